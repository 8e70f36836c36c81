pub mod document;
pub mod entry;
pub mod state;

pub use document::{Account, Document, SchemaInfo, Snapshot, SCHEMA_VERSION};
pub use entry::{AliasEntry, ChangeEntry, UserRecord};
pub use state::RelationshipState;
