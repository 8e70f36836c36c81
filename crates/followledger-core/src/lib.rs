//! FollowLedger Core - Change log reconciliation for follow snapshots
//!
//! This crate turns a sequence of dated follow exports into a change-log
//! document, including:
//! - CSV export loading with suffixed, repeated, or companion columns
//! - Per-user relationship state extraction from membership sets
//! - Carry-forward reduction that emits only first sightings and changes
//! - Stable per-user identity (content hash or random)
//! - Document assembly, atomic persistence, and enrichment from richer snapshots

pub mod assemble;
pub mod config;
pub mod enrich;
pub mod errors;
pub mod extract;
pub mod identity;
pub mod input;
pub mod logging_facility;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod reduce;
pub mod timepoint;

// Re-export commonly used types
pub use assemble::{assemble, AccountInfo};
pub use config::LedgerConfig;
pub use errors::{ExError, ExErrorKind, LedgerError, Result};
pub use extract::{extract_states, MembershipSets};
pub use identity::{ContentHashIds, IdStrategy, IdStrategyKind, RandomIds};
pub use input::TableLayout;
pub use model::{ChangeEntry, Document, RelationshipState, Snapshot, UserRecord};
pub use reduce::{reconcile, ChangeSetReducer, ReducerOptions, ReductionStats};
pub use timepoint::{ResolvedTimePoint, TimePointInput};
