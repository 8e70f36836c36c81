//! The output document handed to the downstream merge tool.

use crate::model::entry::ChangeEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Current document schema version
pub const SCHEMA_VERSION: u32 = 1;

/// The observing account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    pub profile_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Changes observed at one time point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: String,
    #[serde(default)]
    pub changed_users: Vec<ChangeEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub version: u32,
}

impl Default for SchemaInfo {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
        }
    }
}

/// Account metadata plus the ordered change log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub account: Account,
    pub snapshots: Vec<Snapshot>,
    #[serde(default)]
    pub schema: SchemaInfo,
    #[serde(default)]
    pub enriched_at: String,
}

impl Document {
    /// Total number of change entries across all snapshots
    pub fn entry_count(&self) -> usize {
        self.snapshots.iter().map(|s| s.changed_users.len()).sum()
    }
}
