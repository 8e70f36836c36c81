//! Per-user records and the change entries emitted into snapshots.

use crate::model::state::RelationshipState;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A previous username of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub username: String,
    pub changed_at: String,
}

/// Identity and user-managed flags of one username
///
/// The flags are defaulted here and never computed by the reducer; they
/// exist so downstream tools find them on every entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub profile_url: String,
    pub uuid: String,
    pub whitelisted: bool,
    pub blocked: bool,
    pub aliases: Vec<AliasEntry>,
}

impl UserRecord {
    pub fn new(
        username: impl Into<String>,
        profile_url: impl Into<String>,
        uuid: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            profile_url: profile_url.into(),
            uuid: uuid.into(),
            whitelisted: false,
            blocked: false,
            aliases: Vec::new(),
        }
    }

    /// Materialize this record at `state` as a change entry
    pub fn to_entry(&self, state: RelationshipState, order_index: Option<u32>) -> ChangeEntry {
        ChangeEntry {
            username: self.username.clone(),
            profile_url: self.profile_url.clone(),
            follower: state.follower,
            following: state.following,
            uuid: self.uuid.clone(),
            whitelisted: self.whitelisted,
            blocked: self.blocked,
            aliases: self.aliases.clone(),
            order_index,
            extra: Map::new(),
        }
    }
}

/// One user in a snapshot's `changed_users` list
///
/// Fields this crate does not model (`full_name`, `is_verified`,
/// `order_index_following`, ...) are kept in `extra` and written back out
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub username: String,
    #[serde(default)]
    pub profile_url: String,
    #[serde(default)]
    pub follower: bool,
    #[serde(default)]
    pub following: bool,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub whitelisted: bool,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub aliases: Vec<AliasEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChangeEntry {
    pub fn state(&self) -> RelationshipState {
        RelationshipState {
            follower: self.follower,
            following: self.following,
        }
    }
}
