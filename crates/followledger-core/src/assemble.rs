//! Document assembly.
//!
//! Wraps the reducer's snapshots with the configured account, the schema
//! version, and a generation timestamp.

use crate::identity::profile_url;
use crate::model::{Account, Document, SchemaInfo, Snapshot};
use crate::timepoint::iso_now;
use serde_json::Map;

/// Account metadata supplied by configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub username: String,
    pub full_name: String,
    pub profile_url: String,
}

impl AccountInfo {
    /// Account whose profile URL is derived from `base`
    pub fn new(username: &str, full_name: &str, base: &str) -> Self {
        Self {
            username: username.to_string(),
            full_name: full_name.to_string(),
            profile_url: profile_url(base, username),
        }
    }
}

/// Build the document with an explicit `enriched_at`
pub fn assemble(
    account: &AccountInfo,
    snapshots: Vec<Snapshot>,
    enriched_at: String,
) -> Document {
    Document {
        account: Account {
            username: account.username.clone(),
            full_name: account.full_name.clone(),
            profile_url: account.profile_url.clone(),
            extra: Map::new(),
        },
        snapshots,
        schema: SchemaInfo::default(),
        enriched_at,
    }
}

/// Build the document stamped with the current wall-clock time
pub fn assemble_now(account: &AccountInfo, snapshots: Vec<Snapshot>) -> Document {
    assemble(account, snapshots, iso_now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SCHEMA_VERSION;
    use serde_json::json;

    #[test]
    fn test_document_shape() {
        let account = AccountInfo::new("me", "Me Myself", "https://instagram.com/");
        let doc = assemble(
            &account,
            vec![Snapshot {
                timestamp: "2025-06-01T12:00:00".to_string(),
                changed_users: vec![],
            }],
            "2025-10-01T09:00:00".to_string(),
        );

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value["account"],
            json!({
                "username": "me",
                "full_name": "Me Myself",
                "profile_url": "https://instagram.com/me"
            })
        );
        assert_eq!(value["schema"]["version"], SCHEMA_VERSION);
        assert_eq!(value["enriched_at"], "2025-10-01T09:00:00");
        assert_eq!(value["snapshots"][0]["timestamp"], "2025-06-01T12:00:00");
    }

    #[test]
    fn test_assemble_now_stamps_time() {
        let account = AccountInfo::new("me", "", "https://instagram.com/");
        let doc = assemble_now(&account, vec![]);
        assert!(!doc.enriched_at.is_empty());
        assert!(doc.snapshots.is_empty());
    }
}
