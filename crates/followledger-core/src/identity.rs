//! Identifier policies for user records
//!
//! The reducer never decides how a username maps to its `uuid`; it asks an
//! injected [`IdStrategy`]. `ContentHashIds` is deterministic and is the
//! default; `RandomIds` mints a fresh v4 UUID per call.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Default base URL that usernames are appended to
pub const DEFAULT_PROFILE_URL_BASE: &str = "https://instagram.com/";

/// Policy mapping a username to an opaque identifier
pub trait IdStrategy {
    fn id_for(&self, username: &str) -> String;
}

impl<F> IdStrategy for F
where
    F: Fn(&str) -> String,
{
    fn id_for(&self, username: &str) -> String {
        self(username)
    }
}

/// Deterministic identifiers derived from a SHA256 of the username
///
/// The first 16 digest bytes are rendered in the 8-4-4-4-12 UUID layout.
///
/// # Example
/// ```
/// use followledger_core::identity::{ContentHashIds, IdStrategy};
///
/// let ids = ContentHashIds;
/// assert_eq!(ids.id_for("alice"), ids.id_for("alice"));
/// assert_eq!(ids.id_for("alice").len(), 36);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentHashIds;

impl IdStrategy for ContentHashIds {
    fn id_for(&self, username: &str) -> String {
        let digest = Sha256::digest(username.as_bytes());
        let h = hex::encode(&digest[..16]);
        format!(
            "{}-{}-{}-{}-{}",
            &h[0..8],
            &h[8..12],
            &h[12..16],
            &h[16..20],
            &h[20..32]
        )
    }
}

/// Random v4 UUIDs; two calls for the same username differ
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdStrategy for RandomIds {
    fn id_for(&self, _username: &str) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Named strategy, as selected in configuration or on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategyKind {
    #[default]
    Hash,
    Random,
}

impl IdStrategyKind {
    pub fn build(self) -> Box<dyn IdStrategy> {
        match self {
            IdStrategyKind::Hash => Box::new(ContentHashIds),
            IdStrategyKind::Random => Box::new(RandomIds),
        }
    }
}

impl std::str::FromStr for IdStrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hash" => Ok(IdStrategyKind::Hash),
            "random" => Ok(IdStrategyKind::Random),
            other => Err(format!("unknown id strategy '{}' (expected hash or random)", other)),
        }
    }
}

/// Profile URL for `username` under `base`
pub fn profile_url(base: &str, username: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, username)
    } else {
        format!("{}/{}", base, username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_is_uuid_shaped() {
        let id = ContentHashIds.id_for("alice");
        let groups: Vec<usize> = id.split('-').map(str::len).collect();
        assert_eq!(groups, vec![8, 4, 4, 4, 12]);
        assert!(id.chars().all(|c| c == '-' || c.is_ascii_hexdigit()));
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_content_hash_distinguishes_usernames() {
        assert_ne!(ContentHashIds.id_for("alice"), ContentHashIds.id_for("bob"));
    }

    #[test]
    fn test_random_ids_differ() {
        assert_ne!(RandomIds.id_for("alice"), RandomIds.id_for("alice"));
    }

    #[test]
    fn test_closure_is_a_strategy() {
        let ids = |u: &str| format!("id:{}", u);
        assert_eq!(ids.id_for("carol"), "id:carol");
    }

    #[test]
    fn test_strategy_kind_parse() {
        assert_eq!("hash".parse::<IdStrategyKind>(), Ok(IdStrategyKind::Hash));
        assert_eq!("RANDOM".parse::<IdStrategyKind>(), Ok(IdStrategyKind::Random));
        assert!("md5".parse::<IdStrategyKind>().is_err());
    }

    #[test]
    fn test_profile_url_joins_with_single_slash() {
        assert_eq!(
            profile_url("https://instagram.com/", "alice"),
            "https://instagram.com/alice"
        );
        assert_eq!(
            profile_url("https://instagram.com", "alice"),
            "https://instagram.com/alice"
        );
    }
}
