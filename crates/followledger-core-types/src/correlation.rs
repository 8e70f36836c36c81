//! Correlation identifier for a single pipeline run
//!
//! Every reconcile or enrich invocation gets one `RunId`; the CLI opens a
//! span carrying it so all events of that run can be grouped downstream.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one run of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Generate a new time-ordered RunId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_unique() {
        let a = RunId::new();
        let b = RunId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_run_id_display_matches_as_str() {
        let id = RunId::from_string("run-1".to_string());
        assert_eq!(id.to_string(), "run-1");
        assert_eq!(id.as_str(), "run-1");
    }

    #[test]
    fn test_run_id_serde_is_transparent_string() {
        let id = RunId::from_string("run-2".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"run-2\"");
    }
}
