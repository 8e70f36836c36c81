//! Snapshot extraction.
//!
//! Turns the two membership sets of one time point into a username →
//! [`RelationshipState`] mapping. Derivation is pure: the same sets always
//! produce the same mapping, and the mapping is a `BTreeMap` so iteration
//! order is fixed too.

use crate::model::RelationshipState;
use followledger_core_types::schema::EVENT_CONFLICT;
use std::collections::{BTreeMap, BTreeSet};

/// The two membership sets observed at one time point
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipSets {
    /// Usernames the account follows
    pub followed: BTreeSet<String>,
    /// Usernames the account follows that do not follow back
    pub not_following_back: BTreeSet<String>,
}

impl MembershipSets {
    /// Build both sets from raw cells, trimming and dropping blanks
    pub fn from_raw<F, N>(followed: F, not_following_back: N) -> Self
    where
        F: IntoIterator,
        F::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        Self {
            followed: normalize_all(followed),
            not_following_back: normalize_all(not_following_back),
        }
    }

    /// Every username present in either set
    pub fn observed(&self) -> BTreeSet<&str> {
        self.followed
            .iter()
            .chain(self.not_following_back.iter())
            .map(String::as_str)
            .collect()
    }
}

/// Result of extracting one time point
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub states: BTreeMap<String, RelationshipState>,
    /// Usernames listed as not following back without being followed
    pub conflicts: Vec<String>,
}

/// Trim a raw cell; `None` for blank cells
pub fn normalize_username(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn normalize_all<I>(raw: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|cell| normalize_username(cell.as_ref()))
        .collect()
}

/// Derive the state of every observed username at one time point
///
/// A username in `not_following_back` but not in `followed` is kept with
/// state `(false, false)` and reported in `conflicts`, with one warning
/// event per username.
pub fn extract_states(sets: &MembershipSets) -> Extraction {
    let mut extraction = Extraction::default();

    for username in sets.observed() {
        let in_followed = sets.followed.contains(username);
        let in_nfb = sets.not_following_back.contains(username);

        if in_nfb && !in_followed {
            tracing::warn!(
                component = module_path!(),
                op = "extract_states",
                event = EVENT_CONFLICT,
                username = username,
                "listed as not following back but absent from the following set"
            );
            extraction.conflicts.push(username.to_string());
        }

        extraction.states.insert(
            username.to_string(),
            RelationshipState::from_membership(in_followed, in_nfb),
        );
    }

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(followed: &[&str], nfb: &[&str]) -> MembershipSets {
        MembershipSets::from_raw(followed.iter(), nfb.iter())
    }

    #[test]
    fn test_worked_example_first_time_point() {
        let extraction = extract_states(&sets(&["a", "b", "c"], &["b"]));

        assert_eq!(extraction.states.len(), 3);
        assert_eq!(
            extraction.states["a"],
            RelationshipState::from_membership(true, false)
        );
        assert!(!extraction.states["b"].follower);
        assert!(extraction.states["b"].following);
        assert!(extraction.states["c"].follower);
        assert!(extraction.conflicts.is_empty());
    }

    #[test]
    fn test_not_following_back_only_is_conflict() {
        let extraction = extract_states(&sets(&["a"], &["ghost"]));

        assert_eq!(extraction.states["ghost"], RelationshipState::REMOVED);
        assert_eq!(extraction.conflicts, vec!["ghost".to_string()]);
    }

    #[test]
    fn test_cells_are_trimmed_and_blanks_dropped() {
        let s = sets(&["  alice ", "", "   ", "bob"], &[" bob", "\t"]);

        assert_eq!(s.followed.len(), 2);
        assert!(s.followed.contains("alice"));
        assert_eq!(s.not_following_back.len(), 1);

        let extraction = extract_states(&s);
        assert!(!extraction.states["bob"].follower);
        assert!(extraction.states["alice"].follower);
    }

    #[test]
    fn test_empty_sets_extract_nothing() {
        let extraction = extract_states(&MembershipSets::default());
        assert!(extraction.states.is_empty());
    }

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username(" x "), Some("x".to_string()));
        assert_eq!(normalize_username("  "), None);
    }
}
