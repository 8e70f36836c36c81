#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::fixed_ids;
use followledger_core::extract::{extract_states, MembershipSets};
use followledger_core::model::RelationshipState;
use followledger_core::reduce::{ChangeSetReducer, ReducerOptions};
use proptest::prelude::*;
use std::collections::BTreeMap;

const POOL: &[&str] = &["ana", "ben", "cy", "dee", "eli", "fay"];

fn membership() -> impl Strategy<Value = MembershipSets> {
    (
        proptest::sample::subsequence(POOL, 0..=POOL.len()),
        proptest::sample::subsequence(POOL, 0..=POOL.len()),
    )
        .prop_map(|(followed, nfb)| MembershipSets::from_raw(followed, nfb))
}

proptest! {
    #[test]
    fn prop_extraction_is_deterministic(sets in membership()) {
        prop_assert_eq!(extract_states(&sets), extract_states(&sets));
    }

    #[test]
    fn prop_follower_implies_following(sets in membership()) {
        for state in extract_states(&sets).states.values() {
            prop_assert!(!state.follower || state.following);
        }
    }

    #[test]
    fn prop_first_snapshot_is_exhaustive(sets in membership()) {
        let mut reducer = ChangeSetReducer::new(&fixed_ids, ReducerOptions::default());
        let states = extract_states(&sets).states;

        let emitted = reducer.apply("t1", &states);

        match emitted {
            None => prop_assert!(states.is_empty()),
            Some(snapshot) => {
                let names: Vec<&String> =
                    snapshot.changed_users.iter().map(|e| &e.username).collect();
                let expected: Vec<&String> = states.keys().collect();
                prop_assert_eq!(names, expected);
            }
        }
    }

    #[test]
    fn prop_replaying_a_time_point_emits_nothing(
        history in proptest::collection::vec(membership(), 1..6)
    ) {
        let mut reducer = ChangeSetReducer::new(&fixed_ids, ReducerOptions::default());
        let mut last = BTreeMap::new();
        for sets in &history {
            last = extract_states(sets).states;
            reducer.apply("t", &last);
        }

        prop_assert!(reducer.apply("again", &last).is_none());
    }

    #[test]
    fn prop_accumulator_matches_latest_observation(
        history in proptest::collection::vec(membership(), 1..6)
    ) {
        let mut reducer = ChangeSetReducer::new(&fixed_ids, ReducerOptions::default());
        let mut states = BTreeMap::new();
        for sets in &history {
            states = extract_states(sets).states;
            reducer.apply("t", &states);
        }

        for username in reducer.known_users() {
            let expected = states
                .get(username)
                .copied()
                .unwrap_or(RelationshipState::REMOVED);
            prop_assert_eq!(reducer.last_state(username), Some(expected));
        }
    }
}
