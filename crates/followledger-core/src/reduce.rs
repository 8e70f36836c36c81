//! Change-set reduction.
//!
//! Walks time points in chronological order and keeps, per username, the
//! last state written to the change log. A time point contributes a
//! [`Snapshot`] only for usernames whose state differs from that record:
//! new usernames, changed usernames, and usernames that vanished from both
//! source sets (which are forced to `(false, false)`).
//!
//! A reducer holds the accumulator for exactly one pass. Build a new one per
//! run; nothing is shared between runs.

use crate::extract::extract_states;
use crate::identity::{profile_url, IdStrategy, DEFAULT_PROFILE_URL_BASE};
use crate::model::{ChangeEntry, RelationshipState, Snapshot, UserRecord};
use crate::timepoint::ResolvedTimePoint;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Knobs that shape emitted entries but not which entries are emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducerOptions {
    pub profile_url_base: String,
    /// Stamp `order_index` on entries, counting from 0 within each snapshot
    pub assign_order_index: bool,
}

impl Default for ReducerOptions {
    fn default() -> Self {
        Self {
            profile_url_base: DEFAULT_PROFILE_URL_BASE.to_string(),
            assign_order_index: false,
        }
    }
}

/// Counters for one reduction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReductionStats {
    pub time_points: usize,
    pub snapshots_emitted: usize,
    pub entries_emitted: usize,
    pub unique_users: usize,
}

/// Why an entry was emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmitReason {
    FirstSeen,
    Changed,
    Disappeared,
}

impl EmitReason {
    fn as_str(self) -> &'static str {
        match self {
            EmitReason::FirstSeen => "first_seen",
            EmitReason::Changed => "changed",
            EmitReason::Disappeared => "disappeared",
        }
    }
}

/// Accumulator for one reduction pass
pub struct ChangeSetReducer<'a> {
    ids: &'a dyn IdStrategy,
    options: ReducerOptions,
    last_state: HashMap<String, RelationshipState>,
    known_users: BTreeSet<String>,
    records: HashMap<String, UserRecord>,
    stats: ReductionStats,
}

impl<'a> ChangeSetReducer<'a> {
    pub fn new(ids: &'a dyn IdStrategy, options: ReducerOptions) -> Self {
        Self {
            ids,
            options,
            last_state: HashMap::new(),
            known_users: BTreeSet::new(),
            records: HashMap::new(),
            stats: ReductionStats::default(),
        }
    }

    /// Fold one time point into the accumulator
    ///
    /// `states` holds every username observed at this time point. Returns
    /// `None` when nothing changed, so the caller omits the time point.
    ///
    /// The first time point needs no special case: with an empty accumulator
    /// every observed username is new and is emitted.
    pub fn apply(
        &mut self,
        timestamp: &str,
        states: &BTreeMap<String, RelationshipState>,
    ) -> Option<Snapshot> {
        self.stats.time_points += 1;

        let disappeared: BTreeSet<&str> = self
            .known_users
            .iter()
            .map(String::as_str)
            .filter(|u| !states.contains_key(*u))
            .collect();

        let candidates: BTreeSet<String> = states
            .keys()
            .map(String::as_str)
            .chain(disappeared.iter().copied())
            .map(str::to_string)
            .collect();

        let mut changed_users: Vec<ChangeEntry> = Vec::new();

        for username in candidates {
            let current = states
                .get(&username)
                .copied()
                .unwrap_or(RelationshipState::REMOVED);

            let reason = match self.last_state.get(&username) {
                None => EmitReason::FirstSeen,
                Some(last) if *last == current => continue,
                Some(_) if !states.contains_key(&username) => EmitReason::Disappeared,
                Some(_) => EmitReason::Changed,
            };

            let order_index = self
                .options
                .assign_order_index
                .then_some(changed_users.len() as u32);
            let entry = self.record_for(&username).to_entry(current, order_index);

            tracing::debug!(
                op = "reduce",
                time_point = timestamp,
                username = username.as_str(),
                reason = reason.as_str(),
                follower = current.follower,
                following = current.following,
            );

            changed_users.push(entry);
            self.last_state.insert(username.clone(), current);
            self.known_users.insert(username);
        }

        self.stats.unique_users = self.known_users.len();

        if changed_users.is_empty() {
            tracing::debug!(
                op = "reduce",
                time_point = timestamp,
                "no changes, time point omitted"
            );
            return None;
        }

        self.stats.snapshots_emitted += 1;
        self.stats.entries_emitted += changed_users.len();

        Some(Snapshot {
            timestamp: timestamp.to_string(),
            changed_users,
        })
    }

    /// Identity of `username`, minted once per pass
    fn record_for(&mut self, username: &str) -> &UserRecord {
        let ids = self.ids;
        let base = &self.options.profile_url_base;
        self.records
            .entry(username.to_string())
            .or_insert_with(|| {
                UserRecord::new(username, profile_url(base, username), ids.id_for(username))
            })
    }

    /// Last state written to the change log for `username`
    pub fn last_state(&self, username: &str) -> Option<RelationshipState> {
        self.last_state.get(username).copied()
    }

    /// Every username emitted so far in this pass
    pub fn known_users(&self) -> &BTreeSet<String> {
        &self.known_users
    }

    pub fn stats(&self) -> ReductionStats {
        self.stats
    }
}

/// Extract and reduce an ordered sequence of time points
///
/// `time_points` must already be in chronological order (see
/// [`crate::timepoint::resolve_time_points`]).
pub fn reconcile(
    time_points: &[ResolvedTimePoint],
    ids: &dyn IdStrategy,
    options: ReducerOptions,
) -> (Vec<Snapshot>, ReductionStats) {
    let mut reducer = ChangeSetReducer::new(ids, options);
    let snapshots: Vec<Snapshot> = time_points
        .iter()
        .filter_map(|tp| {
            let extraction = extract_states(&tp.sets);
            reducer.apply(&tp.timestamp, &extraction.states)
        })
        .collect();
    (snapshots, reducer.stats())
}
