use serde::{Deserialize, Serialize};

/// Relationship between the observing account and one username at one time point
///
/// `following` means the account follows the username; `follower` means the
/// username follows the account back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RelationshipState {
    pub follower: bool,
    pub following: bool,
}

impl RelationshipState {
    /// State of a username absent from every source set
    pub const REMOVED: RelationshipState = RelationshipState {
        follower: false,
        following: false,
    };

    /// Derive the state from set membership
    ///
    /// Membership in the not-following-back set always clears `follower`,
    /// and `follower` is never set without `following`.
    pub fn from_membership(in_followed: bool, in_not_following_back: bool) -> Self {
        Self {
            follower: in_followed && !in_not_following_back,
            following: in_followed,
        }
    }
}
