//! Read-model aggregates returned by pool queries.

use super::{PoolId, UserId};

/// One of the sample participants included in a pool summary.
///
/// Summaries carry at most four of these, in join order.
#[derive(Debug, Clone)]
pub struct ParticipantPreview {
    /// Participant row identifier.
    pub id: uuid::Uuid,
    /// Avatar of the participating user, when one is set.
    pub avatar_url: Option<String>,
}

/// Owner identity attached to a pool summary.
#[derive(Debug, Clone)]
pub struct PoolOwner {
    /// Owner's user identifier.
    pub id: UserId,
    /// Owner's display name.
    pub name: String,
}

/// Aggregated view of a pool for the list and detail endpoints.
#[derive(Debug, Clone)]
pub struct PoolSummary {
    /// Pool identifier.
    pub id: PoolId,
    /// Pool title.
    pub title: String,
    /// Shareable join code.
    pub code: String,
    /// Owner's user identifier; unset until ownership is claimed.
    pub owner_id: Option<UserId>,
    /// Total number of participants.
    pub participant_count: i64,
    /// Up to four sample participants, in join order.
    pub participants: Vec<ParticipantPreview>,
    /// Owner projection; unset until ownership is claimed.
    pub owner: Option<PoolOwner>,
}
