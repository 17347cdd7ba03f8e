//! Store-access interface consumed by the pool lifecycle service.

use async_trait::async_trait;

use crate::domain::{JoinCode, PoolId, PoolSummary, UserId};

/// Failure surfaced by a [`PoolStore`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The generated join code is already taken by another pool.
    #[error("join code already in use")]
    DuplicateCode,

    /// The underlying store failed or is unavailable.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A pool row to be inserted.
#[derive(Debug, Clone)]
pub struct NewPool {
    /// Identifier assigned by the service.
    pub id: PoolId,
    /// Pool title, already validated.
    pub title: String,
    /// Generated join code.
    pub code: JoinCode,
    /// Owner when the creator was authenticated. The owner is self-joined
    /// as the first participant in the same transaction.
    pub owner: Option<UserId>,
}

/// Result of looking up a pool by join code on behalf of a caller.
#[derive(Debug, Clone, Copy)]
pub struct JoinLookup {
    /// Pool addressed by the code.
    pub pool_id: PoolId,
    /// Current owner, if any.
    pub owner: Option<UserId>,
    /// Whether a participant row already exists for the caller.
    pub already_joined: bool,
}

/// Durable storage operations needed by the pool lifecycle service.
///
/// Implementations must make [`complete_join`](PoolStore::complete_join)
/// atomic: the ownership claim and the participant insert either both take
/// effect or neither does.
#[async_trait]
pub trait PoolStore: std::fmt::Debug + Send + Sync {
    /// Inserts a pool, self-joining the owner when present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateCode`] when the code is taken, with
    /// no row written, or [`StoreError::Unavailable`] on store failure.
    async fn insert_pool(&self, pool: &NewPool) -> Result<(), StoreError>;

    /// Looks up a pool by join code together with the caller's membership.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on store failure.
    async fn find_pool_for_join(
        &self,
        code: &JoinCode,
        user: UserId,
    ) -> Result<Option<JoinLookup>, StoreError>;

    /// Claims ownership (when `claim_ownership` and the owner is still
    /// unset) and inserts the participant row, atomically. Returns `false`
    /// without side effects when the participant row already exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on store failure.
    async fn complete_join(
        &self,
        pool: PoolId,
        user: UserId,
        claim_ownership: bool,
    ) -> Result<bool, StoreError>;

    /// Summary of a single pool by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on store failure.
    async fn pool_summary(&self, id: PoolId) -> Result<Option<PoolSummary>, StoreError>;

    /// Summaries of every pool the user participates in, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on store failure.
    async fn pool_summaries_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<PoolSummary>, StoreError>;

    /// Total number of pools.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on store failure.
    async fn count_pools(&self) -> Result<i64, StoreError>;

    /// Total number of users.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on store failure.
    async fn count_users(&self) -> Result<i64, StoreError>;

    /// Total number of guesses.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on store failure.
    async fn count_guesses(&self) -> Result<i64, StoreError>;
}
