//! Pool lifecycle service: creation, join with late ownership claim,
//! listings, and the public counters.

use std::sync::Arc;

use crate::domain::{JoinCode, PoolId, PoolSummary, UserId};
use crate::error::ApiError;
use crate::persistence::{NewPool, PoolStore, StoreError};

/// How many join codes to try before giving up on pool creation.
const CODE_ATTEMPTS: usize = 3;

/// Orchestration layer for the pool lifecycle.
///
/// Stateless coordinator over an injected [`PoolStore`]. Decision logic
/// (idempotent joins, the late ownership claim) lives here; atomicity of
/// the combined owner-claim + participant-insert lives in the store.
#[derive(Debug, Clone)]
pub struct PoolService {
    store: Arc<dyn PoolStore>,
}

impl PoolService {
    /// Creates a new `PoolService`.
    #[must_use]
    pub fn new(store: Arc<dyn PoolStore>) -> Self {
        Self { store }
    }

    /// Creates a pool and returns its join code.
    ///
    /// An authenticated caller becomes owner and first participant in one
    /// transaction. An anonymous caller gets an ownerless pool; missing
    /// authentication is never a reason to fail here, since ownership is
    /// claimed later by the first authenticated joiner.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an empty title and
    /// [`ApiError::Internal`] when no unique code could be allocated.
    pub async fn create_pool(
        &self,
        title: &str,
        caller: Option<UserId>,
    ) -> Result<JoinCode, ApiError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation("title must not be empty".to_string()));
        }

        for _ in 0..CODE_ATTEMPTS {
            let code = JoinCode::generate();
            let pool = NewPool {
                id: PoolId::new(),
                title: title.to_string(),
                code: code.clone(),
                owner: caller,
            };
            match self.store.insert_pool(&pool).await {
                Ok(()) => {
                    tracing::info!(pool_id = %pool.id, owned = caller.is_some(), "pool created");
                    return Ok(code);
                }
                Err(StoreError::DuplicateCode) => continue,
                Err(err) => return Err(err.into()),
            }
        }

        Err(ApiError::Internal(
            "could not allocate a unique join code".to_string(),
        ))
    }

    /// Joins the caller to the pool addressed by `code`.
    ///
    /// The first authenticated joiner of an ownerless pool claims its
    /// ownership as part of the same operation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed code,
    /// [`ApiError::PoolNotFound`] when no pool matches, and
    /// [`ApiError::AlreadyJoined`] when the caller already participates.
    /// None of these mutate stored state.
    pub async fn join_pool(&self, code: &str, caller: UserId) -> Result<(), ApiError> {
        let code = JoinCode::parse(code).map_err(|e| ApiError::Validation(e.to_string()))?;

        let lookup = self
            .store
            .find_pool_for_join(&code, caller)
            .await?
            .ok_or(ApiError::PoolNotFound)?;

        if lookup.already_joined {
            return Err(ApiError::AlreadyJoined);
        }

        // An identical join can still slip in between the lookup and this
        // call; the store reports it as a no-op and rolls back the claim.
        let claim = lookup.owner.is_none();
        if !self.store.complete_join(lookup.pool_id, caller, claim).await? {
            return Err(ApiError::AlreadyJoined);
        }

        tracing::info!(
            pool_id = %lookup.pool_id,
            user_id = %caller,
            claimed_ownership = claim,
            "user joined pool"
        );
        Ok(())
    }

    /// Summaries of every pool the caller participates in, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on store failure.
    pub async fn list_pools_for_user(
        &self,
        caller: UserId,
    ) -> Result<Vec<PoolSummary>, ApiError> {
        Ok(self.store.pool_summaries_for_user(caller).await?)
    }

    /// Summary of a single pool by identifier, or `None` when it does not
    /// exist. Any authenticated caller may look up any pool.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on store failure.
    pub async fn get_pool(&self, id: PoolId) -> Result<Option<PoolSummary>, ApiError> {
        Ok(self.store.pool_summary(id).await?)
    }

    /// Total number of pools.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on store failure.
    pub async fn count_pools(&self) -> Result<i64, ApiError> {
        Ok(self.store.count_pools().await?)
    }

    /// Total number of users.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on store failure.
    pub async fn count_users(&self) -> Result<i64, ApiError> {
        Ok(self.store.count_users().await?)
    }

    /// Total number of guesses.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] on store failure.
    pub async fn count_guesses(&self) -> Result<i64, ApiError> {
        Ok(self.store.count_guesses().await?)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn make_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    fn make_service(store: &Arc<MemoryStore>) -> PoolService {
        let store: Arc<dyn PoolStore> = Arc::clone(store) as Arc<dyn PoolStore>;
        PoolService::new(store)
    }

    fn user() -> UserId {
        UserId::from_uuid(uuid::Uuid::new_v4())
    }

    async fn pool_id_for(store: &MemoryStore, code: &JoinCode) -> PoolId {
        let probe = user();
        let Ok(Some(lookup)) = store.find_pool_for_join(code, probe).await else {
            panic!("pool not found for code");
        };
        lookup.pool_id
    }

    #[tokio::test]
    async fn anonymous_create_yields_ownerless_empty_pool() {
        let store = make_store();
        let service = make_service(&store);

        let Ok(code) = service.create_pool("world cup", None).await else {
            panic!("create failed");
        };
        assert_eq!(code.as_str().len(), 6);
        assert!(
            code.as_str()
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );

        let id = pool_id_for(&store, &code).await;
        let Ok(Some(summary)) = store.pool_summary(id).await else {
            panic!("summary failed");
        };
        assert_eq!(summary.owner_id, None);
        assert_eq!(summary.participant_count, 0);
    }

    #[tokio::test]
    async fn authenticated_create_owns_and_self_joins() {
        let store = make_store();
        let service = make_service(&store);
        let creator = user();

        let Ok(code) = service.create_pool("office pool", Some(creator)).await else {
            panic!("create failed");
        };

        let id = pool_id_for(&store, &code).await;
        let Ok(Some(summary)) = store.pool_summary(id).await else {
            panic!("summary failed");
        };
        assert_eq!(summary.owner_id, Some(creator));
        assert_eq!(summary.participant_count, 1);
    }

    #[tokio::test]
    async fn empty_title_is_rejected_before_any_write() {
        let store = make_store();
        let service = make_service(&store);

        let result = service.create_pool("   ", Some(user())).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
        let Ok(count) = service.count_pools().await else {
            panic!("count failed");
        };
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn join_unknown_code_is_not_found_and_mutates_nothing() {
        let store = make_store();
        let service = make_service(&store);
        let Ok(code) = service.create_pool("untouched", None).await else {
            panic!("create failed");
        };
        let id = pool_id_for(&store, &code).await;

        let result = service.join_pool("ZZZZ99", user()).await;
        assert!(matches!(result, Err(ApiError::PoolNotFound)));

        let Ok(count) = service.count_pools().await else {
            panic!("count failed");
        };
        assert_eq!(count, 1);
        let Ok(Some(summary)) = store.pool_summary(id).await else {
            panic!("summary failed");
        };
        assert_eq!(summary.participant_count, 0);
    }

    #[tokio::test]
    async fn second_join_is_already_joined_with_no_extra_row() {
        let store = make_store();
        let service = make_service(&store);
        let joiner = user();
        let Ok(code) = service.create_pool("round of 16", None).await else {
            panic!("create failed");
        };
        let id = pool_id_for(&store, &code).await;

        let Ok(()) = service.join_pool(code.as_str(), joiner).await else {
            panic!("first join failed");
        };
        let second = service.join_pool(code.as_str(), joiner).await;
        assert!(matches!(second, Err(ApiError::AlreadyJoined)));

        let Ok(Some(summary)) = store.pool_summary(id).await else {
            panic!("summary failed");
        };
        assert_eq!(summary.participant_count, 1);
    }

    #[tokio::test]
    async fn join_accepts_lowercase_codes() {
        let store = make_store();
        let service = make_service(&store);
        let Ok(code) = service.create_pool("case test", None).await else {
            panic!("create failed");
        };

        let lowered = code.as_str().to_ascii_lowercase();
        let Ok(()) = service.join_pool(&lowered, user()).await else {
            panic!("lowercase join failed");
        };
    }

    #[tokio::test]
    async fn first_joiner_claims_ownership_exactly_once() {
        let store = make_store();
        let service = make_service(&store);
        let first = user();
        let second = user();
        let Ok(code) = service.create_pool("anonymous pool", None).await else {
            panic!("create failed");
        };
        let id = pool_id_for(&store, &code).await;

        let Ok(()) = service.join_pool(code.as_str(), first).await else {
            panic!("first join failed");
        };
        let Ok(Some(summary)) = store.pool_summary(id).await else {
            panic!("summary failed");
        };
        assert_eq!(summary.owner_id, Some(first));

        let Ok(()) = service.join_pool(code.as_str(), second).await else {
            panic!("second join failed");
        };
        let Ok(Some(summary)) = store.pool_summary(id).await else {
            panic!("summary failed");
        };
        assert_eq!(summary.owner_id, Some(first));
        assert_eq!(summary.participant_count, 2);
    }

    #[tokio::test]
    async fn listing_returns_only_joined_pools() {
        let store = make_store();
        let service = make_service(&store);
        let member = user();
        let outsider = user();

        let Ok(joined_code) = service.create_pool("mine", Some(member)).await else {
            panic!("create failed");
        };
        let Ok(_other) = service.create_pool("mine", Some(outsider)).await else {
            panic!("create failed");
        };

        let Ok(pools) = service.list_pools_for_user(member).await else {
            panic!("list failed");
        };
        assert_eq!(pools.len(), 1);
        let Some(only) = pools.first() else {
            panic!("missing pool");
        };
        assert_eq!(only.code, joined_code.as_str());
    }

    #[tokio::test]
    async fn get_pool_is_visible_to_non_participants() {
        let store = make_store();
        let service = make_service(&store);
        let Ok(code) = service.create_pool("public summary", Some(user())).await else {
            panic!("create failed");
        };
        let id = pool_id_for(&store, &code).await;

        let Ok(Some(summary)) = service.get_pool(id).await else {
            panic!("expected a summary");
        };
        assert_eq!(summary.code, code.as_str());

        let Ok(missing) = service.get_pool(PoolId::new()).await else {
            panic!("lookup failed");
        };
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn simultaneous_joins_resolve_to_a_single_participant() {
        for _ in 0..25 {
            let store = make_store();
            let service = make_service(&store);
            let joiner = user();
            let Ok(code) = service.create_pool("race", None).await else {
                panic!("create failed");
            };
            let id = pool_id_for(&store, &code).await;

            let left = {
                let service = service.clone();
                let code = code.clone();
                tokio::spawn(async move { service.join_pool(code.as_str(), joiner).await })
            };
            let right = {
                let service = service.clone();
                let code = code.clone();
                tokio::spawn(async move { service.join_pool(code.as_str(), joiner).await })
            };

            let (left, right) = tokio::join!(left, right);
            let (Ok(left), Ok(right)) = (left, right) else {
                panic!("join task panicked");
            };

            let successes = [&left, &right].iter().filter(|r| r.is_ok()).count();
            assert_eq!(successes, 1, "exactly one join may win");
            for outcome in [left, right] {
                if let Err(err) = outcome {
                    assert!(matches!(err, ApiError::AlreadyJoined));
                }
            }

            let Ok(Some(summary)) = store.pool_summary(id).await else {
                panic!("summary failed");
            };
            assert_eq!(summary.participant_count, 1);
            assert_eq!(summary.owner_id, Some(joiner));
        }
    }
}
