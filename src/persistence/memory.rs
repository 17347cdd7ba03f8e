//! In-memory store for unit tests and local development.
//!
//! Every table lives behind a single [`tokio::sync::Mutex`], so each store
//! operation is atomic, which is the same guarantee the PostgreSQL
//! implementation gets from transactions.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::store::{JoinLookup, NewPool, PoolStore, StoreError};
use crate::domain::{JoinCode, ParticipantPreview, PoolId, PoolOwner, PoolSummary, UserId};

#[derive(Debug, Clone)]
struct PoolRow {
    id: PoolId,
    title: String,
    code: String,
    owner: Option<UserId>,
}

#[derive(Debug, Clone)]
struct UserRow {
    name: String,
    avatar_url: Option<String>,
}

#[derive(Debug, Clone)]
struct ParticipantRow {
    id: Uuid,
    pool: PoolId,
    user: UserId,
}

#[derive(Debug, Default)]
struct Tables {
    // Vecs keep insertion order: pools are listed newest first by
    // reversing it, participants preview in join order.
    pools: Vec<PoolRow>,
    users: HashMap<UserId, UserRow>,
    participants: Vec<ParticipantRow>,
    guesses: Vec<(PoolId, UserId)>,
}

/// In-memory [`PoolStore`] with the same atomicity guarantees as the
/// PostgreSQL implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user row, standing in for the external identity flow
    /// that owns the users table in production.
    pub async fn add_user(&self, id: UserId, name: &str, avatar_url: Option<&str>) {
        let mut tables = self.tables.lock().await;
        tables.users.insert(
            id,
            UserRow {
                name: name.to_string(),
                avatar_url: avatar_url.map(str::to_string),
            },
        );
    }

    /// Records a guess against a pool.
    pub async fn add_guess(&self, pool: PoolId, user: UserId) {
        self.tables.lock().await.guesses.push((pool, user));
    }
}

fn summarize(tables: &Tables, row: &PoolRow) -> PoolSummary {
    let participants: Vec<ParticipantPreview> = tables
        .participants
        .iter()
        .filter(|pc| pc.pool == row.id)
        .take(4)
        .map(|pc| ParticipantPreview {
            id: pc.id,
            avatar_url: tables
                .users
                .get(&pc.user)
                .and_then(|u| u.avatar_url.clone()),
        })
        .collect();
    let participant_count = tables
        .participants
        .iter()
        .filter(|pc| pc.pool == row.id)
        .count() as i64;
    let owner = row.owner.and_then(|id| {
        tables.users.get(&id).map(|u| PoolOwner {
            id,
            name: u.name.clone(),
        })
    });
    PoolSummary {
        id: row.id,
        title: row.title.clone(),
        code: row.code.clone(),
        owner_id: row.owner,
        participant_count,
        participants,
        owner,
    }
}

#[async_trait]
impl PoolStore for MemoryStore {
    async fn insert_pool(&self, pool: &NewPool) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.pools.iter().any(|p| p.code == pool.code.as_str()) {
            return Err(StoreError::DuplicateCode);
        }
        tables.pools.push(PoolRow {
            id: pool.id,
            title: pool.title.clone(),
            code: pool.code.as_str().to_string(),
            owner: pool.owner,
        });
        if let Some(owner) = pool.owner {
            tables.participants.push(ParticipantRow {
                id: Uuid::new_v4(),
                pool: pool.id,
                user: owner,
            });
        }
        Ok(())
    }

    async fn find_pool_for_join(
        &self,
        code: &JoinCode,
        user: UserId,
    ) -> Result<Option<JoinLookup>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .pools
            .iter()
            .find(|p| p.code == code.as_str())
            .map(|p| JoinLookup {
                pool_id: p.id,
                owner: p.owner,
                already_joined: tables
                    .participants
                    .iter()
                    .any(|pc| pc.pool == p.id && pc.user == user),
            }))
    }

    async fn complete_join(
        &self,
        pool: PoolId,
        user: UserId,
        claim_ownership: bool,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        if !tables.pools.iter().any(|p| p.id == pool) {
            return Err(StoreError::Unavailable(format!("pool {pool} not found")));
        }
        if tables
            .participants
            .iter()
            .any(|pc| pc.pool == pool && pc.user == user)
        {
            return Ok(false);
        }
        if claim_ownership
            && let Some(row) = tables.pools.iter_mut().find(|p| p.id == pool)
            && row.owner.is_none()
        {
            row.owner = Some(user);
        }
        tables.participants.push(ParticipantRow {
            id: Uuid::new_v4(),
            pool,
            user,
        });
        Ok(true)
    }

    async fn pool_summary(&self, id: PoolId) -> Result<Option<PoolSummary>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .pools
            .iter()
            .find(|p| p.id == id)
            .map(|row| summarize(&tables, row)))
    }

    async fn pool_summaries_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<PoolSummary>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .pools
            .iter()
            .rev()
            .filter(|p| {
                tables
                    .participants
                    .iter()
                    .any(|pc| pc.pool == p.id && pc.user == user)
            })
            .map(|row| summarize(&tables, row))
            .collect())
    }

    async fn count_pools(&self) -> Result<i64, StoreError> {
        Ok(self.tables.lock().await.pools.len() as i64)
    }

    async fn count_users(&self) -> Result<i64, StoreError> {
        Ok(self.tables.lock().await.users.len() as i64)
    }

    async fn count_guesses(&self) -> Result<i64, StoreError> {
        Ok(self.tables.lock().await.guesses.len() as i64)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn new_pool(owner: Option<UserId>) -> NewPool {
        NewPool {
            id: PoolId::new(),
            title: "quarter finals".to_string(),
            code: JoinCode::generate(),
            owner,
        }
    }

    fn user() -> UserId {
        UserId::from_uuid(Uuid::new_v4())
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_code() {
        let store = MemoryStore::new();
        let first = new_pool(None);
        let mut second = new_pool(None);
        second.code = first.code.clone();

        assert!(store.insert_pool(&first).await.is_ok());
        let result = store.insert_pool(&second).await;
        assert!(matches!(result, Err(StoreError::DuplicateCode)));
        let Ok(count) = store.count_pools().await else {
            panic!("count failed");
        };
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn owned_insert_self_joins() {
        let store = MemoryStore::new();
        let owner = user();
        let pool = new_pool(Some(owner));
        let Ok(()) = store.insert_pool(&pool).await else {
            panic!("insert failed");
        };

        let Ok(Some(lookup)) = store.find_pool_for_join(&pool.code, owner).await else {
            panic!("lookup failed");
        };
        assert!(lookup.already_joined);
        assert_eq!(lookup.owner, Some(owner));
    }

    #[tokio::test]
    async fn complete_join_is_a_no_op_for_existing_participant() {
        let store = MemoryStore::new();
        let joiner = user();
        let pool = new_pool(None);
        let Ok(()) = store.insert_pool(&pool).await else {
            panic!("insert failed");
        };

        let Ok(first) = store.complete_join(pool.id, joiner, true).await else {
            panic!("join failed");
        };
        let Ok(second) = store.complete_join(pool.id, joiner, true).await else {
            panic!("join failed");
        };
        assert!(first);
        assert!(!second);

        let Ok(Some(summary)) = store.pool_summary(pool.id).await else {
            panic!("summary failed");
        };
        assert_eq!(summary.participant_count, 1);
        assert_eq!(summary.owner_id, Some(joiner));
    }

    #[tokio::test]
    async fn counters_track_rows() {
        let store = MemoryStore::new();
        let u = user();
        store.add_user(u, "Ana", Some("https://example.com/ana.png")).await;
        let pool = new_pool(Some(u));
        let Ok(()) = store.insert_pool(&pool).await else {
            panic!("insert failed");
        };
        store.add_guess(pool.id, u).await;

        let Ok(pools) = store.count_pools().await else {
            panic!("count failed");
        };
        let Ok(users) = store.count_users().await else {
            panic!("count failed");
        };
        let Ok(guesses) = store.count_guesses().await else {
            panic!("count failed");
        };
        assert_eq!((pools, users, guesses), (1, 1, 1));
    }
}
