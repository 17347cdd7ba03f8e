//! PostgreSQL implementation of the store seam.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::store::{JoinLookup, NewPool, PoolStore, StoreError};
use crate::domain::{JoinCode, ParticipantPreview, PoolId, PoolOwner, PoolSummary, UserId};

/// Columns shared by the summary queries:
/// id, title, code, owner id, owner name, participant count.
type SummaryRow = (Uuid, String, String, Option<Uuid>, Option<String>, i64);

/// PostgreSQL-backed [`PoolStore`] using `sqlx::PgPool`.
///
/// Queries are bound at runtime; uniqueness of join codes and of
/// (pool, user) participant pairs is backed by the UNIQUE constraints in
/// the schema, with `ON CONFLICT DO NOTHING` turning races into clean
/// outcomes instead of errors.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_previews(&self, pool_id: Uuid) -> Result<Vec<ParticipantPreview>, StoreError> {
        let rows = sqlx::query_as::<_, (Uuid, Option<String>)>(
            "SELECT pc.id, u.avatar_url FROM participants pc \
             JOIN users u ON u.id = pc.user_id \
             WHERE pc.pool_id = $1 ORDER BY pc.joined_at LIMIT 4",
        )
        .bind(pool_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|(id, avatar_url)| ParticipantPreview { id, avatar_url })
            .collect())
    }

    async fn count(&self, query: &str) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>(query)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl PoolStore for PostgresStore {
    async fn insert_pool(&self, pool: &NewPool) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let inserted = sqlx::query(
            "INSERT INTO pools (id, title, code, owner_id) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (code) DO NOTHING",
        )
        .bind(pool.id.into_uuid())
        .bind(&pool.title)
        .bind(pool.code.as_str())
        .bind(pool.owner.map(UserId::into_uuid))
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await.map_err(db_err)?;
            return Err(StoreError::DuplicateCode);
        }

        if let Some(owner) = pool.owner {
            sqlx::query("INSERT INTO participants (id, pool_id, user_id) VALUES ($1, $2, $3)")
                .bind(Uuid::new_v4())
                .bind(pool.id.into_uuid())
                .bind(owner.into_uuid())
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn find_pool_for_join(
        &self,
        code: &JoinCode,
        user: UserId,
    ) -> Result<Option<JoinLookup>, StoreError> {
        let row = sqlx::query_as::<_, (Uuid, Option<Uuid>, bool)>(
            "SELECT p.id, p.owner_id, EXISTS ( \
                 SELECT 1 FROM participants pc \
                 WHERE pc.pool_id = p.id AND pc.user_id = $2 \
             ) FROM pools p WHERE p.code = $1",
        )
        .bind(code.as_str())
        .bind(user.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|(pool_id, owner, already_joined)| JoinLookup {
            pool_id: PoolId::from_uuid(pool_id),
            owner: owner.map(UserId::from_uuid),
            already_joined,
        }))
    }

    async fn complete_join(
        &self,
        pool: PoolId,
        user: UserId,
        claim_ownership: bool,
    ) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        if claim_ownership {
            // Set-if-null keeps a concurrent claim from overwriting an
            // owner assigned after our lookup.
            sqlx::query("UPDATE pools SET owner_id = $1 WHERE id = $2 AND owner_id IS NULL")
                .bind(user.into_uuid())
                .bind(pool.into_uuid())
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }

        let inserted = sqlx::query(
            "INSERT INTO participants (id, pool_id, user_id) VALUES ($1, $2, $3) \
             ON CONFLICT (pool_id, user_id) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(pool.into_uuid())
        .bind(user.into_uuid())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if inserted.rows_affected() == 0 {
            // Lost a race with an identical join. Roll the ownership claim
            // back so the operation has no partial effect.
            tx.rollback().await.map_err(db_err)?;
            return Ok(false);
        }

        tx.commit().await.map_err(db_err)?;
        Ok(true)
    }

    async fn pool_summary(&self, id: PoolId) -> Result<Option<PoolSummary>, StoreError> {
        let row = sqlx::query_as::<_, SummaryRow>(
            "SELECT p.id, p.title, p.code, p.owner_id, u.name, \
                    (SELECT COUNT(*) FROM participants pc WHERE pc.pool_id = p.id) \
             FROM pools p LEFT JOIN users u ON u.id = p.owner_id \
             WHERE p.id = $1",
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => {
                let previews = self.load_previews(row.0).await?;
                Ok(Some(summary_from_row(row, previews)))
            }
            None => Ok(None),
        }
    }

    async fn pool_summaries_for_user(
        &self,
        user: UserId,
    ) -> Result<Vec<PoolSummary>, StoreError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            "SELECT p.id, p.title, p.code, p.owner_id, u.name, \
                    (SELECT COUNT(*) FROM participants pc WHERE pc.pool_id = p.id) \
             FROM pools p LEFT JOIN users u ON u.id = p.owner_id \
             WHERE EXISTS ( \
                 SELECT 1 FROM participants me \
                 WHERE me.pool_id = p.id AND me.user_id = $1 \
             ) \
             ORDER BY p.created_at DESC",
        )
        .bind(user.into_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            let previews = self.load_previews(row.0).await?;
            summaries.push(summary_from_row(row, previews));
        }
        Ok(summaries)
    }

    async fn count_pools(&self) -> Result<i64, StoreError> {
        self.count("SELECT COUNT(*) FROM pools").await
    }

    async fn count_users(&self) -> Result<i64, StoreError> {
        self.count("SELECT COUNT(*) FROM users").await
    }

    async fn count_guesses(&self) -> Result<i64, StoreError> {
        self.count("SELECT COUNT(*) FROM guesses").await
    }
}

fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn summary_from_row(row: SummaryRow, participants: Vec<ParticipantPreview>) -> PoolSummary {
    let (id, title, code, owner_id, owner_name, participant_count) = row;
    let owner = match (owner_id, owner_name) {
        (Some(id), Some(name)) => Some(PoolOwner {
            id: UserId::from_uuid(id),
            name,
        }),
        _ => None,
    };
    PoolSummary {
        id: PoolId::from_uuid(id),
        title,
        code,
        owner_id: owner_id.map(UserId::from_uuid),
        participant_count,
        participants,
        owner,
    }
}
