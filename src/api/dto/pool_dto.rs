//! DTOs for the pool endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{ParticipantPreview, PoolOwner, PoolSummary, UserId};

/// Request body for `POST /pools`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePoolRequest {
    /// Pool title.
    pub title: String,
}

/// Response body for `POST /pools` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatePoolResponse {
    /// Shareable join code of the new pool.
    pub code: String,
}

/// Request body for `POST /pools/join`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinPoolRequest {
    /// Join code of the pool to join.
    pub code: String,
}

/// Bare counter payload for the `/count` endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct CountResponse {
    /// Number of matching rows.
    pub count: i64,
}

/// Aggregate counters, serialized under `_count`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ParticipantCountDto {
    /// Number of participants in the pool.
    pub participants: i64,
}

/// Nested user projection inside a participant preview.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantUserDto {
    /// Avatar of the participating user.
    pub avatar_url: Option<String>,
}

/// One of up to four sample participants in a summary.
#[derive(Debug, Serialize, ToSchema)]
pub struct ParticipantPreviewDto {
    /// Participant row identifier.
    pub id: Uuid,
    /// Projected user fields.
    pub user: ParticipantUserDto,
}

/// Owner projection in a summary.
#[derive(Debug, Serialize, ToSchema)]
pub struct OwnerDto {
    /// Owner's user identifier.
    pub id: Uuid,
    /// Owner's display name.
    pub name: String,
}

/// Pool summary returned by the list and detail endpoints.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolSummaryDto {
    /// Pool identifier.
    pub id: Uuid,
    /// Pool title.
    pub title: String,
    /// Shareable join code.
    pub code: String,
    /// Owner's user identifier; `null` until ownership is claimed.
    pub owner_id: Option<Uuid>,
    /// Aggregate counters.
    #[serde(rename = "_count")]
    pub count: ParticipantCountDto,
    /// Up to four sample participants.
    pub participants: Vec<ParticipantPreviewDto>,
    /// Owner projection; `null` until ownership is claimed.
    pub owner: Option<OwnerDto>,
}

/// Response body for `GET /pools`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolListResponse {
    /// Pools the caller participates in.
    pub pools: Vec<PoolSummaryDto>,
}

/// Response body for `GET /pools/:id`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolDetailResponse {
    /// The requested pool, or `null` when it does not exist.
    pub pool: Option<PoolSummaryDto>,
}

impl From<ParticipantPreview> for ParticipantPreviewDto {
    fn from(preview: ParticipantPreview) -> Self {
        Self {
            id: preview.id,
            user: ParticipantUserDto {
                avatar_url: preview.avatar_url,
            },
        }
    }
}

impl From<PoolOwner> for OwnerDto {
    fn from(owner: PoolOwner) -> Self {
        Self {
            id: owner.id.into_uuid(),
            name: owner.name,
        }
    }
}

impl From<PoolSummary> for PoolSummaryDto {
    fn from(summary: PoolSummary) -> Self {
        Self {
            id: summary.id.into_uuid(),
            title: summary.title,
            code: summary.code,
            owner_id: summary.owner_id.map(UserId::into_uuid),
            count: ParticipantCountDto {
                participants: summary.participant_count,
            },
            participants: summary.participants.into_iter().map(Into::into).collect(),
            owner: summary.owner.map(Into::into),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::PoolId;

    #[test]
    fn summary_serializes_with_client_field_names() {
        let owner = UserId::from_uuid(Uuid::new_v4());
        let summary = PoolSummary {
            id: PoolId::new(),
            title: "world cup".to_string(),
            code: "AB12CD".to_string(),
            owner_id: Some(owner),
            participant_count: 2,
            participants: vec![ParticipantPreview {
                id: Uuid::new_v4(),
                avatar_url: Some("https://example.com/a.png".to_string()),
            }],
            owner: Some(PoolOwner {
                id: owner,
                name: "Ana".to_string(),
            }),
        };

        let Ok(value) = serde_json::to_value(PoolSummaryDto::from(summary)) else {
            panic!("serialization failed");
        };
        assert!(value.get("ownerId").is_some());
        assert_eq!(
            value.pointer("/_count/participants"),
            Some(&serde_json::json!(2))
        );
        assert!(value.pointer("/participants/0/user/avatarUrl").is_some());
        assert_eq!(
            value.pointer("/owner/name"),
            Some(&serde_json::json!("Ana"))
        );
    }

    #[test]
    fn unowned_summary_serializes_nulls() {
        let summary = PoolSummary {
            id: PoolId::new(),
            title: "anonymous".to_string(),
            code: "ZZ99ZZ".to_string(),
            owner_id: None,
            participant_count: 0,
            participants: vec![],
            owner: None,
        };

        let Ok(value) = serde_json::to_value(PoolSummaryDto::from(summary)) else {
            panic!("serialization failed");
        };
        assert_eq!(value.get("ownerId"), Some(&serde_json::Value::Null));
        assert_eq!(value.get("owner"), Some(&serde_json::Value::Null));
    }
}
