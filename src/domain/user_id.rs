//! Type-safe user identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a user as issued by the external identity provider.
///
/// This service never mints user identifiers; it only carries them through
/// ownership and participation records, so there is no `new()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(uuid::Uuid);

impl UserId {
    /// Creates a `UserId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn into_uuid(self) -> uuid::Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for UserId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<UserId> for uuid::Uuid {
    fn from(id: UserId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_bare_uuid() {
        let uuid = uuid::Uuid::new_v4();
        let Ok(id) = serde_json::from_str::<UserId>(&format!("\"{uuid}\"")) else {
            panic!("deserialization failed");
        };
        assert_eq!(id.into_uuid(), uuid);
    }
}
