use async_trait::async_trait;
use uuid::Uuid;

/// The identity a session operation is performed on behalf of.
///
/// `Identity::anonymous()` is a sentinel: invalidating with it tears the
/// session down unconditionally, even when the request carries no valid or
/// parseable identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Identity(Option<Uuid>);

impl Identity {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(user_id: Uuid) -> Self {
        Self(Some(user_id))
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.0
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.is_none()
    }
}

/// Terminates the session bound to the current request.
///
/// Implementations must accept the anonymous sentinel and must treat
/// invalidation of an already-invalidated session as a success.
#[async_trait]
pub trait SessionInvalidator: Send + Sync {
    async fn invalidate_authentication(&self, identity: &Identity) -> Result<(), anyhow::Error>;
}
