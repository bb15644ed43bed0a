use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::response::IntoResponse;
use tower_sessions::Session;
use uuid::Uuid;

use crate::authentication::{Identity, SessionInvalidator};

#[derive(Clone)]
pub struct TypedSession(Session);

impl TypedSession {
    const USER_ID_KEY: &'static str = "user_id";

    pub async fn insert_user_id(&self, user_id: Uuid) -> Result<(), anyhow::Error> {
        self.0.insert(Self::USER_ID_KEY, user_id).await?;
        Ok(())
    }

    pub async fn get_user_id(&self) -> Result<Option<Uuid>, anyhow::Error> {
        Ok(self.0.get(Self::USER_ID_KEY).await?)
    }
}

#[async_trait]
impl SessionInvalidator for TypedSession {
    /// Flushes the session record and cookie regardless of which identity is
    /// passed in; the identity argument exists so callers can hand over the
    /// anonymous sentinel and force teardown without resolving the current user.
    async fn invalidate_authentication(&self, _identity: &Identity) -> Result<(), anyhow::Error> {
        self.0.flush().await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for TypedSession
where
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;
        Ok(Self(session))
    }
}
