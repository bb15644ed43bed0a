use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;

use crate::authentication::{Identity, SessionInvalidator};
use crate::redirect::is_safe_redirect;
use crate::session_state::TypedSession;
use crate::startup::TrustedRedirectBase;

#[derive(thiserror::Error)]
pub enum LogoutError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("failed to log out")]
    InvalidationFailure(#[source] anyhow::Error),
}

impl std::fmt::Debug for LogoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl IntoResponse for LogoutError {
    fn into_response(self) -> Response {
        match &self {
            LogoutError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, self.to_string()).into_response()
            }
            LogoutError::InvalidationFailure(_) => {
                tracing::debug!(
                    error.cause_chain = ?self,
                    error.message = %self,
                    "error logging out",
                );
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

#[derive(serde::Deserialize)]
pub struct LogoutForm {
    pub then: Option<String>,
}

/// Ends the session bound to the request and, when the form carries a safe
/// `then` target, redirects the browser there afterwards.
///
/// Bound with `any()` so that every configured logout path answers non-POST
/// methods with an explicit 405 rather than a router-level fallback.
#[tracing::instrument(skip(session, trusted, form))]
pub async fn log_out(
    method: Method,
    session: TypedSession,
    State(trusted): State<TrustedRedirectBase>,
    form: Result<Form<LogoutForm>, FormRejection>,
) -> Result<Response, LogoutError> {
    // A body that does not parse as a URL-encoded form carries no target.
    let then = form.ok().and_then(|Form(form)| form.then);

    process_logout(method, then, &session, &trusted).await
}

async fn process_logout(
    method: Method,
    then: Option<String>,
    invalidator: &impl SessionInvalidator,
    trusted: &TrustedRedirectBase,
) -> Result<Response, LogoutError> {
    // Logging out mutates server-side state and must not be reachable from a
    // plain navigation. Full CSRF protection is deliberately not provided:
    // requiring a token would break every client that just POSTs here.
    if method != Method::POST {
        return Err(LogoutError::MethodNotAllowed);
    }

    // Invalidate with the anonymous sentinel to force session removal even
    // when the request carries no valid identity.
    invalidator
        .invalidate_authentication(&Identity::anonymous())
        .await
        .map_err(LogoutError::InvalidationFailure)?;

    match then {
        Some(then) if is_safe_redirect(&then, &trusted.0) => {
            Ok((StatusCode::FOUND, [(header::LOCATION, then)]).into_response())
        }
        // An unsafe target is not an error; fail closed to "no redirect".
        _ => Ok(StatusCode::OK.into_response()),
    }
}
