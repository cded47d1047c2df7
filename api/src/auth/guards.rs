//! Route guards.
//!
//! Each guard decodes the bearer token, loads the profile behind it, builds a
//! [`Session`] issued at the token's `iat` and runs the [`SessionGuard`] with
//! the configured TTL. On success the session is stored in the request
//! extensions as [`CurrentSession`].
//!
//! A token past its own `exp` is reported the same way as a session past the
//! TTL, so the client sees one "session expired" message either way.

use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use db::models::profile::Role;
use services::session_guard::{GuardFailure, Session, SessionGuard};
use services::store::{ProfileStore, SeaOrmStore};
use util::state::AppState;

use crate::auth::claims::AuthUser;
use crate::auth::extractors::TokenError;
use crate::response::{ApiResponse, Empty};

type Rejection = (StatusCode, Json<ApiResponse<Empty>>);

/// The validated session of the caller.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

fn reject(status: StatusCode, message: impl Into<String>) -> Rejection {
    (status, Json(ApiResponse::error(message)))
}

fn guard_status(failure: GuardFailure) -> StatusCode {
    match failure {
        GuardFailure::NoSession | GuardFailure::Expired => StatusCode::UNAUTHORIZED,
        GuardFailure::WrongRole | GuardFailure::Inactive => StatusCode::FORBIDDEN,
    }
}

/// Resolves the caller's session and checks it against `required`.
async fn authorize(
    app_state: &AppState,
    req: Request<Body>,
    required: Role,
) -> Result<Request<Body>, Rejection> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|e| match e {
            TokenError::Expired => {
                let failure = GuardFailure::Expired;
                reject(guard_status(failure), failure.to_string())
            }
            TokenError::Missing | TokenError::Invalid => {
                reject(StatusCode::UNAUTHORIZED, "Authentication required")
            }
        })?;

    let store = SeaOrmStore::from_state(app_state);
    let session = match store.fetch_profile(user.0.sub).await {
        Ok(profile) => DateTime::<Utc>::from_timestamp(user.0.iat, 0)
            .map(|issued_at| Session::new(profile, issued_at)),
        Err(e) if e.is_not_found() => None,
        Err(e) => {
            tracing::error!(profile_id = user.0.sub, "could not load profile: {e}");
            return Err(reject(
                StatusCode::SERVICE_UNAVAILABLE,
                "Could not connect, please try again",
            ));
        }
    };

    let guard = SessionGuard::from_config();
    if let Err(failure) = guard.check(session.as_ref(), required, Utc::now()) {
        tracing::debug!(profile_id = user.0.sub, ?failure, "session rejected");
        return Err(reject(guard_status(failure), failure.to_string()));
    }

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user);
    if let Some(session) = session {
        req.extensions_mut().insert(CurrentSession(session));
    }
    Ok(req)
}

/// Any active profile with a live session.
pub async fn allow_authenticated(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Rejection> {
    let req = authorize(&app_state, req, Role::Student).await?;
    Ok(next.run(req).await)
}

/// Admin-only guard.
pub async fn allow_admin(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Rejection> {
    let req = authorize(&app_state, req, Role::Admin).await?;
    Ok(next.run(req).await)
}
