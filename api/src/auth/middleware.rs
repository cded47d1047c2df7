use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts},
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::TypedHeader;
use headers::UserAgent;
use std::net::SocketAddr;
use tracing::info;

use crate::auth::claims::AuthUser;

/// Logs one `Incoming request` line per HTTP request. CORS preflight
/// `OPTIONS` requests pass through unlogged.
///
/// The token is decoded only to label the line. A missing, invalid or expired
/// token is logged as anonymous and the request continues; rejecting it is the
/// route guards' job.
///
/// ### Usage:
/// Apply globally, outside the router, with connect info enabled:
///
/// ```ignore
/// use axum::middleware::from_fn;
/// use api::auth::middleware::log_request;
///
/// let app = api::app(state).layer(from_fn(log_request));
/// axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
/// ```
///
/// ### Fields Logged:
/// - `method`: HTTP method (`GET`, `POST`, ...)
/// - `path`: Requested URI path, query string excluded
/// - `ip`: Peer IP address
/// - `profile`: Profile id from the token's `sub`, `0` when anonymous
/// - `role`: Role claimed by the token, `anonymous` when absent
/// - `user_agent`: `User-Agent` header, `unknown` when absent
pub async fn log_request(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let (mut parts, body) = req.into_parts();

    if parts.method == Method::OPTIONS {
        let req = Request::from_parts(parts, body);
        return Ok(next.run(req).await);
    }

    let claims = AuthUser::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|AuthUser(c)| c);

    let user_agent = TypedHeader::<UserAgent>::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|TypedHeader(ua)| ua.to_string());

    info!(
        method = ?parts.method,
        path = %parts.uri.path(),
        ip = %addr.ip(),
        profile = claims.as_ref().map(|c| c.sub).unwrap_or(0),
        role = claims.as_ref().map(|c| c.role.to_string()).unwrap_or_else(|| "anonymous".into()),
        user_agent = user_agent.unwrap_or_else(|| "unknown".into()),
        "Incoming request"
    );

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}
