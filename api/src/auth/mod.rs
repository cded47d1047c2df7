pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AuthUser, Claims};
pub use extractors::TokenError;
pub use guards::CurrentSession;

use chrono::{DateTime, Duration, Utc};
use db::models::profile::Role;
use jsonwebtoken::{EncodingKey, Header, encode};
use util::config;

/// Generates a JWT and its expiry timestamp for a profile, issued now.
pub fn generate_jwt(
    profile_id: i64,
    role: Role,
) -> Result<(String, String), jsonwebtoken::errors::Error> {
    generate_jwt_issued_at(profile_id, role, Utc::now())
}

/// Like [`generate_jwt`] with an explicit issue time. `exp` is
/// `issued_at` plus the configured JWT duration.
pub fn generate_jwt_issued_at(
    profile_id: i64,
    role: Role,
    issued_at: DateTime<Utc>,
) -> Result<(String, String), jsonwebtoken::errors::Error> {
    let minutes = config::jwt_duration_minutes().min(i32::MAX as u64) as i64;
    let expiry = issued_at + Duration::minutes(minutes);

    let claims = Claims {
        sub: profile_id,
        role,
        iat: issued_at.timestamp(),
        exp: expiry.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )?;

    Ok((token, expiry.to_rfc3339()))
}
