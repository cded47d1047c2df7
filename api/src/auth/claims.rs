use db::models::profile::Role;
use serde::{Deserialize, Serialize};

/// JWT claims issued by the auth provider.
///
/// `iat` doubles as the session issue time checked by the session guard.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
