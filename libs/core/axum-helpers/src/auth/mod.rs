//! Stateless JWT authentication.
//!
//! Tokens are signed with HS256 and carry the user id, email and role. The
//! [`optional_jwt_auth_middleware`] decodes a bearer token (when present) and
//! inserts the claims into request extensions; the [`AuthUser`] extractor
//! turns missing/invalid claims into a 401 at the handlers that require them.

mod config;
mod jwt;
mod middleware;
mod user;

pub use config::JwtConfig;
pub use jwt::{ACCESS_TOKEN_TTL, JwtAuth, JwtClaims, REFRESH_TOKEN_TTL};
pub use middleware::optional_jwt_auth_middleware;
pub use user::AuthUser;
