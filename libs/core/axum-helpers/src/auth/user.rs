use super::jwt::JwtClaims;
use crate::errors::AppError;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};

/// Authenticated principal extracted from JWT claims.
///
/// Requires [`super::optional_jwt_auth_middleware`] to be installed; when the
/// request carried no valid token the extractor rejects with 401.
///
/// # Example
/// ```ignore
/// async fn get_cart(user: AuthUser) -> ... {
///     // user.id, user.email, user.role
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub role: String,
}

impl AuthUser {
    /// Role gate helper: 403 unless the principal holds `role`.
    pub fn require_role(&self, role: &str) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Requires '{}' role",
                role
            )))
        }
    }
}

impl From<&JwtClaims> for AuthUser {
    fn from(claims: &JwtClaims) -> Self {
        Self {
            id: claims.id,
            email: claims.sub.clone(),
            role: claims.role.clone(),
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<JwtClaims>() {
            Some(claims) => Ok(AuthUser::from(claims)),
            None => Err(
                AppError::Unauthorized("Not authenticated".to_string()).into_response(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> AuthUser {
        AuthUser {
            id: 1,
            email: "u@example.com".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_require_role_matches() {
        assert!(user("seller").require_role("seller").is_ok());
    }

    #[test]
    fn test_require_role_mismatch() {
        let err = user("buyer").require_role("admin").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_from_claims() {
        let claims = JwtClaims {
            sub: "s@example.com".to_string(),
            id: 42,
            role: "seller".to_string(),
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
        };
        let user = AuthUser::from(&claims);
        assert_eq!(user.id, 42);
        assert_eq!(user.email, "s@example.com");
        assert_eq!(user.role, "seller");
    }
}
