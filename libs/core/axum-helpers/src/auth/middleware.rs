use super::jwt::JwtAuth;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// Extract JWT from the Authorization header: "Bearer <token>"
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
}

/// Optional JWT authentication middleware.
///
/// Decodes a bearer token when one is present and valid, inserting
/// [`super::JwtClaims`] into request extensions. Requests without a token (or
/// with an invalid one) pass through untouched; handlers that require a
/// principal use the [`super::AuthUser`] extractor, which rejects with 401
/// when no claims were inserted.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .nest("/api", api_routes)
///     .layer(axum::middleware::from_fn_with_state(
///         jwt.clone(),
///         optional_jwt_auth_middleware,
///     ));
/// ```
pub async fn optional_jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token_from_request(&headers) {
        match auth.verify_token(&token) {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
            }
            Err(e) => {
                tracing::debug!("JWT verification failed: {}", e);
            }
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(
            extract_token_from_request(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_missing_header() {
        assert_eq!(extract_token_from_request(&HeaderMap::new()), None);
    }

    #[test]
    fn test_extract_non_bearer_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(extract_token_from_request(&headers), None);
    }
}
