//! # Axum Helpers
//!
//! A collection of utilities, middleware, and helpers for building Axum web applications.
//!
//! ## Modules
//!
//! - **[`auth`]**: stateless JWT authentication (HS256) with role-aware extractors
//! - **[`server`]**: server setup, health checks, graceful shutdown
//! - **[`http`]**: HTTP middleware (CORS, security headers)
//! - **[`errors`]**: structured error responses
//! - **[`extractors`]**: custom extractors (integer id path, validated JSON)

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

// Re-export auth types
pub use auth::{
    ACCESS_TOKEN_TTL, AuthUser, JwtAuth, JwtClaims, JwtConfig, REFRESH_TOKEN_TTL,
    optional_jwt_auth_middleware,
};

// Re-export server types
pub use server::{
    HealthResponse, ShutdownCoordinator, create_app, create_production_app, create_router,
    health_router, shutdown_signal,
};

// Re-export HTTP middleware
pub use http::security_headers;

// Re-export error types
pub use errors::{AppError, ErrorResponse};

// Re-export extractors
pub use extractors::{IdPath, ValidatedJson};
