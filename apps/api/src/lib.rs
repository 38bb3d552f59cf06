//! # Sweet Shop API
//!
//! REST server for the sweet shop storefront and admin panel.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          API Server                                     │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  auth routes   │  │  sweet routes  │  │  health                    ││
//! │  │                │  │                │  │                            ││
//! │  │ • register     │  │ • list/search  │  │ • GET /health              ││
//! │  │ • login        │  │ • get/create   │  │                            ││
//! │  │ • me           │  │ • update/delete│  │                            ││
//! │  │                │  │ • purchase     │  │                            ││
//! │  │                │  │ • restock      │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │  SQLite      │  │  JWT Auth    │  │  tower-http              ││  │
//! │  │  │ sweetshop-db │  │ AuthUser /   │  │  TraceLayer, CorsLayer   ││  │
//! │  │  │              │  │ AdminUser    │  │                          ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `PORT` - HTTP port (default: 5000)
//! - `BIND_ADDR` - Interface to bind (default: 0.0.0.0)
//! - `DATABASE_PATH` - SQLite file (default: ./sweetshop.db)
//! - `DATABASE_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `JWT_SECRET` - Secret for JWT signing
//! - `JWT_EXPIRES_IN_SECS` - Token lifetime (default: 86400)
//! - `CORS_ORIGIN` - Allowed browser origin, `*` for any (default: http://localhost:3000)

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use sweetshop_db::Database;

// Re-exports
pub use auth::JwtManager;
pub use config::ApiConfig;
pub use error::ApiError;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            db,
            jwt: Arc::new(JwtManager::new(&config.jwt_secret, config.jwt_expires_in_secs)),
            config: Arc::new(config),
        }
    }
}

/// The full application: routes, state, tracing and CORS.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);

    routes::routes()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origin == "*" {
        return layer.allow_origin(Any);
    }

    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!(%origin, "CORS_ORIGIN is not a valid header value, allowing no origins");
            layer
        }
    }
}
