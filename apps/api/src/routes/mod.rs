//! # HTTP Routes
//!
//! ```text
//! GET    /health
//! POST   /api/auth/register
//! POST   /api/auth/login
//! GET    /api/auth/me                 (signed in)
//! GET    /api/sweets
//! GET    /api/sweets/search
//! GET    /api/sweets/{id}
//! POST   /api/sweets                  (admin)
//! PUT    /api/sweets/{id}             (admin)
//! DELETE /api/sweets/{id}             (admin)
//! POST   /api/sweets/{id}/purchase    (signed in)
//! POST   /api/sweets/{id}/restock     (admin)
//! ```

pub mod auth;
pub mod health;
pub mod sweets;

use axum::extract::FromRequest;
use axum::http::{Method, Uri};
use axum::routing::{get, post};
use axum::Router;

use crate::error::ApiError;
use crate::AppState;

/// `axum::Json` with rejections reported as `400 { error }`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// All routes, without middleware or state.
pub fn routes() -> Router<AppState> {
    let auth = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me));

    let sweets = Router::new()
        .route("/", get(sweets::list).post(sweets::create))
        .route("/search", get(sweets::search))
        .route(
            "/{id}",
            get(sweets::get_one).put(sweets::update).delete(sweets::remove),
        )
        .route("/{id}/purchase", post(sweets::purchase))
        .route("/{id}/restock", post(sweets::restock));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/auth", auth)
        .nest("/api/sweets", sweets)
        .fallback(not_found)
}

async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
