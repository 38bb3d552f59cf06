//! # Sweet Routes
//!
//! Catalog reads are public. Purchases need a signed-in account; every other
//! write needs an admin.
//!
//! ## Stock Changes
//! ```text
//! POST /api/sweets/{id}/purchase   { "quantity": 2 }   (body optional, default 1)
//! POST /api/sweets/{id}/restock    { "quantity": 10 }  (body optional, default 10)
//!        │
//!        ▼
//! SweetRepository::apply_stock ── one conditional UPDATE
//!        │
//!        ├── ok ──────────────► 200 { sweet, purchasedQuantity | restockedQuantity }
//!        ├── not enough stock ─► 400 { error: "Insufficient stock", available, requested }
//!        └── no such sweet ────► 404 { error: "Sweet not found" }
//! ```

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use sweetshop_core::{
    Money, NewSweet, Sweet, SweetChanges, SweetFilter, ValidationError,
    DEFAULT_PURCHASE_QUANTITY, DEFAULT_RESTOCK_QUANTITY,
};

use crate::auth::{AdminUser, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::routes::ApiJson;
use crate::AppState;

// =============================================================================
// Wire Types
// =============================================================================

/// A sweet as the client sees it: price as a decimal amount.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweetDto {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Sweet> for SweetDto {
    fn from(sweet: Sweet) -> Self {
        SweetDto {
            price: sweet.price().to_decimal(),
            id: sweet.id,
            name: sweet.name,
            category: sweet.category,
            quantity: sweet.quantity,
            description: sweet.description,
            created_at: sweet.created_at,
            updated_at: sweet.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub count: usize,
    pub sweets: Vec<SweetDto>,
}

impl ListResponse {
    fn new(sweets: Vec<Sweet>) -> Self {
        ListResponse {
            success: true,
            count: sweets.len(),
            sweets: sweets.into_iter().map(SweetDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SweetResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub sweet: SweetDto,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub success: bool,
    pub message: &'static str,
    pub purchased_quantity: i64,
    pub sweet: SweetDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockResponse {
    pub success: bool,
    pub message: &'static str,
    pub restocked_quantity: i64,
    pub sweet: SweetDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchParams {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateSweetRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateSweetRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StockRequest {
    quantity: Option<i64>,
}

// =============================================================================
// Parsing Helpers
// =============================================================================

fn price_from_number(field: &str, amount: f64) -> Result<Money, ValidationError> {
    Money::from_decimal(amount).ok_or_else(|| ValidationError::invalid_format(field, "not a number"))
}

fn price_from_query(field: &str, raw: Option<String>) -> Result<Option<Money>, ValidationError> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(None);
    };

    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::invalid_format(field, "not a number"))?;

    price_from_number(field, amount).map(Some)
}

/// Reads `{ "quantity": n }`, falling back to `default` for an empty body
/// or a missing/null field.
fn stock_quantity(body: &Bytes, default: i64) -> Result<i64, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(default);
    }

    let req: StockRequest = serde_json::from_slice(body)
        .map_err(|_| ApiError::BadRequest("quantity must be a positive integer".to_string()))?;

    Ok(req.quantity.unwrap_or(default))
}

// =============================================================================
// Reads
// =============================================================================

/// `GET /api/sweets`
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<ListResponse>> {
    let sweets = state.db.sweets().list().await?;
    Ok(Json(ListResponse::new(sweets)))
}

/// `GET /api/sweets/search?name=&category=&minPrice=&maxPrice=`
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<ListResponse>> {
    let filter = SweetFilter {
        name: params.name,
        category: params.category,
        min_price: price_from_query("minPrice", params.min_price)?,
        max_price: price_from_query("maxPrice", params.max_price)?,
    }
    .normalized();

    let sweets = state.db.sweets().search(&filter).await?;
    Ok(Json(ListResponse::new(sweets)))
}

/// `GET /api/sweets/{id}`
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SweetResponse>> {
    let sweet = state
        .db
        .sweets()
        .get_by_id(&id)
        .await?
        .ok_or(ApiError::SweetNotFound)?;

    Ok(Json(SweetResponse {
        success: true,
        message: None,
        sweet: sweet.into(),
    }))
}

// =============================================================================
// Admin Writes
// =============================================================================

/// `POST /api/sweets`
pub async fn create(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiJson(req): ApiJson<CreateSweetRequest>,
) -> ApiResult<(StatusCode, Json<SweetResponse>)> {
    let (Some(name), Some(category), Some(price)) = (req.name, req.category, req.price) else {
        return Err(ValidationError::MissingFields(
            "Name, category, and price are required".to_string(),
        )
        .into());
    };

    let new_sweet = NewSweet {
        name,
        category,
        price: price_from_number("price", price)?,
        quantity: req.quantity.unwrap_or(0),
        description: req.description,
    }
    .validated()?;

    let sweet = state.db.sweets().insert(&new_sweet).await?;
    info!(id = %sweet.id, name = %sweet.name, by = %admin.email, "Sweet created");

    Ok((
        StatusCode::CREATED,
        Json(SweetResponse {
            success: true,
            message: Some("Sweet created successfully"),
            sweet: sweet.into(),
        }),
    ))
}

/// `PUT /api/sweets/{id}`
pub async fn update(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateSweetRequest>,
) -> ApiResult<Json<SweetResponse>> {
    let changes = SweetChanges {
        name: req.name,
        category: req.category,
        price: req.price.map(|p| price_from_number("price", p)).transpose()?,
        quantity: req.quantity,
        description: req.description,
    }
    .validated()?;

    let sweet = state.db.sweets().update(&id, &changes).await?;
    info!(id = %sweet.id, by = %admin.email, "Sweet updated");

    Ok(Json(SweetResponse {
        success: true,
        message: Some("Sweet updated successfully"),
        sweet: sweet.into(),
    }))
}

/// `DELETE /api/sweets/{id}`
pub async fn remove(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.sweets().delete(&id).await?;
    info!(id = %id, by = %admin.email, "Sweet deleted");

    Ok(Json(MessageResponse {
        success: true,
        message: "Sweet deleted successfully",
    }))
}

// =============================================================================
// Stock
// =============================================================================

/// `POST /api/sweets/{id}/purchase`
pub async fn purchase(
    State(state): State<AppState>,
    AuthUser(buyer): AuthUser,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<PurchaseResponse>> {
    let quantity = stock_quantity(&body, DEFAULT_PURCHASE_QUANTITY)?;

    let (sweet, change) = state.db.sweets().purchase(&id, quantity).await?;
    info!(
        id = %sweet.id,
        by = %buyer.email,
        quantity = change.amount,
        remaining = change.new_quantity,
        "Sweet purchased"
    );

    Ok(Json(PurchaseResponse {
        success: true,
        message: "Purchase successful",
        purchased_quantity: change.amount,
        sweet: sweet.into(),
    }))
}

/// `POST /api/sweets/{id}/restock`
pub async fn restock(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<RestockResponse>> {
    let quantity = stock_quantity(&body, DEFAULT_RESTOCK_QUANTITY)?;

    let (sweet, change) = state.db.sweets().restock(&id, quantity).await?;
    info!(
        id = %sweet.id,
        by = %admin.email,
        quantity = change.amount,
        total = change.new_quantity,
        "Sweet restocked"
    );

    Ok(Json(RestockResponse {
        success: true,
        message: "Restock successful",
        restocked_quantity: change.amount,
        sweet: sweet.into(),
    }))
}
