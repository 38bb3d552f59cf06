//! Shared harness for the HTTP tests: an in-memory app with one admin and
//! one regular account already signed in.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use sweetshop_api::{build_router, ApiConfig, AppState};
use sweetshop_core::{Money, NewSweet, NewUser, Role, Sweet};
use sweetshop_db::{Database, DbConfig};

pub const ADMIN_EMAIL: &str = "admin@sweetshop.com";
pub const USER_EMAIL: &str = "user@sweetshop.com";
pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub admin_token: String,
    pub user_token: String,
}

pub async fn spawn_app() -> TestApp {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let state = AppState::new(db, ApiConfig::default());

    let admin = state
        .db
        .users()
        .insert(&NewUser {
            role: Role::Admin,
            ..NewUser::registration(ADMIN_EMAIL, PASSWORD, "Admin User").unwrap()
        })
        .await
        .unwrap();
    let user = state
        .db
        .users()
        .insert(&NewUser::registration(USER_EMAIL, PASSWORD, "Regular User").unwrap())
        .await
        .unwrap();

    TestApp {
        router: build_router(state.clone()),
        admin_token: state.jwt.issue(&admin.principal()).unwrap(),
        user_token: state.jwt.issue(&user.principal()).unwrap(),
        state,
    }
}

impl TestApp {
    pub async fn add_sweet(&self, name: &str, category: &str, cents: i64, quantity: i64) -> Sweet {
        let new_sweet = NewSweet {
            name: name.to_string(),
            category: category.to_string(),
            price: Money::from_cents(cents),
            quantity,
            description: None,
        };
        self.state.db.sweets().insert(&new_sweet).await.unwrap()
    }

    pub async fn stored_quantity(&self, id: &str) -> i64 {
        self.state
            .db
            .sweets()
            .get_by_id(id)
            .await
            .unwrap()
            .unwrap()
            .quantity
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request(Method::GET, uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::POST, uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::PUT, uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request(Method::DELETE, uri, token, None)).await
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
