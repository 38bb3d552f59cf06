mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};

use common::{request, spawn_app, TestApp};

fn names(body: &Value) -> Vec<&str> {
    body["sweets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect()
}

async fn catalog() -> TestApp {
    let app = spawn_app().await;
    app.add_sweet("Chocolate Truffle", "Chocolate", 299, 50).await;
    app.add_sweet("Gummy Bears", "Gummies", 199, 100).await;
    app.add_sweet("Chocolate Bar", "Chocolate", 349, 30).await;
    app.add_sweet("Lollipop", "Lollipops", 99, 200).await;
    app
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn list_is_public_and_sorted() {
    let app = catalog().await;

    let (status, body) = app.get("/api/sweets", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 4);
    assert_eq!(
        names(&body),
        vec!["Chocolate Bar", "Chocolate Truffle", "Gummy Bears", "Lollipop"]
    );
    assert_eq!(body["sweets"][0]["price"], 3.49);
}

#[tokio::test]
async fn public_read_ignores_bad_token() {
    let app = catalog().await;

    let (status, body) = app.get("/api/sweets", Some("garbage")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);
}

#[tokio::test]
async fn search_by_name_and_category() {
    let app = catalog().await;

    let (status, body) = app.get("/api/sweets/search?name=choc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Chocolate Bar", "Chocolate Truffle"]);

    let (_, body) = app.get("/api/sweets/search?category=gummies", None).await;
    assert_eq!(names(&body), vec!["Gummy Bears"]);

    let (_, body) = app
        .get("/api/sweets/search?name=bar&category=Chocolate", None)
        .await;
    assert_eq!(names(&body), vec!["Chocolate Bar"]);
}

#[tokio::test]
async fn search_by_price_range() {
    let app = catalog().await;

    let (status, body) = app
        .get("/api/sweets/search?minPrice=2&maxPrice=3", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Chocolate Truffle"]);
    assert!(body["sweets"]
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["price"].as_f64().unwrap() >= 2.0 && s["price"].as_f64().unwrap() <= 3.0));

    let (_, body) = app.get("/api/sweets/search?minPrice=1.99&maxPrice=1.99", None).await;
    assert_eq!(names(&body), vec!["Gummy Bears"]);
}

#[tokio::test]
async fn search_edge_cases() {
    let app = catalog().await;

    let (status, body) = app.get("/api/sweets/search?minPrice=cheap", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("minPrice"));

    let (status, body) = app
        .get("/api/sweets/search?minPrice=5&maxPrice=1", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let (_, body) = app.get("/api/sweets/search?name=&category=", None).await;
    assert_eq!(body["count"], 4);
}

#[tokio::test]
async fn get_one_and_not_found() {
    let app = spawn_app().await;
    let sweet = app.add_sweet("Toffee Candy", "Caramels", 299, 40).await;

    let (status, body) = app.get(&format!("/api/sweets/{}", sweet.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sweet"]["name"], "Toffee Candy");
    assert_eq!(body["sweet"]["quantity"], 40);

    let (status, body) = app.get("/api/sweets/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Sweet not found");
}

// =============================================================================
// Admin Writes
// =============================================================================

#[tokio::test]
async fn create_as_admin() {
    let app = spawn_app().await;

    let (status, body) = app
        .post(
            "/api/sweets",
            Some(&app.admin_token),
            json!({
                "name": "New Chocolate Bar",
                "category": "Chocolate",
                "price": 3.99,
                "quantity": 25,
                "description": "Dark and rich"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["sweet"]["name"], "New Chocolate Bar");
    assert_eq!(body["sweet"]["price"], 3.99);
    assert_eq!(body["sweet"]["quantity"], 25);

    let id = body["sweet"]["id"].as_str().unwrap();
    let stored = app.state.db.sweets().get_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.price_cents, 399);
}

#[tokio::test]
async fn create_requires_admin() {
    let app = spawn_app().await;
    let body = json!({ "name": "Fudge", "category": "Fudge", "price": 1.5, "quantity": 5 });

    let (status, resp) = app
        .post("/api/sweets", Some(&app.user_token), body.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(resp["error"], "Admin access required");

    let (status, resp) = app.post("/api/sweets", None, body).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["error"], "Authentication required. No token provided.");

    // The role check runs before the body is looked at.
    let (status, _) = app
        .post("/api/sweets", Some(&app.user_token), json!({ "name": "x" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(app.state.db.sweets().count().await.unwrap(), 0);
}

#[tokio::test]
async fn create_validates_input() {
    let app = spawn_app().await;
    let token = Some(app.admin_token.as_str());

    let (status, body) = app
        .post("/api/sweets", token, json!({ "name": "Fudge" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name, category, and price are required");

    let (status, body) = app
        .post(
            "/api/sweets",
            token,
            json!({ "name": "F", "category": "Fudge", "price": 1.5 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name must be at least 2 characters");

    let (status, _) = app
        .post(
            "/api/sweets",
            token,
            json!({ "name": "Fudge", "category": "Fudge", "price": -1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/sweets",
            token,
            json!({ "name": "Fudge", "category": "Fudge", "price": 1.5 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["sweet"]["quantity"], 0);
}

#[tokio::test]
async fn update_is_partial() {
    let app = spawn_app().await;
    let sweet = app.add_sweet("Test Sweet", "Chocolate", 199, 10).await;
    let uri = format!("/api/sweets/{}", sweet.id);

    let (status, body) = app
        .put(
            &uri,
            Some(&app.admin_token),
            json!({ "name": "Updated Sweet Name", "price": 2.49 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sweet"]["name"], "Updated Sweet Name");
    assert_eq!(body["sweet"]["price"], 2.49);
    assert_eq!(body["sweet"]["category"], "Chocolate");
    assert_eq!(body["sweet"]["quantity"], 10);

    let (status, _) = app
        .put(&uri, Some(&app.admin_token), json!({ "quantity": -5 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.stored_quantity(&sweet.id).await, 10);
}

#[tokio::test]
async fn update_guards() {
    let app = spawn_app().await;
    let sweet = app.add_sweet("Test Sweet", "Chocolate", 199, 10).await;

    let (status, _) = app
        .put(
            &format!("/api/sweets/{}", sweet.id),
            Some(&app.user_token),
            json!({ "name": "Hacked" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put(
            "/api/sweets/missing",
            Some(&app.admin_token),
            json!({ "name": "Whatever" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Sweet not found");
}

#[tokio::test]
async fn delete_sweet() {
    let app = spawn_app().await;
    let sweet = app.add_sweet("Test Sweet", "Chocolate", 199, 10).await;
    let uri = format!("/api/sweets/{}", sweet.id);

    let (status, _) = app.delete(&uri, Some(&app.user_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.delete(&uri, Some(&app.admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(app.state.db.sweets().get_by_id(&sweet.id).await.unwrap().is_none());

    let (status, _) = app.delete(&uri, Some(&app.admin_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Stock
// =============================================================================

#[tokio::test]
async fn purchase_decrements_stock() {
    let app = spawn_app().await;
    let sweet = app.add_sweet("Purchase Test", "Chocolate", 199, 10).await;

    let (status, body) = app
        .post(
            &format!("/api/sweets/{}/purchase", sweet.id),
            Some(&app.user_token),
            json!({ "quantity": 2 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["purchasedQuantity"], 2);
    assert_eq!(body["sweet"]["quantity"], 8);
    assert_eq!(app.stored_quantity(&sweet.id).await, 8);
}

#[tokio::test]
async fn purchase_insufficient_stock() {
    let app = spawn_app().await;
    let sweet = app.add_sweet("Purchase Test", "Chocolate", 199, 10).await;

    let (status, body) = app
        .post(
            &format!("/api/sweets/{}/purchase", sweet.id),
            Some(&app.user_token),
            json!({ "quantity": 20 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient stock");
    assert_eq!(body["available"], 10);
    assert_eq!(body["requested"], 20);
    assert_eq!(app.stored_quantity(&sweet.id).await, 10);
}

#[tokio::test]
async fn purchase_requires_sign_in() {
    let app = spawn_app().await;
    let sweet = app.add_sweet("Purchase Test", "Chocolate", 199, 10).await;

    let (status, body) = app
        .post(
            &format!("/api/sweets/{}/purchase", sweet.id),
            None,
            json!({ "quantity": 1 }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required. No token provided.");
    assert_eq!(app.stored_quantity(&sweet.id).await, 10);
}

#[tokio::test]
async fn purchase_defaults_and_validation() {
    let app = spawn_app().await;
    let sweet = app.add_sweet("Purchase Test", "Chocolate", 199, 10).await;
    let uri = format!("/api/sweets/{}/purchase", sweet.id);

    // No body at all buys one unit.
    let (status, body) = app
        .send(request(Method::POST, &uri, Some(&app.admin_token), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["purchasedQuantity"], 1);
    assert_eq!(body["sweet"]["quantity"], 9);

    let (status, body) = app
        .post(&uri, Some(&app.user_token), json!({ "quantity": 0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "quantity must be positive");

    let (status, _) = app
        .post(&uri, Some(&app.user_token), json!({ "quantity": -3 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(&uri, Some(&app.user_token), json!({ "quantity": "lots" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.stored_quantity(&sweet.id).await, 9);

    let (status, body) = app
        .post(
            "/api/sweets/missing/purchase",
            Some(&app.user_token),
            json!({ "quantity": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Sweet not found");
}

#[tokio::test]
async fn concurrent_purchases_never_oversell() {
    let app = spawn_app().await;
    let sweet = app.add_sweet("Last Few", "Chocolate", 199, 5).await;
    let uri = format!("/api/sweets/{}/purchase", sweet.id);

    let mut handles = Vec::new();
    for _ in 0..12 {
        let router = app.router.clone();
        let req = request(
            Method::POST,
            &uri,
            Some(&app.user_token),
            Some(json!({ "quantity": 1 })),
        );
        handles.push(tokio::spawn(async move {
            use tower::ServiceExt;
            router.oneshot(req).await.unwrap().status()
        }));
    }

    let mut sold = 0;
    let mut refused = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => sold += 1,
            StatusCode::BAD_REQUEST => refused += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(sold, 5);
    assert_eq!(refused, 7);
    assert_eq!(app.stored_quantity(&sweet.id).await, 0);
}

#[tokio::test]
async fn restock_increments_stock() {
    let app = spawn_app().await;
    let sweet = app.add_sweet("Restock Test", "Chocolate", 199, 5).await;
    let uri = format!("/api/sweets/{}/restock", sweet.id);

    let (status, body) = app
        .post(&uri, Some(&app.admin_token), json!({ "quantity": 10 }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["restockedQuantity"], 10);
    assert_eq!(body["sweet"]["quantity"], 15);

    // Empty body tops up by the default of ten.
    let (status, body) = app
        .send(request(Method::POST, &uri, Some(&app.admin_token), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["restockedQuantity"], 10);
    assert_eq!(body["sweet"]["quantity"], 25);
}

#[tokio::test]
async fn restock_requires_admin() {
    let app = spawn_app().await;
    let sweet = app.add_sweet("Restock Test", "Chocolate", 199, 5).await;

    let (status, body) = app
        .post(
            &format!("/api/sweets/{}/restock", sweet.id),
            Some(&app.user_token),
            json!({ "quantity": 10 }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");
    assert_eq!(app.stored_quantity(&sweet.id).await, 5);
}

// =============================================================================
// Infrastructure
// =============================================================================

#[tokio::test]
async fn health_reports_database() {
    let app = spawn_app().await;

    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["database"], "connected");
    assert!(body["version"].is_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], "Cannot GET /api/nope");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/elsewhere")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = app.send(req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cannot POST /elsewhere");
}
