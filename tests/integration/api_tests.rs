//! API integration tests.
//!
//! These run against a live server with a provisioned database and a seeded
//! `admin`/`admin` account. Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Helper to get a staff-level token
async fn get_admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to register a fresh student and log in
async fn register_student(client: &Client) -> (i64, String) {
    let login = unique("student");

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "login": login,
            "password": "student-password"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse register response");
    let user_id = body["id"].as_i64().expect("No user ID");

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": login,
            "password": "student-password"
        }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse login response");
    (user_id, body["token"].as_str().expect("No token").to_string())
}

/// Helper to create an item as staff; returns its ID
async fn create_item(client: &Client, token: &str, quantity: i64) -> i64 {
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": "Test Camera",
            "category": "camera",
            "quantity": quantity,
            "asset_tag": unique("CAM")
        }))
        .send()
        .await
        .expect("Failed to send create item request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse item response");
    body["id"].as_i64().expect("No item ID")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_register_login_and_me() {
    let client = Client::new();
    let (user_id, token) = register_student(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"].as_i64(), Some(user_id));
    assert_eq!(body["role"], "student");
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/items", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_item_availability_drops_on_checkout() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let (user_id, _) = register_student(&client).await;

    let item_id = create_item(&client, &token, 2).await;

    let response = client
        .post(format!("{}/borrowals/checkout", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "user_id": user_id, "item_id": item_id }))
        .send()
        .await
        .expect("Failed to send checkout request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/items/{}", BASE_URL, item_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send item request");

    let body: Value = response.json().await.expect("Failed to parse item response");
    assert_eq!(body["quantity"].as_i64(), Some(2));
    assert_eq!(body["available_quantity"].as_i64(), Some(1));
}

#[tokio::test]
#[ignore]
async fn test_overlapping_reservations_conflict_on_single_unit() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let (_, first) = register_student(&client).await;
    let (_, second) = register_student(&client).await;

    let item_id = create_item(&client, &token, 1).await;
    let pickup = chrono::Utc::now() + chrono::Duration::hours(2);

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", first))
        .json(&json!({ "item_id": item_id, "pickup_date": pickup }))
        .send()
        .await
        .expect("Failed to send first reservation");
    assert_eq!(response.status(), 201);

    // Overlapping window on the same single unit by a different user
    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", second))
        .json(&json!({
            "item_id": item_id,
            "pickup_date": pickup + chrono::Duration::hours(1)
        }))
        .send()
        .await
        .expect("Failed to send second reservation");
    assert_eq!(response.status(), 409);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
#[ignore]
async fn test_same_user_cannot_double_book_a_window() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let (_, student) = register_student(&client).await;

    let item_id = create_item(&client, &token, 3).await;
    let pickup = chrono::Utc::now() + chrono::Duration::hours(2);

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", student))
        .json(&json!({ "item_id": item_id, "pickup_date": pickup }))
        .send()
        .await
        .expect("Failed to send first reservation");
    assert_eq!(response.status(), 201);

    // Capacity remains, but the same user may not hold two overlapping windows
    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", student))
        .json(&json!({
            "item_id": item_id,
            "pickup_date": pickup + chrono::Duration::hours(3)
        }))
        .send()
        .await
        .expect("Failed to send second reservation");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_reservation_rejects_past_pickup() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let (_, student) = register_student(&client).await;

    let item_id = create_item(&client, &token, 1).await;

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", student))
        .json(&json!({
            "item_id": item_id,
            "pickup_date": chrono::Utc::now() - chrono::Duration::hours(1)
        }))
        .send()
        .await
        .expect("Failed to send reservation");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_return_twice_is_rejected() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let (user_id, _) = register_student(&client).await;

    let item_id = create_item(&client, &token, 1).await;

    let response = client
        .post(format!("{}/borrowals/checkout", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "user_id": user_id, "item_id": item_id }))
        .send()
        .await
        .expect("Failed to send checkout request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse checkout response");
    let borrowal_id = body["id"].as_i64().expect("No borrowal ID");

    let response = client
        .put(format!("{}/borrowals/{}/return", BASE_URL, borrowal_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send return request");
    assert_eq!(response.status(), 200);

    let response = client
        .put(format!("{}/borrowals/{}/return", BASE_URL, borrowal_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send second return request");
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["message"], "Item already returned");
}

#[tokio::test]
#[ignore]
async fn test_paying_a_paid_fine_is_rejected() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let (user_id, student) = register_student(&client).await;

    // Staff records a manual damage fine
    let response = client
        .post(format!("{}/fines", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "user_id": user_id,
            "amount": "12.50",
            "reason": "damage"
        }))
        .send()
        .await
        .expect("Failed to send create fine request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse fine response");
    let fine_id = body["id"].as_i64().expect("No fine ID");

    let response = client
        .post(format!("{}/fines/{}/pay", BASE_URL, fine_id))
        .header("Authorization", format!("Bearer {}", student))
        .json(&json!({ "method": "card" }))
        .send()
        .await
        .expect("Failed to send pay request");
    assert_eq!(response.status(), 200);

    let paid: Value = response.json().await.expect("Failed to parse pay response");
    assert_eq!(paid["status"], "paid");
    assert!(paid["receipt_number"].as_str().expect("No receipt").starts_with("RCT-"));

    let response = client
        .post(format!("{}/fines/{}/pay", BASE_URL, fine_id))
        .header("Authorization", format!("Bearer {}", student))
        .json(&json!({ "method": "card" }))
        .send()
        .await
        .expect("Failed to send second pay request");
    assert_eq!(response.status(), 400);

    // Amount and paid_at are unchanged
    let response = client
        .get(format!("{}/fines", BASE_URL))
        .header("Authorization", format!("Bearer {}", student))
        .send()
        .await
        .expect("Failed to send list fines request");
    let fines: Value = response.json().await.expect("Failed to parse fines");
    let fine = fines
        .as_array()
        .expect("Expected array")
        .iter()
        .find(|f| f["id"].as_i64() == Some(fine_id))
        .expect("Fine missing");
    assert_eq!(fine["amount"], paid["amount"]);
    assert_eq!(fine["paid_at"], paid["paid_at"]);
}

#[tokio::test]
#[ignore]
async fn test_campus_cash_payment_requires_balance() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let (user_id, student) = register_student(&client).await;

    let response = client
        .post(format!("{}/fines", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "user_id": user_id,
            "amount": "30.00",
            "reason": "loss"
        }))
        .send()
        .await
        .expect("Failed to send create fine request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse fine response");
    let fine_id = body["id"].as_i64().expect("No fine ID");

    // Fresh accounts start with a zero balance
    let response = client
        .post(format!("{}/fines/{}/pay", BASE_URL, fine_id))
        .header("Authorization", format!("Bearer {}", student))
        .json(&json!({ "method": "campus-cash" }))
        .send()
        .await
        .expect("Failed to send pay request");
    assert_eq!(response.status(), 400);

    // Top up and retry
    let response = client
        .post(format!("{}/users/{}/campus-cash", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "amount": "50.00" }))
        .send()
        .await
        .expect("Failed to send top-up request");
    assert_eq!(response.status(), 200);

    let response = client
        .post(format!("{}/fines/{}/pay", BASE_URL, fine_id))
        .header("Authorization", format!("Bearer {}", student))
        .json(&json!({ "method": "campus-cash" }))
        .send()
        .await
        .expect("Failed to send second pay request");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore]
async fn test_waitlist_join_and_duplicate_rejected() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let (_, student) = register_student(&client).await;

    let item_id = create_item(&client, &token, 1).await;

    let response = client
        .post(format!("{}/waitlist", BASE_URL))
        .header("Authorization", format!("Bearer {}", student))
        .json(&json!({ "item_id": item_id }))
        .send()
        .await
        .expect("Failed to send join request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse entry");
    assert_eq!(body["position"].as_i64(), Some(1));
    assert_eq!(body["status"], "waiting");

    let response = client
        .post(format!("{}/waitlist", BASE_URL))
        .header("Authorization", format!("Bearer {}", student))
        .json(&json!({ "item_id": item_id }))
        .send()
        .await
        .expect("Failed to send duplicate join request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_dashboard_requires_staff() {
    let client = Client::new();
    let (_, student) = register_student(&client).await;

    let response = client
        .get(format!("{}/dashboard", BASE_URL))
        .header("Authorization", format!("Bearer {}", student))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let token = get_admin_token(&client).await;
    let response = client
        .get(format!("{}/dashboard", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_number());
    assert!(body["borrowals"]["active"].is_number());
    assert!(body["fines"]["pending"].is_number());
}
