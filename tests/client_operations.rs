//! Operation surface behavior: token attachment, passthrough, paths
//!
//! Runs the client against a local mock service and asserts on what
//! actually went over the wire.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use chrono::NaiveDate;
use common::MockService;
use serde_json::json;
use transit_client::api::{no_token, static_token, TokenAccessor};
use transit_client::{DashboardStats, ResilienceConfig, ServiceEndpoints, TransitClient};

fn quick_config() -> ResilienceConfig {
    ResilienceConfig::builder()
        .max_attempts(2)
        .base_delay(Duration::from_millis(1))
        .request_logging(false)
        .build()
}

#[tokio::test]
async fn bearer_token_attached_to_reads_and_writes() {
    common::init_logging();
    let service = MockService::always(200, "[]");
    let base = service.spawn().await;
    let client = TransitClient::with_config(ServiceEndpoints::single_host(&base), quick_config())
        .with_token_accessor(static_token("abc123"));

    client.list_routes().await;
    let _ = client.send_notification("service delayed").await;

    let headers = service.auth_headers();
    assert_eq!(headers.len(), 2);
    for header in headers {
        assert_eq!(header.as_deref(), Some("Bearer abc123"));
    }
}

#[tokio::test]
async fn absent_token_sends_no_authorization_header() {
    let service = MockService::always(200, "[]");
    let base = service.spawn().await;
    let client = TransitClient::with_config(ServiceEndpoints::single_host(&base), quick_config())
        .with_token_accessor(no_token());

    client.list_users().await;

    assert_eq!(service.auth_headers(), vec![None]);
}

#[tokio::test]
async fn token_is_read_fresh_on_every_request() {
    let service = MockService::always(200, "[]");
    let base = service.spawn().await;

    let current = Arc::new(Mutex::new("first".to_string()));
    let store = current.clone();
    let accessor: TokenAccessor = Arc::new(move || Some(store.lock().unwrap().clone()));

    let client = TransitClient::with_config(ServiceEndpoints::single_host(&base), quick_config())
        .with_token_accessor(accessor);

    client.list_routes().await;
    *current.lock().unwrap() = "second".to_string();
    client.list_routes().await;

    assert_eq!(
        service.auth_headers(),
        vec![
            Some("Bearer first".to_string()),
            Some("Bearer second".to_string())
        ]
    );
}

#[tokio::test]
async fn list_read_preserves_server_order() {
    let body = r#"[{"id":3},{"id":1},{"id":2}]"#;
    let service = MockService::always(200, body);
    let base = service.spawn().await;
    let client = TransitClient::with_config(ServiceEndpoints::single_host(&base), quick_config());

    let tickets = client.list_tickets().await;

    assert_eq!(tickets, vec![json!({"id": 3}), json!({"id": 1}), json!({"id": 2})]);
}

#[tokio::test]
async fn booking_hits_the_book_action_path() {
    let service = MockService::always(201, r#"{"id":55,"status":"CONFIRMED"}"#);
    let base = service.spawn().await;
    let client = TransitClient::with_config(ServiceEndpoints::single_host(&base), quick_config());

    let booked = client
        .book_ticket(&json!({"passengerName": "Ada", "routeName": "Express-7"}))
        .await
        .unwrap();

    assert_eq!(booked["id"], 55);
    assert_eq!(service.paths(), vec!["/api/tickets/book".to_string()]);
}

#[tokio::test]
async fn cancellation_returns_null_for_empty_response() {
    let service = MockService::always(204, "");
    let base = service.spawn().await;
    let client = TransitClient::with_config(ServiceEndpoints::single_host(&base), quick_config());

    let result = client.cancel_ticket(9).await.unwrap();

    assert!(result.is_null());
    assert_eq!(service.paths(), vec!["/api/tickets/cancel/9".to_string()]);
}

#[tokio::test]
async fn available_seats_sends_filter_query() {
    let service = MockService::always(200, "[3,4,7]");
    let base = service.spawn().await;
    let client = TransitClient::with_config(ServiceEndpoints::single_host(&base), quick_config());

    let departure = NaiveDate::from_ymd_opt(2025, 5, 1)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap();
    let seats = client.available_seats("Express-7", departure).await.unwrap();

    assert_eq!(seats, vec![3, 4, 7]);
    assert_eq!(service.paths(), vec!["/api/tickets/available-seats".to_string()]);

    let query = service.queries().remove(0);
    assert!(query.contains("routeName=Express-7"), "query: {}", query);
    assert!(
        query.contains("travelDateTime=2025-05-01T08%3A30%3A00"),
        "query: {}",
        query
    );
}

#[tokio::test]
async fn assignment_hits_the_assign_route_path() {
    let service = MockService::always(200, r#"{"id":5,"routeId":12}"#);
    let base = service.spawn().await;
    let client = TransitClient::with_config(ServiceEndpoints::single_host(&base), quick_config());

    client.assign_schedule_to_route(5, 12).await.unwrap();

    assert_eq!(
        service.paths(),
        vec!["/api/schedules/5/assign-route/12".to_string()]
    );
}

#[tokio::test]
async fn revenue_degrades_to_zero_shape() {
    let service = MockService::always(500, "boom");
    let base = service.spawn().await;
    let client = TransitClient::with_config(ServiceEndpoints::single_host(&base), quick_config());

    let revenue = client.revenue_analytics().await;

    assert_eq!(revenue["totalRevenue"], 0.0);
    assert!(revenue["monthlyRevenue"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn dashboard_stats_tolerate_partial_failures() {
    let app = Router::new()
        .route(
            "/api/tickets/count",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route("/api/routes/count", get(|| async { "4" }))
        .route("/api/users/count", get(|| async { "9" }))
        .route("/api/schedules/count", get(|| async { "2" }));
    let base = common::serve(app).await;
    let client = TransitClient::with_config(ServiceEndpoints::single_host(&base), quick_config());

    let stats = client.dashboard_stats().await;

    assert_eq!(
        stats,
        DashboardStats {
            total_tickets: 0,
            total_routes: 4,
            total_users: 9,
            total_schedules: 2,
        }
    );
}

#[tokio::test]
async fn login_posts_to_auth_service() {
    let service = MockService::always(200, r#"{"token":"jwt-here","role":"USER"}"#);
    let base = service.spawn().await;
    let client = TransitClient::with_config(ServiceEndpoints::single_host(&base), quick_config());

    let session = client
        .login(&json!({"username": "ada", "password": "secret"}))
        .await
        .unwrap();

    assert_eq!(session["token"], "jwt-here");
    assert_eq!(service.paths(), vec!["/api/auth/login".to_string()]);
}

#[tokio::test]
async fn non_array_list_body_degrades_to_empty() {
    let service = MockService::always(200, r#"{"unexpected":"object"}"#);
    let base = service.spawn().await;
    let client = TransitClient::with_config(ServiceEndpoints::single_host(&base), quick_config());

    let routes = client.list_routes().await;

    assert!(routes.is_empty());
    assert_eq!(service.hits(), 1);
}
