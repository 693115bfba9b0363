//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::BookingService;
use crate::domain::RepositoryProvider;

use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::properties::{self, PropertyState};
use super::modules::reservations::{self, ReservationState};

/// Unified state for the `/api/v1` routes.
/// Axum extracts the specific handler state via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub booking: Arc<BookingService>,
}

impl FromRef<ApiState> for PropertyState {
    fn from_ref(s: &ApiState) -> Self {
        PropertyState {
            repos: Arc::clone(&s.repos),
            booking: Arc::clone(&s.booking),
        }
    }
}

impl FromRef<ApiState> for ReservationState {
    fn from_ref(s: &ApiState) -> Self {
        ReservationState {
            booking: Arc::clone(&s.booking),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Properties
        properties::list_properties,
        properties::get_property,
        properties::create_property,
        properties::update_property,
        properties::delete_property,
        properties::quote,
        // Blocked dates
        properties::list_blocked_dates,
        properties::add_blocked_date,
        properties::remove_blocked_date,
        // Reservations
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::confirm_reservation,
        reservations::check_in_reservation,
        reservations::check_out_reservation,
        reservations::complete_reservation,
        reservations::cancel_reservation,
        reservations::refund_preview,
    ),
    components(
        schemas(
            health::HealthResponse,
            health::ComponentHealth,
            properties::PropertyResponse,
            properties::CreatePropertyRequest,
            properties::UpdatePropertyRequest,
            properties::QuoteRequest,
            properties::QuoteResponse,
            properties::CostBreakdownResponse,
            properties::BlockDateRequest,
            properties::BlockedDateResponse,
            reservations::CreateReservationRequest,
            reservations::CancelReservationRequest,
            reservations::CancellationResponse,
            reservations::ReservationResponse,
            reservations::RefundPreviewResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Properties", description = "Listings and price quotes"),
        (name = "Blocked Dates", description = "Nights a host has taken off the calendar"),
        (name = "Reservations", description = "Booking and the reservation lifecycle"),
    ),
    info(
        title = "Stay Booking API",
        version = "0.1.0",
        description = "Availability, pricing and reservations for short-term rentals",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    db: DatabaseConnection,
    booking: Arc<BookingService>,
    prometheus: PrometheusHandle,
) -> Router {
    let api_state = ApiState {
        repos: Arc::clone(booking.repos()),
        booking,
    };

    let api_routes = Router::new()
        // --- Properties (State<PropertyState> via FromRef) ---
        .route(
            "/api/v1/properties",
            get(properties::list_properties).post(properties::create_property),
        )
        .route(
            "/api/v1/properties/{id}",
            get(properties::get_property)
                .put(properties::update_property)
                .delete(properties::delete_property),
        )
        .route("/api/v1/properties/{id}/quote", post(properties::quote))
        .route(
            "/api/v1/properties/{id}/blocked-dates",
            get(properties::list_blocked_dates).post(properties::add_blocked_date),
        )
        .route(
            "/api/v1/properties/{id}/blocked-dates/{date}",
            delete(properties::remove_blocked_date),
        )
        // --- Reservations (State<ReservationState> via FromRef) ---
        .route(
            "/api/v1/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route("/api/v1/reservations/{id}", get(reservations::get_reservation))
        .route(
            "/api/v1/reservations/{id}/confirm",
            post(reservations::confirm_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/check-in",
            post(reservations::check_in_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/check-out",
            post(reservations::check_out_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/complete",
            post(reservations::complete_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/cancel",
            post(reservations::cancel_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/refund-preview",
            get(reservations::refund_preview),
        )
        .with_state(api_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState { handle: prometheus });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .merge(metrics_routes)
        .merge(api_routes)
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Utc};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};

    use crate::application::BookingOptions;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_database;

    async fn app() -> Router {
        let db = test_database().await;
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let booking = Arc::new(BookingService::new(repos, BookingOptions::default()));
        let handle = PrometheusBuilder::new().build_recorder().handle();
        create_api_router(db, booking, handle)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        use tower::Service;

        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&b).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let mut svc = app.clone().into_service();
        let resp = svc.call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// A day `n` days from today as `YYYY-MM-DD`
    fn day(n: i64) -> String {
        (Utc::now().date_naive() + Duration::days(n)).to_string()
    }

    async fn create_property(app: &Router) -> i64 {
        let (status, body) = call(
            app,
            "POST",
            "/api/v1/properties",
            Some(json!({
                "host_id": "host-1",
                "title": "Harbour loft",
                "city": "Lisbon",
                "country": "PT",
                "nightly_rate": "100.00",
                "cleaning_fee": "20.00",
                "max_guests": 4,
                "status": "active"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }

    async fn book(app: &Router, property_id: i64, from: i64, to: i64) -> (StatusCode, Value) {
        call(
            app,
            "POST",
            "/api/v1/reservations",
            Some(json!({
                "property_id": property_id,
                "guest_id": "guest-1",
                "check_in": day(from),
                "check_out": day(to),
                "guest_count": 2
            })),
        )
        .await
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app().await;
        let (status, body) = call(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"]["status"], "ok");
    }

    #[tokio::test]
    async fn quote_prices_a_stay() {
        let app = app().await;
        let id = create_property(&app).await;

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/v1/properties/{id}/quote"),
            Some(json!({"check_in": day(30), "check_out": day(33), "guest_count": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["available"], true);
        assert_eq!(body["data"]["nights"], 3);
        assert_eq!(body["data"]["cost"]["total"], "376.40");
    }

    #[tokio::test]
    async fn booking_flow_and_conflicts() {
        let app = app().await;
        let id = create_property(&app).await;

        let (status, body) = book(&app, id, 30, 34).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["data"]["status"], "pending");
        let rid = body["data"]["id"].as_i64().unwrap();
        assert!(body["data"]["booking_id"].as_str().unwrap().starts_with("BK"));

        // Pending stays do not block.
        let (status, _) = book(&app, id, 32, 35).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(&app, "POST", &format!("/api/v1/reservations/{rid}/confirm"), None).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["status"], "confirmed");
        assert_eq!(body["data"]["confirmation_code"].as_str().unwrap().len(), 6);

        let (status, body) = book(&app, id, 33, 36).await;
        assert_eq!(status, StatusCode::CONFLICT, "{body}");
        assert_eq!(body["success"], false);

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/v1/properties/{id}/quote"),
            Some(json!({"check_in": day(31), "check_out": day(32), "guest_count": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["available"], false);
        assert!(body["data"]["reason"].is_string());

        // Back-to-back is fine.
        let (status, _) = book(&app, id, 34, 36).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(&app, "GET", &format!("/api/v1/reservations?property_id={id}&status=pending"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 2);
    }

    #[tokio::test]
    async fn invalid_stays_are_unprocessable() {
        let app = app().await;
        let id = create_property(&app).await;

        // Too many guests for the listing.
        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/reservations",
            Some(json!({
                "property_id": id,
                "guest_id": "guest-1",
                "check_in": day(30),
                "check_out": day(32),
                "guest_count": 9
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("maximum is 4"));

        // Reversed range.
        let (status, _) = book(&app, id, 32, 30).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        // Request validation: zero guests.
        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/reservations",
            Some(json!({
                "property_id": id,
                "guest_id": "guest-1",
                "check_in": day(30),
                "check_out": day(32),
                "guest_count": 0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        // Same-day booking violates the one-day advance notice.
        let (status, body) = book(&app, id, 0, 2).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("ahead"));
    }

    #[tokio::test]
    async fn lifecycle_errors_map_to_status_codes() {
        let app = app().await;
        let id = create_property(&app).await;
        let (_, body) = book(&app, id, 30, 32).await;
        let rid = body["data"]["id"].as_i64().unwrap();

        let (status, _) = call(&app, "POST", &format!("/api/v1/reservations/{rid}/check-in"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = call(&app, "POST", "/api/v1/reservations/9999/confirm", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(
            &app,
            "POST",
            &format!("/api/v1/reservations/{rid}/cancel"),
            Some(json!({"reason": "changed_my_mind"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn cancellation_refund_is_previewed_and_persisted() {
        let app = app().await;
        let id = create_property(&app).await;
        let (_, body) = book(&app, id, 30, 33).await;
        let rid = body["data"]["id"].as_i64().unwrap();

        let (status, preview) = call(&app, "GET", &format!("/api/v1/reservations/{rid}/refund-preview"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(preview["data"]["refund_amount"], "376.40");
        assert_eq!(preview["data"]["days_until_check_in"], 30);

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/v1/reservations/{rid}/cancel"),
            Some(json!({"reason": "guest_request", "notes": "plans changed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["status"], "cancelled");
        assert_eq!(body["data"]["cancellation"]["refund_amount"], "376.40");
        assert_eq!(body["data"]["cancellation"]["reason"], "guest_request");
    }

    #[tokio::test]
    async fn blocked_dates_crud() {
        let app = app().await;
        let id = create_property(&app).await;
        let uri = format!("/api/v1/properties/{id}/blocked-dates");

        let (status, _) = call(&app, "POST", &uri, Some(json!({"date": day(31), "reason": "maintenance"}))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = call(&app, "POST", &uri, Some(json!({"date": day(31)}))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = book(&app, id, 30, 33).await;
        assert_eq!(status, StatusCode::CONFLICT, "{body}");

        let (_, body) = call(&app, "GET", &uri, None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, _) = call(&app, "DELETE", &format!("{uri}/{}", day(31)), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, "DELETE", &format!("{uri}/{}", day(31)), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = book(&app, id, 30, 33).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn oversized_money_is_rejected_before_storage() {
        let app = app().await;
        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/properties",
            Some(json!({
                "host_id": "host-1",
                "title": "Gold plated",
                "city": "Lisbon",
                "country": "PT",
                "nightly_rate": "79228162514264337593543950335",
                "max_guests": 2
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("nightly_rate"));

        let (_, body) = call(&app, "GET", "/api/v1/properties", None).await;
        assert_eq!(body["data"]["total"], 0);
    }

    #[tokio::test]
    async fn property_search_filters() {
        let app = app().await;
        create_property(&app).await;
        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/properties",
            Some(json!({
                "host_id": "host-2",
                "title": "Fjord cabin",
                "city": "Bergen",
                "state": "Vestland",
                "country": "Norway",
                "nightly_rate": "240.00",
                "max_guests": 8,
                "status": "active"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let titles = |body: &Value| -> Vec<String> {
            body["data"]["items"]
                .as_array()
                .unwrap()
                .iter()
                .map(|p| p["title"].as_str().unwrap().to_string())
                .collect()
        };

        let (status, body) = call(&app, "GET", "/api/v1/properties?location=vestland", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), vec!["Fjord cabin"]);

        let (_, body) = call(&app, "GET", "/api/v1/properties?location=pt", None).await;
        assert_eq!(titles(&body), vec!["Harbour loft"]);

        let (_, body) = call(&app, "GET", "/api/v1/properties?max_price=150", None).await;
        assert_eq!(titles(&body), vec!["Harbour loft"]);

        let (_, body) = call(&app, "GET", "/api/v1/properties?min_price=100&num_guests=6", None).await;
        assert_eq!(titles(&body), vec!["Fjord cabin"]);

        let (status, _) = call(&app, "GET", "/api/v1/properties?min_price=300&max_price=100", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn property_update_and_delete() {
        let app = app().await;
        let id = create_property(&app).await;
        let uri = format!("/api/v1/properties/{id}");

        let (status, body) = call(&app, "PUT", &uri, Some(json!({"is_available": false}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["is_available"], false);

        // Unavailable listings refuse bookings.
        let (status, _) = book(&app, id, 30, 32).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = call(&app, "PUT", &uri, Some(json!({"min_nights": 10, "max_nights": 5}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = call(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_text() {
        use tower::Service;

        let app = app().await;
        let mut svc = app.into_service();
        let resp = svc
            .call(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
    }
}
