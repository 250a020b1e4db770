use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Json;
use serde_json::json;
use tower::ServiceExt;

// Router de test con la misma superficie que el health check real
fn create_test_app() -> axum::Router {
    axum::Router::new().route(
        "/health",
        get(|| async {
            Json(json!({
                "service": "protocol-management",
                "status": "healthy",
            }))
        }),
    )
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["service"], "protocol-management");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::get("/does-not-exist").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// Contratos de wire format que el frontend asume

#[test]
fn test_submission_wire_contract_round_trip() {
    let payload = json!({
        "purpose": "Court visit at Bhopal",
        "specialNotes": "VIP guest",
        "journeyDetails": [{
            "legOrder": 1,
            "mode": "BYRAIL",
            "fromLocation": "Indore",
            "toLocation": "Bhopal",
            "trainNumber": "12002",
            "arrivalDate": "2025-03-01",
            "arrivalTime": "08:30"
        }],
        "guestUsers": [{
            "firstName": "Ravi",
            "lastName": "Shah",
            "age": "34",
            "contactNumber": "9876543210"
        }]
    });

    // age y guestCount viajan como strings decimales; legOrder como número
    assert!(payload["journeyDetails"][0]["legOrder"].is_number());
    assert!(payload["guestUsers"][0]["age"].is_string());

    let round_trip: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&payload).unwrap()).unwrap();
    assert_eq!(round_trip, payload);
}

#[test]
fn test_error_envelope_shape() {
    // El contrato de error acordado: error/message/details/code
    let body = json!({
        "error": "Validation Error",
        "message": "The provided data is invalid",
        "details": { "journeyDetails[0].trainNumber": "Train number is required for BYRAIL journeys" },
        "code": "VALIDATION_ERROR"
    });
    assert!(body["details"]["journeyDetails[0].trainNumber"]
        .as_str()
        .unwrap()
        .contains("BYRAIL"));
}
