//! Rutas del ciclo de vida del request

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::request_controller::RequestController;
use crate::dto::common::ApiResponse;
use crate::dto::request_dto::{PendingQuery, RequestResponse, SubmitRequestPayload};
use crate::dto::service_dto::{
    AddGuesthouseServiceRequest, AddOtherServiceRequest, AddVehicleServiceRequest,
};
use crate::middleware::identity::CallerIdentity;
use crate::models::service_request::{GuesthouseRequest, OtherRequest, VehicleRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_request_router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_request))
        .route("/mine", get(list_my_requests))
        .route("/pending", get(list_pending_requests))
        .route("/:id/vehicle-requests", post(add_vehicle_request))
        .route("/:id/guesthouse-requests", post(add_guesthouse_request))
        .route("/:id/other-requests", post(add_other_request))
}

async fn submit_request(
    State(state): State<AppState>,
    CallerIdentity(requestee_id): CallerIdentity,
    Json(payload): Json<SubmitRequestPayload>,
) -> Result<Json<ApiResponse<RequestResponse>>, AppError> {
    let controller = RequestController::new(state.pool.clone());
    let response = controller.submit(requestee_id, payload).await?;
    Ok(Json(ApiResponse::new(response)))
}

async fn list_my_requests(
    State(state): State<AppState>,
    CallerIdentity(requestee_id): CallerIdentity,
) -> Result<Json<ApiResponse<Vec<RequestResponse>>>, AppError> {
    let controller = RequestController::new(state.pool.clone());
    let response = controller.list_mine(requestee_id).await?;
    Ok(Json(ApiResponse::new(response)))
}

async fn list_pending_requests(
    State(state): State<AppState>,
    CallerIdentity(_incharge_id): CallerIdentity,
    Query(query): Query<PendingQuery>,
) -> Result<Json<ApiResponse<Vec<RequestResponse>>>, AppError> {
    let controller = RequestController::new(state.pool.clone());
    let (items, meta) = controller.list_pending(query.page(), query.limit()).await?;
    Ok(Json(ApiResponse::paginated(items, meta)))
}

async fn add_vehicle_request(
    State(state): State<AppState>,
    CallerIdentity(_staff_id): CallerIdentity,
    Path(request_id): Path<i64>,
    Json(fields): Json<AddVehicleServiceRequest>,
) -> Result<Json<ApiResponse<VehicleRequest>>, AppError> {
    let controller = RequestController::new(state.pool.clone());
    let response = controller.add_vehicle(request_id, fields).await?;
    Ok(Json(ApiResponse::new(response)))
}

async fn add_guesthouse_request(
    State(state): State<AppState>,
    CallerIdentity(_staff_id): CallerIdentity,
    Path(request_id): Path<i64>,
    Json(fields): Json<AddGuesthouseServiceRequest>,
) -> Result<Json<ApiResponse<GuesthouseRequest>>, AppError> {
    let controller = RequestController::new(state.pool.clone());
    let response = controller.add_guesthouse(request_id, fields).await?;
    Ok(Json(ApiResponse::new(response)))
}

async fn add_other_request(
    State(state): State<AppState>,
    CallerIdentity(_staff_id): CallerIdentity,
    Path(request_id): Path<i64>,
    Json(fields): Json<AddOtherServiceRequest>,
) -> Result<Json<ApiResponse<OtherRequest>>, AppError> {
    let controller = RequestController::new(state.pool.clone());
    let response = controller.add_other(request_id, fields).await?;
    Ok(Json(ApiResponse::new(response)))
}
