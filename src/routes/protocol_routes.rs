//! Rutas de asignación de oficiales

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::protocol_controller::ProtocolController;
use crate::dto::assignment_dto::{
    AssignLegsRequest, AssignOfficerRequest, LegCandidates, MultiAssignResponse,
};
use crate::dto::common::ApiResponse;
use crate::middleware::identity::CallerIdentity;
use crate::models::assignment::ProtocolAssignment;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_protocol_router() -> Router<AppState> {
    Router::new()
        .route("/assign", post(assign_officer))
        .route("/assign-legs", post(assign_officers_multiple))
        .route("/requests/:id/candidate-officers", get(candidate_officers))
}

async fn assign_officer(
    State(state): State<AppState>,
    CallerIdentity(incharge_id): CallerIdentity,
    Json(request): Json<AssignOfficerRequest>,
) -> Result<Json<ApiResponse<ProtocolAssignment>>, AppError> {
    let controller = ProtocolController::new(state.pool.clone());
    let response = controller.assign_single(incharge_id, request).await?;
    Ok(Json(ApiResponse::new(response)))
}

async fn assign_officers_multiple(
    State(state): State<AppState>,
    CallerIdentity(incharge_id): CallerIdentity,
    Json(request): Json<AssignLegsRequest>,
) -> Result<Json<ApiResponse<MultiAssignResponse>>, AppError> {
    let controller = ProtocolController::new(state.pool.clone());
    let response = controller.assign_multiple(incharge_id, request).await?;
    Ok(Json(ApiResponse::new(response)))
}

async fn candidate_officers(
    State(state): State<AppState>,
    CallerIdentity(_incharge_id): CallerIdentity,
    Path(request_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<LegCandidates>>>, AppError> {
    let controller = ProtocolController::new(state.pool.clone());
    let response = controller.candidate_officers(request_id).await?;
    Ok(Json(ApiResponse::new(response)))
}
