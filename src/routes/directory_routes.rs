//! Rutas del directorio de oficiales y sedes

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::dto::common::ApiResponse;
use crate::dto::directory_dto::{LocationQuery, OfficerSearchQuery};
use crate::models::directory::{Location, Officer};
use crate::services::directory_service::{OfficerDirectory, PgOfficerDirectory};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_directory_router() -> Router<AppState> {
    Router::new()
        .route("/officers", get(search_officers))
        .route("/locations", get(list_locations))
}

async fn search_officers(
    State(state): State<AppState>,
    Query(query): Query<OfficerSearchQuery>,
) -> Result<Json<ApiResponse<Vec<Officer>>>, AppError> {
    let directory = PgOfficerDirectory::new(state.pool.clone());
    let officers = directory
        .search_officers(query.search.as_deref(), query.destination.as_deref())
        .await?;
    Ok(Json(ApiResponse::new(officers)))
}

async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<ApiResponse<Vec<Location>>>, AppError> {
    let directory = PgOfficerDirectory::new(state.pool.clone());
    let locations = directory.locations_for_destination(&query.destination).await?;
    Ok(Json(ApiResponse::new(locations)))
}
