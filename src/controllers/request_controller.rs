//! Controller del ciclo de vida del request

use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::common::PageMeta;
use crate::dto::request_dto::{RequestResponse, SubmitRequestPayload};
use crate::dto::service_dto::{
    AddGuesthouseServiceRequest, AddOtherServiceRequest, AddVehicleServiceRequest,
};
use crate::models::request::HydratedRequest;
use crate::models::service_request::{GuesthouseRequest, OtherRequest, VehicleRequest};
use crate::repositories::request_repository::RequestRepository;
use crate::services::summary_service::summarize;
use crate::utils::errors::AppResult;
use crate::validation::validate_submission;

pub struct RequestController {
    repository: RequestRepository,
}

impl RequestController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: RequestRepository::new(pool),
        }
    }

    /// Envío de un request nuevo por el requestee autenticado.
    /// La validación rechaza el payload completo antes de tocar storage.
    pub async fn submit(
        &self,
        requestee_id: i64,
        payload: SubmitRequestPayload,
    ) -> AppResult<RequestResponse> {
        let new_request = validate_submission(&payload)?;
        let hydrated = self.repository.create(requestee_id, new_request).await?;
        info!(
            "request {} created by requestee {} ({} legs, {} guests)",
            hydrated.request.id,
            requestee_id,
            hydrated.journey_legs.len(),
            hydrated.guests.len()
        );
        Ok(to_response(hydrated))
    }

    /// Historial del propio requestee
    pub async fn list_mine(&self, requestee_id: i64) -> AppResult<Vec<RequestResponse>> {
        let requests = self.repository.find_by_requestee(requestee_id).await?;
        Ok(requests.into_iter().map(to_response).collect())
    }

    /// Cola de triage para el protocol in-charge
    pub async fn list_pending(
        &self,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<RequestResponse>, PageMeta)> {
        let (rows, total) = self.repository.find_pending(page, limit).await?;
        let items = rows
            .into_iter()
            .map(|(hydrated, requestee)| to_response(hydrated).with_requestee(requestee))
            .collect();
        Ok((items, PageMeta::new(total, page, limit)))
    }

    pub async fn add_vehicle(
        &self,
        request_id: i64,
        fields: AddVehicleServiceRequest,
    ) -> AppResult<VehicleRequest> {
        fields.validate()?;
        self.repository.add_vehicle_service(request_id, &fields).await
    }

    pub async fn add_guesthouse(
        &self,
        request_id: i64,
        fields: AddGuesthouseServiceRequest,
    ) -> AppResult<GuesthouseRequest> {
        fields.validate()?;
        self.repository
            .add_guesthouse_service(request_id, &fields)
            .await
    }

    pub async fn add_other(
        &self,
        request_id: i64,
        fields: AddOtherServiceRequest,
    ) -> AppResult<OtherRequest> {
        fields.validate()?;
        self.repository.add_other_service(request_id, &fields).await
    }
}

fn to_response(hydrated: HydratedRequest) -> RequestResponse {
    let summary = summarize(&hydrated);
    RequestResponse::from_hydrated(hydrated, summary)
}
