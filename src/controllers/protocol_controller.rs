//! Controller de asignación de oficiales (protocol in-charge)

use sqlx::PgPool;

use crate::dto::assignment_dto::{
    AssignLegsRequest, AssignOfficerRequest, LegCandidates, MultiAssignResponse,
};
use crate::models::assignment::ProtocolAssignment;
use crate::services::assignment_service::{resolve_candidate_officers, AssignmentEngine};
use crate::services::directory_service::PgOfficerDirectory;
use crate::utils::errors::AppResult;

pub struct ProtocolController {
    engine: AssignmentEngine,
    directory: PgOfficerDirectory,
}

impl ProtocolController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            engine: AssignmentEngine::new(pool.clone()),
            directory: PgOfficerDirectory::new(pool),
        }
    }

    /// Asignación en modo single sobre el request completo
    pub async fn assign_single(
        &self,
        incharge_id: i64,
        request: AssignOfficerRequest,
    ) -> AppResult<ProtocolAssignment> {
        self.engine.assign_single(incharge_id, request).await
    }

    /// Asignación multi-leg con reporte de éxito parcial
    pub async fn assign_multiple(
        &self,
        incharge_id: i64,
        request: AssignLegsRequest,
    ) -> AppResult<MultiAssignResponse> {
        self.engine
            .assign_multiple(&self.directory, incharge_id, request)
            .await
    }

    /// Oficiales candidatos por leg para la vista de asignación
    pub async fn candidate_officers(&self, request_id: i64) -> AppResult<Vec<LegCandidates>> {
        let hydrated = self.engine.load_request(request_id).await?;
        let mut candidates =
            resolve_candidate_officers(&self.directory, &hydrated.journey_legs).await;

        let mut result = Vec::with_capacity(hydrated.journey_legs.len());
        for leg in hydrated.ordered_legs() {
            result.push(LegCandidates {
                journey_leg_id: leg.id,
                destination: leg.to_location.clone(),
                officers: candidates.remove(&leg.id).unwrap_or_default(),
            });
        }
        Ok(result)
    }
}
