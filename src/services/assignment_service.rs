//! Motor de asignación de oficiales
//!
//! Mapea journey legs a oficiales bajo las reglas de negocio de
//! prioridad y cobertura. Las entradas inválidas se rechazan en bloque
//! antes de tocar la base; los fallos de persistencia o de cobertura se
//! aíslan por leg y se reportan como `unavailable` sin abortar el resto
//! de la llamada.
//!
//! Ciclo de vida por asignación: sin fila -> assigned -> completed, con
//! assigned -> rejected como salida alternativa; una rejected puede ser
//! superseded por una asignación nueva.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{info, warn};

use crate::dto::assignment_dto::{
    AssignLegsRequest, AssignOfficerRequest, LegAssignmentEntry, MultiAssignResponse,
    UnavailableLeg,
};
use crate::models::assignment::{Priority, ProtocolAssignment};
use crate::models::directory::Officer;
use crate::models::journey_leg::JourneyLeg;
use crate::repositories::assignment_repository::AssignmentRepository;
use crate::repositories::request_repository::RequestRepository;
use crate::services::directory_service::OfficerDirectory;
use crate::utils::errors::{not_found_error, AppError, AppResult, FieldErrors};

// ---------------------------------------------------------------------------
// Reglas puras
// ---------------------------------------------------------------------------

/// Regla compartida single/multi: oficial válido y, si la prioridad es
/// high, remarks con contenido real (un espacio solo no cuenta).
pub fn validate_assignment_rules(
    officer_id: i64,
    priority: Priority,
    remarks: Option<&str>,
    path_prefix: &str,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if officer_id < 1 {
        errors.insert(
            format!("{}officerId", path_prefix),
            "Please select an officer".to_string(),
        );
    }
    if priority == Priority::High {
        let has_remarks = remarks.map(str::trim).map_or(false, |r| !r.is_empty());
        if !has_remarks {
            errors.insert(
                format!("{}remarks", path_prefix),
                "Remarks are required for high priority assignments".to_string(),
            );
        }
    }
    errors
}

/// Validación fail-fast de todas las entradas multi-leg: cualquier
/// violación rechaza la llamada completa antes de persistir nada.
pub fn validate_entries(entries: &[LegAssignmentEntry]) -> AppResult<()> {
    if entries.is_empty() {
        let mut errors = FieldErrors::new();
        errors.insert(
            "assignments".to_string(),
            "At least one assignment entry is required".to_string(),
        );
        return Err(AppError::Validation(errors));
    }

    let mut errors = FieldErrors::new();
    for (i, entry) in entries.iter().enumerate() {
        let prefix = format!("assignments[{}].", i);
        errors.extend(validate_assignment_rules(
            entry.officer_id,
            entry.priority,
            entry.remarks.as_deref(),
            &prefix,
        ));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    Ok(())
}

/// Plan de persistencia de una llamada multi-leg
#[derive(Debug)]
pub struct AssignmentPlan<'a> {
    pub accepted: Vec<(&'a LegAssignmentEntry, &'a JourneyLeg)>,
    pub unavailable: Vec<UnavailableLeg>,
}

/// Separa las entradas en persistibles y no disponibles según la
/// cobertura confirmada por el directorio para cada destino.
pub fn plan_assignments<'a>(
    legs: &'a [JourneyLeg],
    entries: &'a [LegAssignmentEntry],
    candidates: &HashMap<i64, Vec<Officer>>,
) -> AssignmentPlan<'a> {
    let mut plan = AssignmentPlan {
        accepted: Vec::new(),
        unavailable: Vec::new(),
    };

    for entry in entries {
        let leg = legs.iter().find(|leg| leg.id == entry.journey_leg_id);
        let leg = match leg {
            Some(leg) => leg,
            None => {
                plan.unavailable.push(UnavailableLeg {
                    journey_leg_id: entry.journey_leg_id,
                    location: "unknown".to_string(),
                    reason: format!(
                        "Journey leg {} does not belong to this request",
                        entry.journey_leg_id
                    ),
                });
                continue;
            }
        };

        let covered = candidates
            .get(&leg.id)
            .map_or(false, |officers| !officers.is_empty());
        if !covered {
            plan.unavailable.push(UnavailableLeg {
                journey_leg_id: leg.id,
                location: leg.to_location.clone(),
                reason: format!("No protocol officer currently covers '{}'", leg.to_location),
            });
            continue;
        }

        plan.accepted.push((entry, leg));
    }

    plan
}

/// Candidatos por leg según el destino de cada tramo. Un directorio
/// caído degrada a lista vacía: el triage sigue en pie con "no officers
/// found" en lugar de un error duro.
pub async fn resolve_candidate_officers(
    directory: &dyn OfficerDirectory,
    legs: &[JourneyLeg],
) -> HashMap<i64, Vec<Officer>> {
    let mut candidates = HashMap::with_capacity(legs.len());
    for leg in legs {
        let officers = match directory
            .search_officers(None, Some(leg.to_location.as_str()))
            .await
        {
            Ok(officers) => officers,
            Err(e) => {
                warn!(
                    "directory lookup for '{}' degraded to empty: {}",
                    leg.to_location, e
                );
                Vec::new()
            }
        };
        candidates.insert(leg.id, officers);
    }
    candidates
}

// ---------------------------------------------------------------------------
// Motor con persistencia
// ---------------------------------------------------------------------------

pub struct AssignmentEngine {
    requests: RequestRepository,
    assignments: AssignmentRepository,
}

impl AssignmentEngine {
    pub fn new(pool: PgPool) -> Self {
        Self {
            requests: RequestRepository::new(pool.clone()),
            assignments: AssignmentRepository::new(pool),
        }
    }

    /// Asignación multi-leg con semántica de éxito parcial: algunos legs
    /// pueden asignarse mientras otros se reportan unavailable en la
    /// misma respuesta. Un fallo persistiendo el leg 2 nunca revierte el
    /// leg 1 ya asignado.
    pub async fn assign_multiple(
        &self,
        directory: &dyn OfficerDirectory,
        incharge_id: i64,
        request: AssignLegsRequest,
    ) -> AppResult<MultiAssignResponse> {
        let hydrated = self
            .requests
            .find_by_id(request.request_id)
            .await?
            .ok_or_else(|| not_found_error("Request", request.request_id))?;

        validate_entries(&request.assignments)?;

        let candidates = resolve_candidate_officers(directory, &hydrated.journey_legs).await;
        let plan = plan_assignments(&hydrated.journey_legs, &request.assignments, &candidates);

        let mut succeeded = Vec::new();
        let mut unavailable = plan.unavailable;
        for (entry, leg) in plan.accepted {
            match self
                .assignments
                .upsert_for_leg(
                    request.request_id,
                    leg.id,
                    entry.officer_id,
                    incharge_id,
                    entry.priority,
                    entry.remarks.as_deref().map(str::trim),
                    None,
                )
                .await
            {
                Ok(assignment) => succeeded.push(assignment),
                Err(e) => {
                    // Fallo aislado: los legs hermanos ya asignados se quedan
                    warn!("assignment for leg {} failed: {}", leg.id, e);
                    unavailable.push(UnavailableLeg {
                        journey_leg_id: leg.id,
                        location: leg.to_location.clone(),
                        reason: format!("Could not persist assignment: {}", e),
                    });
                }
            }
        }

        let message = MultiAssignResponse::compose_message(succeeded.len(), &unavailable);
        info!(
            "request {}: {} ({} unavailable)",
            request.request_id,
            message,
            unavailable.len()
        );
        Ok(MultiAssignResponse {
            succeeded,
            unavailable,
            message,
        })
    }

    /// Modo single: wrapper de conveniencia que aplica las mismas reglas
    /// de validación y asigna a nivel de request completo.
    pub async fn assign_single(
        &self,
        incharge_id: i64,
        request: AssignOfficerRequest,
    ) -> AppResult<ProtocolAssignment> {
        let errors = validate_assignment_rules(
            request.officer_id,
            request.priority,
            request.remarks.as_deref(),
            "",
        );
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        if !self.requests.exists(request.request_id).await? {
            return Err(not_found_error("Request", request.request_id));
        }

        self.assignments
            .upsert_for_request(
                request.request_id,
                request.officer_id,
                incharge_id,
                request.priority,
                request.remarks.as_deref().map(str::trim),
                request.officer_location_id,
            )
            .await
    }

    /// Request hidratado para la vista de triage/candidatos
    pub async fn load_request(&self, request_id: i64) -> AppResult<crate::models::request::HydratedRequest> {
        self.requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| not_found_error("Request", request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::directory::Location;
    use crate::models::journey_leg::TravelMode;
    use crate::services::directory_service::testing::StaticDirectory;
    use chrono::NaiveDate;

    fn leg(id: i64, leg_order: i32, from: &str, to: &str) -> JourneyLeg {
        JourneyLeg {
            id,
            request_id: 1,
            leg_order,
            mode: TravelMode::Byroad,
            from_location: from.to_string(),
            to_location: to.to_string(),
            train_number: None,
            flight_number: None,
            vehicle_number: Some("MP04AB1234".to_string()),
            arrival_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            arrival_time: None,
        }
    }

    fn entry(journey_leg_id: i64, officer_id: i64, priority: Priority) -> LegAssignmentEntry {
        LegAssignmentEntry {
            journey_leg_id,
            officer_id,
            priority,
            remarks: None,
        }
    }

    fn officer(id: i64, username: &str, location_id: Option<i64>) -> Officer {
        Officer {
            id,
            username: username.to_string(),
            email: format!("{}@protocol.gov.in", username),
            location_id,
        }
    }

    #[test]
    fn test_high_priority_requires_remarks() {
        let errors = validate_assignment_rules(1, Priority::High, None, "");
        assert!(errors.contains_key("remarks"));

        // Un espacio solo no es un remark válido
        let errors = validate_assignment_rules(1, Priority::High, Some(" "), "");
        assert!(errors.contains_key("remarks"));

        let errors = validate_assignment_rules(1, Priority::High, Some("VIP escort"), "");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_medium_priority_does_not_require_remarks() {
        let errors = validate_assignment_rules(1, Priority::Medium, None, "");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_officer_id_must_be_positive() {
        let errors = validate_assignment_rules(0, Priority::Low, None, "");
        assert!(errors.contains_key("officerId"));
    }

    #[test]
    fn test_validate_entries_fails_fast_on_any_bad_entry() {
        let entries = vec![
            entry(1, 10, Priority::Medium),
            LegAssignmentEntry {
                journey_leg_id: 2,
                officer_id: 11,
                priority: Priority::High,
                remarks: Some("   ".to_string()),
            },
        ];
        match validate_entries(&entries) {
            Err(AppError::Validation(errors)) => {
                assert!(errors.contains_key("assignments[1].remarks"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_entries_rejects_empty_list() {
        assert!(validate_entries(&[]).is_err());
    }

    #[test]
    fn test_plan_partial_success() {
        let legs = vec![leg(1, 1, "Indore", "Bhopal"), leg(2, 2, "Bhopal", "Chennai")];
        let entries = vec![entry(1, 10, Priority::Medium), entry(2, 11, Priority::Medium)];

        let mut candidates = HashMap::new();
        candidates.insert(1, vec![officer(10, "kumar", Some(5))]);
        candidates.insert(2, Vec::new());

        let plan = plan_assignments(&legs, &entries, &candidates);
        assert_eq!(plan.accepted.len(), 1);
        assert_eq!(plan.accepted[0].1.id, 1);
        assert_eq!(plan.unavailable.len(), 1);
        assert_eq!(plan.unavailable[0].journey_leg_id, 2);
        assert_eq!(plan.unavailable[0].location, "Chennai");
    }

    #[test]
    fn test_plan_rejects_foreign_leg_id() {
        let legs = vec![leg(1, 1, "Indore", "Bhopal")];
        let entries = vec![entry(99, 10, Priority::Medium)];
        let candidates = HashMap::new();

        let plan = plan_assignments(&legs, &entries, &candidates);
        assert!(plan.accepted.is_empty());
        assert_eq!(plan.unavailable.len(), 1);
        assert!(plan.unavailable[0].reason.contains("does not belong"));
    }

    #[tokio::test]
    async fn test_resolve_candidates_per_leg_destination() {
        let directory = StaticDirectory::new(
            vec![officer(1, "kumar", Some(5)), officer(2, "mehta", None)],
            vec![Location {
                id: 5,
                name: "Bhopal".to_string(),
                city: None,
                state: None,
            }],
        );
        let legs = vec![
            leg(1, 1, "Indore", "Bhopal High Court"),
            leg(2, 2, "Bhopal", "Chennai"),
        ];

        let candidates = resolve_candidate_officers(&directory, &legs).await;

        let bhopal: Vec<i64> = candidates[&1].iter().map(|o| o.id).collect();
        assert_eq!(bhopal, vec![1, 2]);

        // El oficial con sede en Bhopal no aparece para Chennai; el
        // oficial sin sede aparece en ambos.
        let chennai: Vec<i64> = candidates[&2].iter().map(|o| o.id).collect();
        assert_eq!(chennai, vec![2]);
    }

    #[tokio::test]
    async fn test_resolve_candidates_degrades_when_directory_is_down() {
        let mut directory = StaticDirectory::new(vec![officer(1, "kumar", None)], Vec::new());
        directory.unavailable = true;
        let legs = vec![leg(1, 1, "Indore", "Bhopal")];

        let candidates = resolve_candidate_officers(&directory, &legs).await;
        assert!(candidates[&1].is_empty());
    }
}
