//! DTOs de asignación de oficiales

use serde::{Deserialize, Serialize};

use crate::models::assignment::{Priority, ProtocolAssignment};
use crate::models::directory::Officer;

/// Asignación en modo single: aplica al request completo
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignOfficerRequest {
    pub request_id: i64,
    pub officer_id: i64,
    pub priority: Priority,
    pub remarks: Option<String>,
    pub officer_location_id: Option<i64>,
}

/// Una entrada de asignación por leg
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegAssignmentEntry {
    pub journey_leg_id: i64,
    pub officer_id: i64,
    pub priority: Priority,
    pub remarks: Option<String>,
}

/// Asignación multi-leg con semántica de éxito parcial
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignLegsRequest {
    pub request_id: i64,
    pub assignments: Vec<LegAssignmentEntry>,
}

/// Un leg que no pudo asignarse, con el motivo legible
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableLeg {
    pub journey_leg_id: i64,
    pub location: String,
    pub reason: String,
}

/// Resultado compuesto de una asignación multi-leg
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiAssignResponse {
    pub succeeded: Vec<ProtocolAssignment>,
    pub unavailable: Vec<UnavailableLeg>,
    pub message: String,
}

impl MultiAssignResponse {
    /// Mensaje compuesto "N assigned, M skipped: motivos"
    pub fn compose_message(succeeded: usize, unavailable: &[UnavailableLeg]) -> String {
        if unavailable.is_empty() {
            return format!("{} assigned", succeeded);
        }
        let reasons: Vec<&str> = unavailable.iter().map(|u| u.reason.as_str()).collect();
        format!(
            "{} assigned, {} skipped: {}",
            succeeded,
            unavailable.len(),
            reasons.join("; ")
        )
    }
}

/// Oficiales candidatos para un leg concreto
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegCandidates {
    pub journey_leg_id: i64,
    pub destination: String,
    pub officers: Vec<Officer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_message_all_assigned() {
        assert_eq!(MultiAssignResponse::compose_message(3, &[]), "3 assigned");
    }

    #[test]
    fn test_compose_message_partial() {
        let unavailable = vec![UnavailableLeg {
            journey_leg_id: 7,
            location: "Chennai".to_string(),
            reason: "No protocol officer covers Chennai".to_string(),
        }];
        assert_eq!(
            MultiAssignResponse::compose_message(1, &unavailable),
            "1 assigned, 1 skipped: No protocol officer covers Chennai"
        );
    }
}
