//! DTOs del ciclo de vida del request
//!
//! El payload de envío llega en camelCase; los hijos persistidos se
//! serializan con sus nombres de columna, que es lo que el frontend
//! consume hoy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::assignment::{Priority, ProtocolAssignment};
use crate::models::guest::Guest;
use crate::models::journey_leg::{JourneyLeg, TravelMode};
use crate::models::request::{HydratedRequest, RequestStatus, RequesteeRef};
use crate::models::service_request::{GuesthouseRequest, OtherRequest, VehicleRequest};

// ---------------------------------------------------------------------------
// Payload de envío (requestee)
// ---------------------------------------------------------------------------

/// Payload crudo de un envío de request
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequestPayload {
    pub purpose: Option<String>,
    pub special_notes: Option<String>,
    pub journey_details: Vec<JourneyLegPayload>,
    pub guest_users: Vec<GuestPayload>,
    #[serde(default)]
    pub vehicle_requests: Option<Vec<VehicleServicePayload>>,
    #[serde(default)]
    pub guesthouse_requests: Option<Vec<GuesthouseServicePayload>>,
    #[serde(default)]
    pub other_requests: Option<Vec<OtherServicePayload>>,
}

/// Un leg del payload. legOrder viaja como número; el identificador
/// exigido depende del modo.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyLegPayload {
    pub leg_order: i32,
    pub mode: TravelMode,
    pub from_location: String,
    pub to_location: String,
    pub train_number: Option<String>,
    pub flight_number: Option<String>,
    pub vehicle_number: Option<String>,
    pub arrival_date: String,
    pub arrival_time: Option<String>,
}

/// Guest del payload. age viaja como string decimal validado.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestPayload {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub contact_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleServicePayload {
    pub pickup_location: String,
    pub destination: String,
    pub purpose: String,
    pub request_location: Option<String>,
}

/// guestCount viaja como string decimal validado, igual que age.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuesthouseServicePayload {
    pub check_in_date: String,
    pub checkout_date: String,
    pub purpose: String,
    pub guest_count: String,
    pub request_location: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherServicePayload {
    pub purpose: String,
    pub request_location: Option<String>,
}

// ---------------------------------------------------------------------------
// Proyección de lectura
// ---------------------------------------------------------------------------

/// Resumen de display calculado por el read-side.
/// Tolerante a hijos ausentes: nunca lanza, devuelve defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub status_badge: String,
    pub latest_priority: Option<Priority>,
    pub first_arrival_date: String,
    pub guest_count: usize,
    pub vehicle_count: usize,
    pub final_destination: String,
    pub journey_route: String,
}

/// Response completa de un request con hijos
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    pub id: i64,
    pub movement_number: Option<String>,
    pub requestee_id: i64,
    pub purpose: Option<String>,
    pub special_notes: Option<String>,
    pub req_status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub journey_details: Vec<JourneyLeg>,
    pub guest_users: Vec<Guest>,
    pub vehicle_requests: Vec<VehicleRequest>,
    pub guesthouse_requests: Vec<GuesthouseRequest>,
    pub other_requests: Vec<OtherRequest>,
    pub protocol_assignments: Vec<ProtocolAssignment>,
    pub summary: RequestSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requestee: Option<RequesteeRef>,
}

impl RequestResponse {
    pub fn from_hydrated(hydrated: HydratedRequest, summary: RequestSummary) -> Self {
        let HydratedRequest {
            request,
            mut journey_legs,
            guests,
            vehicle_requests,
            guesthouse_requests,
            other_requests,
            assignments,
        } = hydrated;
        journey_legs.sort_by_key(|leg| leg.leg_order);
        Self {
            id: request.id,
            movement_number: request.movement_number,
            requestee_id: request.requestee_id,
            purpose: request.purpose,
            special_notes: request.special_notes,
            req_status: request.req_status,
            created_at: request.created_at,
            journey_details: journey_legs,
            guest_users: guests,
            vehicle_requests,
            guesthouse_requests,
            other_requests,
            protocol_assignments: assignments,
            summary,
            requestee: None,
        }
    }

    pub fn with_requestee(mut self, requestee: RequesteeRef) -> Self {
        self.requestee = Some(requestee);
        self
    }
}

/// Query params del listado de pendientes
#[derive(Debug, Clone, Deserialize)]
pub struct PendingQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PendingQuery {
    pub fn page(&self) -> i64 {
        self.page.filter(|p| *p >= 1).unwrap_or(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.filter(|l| (1..=100).contains(l)).unwrap_or(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_query_defaults() {
        let q = PendingQuery {
            page: None,
            limit: None,
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 10);
    }

    #[test]
    fn test_pending_query_clamps_garbage() {
        let q = PendingQuery {
            page: Some(0),
            limit: Some(5000),
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 10);
    }

    #[test]
    fn test_submit_payload_wire_names() {
        let raw = serde_json::json!({
            "purpose": "Court visit",
            "journeyDetails": [{
                "legOrder": 1,
                "mode": "BYROAD",
                "fromLocation": "Indore",
                "toLocation": "Bhopal",
                "vehicleNumber": "MP04AB1234",
                "arrivalDate": "2025-03-01"
            }],
            "guestUsers": [{
                "firstName": "Ravi",
                "lastName": "Shah",
                "age": "34"
            }]
        });
        let payload: SubmitRequestPayload = serde_json::from_value(raw).unwrap();
        assert_eq!(payload.journey_details.len(), 1);
        assert_eq!(payload.journey_details[0].mode, TravelMode::Byroad);
        assert_eq!(payload.guest_users[0].age, "34");
        assert!(payload.vehicle_requests.is_none());
    }
}
