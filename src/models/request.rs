//! Modelo de Request
//!
//! Este módulo contiene el struct Request y el agregado hidratado con
//! sus hijos. Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

use super::assignment::ProtocolAssignment;
use super::guest::Guest;
use super::journey_leg::JourneyLeg;
use super::service_request::{GuesthouseRequest, OtherRequest, VehicleRequest};

/// Estado del request - mapea al ENUM request_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

/// Request principal - mapea exactamente a la tabla requests
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Request {
    pub id: i64,
    pub requestee_id: i64,
    pub movement_number: Option<String>,
    pub purpose: Option<String>,
    pub special_notes: Option<String>,
    pub req_status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Request con todos sus hijos cargados, listo para proyección
#[derive(Debug, Clone)]
pub struct HydratedRequest {
    pub request: Request,
    pub journey_legs: Vec<JourneyLeg>,
    pub guests: Vec<Guest>,
    pub vehicle_requests: Vec<VehicleRequest>,
    pub guesthouse_requests: Vec<GuesthouseRequest>,
    pub other_requests: Vec<OtherRequest>,
    pub assignments: Vec<ProtocolAssignment>,
}

impl HydratedRequest {
    /// Legs ordenados por leg_order ascendente
    pub fn ordered_legs(&self) -> Vec<&JourneyLeg> {
        let mut legs: Vec<&JourneyLeg> = self.journey_legs.iter().collect();
        legs.sort_by_key(|leg| leg.leg_order);
        legs
    }

    /// Destino final del viaje: to_location del último leg
    pub fn final_destination(&self) -> Option<&str> {
        self.ordered_legs()
            .last()
            .map(|leg| leg.to_location.as_str())
    }
}

/// Referencia mínima al requestee para la cola de triage
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RequesteeRef {
    pub id: i64,
    pub username: String,
}
