//! Modelo de ProtocolAssignment
//!
//! Vincula un Request (y opcionalmente un JourneyLeg concreto) con el
//! oficial de protocolo asignado. Para requests multi-leg existe como
//! máximo una asignación activa por par (request, journey_leg); una
//! reasignación reemplaza la fila anterior.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Prioridad de la asignación - mapea al ENUM assignment_priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "assignment_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Estado de avance del oficial - mapea al ENUM completion_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "completion_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    Pending,
    Assigned,
    Completed,
    Rejected,
}

/// ProtocolAssignment - mapea exactamente a la tabla protocol_assignments.
///
/// journey_leg_id NULL significa asignación a nivel de request (modo
/// single); un valor concreto la liga a ese leg.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProtocolAssignment {
    pub id: i64,
    pub request_id: i64,
    pub journey_leg_id: Option<i64>,
    pub assigned_officer_id: i64,
    pub assigned_by_incharge_id: i64,
    pub officer_location_id: Option<i64>,
    pub priority: Priority,
    pub completion_status: CompletionStatus,
    pub officer_remarks: Option<String>,
    pub assigned_at: DateTime<Utc>,
}
