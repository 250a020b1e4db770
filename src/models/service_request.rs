//! Modelos de sub-requests de servicios
//!
//! Tres variantes (vehículo, guesthouse, otros) que comparten la
//! relación "pertenece a un Request" y el tag opcional request_location
//! que las correlaciona con el destino de un leg concreto.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Estado de atención de un servicio - mapea al ENUM service_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "service_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Pending,
    Completed,
    Cancelled,
}

/// VehicleRequest - mapea a la tabla vehicle_requests.
///
/// pickup/destination/purpose los aporta el requestee; vehicle_type,
/// vehicle_number, driver_name y driver_contact_no los completa el
/// staff más tarde.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleRequest {
    pub id: i64,
    pub request_id: i64,
    pub pickup_location: String,
    pub destination: String,
    pub purpose: String,
    pub request_location: Option<String>,
    pub vehicle_type: Option<String>,
    pub vehicle_number: Option<String>,
    pub driver_name: Option<String>,
    pub driver_contact_no: Option<String>,
    pub service_status: ServiceStatus,
}

/// GuesthouseRequest - mapea a la tabla guesthouse_requests
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GuesthouseRequest {
    pub id: i64,
    pub request_id: i64,
    pub check_in_date: NaiveDate,
    pub checkout_date: NaiveDate,
    pub purpose: String,
    pub guest_count: i32,
    pub request_location: Option<String>,
    pub guesthouse_location: Option<String>,
    pub service_status: ServiceStatus,
}

/// OtherRequest - mapea a la tabla other_requests
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OtherRequest {
    pub id: i64,
    pub request_id: i64,
    pub purpose: String,
    pub request_location: Option<String>,
    pub service_status: ServiceStatus,
}
