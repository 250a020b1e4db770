//! Modelo de JourneyLeg
//!
//! Un leg es un tramo direccional del viaje (de X a Y con un solo modo
//! de transporte). Pertenece exclusivamente a su Request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Modo de transporte - mapea al ENUM travel_mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "travel_mode", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TravelMode {
    Byroad,
    Byrail,
    Byair,
}

impl TravelMode {
    /// Nombre del campo identificador que exige cada modo
    pub fn identifier_field(&self) -> &'static str {
        match self {
            TravelMode::Byrail => "trainNumber",
            TravelMode::Byair => "flightNumber",
            TravelMode::Byroad => "vehicleNumber",
        }
    }
}

/// JourneyLeg - mapea exactamente a la tabla journey_legs.
///
/// El id lo asigna siempre la base de datos al crear el Request; nunca
/// se acepta un id derivado del índice del payload como clave de join.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JourneyLeg {
    pub id: i64,
    pub request_id: i64,
    pub leg_order: i32,
    pub mode: TravelMode,
    pub from_location: String,
    pub to_location: String,
    pub train_number: Option<String>,
    pub flight_number: Option<String>,
    pub vehicle_number: Option<String>,
    pub arrival_date: NaiveDate,
    // HH:mm tal cual llegó en el wire format
    pub arrival_time: Option<String>,
}
