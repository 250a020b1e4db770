//! Proyección de presentación del request
//!
//! Transformación pura de lectura: dado un request con hijos poblados
//! calcula el resumen de display. Tolera hijos ausentes sin lanzar,
//! devolviendo defaults ("N/A", 0, "—") aunque el modelo de datos
//! garantice ≥1 leg y ≥1 guest.

use crate::dto::request_dto::RequestSummary;
use crate::models::request::{HydratedRequest, RequestStatus};

/// Clase de badge para el estado del request
pub fn status_badge(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Pending => "status-pending",
        RequestStatus::Approved => "status-approved",
        RequestStatus::Rejected => "status-rejected",
        RequestStatus::Completed => "status-completed",
    }
}

/// Calcula el resumen de display de un request hidratado
pub fn summarize(hydrated: &HydratedRequest) -> RequestSummary {
    let legs = hydrated.ordered_legs();

    let first_arrival_date = legs
        .first()
        .map(|leg| leg.arrival_date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let final_destination = hydrated
        .final_destination()
        .map(str::to_string)
        .unwrap_or_else(|| "—".to_string());

    let journey_route = match legs.first() {
        Some(first) => {
            let mut route = vec![first.from_location.as_str()];
            route.extend(legs.iter().map(|leg| leg.to_location.as_str()));
            route.join(" → ")
        }
        None => "—".to_string(),
    };

    // Las asignaciones vienen ordenadas más reciente primero
    let latest_priority = hydrated.assignments.first().map(|a| a.priority);

    RequestSummary {
        status_badge: status_badge(hydrated.request.req_status).to_string(),
        latest_priority,
        first_arrival_date,
        guest_count: hydrated.guests.len(),
        vehicle_count: hydrated.vehicle_requests.len(),
        final_destination,
        journey_route,
    }
}
