//! Capa de validación de envíos
//!
//! Acepta el payload crudo de un envío y produce o bien un valor de
//! construcción normalizado (strings con trim semántico, numéricos del
//! wire format ya parseados) o bien el mapa completo de errores por
//! ruta de campo. El envío se acepta o rechaza de forma atómica: no hay
//! aceptación parcial.

use chrono::NaiveDate;

use crate::dto::request_dto::{
    GuestPayload, GuesthouseServicePayload, JourneyLegPayload, OtherServicePayload,
    SubmitRequestPayload, VehicleServicePayload,
};
use crate::models::journey_leg::TravelMode;
use crate::utils::errors::{AppError, AppResult, FieldErrors};
use crate::utils::validation::{
    is_non_blank, is_valid_contact_number, is_valid_date, is_valid_time, parse_wire_number,
};

// ---------------------------------------------------------------------------
// Valor de construcción normalizado
// ---------------------------------------------------------------------------

/// Envío validado, listo para que el agregado lo persista
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub purpose: Option<String>,
    pub special_notes: Option<String>,
    pub journey_legs: Vec<NewJourneyLeg>,
    pub guests: Vec<NewGuest>,
    pub vehicle_requests: Vec<NewVehicleService>,
    pub guesthouse_requests: Vec<NewGuesthouseService>,
    pub other_requests: Vec<NewOtherService>,
}

/// Leg normalizado: solo conserva el identificador que exige su modo
#[derive(Debug, Clone)]
pub struct NewJourneyLeg {
    pub leg_order: i32,
    pub mode: TravelMode,
    pub from_location: String,
    pub to_location: String,
    pub train_number: Option<String>,
    pub flight_number: Option<String>,
    pub vehicle_number: Option<String>,
    pub arrival_date: NaiveDate,
    pub arrival_time: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewGuest {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub contact_number: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewVehicleService {
    pub pickup_location: String,
    pub destination: String,
    pub purpose: String,
    pub request_location: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewGuesthouseService {
    pub check_in_date: NaiveDate,
    pub checkout_date: NaiveDate,
    pub purpose: String,
    pub guest_count: i32,
    pub request_location: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOtherService {
    pub purpose: String,
    pub request_location: Option<String>,
}

// ---------------------------------------------------------------------------
// Validación
// ---------------------------------------------------------------------------

/// Valida un envío completo. Devuelve el valor de construcción o el
/// mapa de errores con rutas tipo `journeyDetails[0].trainNumber`.
pub fn validate_submission(payload: &SubmitRequestPayload) -> AppResult<NewRequest> {
    let mut errors = FieldErrors::new();

    if payload.journey_details.is_empty() {
        errors.insert(
            "journeyDetails".to_string(),
            "At least one journey detail is required".to_string(),
        );
    }
    if payload.guest_users.is_empty() {
        errors.insert(
            "guestUsers".to_string(),
            "At least one guest is required".to_string(),
        );
    }

    let legs: Vec<Option<NewJourneyLeg>> = payload
        .journey_details
        .iter()
        .enumerate()
        .map(|(i, leg)| validate_leg(i, leg, &mut errors))
        .collect();
    check_leg_order_uniqueness(&payload.journey_details, &mut errors);

    let guests: Vec<Option<NewGuest>> = payload
        .guest_users
        .iter()
        .enumerate()
        .map(|(i, guest)| validate_guest(i, guest, &mut errors))
        .collect();

    let vehicles: Vec<Option<NewVehicleService>> = payload
        .vehicle_requests
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, v)| validate_vehicle_service(i, v, &mut errors))
        .collect();

    let guesthouses: Vec<Option<NewGuesthouseService>> = payload
        .guesthouse_requests
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, g)| validate_guesthouse_service(i, g, &mut errors))
        .collect();

    let others: Vec<Option<NewOtherService>> = payload
        .other_requests
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, o)| validate_other_service(i, o, &mut errors))
        .collect();

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(NewRequest {
        purpose: opt_trimmed(payload.purpose.as_deref()),
        special_notes: opt_trimmed(payload.special_notes.as_deref()),
        journey_legs: legs.into_iter().flatten().collect(),
        guests: guests.into_iter().flatten().collect(),
        vehicle_requests: vehicles.into_iter().flatten().collect(),
        guesthouse_requests: guesthouses.into_iter().flatten().collect(),
        other_requests: others.into_iter().flatten().collect(),
    })
}

fn validate_leg(
    index: usize,
    leg: &JourneyLegPayload,
    errors: &mut FieldErrors,
) -> Option<NewJourneyLeg> {
    let mut valid = true;
    let path = |field: &str| format!("journeyDetails[{}].{}", index, field);

    if leg.leg_order < 1 {
        errors.insert(
            path("legOrder"),
            "Leg order must be a positive number".to_string(),
        );
        valid = false;
    }

    let from_location = leg.from_location.trim();
    if from_location.is_empty() {
        errors.insert(path("fromLocation"), "From location is required".to_string());
        valid = false;
    }
    let to_location = leg.to_location.trim();
    if to_location.is_empty() {
        errors.insert(path("toLocation"), "To location is required".to_string());
        valid = false;
    }

    // El identificador exigido depende del modo; los otros dos se descartan.
    let identifier = match leg.mode {
        TravelMode::Byrail => leg.train_number.as_deref(),
        TravelMode::Byair => leg.flight_number.as_deref(),
        TravelMode::Byroad => leg.vehicle_number.as_deref(),
    };
    let identifier = identifier.map(str::trim).filter(|v| !v.is_empty());
    if identifier.is_none() {
        let message = match leg.mode {
            TravelMode::Byrail => "Train number is required for BYRAIL journeys",
            TravelMode::Byair => "Flight number is required for BYAIR journeys",
            TravelMode::Byroad => "Vehicle number is required for BYROAD journeys",
        };
        errors.insert(path(leg.mode.identifier_field()), message.to_string());
        valid = false;
    }

    let arrival_date = parse_wire_date(&leg.arrival_date);
    if arrival_date.is_none() {
        errors.insert(path("arrivalDate"), "Must be YYYY-MM-DD".to_string());
        valid = false;
    }

    let arrival_time = opt_trimmed(leg.arrival_time.as_deref());
    if let Some(time) = arrival_time.as_deref() {
        if !is_valid_time(time) {
            errors.insert(path("arrivalTime"), "Must be HH:mm".to_string());
            valid = false;
        }
    }

    if !valid {
        return None;
    }

    let identifier = identifier.map(str::to_string);
    Some(NewJourneyLeg {
        leg_order: leg.leg_order,
        mode: leg.mode,
        from_location: from_location.to_string(),
        to_location: to_location.to_string(),
        train_number: matches!(leg.mode, TravelMode::Byrail)
            .then(|| identifier.clone())
            .flatten(),
        flight_number: matches!(leg.mode, TravelMode::Byair)
            .then(|| identifier.clone())
            .flatten(),
        vehicle_number: matches!(leg.mode, TravelMode::Byroad)
            .then(|| identifier)
            .flatten(),
        arrival_date: arrival_date.unwrap(),
        arrival_time,
    })
}

/// leg_order define el orden de recorrido: debe ser único dentro del request
fn check_leg_order_uniqueness(legs: &[JourneyLegPayload], errors: &mut FieldErrors) {
    let mut seen: Vec<i32> = Vec::new();
    for (i, leg) in legs.iter().enumerate() {
        if leg.leg_order < 1 {
            continue;
        }
        if seen.contains(&leg.leg_order) {
            errors.insert(
                format!("journeyDetails[{}].legOrder", i),
                "Leg order must be unique within the request".to_string(),
            );
        } else {
            seen.push(leg.leg_order);
        }
    }
}

fn validate_guest(index: usize, guest: &GuestPayload, errors: &mut FieldErrors) -> Option<NewGuest> {
    let mut valid = true;
    let path = |field: &str| format!("guestUsers[{}].{}", index, field);

    let first_name = guest.first_name.trim();
    if first_name.is_empty() {
        errors.insert(path("firstName"), "First name is required".to_string());
        valid = false;
    }
    let last_name = guest.last_name.trim();
    if last_name.is_empty() {
        errors.insert(path("lastName"), "Last name is required".to_string());
        valid = false;
    }

    let parsed_age = parse_wire_number(guest.age.trim());
    if parsed_age.is_none() {
        errors.insert(path("age"), "Age must be a non-negative number".to_string());
        valid = false;
    }

    let contact_number = opt_trimmed(guest.contact_number.as_deref());
    if let Some(contact) = contact_number.as_deref() {
        if !is_valid_contact_number(contact) {
            errors.insert(
                path("contactNumber"),
                "Contact number must be 10 digits".to_string(),
            );
            valid = false;
        }
    }

    if !valid {
        return None;
    }

    Some(NewGuest {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        age: parsed_age.unwrap(),
        contact_number,
    })
}

fn validate_vehicle_service(
    index: usize,
    vehicle: &VehicleServicePayload,
    errors: &mut FieldErrors,
) -> Option<NewVehicleService> {
    let mut valid = true;
    let path = |field: &str| format!("vehicleRequests[{}].{}", index, field);

    let pickup = vehicle.pickup_location.trim();
    if pickup.is_empty() {
        errors.insert(path("pickupLocation"), "Pickup location is required".to_string());
        valid = false;
    }
    let destination = vehicle.destination.trim();
    if destination.is_empty() {
        errors.insert(path("destination"), "Destination is required".to_string());
        valid = false;
    }
    let purpose = vehicle.purpose.trim();
    if purpose.is_empty() {
        errors.insert(path("purpose"), "Purpose is required".to_string());
        valid = false;
    }

    if !valid {
        return None;
    }

    Some(NewVehicleService {
        pickup_location: pickup.to_string(),
        destination: destination.to_string(),
        purpose: purpose.to_string(),
        request_location: opt_trimmed(vehicle.request_location.as_deref()),
    })
}

fn validate_guesthouse_service(
    index: usize,
    guesthouse: &GuesthouseServicePayload,
    errors: &mut FieldErrors,
) -> Option<NewGuesthouseService> {
    let mut valid = true;
    let path = |field: &str| format!("guesthouseRequests[{}].{}", index, field);

    let check_in = parse_wire_date(&guesthouse.check_in_date);
    if check_in.is_none() {
        errors.insert(path("checkInDate"), "Must be YYYY-MM-DD".to_string());
        valid = false;
    }
    let checkout = parse_wire_date(&guesthouse.checkout_date);
    if checkout.is_none() {
        errors.insert(path("checkoutDate"), "Must be YYYY-MM-DD".to_string());
        valid = false;
    }

    let purpose = guesthouse.purpose.trim();
    if purpose.is_empty() {
        errors.insert(path("purpose"), "Purpose is required".to_string());
        valid = false;
    }

    let guest_count = parse_wire_number(guesthouse.guest_count.trim()).filter(|n| *n > 0);
    if guest_count.is_none() {
        errors.insert(
            path("guestCount"),
            "Guest count must be a positive number".to_string(),
        );
        valid = false;
    }

    if !valid {
        return None;
    }

    Some(NewGuesthouseService {
        check_in_date: check_in.unwrap(),
        checkout_date: checkout.unwrap(),
        purpose: purpose.to_string(),
        guest_count: guest_count.unwrap(),
        request_location: opt_trimmed(guesthouse.request_location.as_deref()),
    })
}

fn validate_other_service(
    index: usize,
    other: &OtherServicePayload,
    errors: &mut FieldErrors,
) -> Option<NewOtherService> {
    let purpose = other.purpose.trim();
    if purpose.is_empty() {
        errors.insert(
            format!("otherRequests[{}].purpose", index),
            "Purpose is required".to_string(),
        );
        return None;
    }

    Some(NewOtherService {
        purpose: purpose.to_string(),
        request_location: opt_trimmed(other.request_location.as_deref()),
    })
}

/// Formato del wire más chequeo de calendario real
fn parse_wire_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if !is_valid_date(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Trim semántico: un opcional en blanco equivale a ausente
fn opt_trimmed(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| is_non_blank(v)).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_leg() -> JourneyLegPayload {
        JourneyLegPayload {
            leg_order: 1,
            mode: TravelMode::Byroad,
            from_location: "Indore".to_string(),
            to_location: "Bhopal".to_string(),
            train_number: None,
            flight_number: None,
            vehicle_number: Some("MP04AB1234".to_string()),
            arrival_date: "2025-03-01".to_string(),
            arrival_time: None,
        }
    }

    fn base_guest() -> GuestPayload {
        GuestPayload {
            first_name: "Ravi".to_string(),
            last_name: "Shah".to_string(),
            age: "34".to_string(),
            contact_number: None,
        }
    }

    fn base_payload() -> SubmitRequestPayload {
        SubmitRequestPayload {
            purpose: Some("Court visit".to_string()),
            special_notes: None,
            journey_details: vec![base_leg()],
            guest_users: vec![base_guest()],
            vehicle_requests: None,
            guesthouse_requests: None,
            other_requests: None,
        }
    }

    fn field_errors(result: AppResult<NewRequest>) -> FieldErrors {
        match result {
            Err(AppError::Validation(fields)) => fields,
            other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_minimal_valid_submission() {
        let request = validate_submission(&base_payload()).unwrap();
        assert_eq!(request.journey_legs.len(), 1);
        assert_eq!(request.guests.len(), 1);
        assert_eq!(request.guests[0].age, 34);
        assert!(request.vehicle_requests.is_empty());
        assert_eq!(
            request.journey_legs[0].vehicle_number.as_deref(),
            Some("MP04AB1234")
        );
    }

    #[test]
    fn test_byrail_requires_train_number() {
        let mut payload = base_payload();
        payload.journey_details[0].mode = TravelMode::Byrail;
        payload.journey_details[0].train_number = None;

        let errors = field_errors(validate_submission(&payload));
        let key = errors.keys().next().unwrap();
        assert!(key.ends_with("trainNumber"), "unexpected key {}", key);
        assert_eq!(
            errors["journeyDetails[0].trainNumber"],
            "Train number is required for BYRAIL journeys"
        );

        payload.journey_details[0].train_number = Some("12002".to_string());
        assert!(validate_submission(&payload).is_ok());
    }

    #[test]
    fn test_byair_requires_flight_number() {
        let mut payload = base_payload();
        payload.journey_details[0].mode = TravelMode::Byair;
        payload.journey_details[0].vehicle_number = None;

        let errors = field_errors(validate_submission(&payload));
        assert!(errors.contains_key("journeyDetails[0].flightNumber"));
    }

    #[test]
    fn test_byroad_requires_vehicle_number() {
        let mut payload = base_payload();
        payload.journey_details[0].vehicle_number = Some("   ".to_string());

        let errors = field_errors(validate_submission(&payload));
        assert!(errors.contains_key("journeyDetails[0].vehicleNumber"));
    }

    #[test]
    fn test_identifier_of_other_mode_is_dropped() {
        let mut payload = base_payload();
        // BYROAD con trainNumber extra: el extra no sobrevive a la normalización
        payload.journey_details[0].train_number = Some("12002".to_string());

        let request = validate_submission(&payload).unwrap();
        assert!(request.journey_legs[0].train_number.is_none());
        assert_eq!(
            request.journey_legs[0].vehicle_number.as_deref(),
            Some("MP04AB1234")
        );
    }

    #[test]
    fn test_empty_journey_details_rejected() {
        let mut payload = base_payload();
        payload.journey_details.clear();

        let errors = field_errors(validate_submission(&payload));
        assert_eq!(
            errors["journeyDetails"],
            "At least one journey detail is required"
        );
    }

    #[test]
    fn test_empty_guests_rejected() {
        let mut payload = base_payload();
        payload.guest_users.clear();

        let errors = field_errors(validate_submission(&payload));
        assert_eq!(errors["guestUsers"], "At least one guest is required");
    }

    #[test]
    fn test_age_must_be_digits() {
        let mut payload = base_payload();
        payload.guest_users[0].age = "34a".to_string();

        let errors = field_errors(validate_submission(&payload));
        assert!(errors.contains_key("guestUsers[0].age"));
    }

    #[test]
    fn test_contact_number_must_be_ten_digits() {
        let mut payload = base_payload();
        payload.guest_users[0].contact_number = Some("98765".to_string());

        let errors = field_errors(validate_submission(&payload));
        assert!(errors.contains_key("guestUsers[0].contactNumber"));

        payload.guest_users[0].contact_number = Some("9876543210".to_string());
        assert!(validate_submission(&payload).is_ok());
    }

    #[test]
    fn test_arrival_date_format_and_calendar() {
        let mut payload = base_payload();
        payload.journey_details[0].arrival_date = "2025/03/01".to_string();
        assert!(field_errors(validate_submission(&payload))
            .contains_key("journeyDetails[0].arrivalDate"));

        payload.journey_details[0].arrival_date = "2025-13-45".to_string();
        assert!(field_errors(validate_submission(&payload))
            .contains_key("journeyDetails[0].arrivalDate"));
    }

    #[test]
    fn test_arrival_time_format() {
        let mut payload = base_payload();
        payload.journey_details[0].arrival_time = Some("8:30".to_string());

        let errors = field_errors(validate_submission(&payload));
        assert_eq!(errors["journeyDetails[0].arrivalTime"], "Must be HH:mm");
    }

    #[test]
    fn test_duplicate_leg_order_rejected() {
        let mut payload = base_payload();
        let mut second = base_leg();
        second.from_location = "Bhopal".to_string();
        second.to_location = "Delhi".to_string();
        payload.journey_details.push(second);

        let errors = field_errors(validate_submission(&payload));
        assert_eq!(
            errors["journeyDetails[1].legOrder"],
            "Leg order must be unique within the request"
        );
    }

    #[test]
    fn test_all_errors_reported_atomically() {
        let mut payload = base_payload();
        payload.journey_details[0].mode = TravelMode::Byrail;
        payload.journey_details[0].train_number = None;
        payload.guest_users[0].first_name = " ".to_string();
        payload.guest_users[0].age = "xx".to_string();

        let errors = field_errors(validate_submission(&payload));
        assert!(errors.len() >= 3);
        assert!(errors.contains_key("journeyDetails[0].trainNumber"));
        assert!(errors.contains_key("guestUsers[0].firstName"));
        assert!(errors.contains_key("guestUsers[0].age"));
    }

    #[test]
    fn test_guesthouse_service_rules() {
        let mut payload = base_payload();
        payload.guesthouse_requests = Some(vec![GuesthouseServicePayload {
            check_in_date: "2025-03-01".to_string(),
            checkout_date: "bad".to_string(),
            purpose: "Stay".to_string(),
            guest_count: "0".to_string(),
            request_location: None,
        }]);

        let errors = field_errors(validate_submission(&payload));
        assert!(errors.contains_key("guesthouseRequests[0].checkoutDate"));
        assert!(errors.contains_key("guesthouseRequests[0].guestCount"));
    }

    #[test]
    fn test_purpose_is_semantically_trimmed() {
        let mut payload = base_payload();
        payload.purpose = Some("   ".to_string());

        let request = validate_submission(&payload).unwrap();
        assert!(request.purpose.is_none());
    }
}
