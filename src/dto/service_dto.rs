//! DTOs para adjuntar servicios post-envío (staff)
//!
//! Estos payloads llegan en snake_case, el contrato que ya consumen
//! los formularios de servicios del staff.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{validate_count_string, validate_date_format, validate_driver_contact};

/// Request para adjuntar un pedido de vehículo a un Request existente
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AddVehicleServiceRequest {
    #[validate(length(min = 1, message = "Pickup location is required"))]
    pub pickup_location: String,

    #[validate(length(min = 1, message = "Destination is required"))]
    pub destination: String,

    #[validate(length(min = 1, message = "Purpose is required"))]
    pub purpose: String,

    pub request_location: Option<String>,

    pub vehicle_type: Option<String>,
    pub vehicle_number: Option<String>,
    pub driver_name: Option<String>,

    #[validate(custom = "validate_driver_contact")]
    pub driver_contact_no: Option<String>,
}

/// Request para adjuntar un pedido de guesthouse
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AddGuesthouseServiceRequest {
    #[validate(custom = "validate_date_format")]
    pub check_in_date: String,

    #[validate(custom = "validate_date_format")]
    pub checkout_date: String,

    #[validate(length(min = 1, message = "Purpose is required"))]
    pub purpose: String,

    #[validate(custom = "validate_count_string")]
    pub guest_count: String,

    pub request_location: Option<String>,
    pub guesthouse_location: Option<String>,
}

/// Request para adjuntar un pedido misceláneo
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AddOtherServiceRequest {
    #[validate(length(min = 1, message = "Purpose is required"))]
    pub purpose: String,

    pub request_location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_service_requires_core_fields() {
        let req = AddVehicleServiceRequest {
            pickup_location: "".to_string(),
            destination: "Bhopal".to_string(),
            purpose: "Court visit".to_string(),
            request_location: None,
            vehicle_type: None,
            vehicle_number: None,
            driver_name: None,
            driver_contact_no: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_guesthouse_service_date_format() {
        let mut req = AddGuesthouseServiceRequest {
            check_in_date: "2025-03-01".to_string(),
            checkout_date: "2025-03-04".to_string(),
            purpose: "Overnight stay".to_string(),
            guest_count: "2".to_string(),
            request_location: None,
            guesthouse_location: None,
        };
        assert!(req.validate().is_ok());

        req.checkout_date = "03/04/2025".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_guesthouse_service_guest_count_must_be_positive() {
        let req = AddGuesthouseServiceRequest {
            check_in_date: "2025-03-01".to_string(),
            checkout_date: "2025-03-04".to_string(),
            purpose: "Overnight stay".to_string(),
            guest_count: "0".to_string(),
            request_location: None,
            guesthouse_location: None,
        };
        assert!(req.validate().is_err());
    }
}
