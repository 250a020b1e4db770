//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de formatos
//! del wire format (fechas, horas, números en formato string).

use lazy_static::lazy_static;
use num_traits::Zero;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref DATE_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref TIME_RE: Regex = Regex::new(r"^\d{2}:\d{2}$").unwrap();
    static ref DIGITS_RE: Regex = Regex::new(r"^\d+$").unwrap();
    static ref CONTACT_RE: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
    static ref DRIVER_CONTACT_RE: Regex = Regex::new(r"^[0-9+\-()\s]{7,}$").unwrap();
}

/// Verificar formato de fecha `YYYY-MM-DD`
pub fn is_valid_date(value: &str) -> bool {
    DATE_RE.is_match(value)
}

/// Verificar formato de hora `HH:mm`
pub fn is_valid_time(value: &str) -> bool {
    TIME_RE.is_match(value)
}

/// Verificar que un string contiene solo dígitos (edad, guestCount)
pub fn is_all_digits(value: &str) -> bool {
    DIGITS_RE.is_match(value)
}

/// Verificar número de contacto de exactamente 10 dígitos
pub fn is_valid_contact_number(value: &str) -> bool {
    CONTACT_RE.is_match(value)
}

/// Verificar que un string no queda vacío después de trim
pub fn is_non_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Parsear un campo decimal string del wire format a entero.
///
/// El wire format envía age/guestCount como strings decimales validados;
/// el parseo defensivo evita panics ante datos legacy fuera de contrato.
pub fn parse_wire_number(value: &str) -> Option<i32> {
    if !is_all_digits(value) {
        return None;
    }
    value.parse::<i32>().ok()
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + Zero>(value: T) -> Result<(), ValidationError> {
    if value <= T::zero() {
        return Err(ValidationError::new("positive"));
    }
    Ok(())
}

/// Validador de fecha para derive(Validate) en DTOs de servicios
pub fn validate_date_format(value: &str) -> Result<(), ValidationError> {
    if !is_valid_date(value) {
        let mut error = ValidationError::new("date");
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validador de contacto de chofer para derive(Validate).
/// Más laxo que el contacto de guests: admite separadores y prefijos.
pub fn validate_driver_contact(value: &str) -> Result<(), ValidationError> {
    if !DRIVER_CONTACT_RE.is_match(value) {
        return Err(ValidationError::new("driver_contact"));
    }
    Ok(())
}

/// Validador de conteo decimal-string para derive(Validate)
pub fn validate_count_string(value: &str) -> Result<(), ValidationError> {
    match parse_wire_number(value) {
        Some(n) if n > 0 => Ok(()),
        _ => {
            let mut error = ValidationError::new("count");
            error.add_param("format".into(), &"positive decimal string".to_string());
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_date() {
        assert!(is_valid_date("2025-03-01"));
        assert!(!is_valid_date("2025/03/01"));
        assert!(!is_valid_date("01-03-2025"));
        assert!(!is_valid_date("2025-3-1"));
    }

    #[test]
    fn test_is_valid_time() {
        assert!(is_valid_time("08:30"));
        assert!(is_valid_time("23:59"));
        assert!(!is_valid_time("8:30"));
        assert!(!is_valid_time("08:30:00"));
    }

    #[test]
    fn test_is_all_digits() {
        assert!(is_all_digits("34"));
        assert!(is_all_digits("0"));
        assert!(!is_all_digits("34a"));
        assert!(!is_all_digits("-3"));
        assert!(!is_all_digits(""));
    }

    #[test]
    fn test_is_valid_contact_number() {
        assert!(is_valid_contact_number("9876543210"));
        assert!(!is_valid_contact_number("987654321"));
        assert!(!is_valid_contact_number("98765432100"));
        assert!(!is_valid_contact_number("98765-4321"));
    }

    #[test]
    fn test_parse_wire_number() {
        assert_eq!(parse_wire_number("34"), Some(34));
        assert_eq!(parse_wire_number("007"), Some(7));
        assert_eq!(parse_wire_number("abc"), None);
        assert_eq!(parse_wire_number("-2"), None);
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(5).is_ok());
        assert!(validate_positive(0).is_err());
        assert!(validate_positive(-5).is_err());
    }

    #[test]
    fn test_validate_driver_contact() {
        assert!(validate_driver_contact("+91 98765-43210").is_ok());
        assert!(validate_driver_contact("123456").is_err());
        assert!(validate_driver_contact("not-a-phone").is_err());
    }

    #[test]
    fn test_validate_count_string() {
        assert!(validate_count_string("3").is_ok());
        assert!(validate_count_string("0").is_err());
        assert!(validate_count_string("three").is_err());
    }
}
