//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod assignment;
pub mod directory;
pub mod guest;
pub mod journey_leg;
pub mod request;
pub mod service_request;
