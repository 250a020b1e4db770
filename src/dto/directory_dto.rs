//! DTOs del directorio de oficiales y sedes

use serde::Deserialize;

/// Query params de búsqueda de oficiales
#[derive(Debug, Clone, Deserialize)]
pub struct OfficerSearchQuery {
    pub search: Option<String>,
    pub destination: Option<String>,
}

/// Query params de sedes para un destino
#[derive(Debug, Clone, Deserialize)]
pub struct LocationQuery {
    pub destination: String,
}
