//! Entidades de referencia del directorio de oficiales
//!
//! Officer y Location no pertenecen al subsistema de requests: son
//! lookups de solo lectura contra el directorio externo.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Oficial de protocolo. location_id NULL significa que el oficial no
/// tiene sede asignada y se considera disponible en cualquier destino.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Officer {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub location_id: Option<i64>,
}

/// Sede de oficiales de protocolo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
}
