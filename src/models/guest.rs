//! Modelo de Guest

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Guest - acompañante de un Request, mapea a la tabla guests.
///
/// La edad llega como string decimal en el wire format y se guarda
/// como entero una vez validada.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Guest {
    pub id: i64,
    pub request_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub contact_number: Option<String>,
}
