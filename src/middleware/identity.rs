//! Identidad del caller por request
//!
//! La autenticación vive fuera de este servicio: el gateway valida la
//! sesión y propaga la identidad en el header `X-User-Id`. Cada
//! operación recibe esa identidad como parámetro explícito; no hay
//! estado ambiente de usuario.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::utils::errors::AppError;

/// Identidad del usuario que ejecuta la operación
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .map(CallerIdentity)
            .ok_or_else(|| {
                AppError::BadRequest("Missing or invalid X-User-Id header".to_string())
            })
    }
}
