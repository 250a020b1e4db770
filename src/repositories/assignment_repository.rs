//! Repositorio de asignaciones de protocolo
//!
//! Las escrituras de reemplazo usan upsert sobre índices únicos
//! parciales: nunca pueden coexistir dos filas activas para el mismo
//! par (request, journey_leg), ni dos filas a nivel de request. Bajo
//! escrituras concurrentes gana exactamente una (last-writer-wins por
//! fila); la supersesión sobreescribe la fila anterior.
//!
//! Índices que asume el schema:
//!   UNIQUE (request_id, journey_leg_id) WHERE journey_leg_id IS NOT NULL
//!   UNIQUE (request_id)                 WHERE journey_leg_id IS NULL

use sqlx::PgPool;

use crate::models::assignment::{Priority, ProtocolAssignment};
use crate::utils::errors::{AppError, AppResult};

pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Asigna (o reasigna) un oficial a un leg concreto. En la misma
    /// transacción el request pendiente pasa a approved y recibe su
    /// movement number.
    #[allow(clippy::too_many_arguments)]
    pub async fn upsert_for_leg(
        &self,
        request_id: i64,
        journey_leg_id: i64,
        officer_id: i64,
        incharge_id: i64,
        priority: Priority,
        remarks: Option<&str>,
        officer_location_id: Option<i64>,
    ) -> AppResult<ProtocolAssignment> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Persistence(format!("could not open transaction: {}", e)))?;

        let assignment = sqlx::query_as::<_, ProtocolAssignment>(
            r#"
            INSERT INTO protocol_assignments
                (request_id, journey_leg_id, assigned_officer_id, assigned_by_incharge_id,
                 officer_location_id, priority, completion_status, officer_remarks, assigned_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'assigned', $7, now())
            ON CONFLICT (request_id, journey_leg_id) WHERE journey_leg_id IS NOT NULL
            DO UPDATE SET
                assigned_officer_id = EXCLUDED.assigned_officer_id,
                assigned_by_incharge_id = EXCLUDED.assigned_by_incharge_id,
                officer_location_id = EXCLUDED.officer_location_id,
                priority = EXCLUDED.priority,
                completion_status = 'assigned',
                officer_remarks = EXCLUDED.officer_remarks,
                assigned_at = now()
            RETURNING id, request_id, journey_leg_id, assigned_officer_id,
                      assigned_by_incharge_id, officer_location_id, priority,
                      completion_status, officer_remarks, assigned_at
            "#,
        )
        .bind(request_id)
        .bind(journey_leg_id)
        .bind(officer_id)
        .bind(incharge_id)
        .bind(officer_location_id)
        .bind(priority)
        .bind(remarks)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::Persistence(format!("assignment upsert failed: {}", e)))?;

        approve_pending(&mut tx, request_id).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Persistence(format!("assignment commit failed: {}", e)))?;
        Ok(assignment)
    }

    /// Asignación a nivel de request (modo single, journey_leg_id NULL)
    pub async fn upsert_for_request(
        &self,
        request_id: i64,
        officer_id: i64,
        incharge_id: i64,
        priority: Priority,
        remarks: Option<&str>,
        officer_location_id: Option<i64>,
    ) -> AppResult<ProtocolAssignment> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Persistence(format!("could not open transaction: {}", e)))?;

        let assignment = sqlx::query_as::<_, ProtocolAssignment>(
            r#"
            INSERT INTO protocol_assignments
                (request_id, journey_leg_id, assigned_officer_id, assigned_by_incharge_id,
                 officer_location_id, priority, completion_status, officer_remarks, assigned_at)
            VALUES ($1, NULL, $2, $3, $4, $5, 'assigned', $6, now())
            ON CONFLICT (request_id) WHERE journey_leg_id IS NULL
            DO UPDATE SET
                assigned_officer_id = EXCLUDED.assigned_officer_id,
                assigned_by_incharge_id = EXCLUDED.assigned_by_incharge_id,
                officer_location_id = EXCLUDED.officer_location_id,
                priority = EXCLUDED.priority,
                completion_status = 'assigned',
                officer_remarks = EXCLUDED.officer_remarks,
                assigned_at = now()
            RETURNING id, request_id, journey_leg_id, assigned_officer_id,
                      assigned_by_incharge_id, officer_location_id, priority,
                      completion_status, officer_remarks, assigned_at
            "#,
        )
        .bind(request_id)
        .bind(officer_id)
        .bind(incharge_id)
        .bind(officer_location_id)
        .bind(priority)
        .bind(remarks)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::Persistence(format!("assignment upsert failed: {}", e)))?;

        approve_pending(&mut tx, request_id).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Persistence(format!("assignment commit failed: {}", e)))?;
        Ok(assignment)
    }

}

/// Primera asignación exitosa: el request pendiente queda aprobado y
/// recibe su movement number una sola vez.
async fn approve_pending(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    request_id: i64,
) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE requests
        SET req_status = 'approved',
            movement_number = COALESCE(
                movement_number,
                'MOV-' || to_char(now(), 'YYYY') || '-' || lpad(id::text, 3, '0')
            )
        WHERE id = $1 AND req_status = 'pending'
        "#,
    )
    .bind(request_id)
    .execute(&mut **tx)
    .await
    .map_err(|e| AppError::Persistence(format!("request approval failed: {}", e)))?;
    Ok(())
}
