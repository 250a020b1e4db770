//! Repositorio del agregado Request
//!
//! La creación persiste el request con todos sus hijos dentro de una
//! transacción: legs guardados sin guests no es un resultado legal, así
//! que cualquier fallo revierte el conjunto completo.

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

use crate::dto::service_dto::{
    AddGuesthouseServiceRequest, AddOtherServiceRequest, AddVehicleServiceRequest,
};
use crate::models::assignment::ProtocolAssignment;
use crate::models::guest::Guest;
use crate::models::journey_leg::JourneyLeg;
use crate::models::request::{HydratedRequest, Request, RequesteeRef};
use crate::models::service_request::{GuesthouseRequest, OtherRequest, VehicleRequest};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::parse_wire_number;
use crate::validation::NewRequest;

pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crea el request completo en una unidad atómica y lo devuelve
    /// hidratado. Cualquier fallo de escritura revierte todo.
    pub async fn create(
        &self,
        requestee_id: i64,
        new_request: NewRequest,
    ) -> AppResult<HydratedRequest> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Persistence(format!("could not open transaction: {}", e)))?;

        let request = sqlx::query_as::<_, Request>(
            r#"
            INSERT INTO requests (requestee_id, purpose, special_notes, req_status, created_at)
            VALUES ($1, $2, $3, 'pending', now())
            RETURNING id, requestee_id, movement_number, purpose, special_notes, req_status, created_at
            "#,
        )
        .bind(requestee_id)
        .bind(&new_request.purpose)
        .bind(&new_request.special_notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::Persistence(format!("request insert failed: {}", e)))?;

        let mut legs = new_request.journey_legs;
        legs.sort_by_key(|leg| leg.leg_order);

        let mut journey_legs = Vec::with_capacity(legs.len());
        for leg in legs {
            // El id del leg lo asigna la base de datos; es la clave de
            // join para asignaciones por leg.
            let row = sqlx::query_as::<_, JourneyLeg>(
                r#"
                INSERT INTO journey_legs
                    (request_id, leg_order, mode, from_location, to_location,
                     train_number, flight_number, vehicle_number, arrival_date, arrival_time)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING id, request_id, leg_order, mode, from_location, to_location,
                          train_number, flight_number, vehicle_number, arrival_date, arrival_time
                "#,
            )
            .bind(request.id)
            .bind(leg.leg_order)
            .bind(leg.mode)
            .bind(&leg.from_location)
            .bind(&leg.to_location)
            .bind(&leg.train_number)
            .bind(&leg.flight_number)
            .bind(&leg.vehicle_number)
            .bind(leg.arrival_date)
            .bind(&leg.arrival_time)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::Persistence(format!("journey leg insert failed: {}", e)))?;
            journey_legs.push(row);
        }

        let mut guests = Vec::with_capacity(new_request.guests.len());
        for guest in &new_request.guests {
            let row = sqlx::query_as::<_, Guest>(
                r#"
                INSERT INTO guests (request_id, first_name, last_name, age, contact_number)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, request_id, first_name, last_name, age, contact_number
                "#,
            )
            .bind(request.id)
            .bind(&guest.first_name)
            .bind(&guest.last_name)
            .bind(guest.age)
            .bind(&guest.contact_number)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::Persistence(format!("guest insert failed: {}", e)))?;
            guests.push(row);
        }

        let mut vehicle_requests = Vec::new();
        for vehicle in &new_request.vehicle_requests {
            let row = insert_vehicle(
                &mut tx,
                request.id,
                &vehicle.pickup_location,
                &vehicle.destination,
                &vehicle.purpose,
                vehicle.request_location.as_deref(),
                None,
                None,
                None,
                None,
            )
            .await?;
            vehicle_requests.push(row);
        }

        let mut guesthouse_requests = Vec::new();
        for guesthouse in &new_request.guesthouse_requests {
            let row = insert_guesthouse(
                &mut tx,
                request.id,
                guesthouse.check_in_date,
                guesthouse.checkout_date,
                &guesthouse.purpose,
                guesthouse.guest_count,
                guesthouse.request_location.as_deref(),
                None,
            )
            .await?;
            guesthouse_requests.push(row);
        }

        let mut other_requests = Vec::new();
        for other in &new_request.other_requests {
            let row = insert_other(
                &mut tx,
                request.id,
                &other.purpose,
                other.request_location.as_deref(),
            )
            .await?;
            other_requests.push(row);
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Persistence(format!("request creation commit failed: {}", e)))?;

        Ok(HydratedRequest {
            request,
            journey_legs,
            guests,
            vehicle_requests,
            guesthouse_requests,
            other_requests,
            assignments: Vec::new(),
        })
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<HydratedRequest>> {
        let request = sqlx::query_as::<_, Request>(
            r#"
            SELECT id, requestee_id, movement_number, purpose, special_notes, req_status, created_at
            FROM requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match request {
            Some(request) => Ok(Some(self.hydrate(request).await?)),
            None => Ok(None),
        }
    }

    /// Historial del requestee, con hijos poblados. Orden estable entre
    /// lecturas repetidas mientras no haya mutaciones.
    pub async fn find_by_requestee(&self, requestee_id: i64) -> AppResult<Vec<HydratedRequest>> {
        let requests = sqlx::query_as::<_, Request>(
            r#"
            SELECT id, requestee_id, movement_number, purpose, special_notes, req_status, created_at
            FROM requests
            WHERE requestee_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(requestee_id)
        .fetch_all(&self.pool)
        .await?;

        let mut hydrated = Vec::with_capacity(requests.len());
        for request in requests {
            hydrated.push(self.hydrate(request).await?);
        }
        Ok(hydrated)
    }

    /// Cola de triage: página 1-indexed de requests pendientes más el
    /// total. Pedir una página más allá del final da lista vacía.
    pub async fn find_pending(
        &self,
        page: i64,
        limit: i64,
    ) -> AppResult<(Vec<(HydratedRequest, RequesteeRef)>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM requests WHERE req_status = 'pending'")
                .fetch_one(&self.pool)
                .await?;

        let offset = (page - 1) * limit;
        let requests = sqlx::query_as::<_, Request>(
            r#"
            SELECT id, requestee_id, movement_number, purpose, special_notes, req_status, created_at
            FROM requests
            WHERE req_status = 'pending'
            ORDER BY created_at ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut rows = Vec::with_capacity(requests.len());
        for request in requests {
            let requestee = self.requestee_ref(request.requestee_id).await?;
            let hydrated = self.hydrate(request).await?;
            rows.push((hydrated, requestee));
        }
        Ok((rows, total))
    }

    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let found: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM requests WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(found.0)
    }

    async fn requestee_ref(&self, requestee_id: i64) -> AppResult<RequesteeRef> {
        let row = sqlx::query_as::<_, RequesteeRef>("SELECT id, username FROM users WHERE id = $1")
            .bind(requestee_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.unwrap_or(RequesteeRef {
            id: requestee_id,
            username: "unknown".to_string(),
        }))
    }

    async fn hydrate(&self, request: Request) -> AppResult<HydratedRequest> {
        let journey_legs = sqlx::query_as::<_, JourneyLeg>(
            r#"
            SELECT id, request_id, leg_order, mode, from_location, to_location,
                   train_number, flight_number, vehicle_number, arrival_date, arrival_time
            FROM journey_legs
            WHERE request_id = $1
            ORDER BY leg_order ASC
            "#,
        )
        .bind(request.id)
        .fetch_all(&self.pool)
        .await?;

        let guests = sqlx::query_as::<_, Guest>(
            r#"
            SELECT id, request_id, first_name, last_name, age, contact_number
            FROM guests
            WHERE request_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(request.id)
        .fetch_all(&self.pool)
        .await?;

        let vehicle_requests = sqlx::query_as::<_, VehicleRequest>(
            r#"
            SELECT id, request_id, pickup_location, destination, purpose, request_location,
                   vehicle_type, vehicle_number, driver_name, driver_contact_no, service_status
            FROM vehicle_requests
            WHERE request_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(request.id)
        .fetch_all(&self.pool)
        .await?;

        let guesthouse_requests = sqlx::query_as::<_, GuesthouseRequest>(
            r#"
            SELECT id, request_id, check_in_date, checkout_date, purpose, guest_count,
                   request_location, guesthouse_location, service_status
            FROM guesthouse_requests
            WHERE request_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(request.id)
        .fetch_all(&self.pool)
        .await?;

        let other_requests = sqlx::query_as::<_, OtherRequest>(
            r#"
            SELECT id, request_id, purpose, request_location, service_status
            FROM other_requests
            WHERE request_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(request.id)
        .fetch_all(&self.pool)
        .await?;

        // La asignación más reciente primero: la proyección toma [0]
        let assignments = sqlx::query_as::<_, ProtocolAssignment>(
            r#"
            SELECT id, request_id, journey_leg_id, assigned_officer_id, assigned_by_incharge_id,
                   officer_location_id, priority, completion_status, officer_remarks, assigned_at
            FROM protocol_assignments
            WHERE request_id = $1
            ORDER BY assigned_at DESC, id DESC
            "#,
        )
        .bind(request.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(HydratedRequest {
            request,
            journey_legs,
            guests,
            vehicle_requests,
            guesthouse_requests,
            other_requests,
            assignments,
        })
    }

    // -----------------------------------------------------------------
    // Servicios adjuntados post-envío por el staff
    // -----------------------------------------------------------------

    pub async fn add_vehicle_service(
        &self,
        request_id: i64,
        fields: &AddVehicleServiceRequest,
    ) -> AppResult<VehicleRequest> {
        self.ensure_exists(request_id).await?;
        let mut tx = self.pool.begin().await?;
        let row = insert_vehicle(
            &mut tx,
            request_id,
            fields.pickup_location.trim(),
            fields.destination.trim(),
            fields.purpose.trim(),
            fields.request_location.as_deref(),
            fields.vehicle_type.as_deref(),
            fields.vehicle_number.as_deref(),
            fields.driver_name.as_deref(),
            fields.driver_contact_no.as_deref(),
        )
        .await?;
        tx.commit()
            .await
            .map_err(|e| AppError::Persistence(format!("vehicle request commit failed: {}", e)))?;
        Ok(row)
    }

    pub async fn add_guesthouse_service(
        &self,
        request_id: i64,
        fields: &AddGuesthouseServiceRequest,
    ) -> AppResult<GuesthouseRequest> {
        self.ensure_exists(request_id).await?;

        // Los campos llegan ya validados; el parseo sigue siendo
        // defensivo por el contrato string-typed del wire format.
        let check_in = parse_date_field(&fields.check_in_date, "check_in_date")?;
        let checkout = parse_date_field(&fields.checkout_date, "checkout_date")?;
        let guest_count = parse_wire_number(fields.guest_count.trim())
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                AppError::BadRequest("guest_count must be a positive decimal string".to_string())
            })?;

        let mut tx = self.pool.begin().await?;
        let row = insert_guesthouse(
            &mut tx,
            request_id,
            check_in,
            checkout,
            fields.purpose.trim(),
            guest_count,
            fields.request_location.as_deref(),
            fields.guesthouse_location.as_deref(),
        )
        .await?;
        tx.commit().await.map_err(|e| {
            AppError::Persistence(format!("guesthouse request commit failed: {}", e))
        })?;
        Ok(row)
    }

    pub async fn add_other_service(
        &self,
        request_id: i64,
        fields: &AddOtherServiceRequest,
    ) -> AppResult<OtherRequest> {
        self.ensure_exists(request_id).await?;
        let mut tx = self.pool.begin().await?;
        let row = insert_other(
            &mut tx,
            request_id,
            fields.purpose.trim(),
            fields.request_location.as_deref(),
        )
        .await?;
        tx.commit()
            .await
            .map_err(|e| AppError::Persistence(format!("other request commit failed: {}", e)))?;
        Ok(row)
    }

    async fn ensure_exists(&self, request_id: i64) -> AppResult<()> {
        if !self.exists(request_id).await? {
            return Err(not_found_error("Request", request_id));
        }
        Ok(())
    }
}

fn parse_date_field(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("{} must be YYYY-MM-DD", field)))
}

#[allow(clippy::too_many_arguments)]
async fn insert_vehicle(
    tx: &mut Transaction<'_, Postgres>,
    request_id: i64,
    pickup_location: &str,
    destination: &str,
    purpose: &str,
    request_location: Option<&str>,
    vehicle_type: Option<&str>,
    vehicle_number: Option<&str>,
    driver_name: Option<&str>,
    driver_contact_no: Option<&str>,
) -> AppResult<VehicleRequest> {
    sqlx::query_as::<_, VehicleRequest>(
        r#"
        INSERT INTO vehicle_requests
            (request_id, pickup_location, destination, purpose, request_location,
             vehicle_type, vehicle_number, driver_name, driver_contact_no, service_status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending')
        RETURNING id, request_id, pickup_location, destination, purpose, request_location,
                  vehicle_type, vehicle_number, driver_name, driver_contact_no, service_status
        "#,
    )
    .bind(request_id)
    .bind(pickup_location)
    .bind(destination)
    .bind(purpose)
    .bind(request_location)
    .bind(vehicle_type)
    .bind(vehicle_number)
    .bind(driver_name)
    .bind(driver_contact_no)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| AppError::Persistence(format!("vehicle request insert failed: {}", e)))
}

#[allow(clippy::too_many_arguments)]
async fn insert_guesthouse(
    tx: &mut Transaction<'_, Postgres>,
    request_id: i64,
    check_in_date: NaiveDate,
    checkout_date: NaiveDate,
    purpose: &str,
    guest_count: i32,
    request_location: Option<&str>,
    guesthouse_location: Option<&str>,
) -> AppResult<GuesthouseRequest> {
    sqlx::query_as::<_, GuesthouseRequest>(
        r#"
        INSERT INTO guesthouse_requests
            (request_id, check_in_date, checkout_date, purpose, guest_count,
             request_location, guesthouse_location, service_status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending')
        RETURNING id, request_id, check_in_date, checkout_date, purpose, guest_count,
                  request_location, guesthouse_location, service_status
        "#,
    )
    .bind(request_id)
    .bind(check_in_date)
    .bind(checkout_date)
    .bind(purpose)
    .bind(guest_count)
    .bind(request_location)
    .bind(guesthouse_location)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| AppError::Persistence(format!("guesthouse request insert failed: {}", e)))
}

async fn insert_other(
    tx: &mut Transaction<'_, Postgres>,
    request_id: i64,
    purpose: &str,
    request_location: Option<&str>,
) -> AppResult<OtherRequest> {
    sqlx::query_as::<_, OtherRequest>(
        r#"
        INSERT INTO other_requests (request_id, purpose, request_location, service_status)
        VALUES ($1, $2, $3, 'pending')
        RETURNING id, request_id, purpose, request_location, service_status
        "#,
    )
    .bind(request_id)
    .bind(purpose)
    .bind(request_location)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| AppError::Persistence(format!("other request insert failed: {}", e)))
}
