//! Directorio de oficiales y sedes
//!
//! El directorio es un colaborador externo de solo lectura: dado el
//! destino de un leg devuelve las sedes que matchean y los oficiales
//! elegibles. El matching por ubicación es load-bearing: un oficial no
//! debe aparecer como candidato para destinos que su sede no cubre.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::directory::{Location, Officer};
use crate::utils::errors::{AppError, AppResult};

/// Lookup de oficiales/sedes. Las lecturas son idempotentes y sin
/// efectos secundarios: repetir una búsqueda es siempre seguro.
#[async_trait]
pub trait OfficerDirectory: Send + Sync {
    /// Busca oficiales, opcionalmente filtrados por término de búsqueda
    /// (username o email) y por destino.
    async fn search_officers(
        &self,
        search: Option<&str>,
        destination: Option<&str>,
    ) -> AppResult<Vec<Officer>>;

    /// Sedes cuyo nombre o ciudad matchea el destino, ordenadas por
    /// nombre para que el caller pueda autoseleccionar la primera.
    async fn locations_for_destination(&self, destination: &str) -> AppResult<Vec<Location>>;
}

// ---------------------------------------------------------------------------
// Matching puro
// ---------------------------------------------------------------------------

/// Matching textual bidireccional case-insensitive: el destino contiene
/// el nombre/ciudad de la sede, o la sede contiene el destino.
pub fn location_matches_destination(location: &Location, destination: &str) -> bool {
    let dest = destination.trim().to_lowercase();
    if dest.is_empty() {
        return false;
    }

    let name = location.name.trim().to_lowercase();
    if !name.is_empty() && (dest.contains(&name) || name.contains(&dest)) {
        return true;
    }

    match location.city.as_deref() {
        Some(city) => {
            let city = city.trim().to_lowercase();
            !city.is_empty() && (dest.contains(&city) || city.contains(&dest))
        }
        None => false,
    }
}

/// Sedes que matchean un destino, ordenadas por nombre
pub fn matching_locations(locations: &[Location], destination: &str) -> Vec<Location> {
    let mut matched: Vec<Location> = locations
        .iter()
        .filter(|location| location_matches_destination(location, destination))
        .cloned()
        .collect();
    matched.sort_by(|a, b| a.name.cmp(&b.name));
    matched
}

/// Un oficial es candidato si no tiene sede asignada (disponible en
/// cualquier destino) o si su sede está entre las que matchean.
pub fn is_candidate_for(officer: &Officer, matched: &[Location]) -> bool {
    match officer.location_id {
        None => true,
        Some(location_id) => matched.iter().any(|location| location.id == location_id),
    }
}

/// Filtra los oficiales candidatos para un destino concreto
pub fn filter_candidates(
    officers: &[Officer],
    locations: &[Location],
    destination: &str,
) -> Vec<Officer> {
    let matched = matching_locations(locations, destination);
    officers
        .iter()
        .filter(|officer| is_candidate_for(officer, &matched))
        .cloned()
        .collect()
}

/// Término de búsqueda contra username o email, case-insensitive
pub fn officer_matches_search(officer: &Officer, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    officer.username.to_lowercase().contains(&term)
        || officer.email.to_lowercase().contains(&term)
}

// ---------------------------------------------------------------------------
// Implementación PostgreSQL
// ---------------------------------------------------------------------------

pub struct PgOfficerDirectory {
    pool: PgPool,
}

impl PgOfficerDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_officers(&self) -> AppResult<Vec<Officer>> {
        sqlx::query_as::<_, Officer>(
            r#"
            SELECT id, username, email, location_id
            FROM users
            WHERE user_type = 'protocol_officer'
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DirectoryUnavailable(format!("officer lookup failed: {}", e)))
    }

    async fn load_locations(&self) -> AppResult<Vec<Location>> {
        sqlx::query_as::<_, Location>(
            "SELECT id, name, city, state FROM locations ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DirectoryUnavailable(format!("location lookup failed: {}", e)))
    }
}

#[async_trait]
impl OfficerDirectory for PgOfficerDirectory {
    async fn search_officers(
        &self,
        search: Option<&str>,
        destination: Option<&str>,
    ) -> AppResult<Vec<Officer>> {
        let mut officers = self.load_officers().await?;

        if let Some(term) = search {
            officers.retain(|officer| officer_matches_search(officer, term));
        }

        // El filtrado por destino reusa el mismo matching que la vista
        // por leg, para que ambas rutas den los mismos candidatos.
        if let Some(destination) = destination.filter(|d| !d.trim().is_empty()) {
            let locations = self.load_locations().await?;
            officers = filter_candidates(&officers, &locations, destination);
        }

        Ok(officers)
    }

    async fn locations_for_destination(&self, destination: &str) -> AppResult<Vec<Location>> {
        let locations = self.load_locations().await?;
        Ok(matching_locations(&locations, destination))
    }
}

// ---------------------------------------------------------------------------
// Directorio estático para tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::*;

    fn location(id: i64, name: &str, city: Option<&str>) -> Location {
        Location {
            id,
            name: name.to_string(),
            city: city.map(str::to_string),
            state: None,
        }
    }

    fn officer(id: i64, username: &str, location_id: Option<i64>) -> Officer {
        Officer {
            id,
            username: username.to_string(),
            email: format!("{}@protocol.gov.in", username),
            location_id,
        }
    }

    #[test]
    fn test_destination_contains_location_name() {
        let bhopal = location(5, "Bhopal", None);
        assert!(location_matches_destination(&bhopal, "Bhopal High Court"));
    }

    #[test]
    fn test_location_name_contains_destination() {
        let full = location(5, "Bhopal High Court Complex", None);
        assert!(location_matches_destination(&full, "bhopal high court"));
    }

    #[test]
    fn test_no_match_for_unrelated_destination() {
        let bhopal = location(5, "Bhopal", None);
        assert!(!location_matches_destination(&bhopal, "Chennai"));
    }

    #[test]
    fn test_city_field_also_matches() {
        let airport = location(9, "Raja Bhoj Airport", Some("Bhopal"));
        assert!(location_matches_destination(&airport, "Bhopal"));
    }

    #[test]
    fn test_blank_destination_never_matches() {
        let bhopal = location(5, "Bhopal", None);
        assert!(!location_matches_destination(&bhopal, "   "));
    }

    #[test]
    fn test_candidate_filtering_per_destination() {
        let locations = vec![location(5, "Bhopal", None), location(8, "Chennai", None)];
        let stationed = officer(1, "kumar", Some(5));
        let roaming = officer(2, "mehta", None);
        let officers = vec![stationed, roaming];

        let bhopal_candidates = filter_candidates(&officers, &locations, "Bhopal High Court");
        let ids: Vec<i64> = bhopal_candidates.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2]);

        let chennai_candidates = filter_candidates(&officers, &locations, "Chennai");
        let ids: Vec<i64> = chennai_candidates.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_matching_locations_sorted_by_name() {
        let locations = vec![
            location(2, "Bhopal Secretariat", None),
            location(1, "Bhopal High Court", None),
        ];
        let matched = matching_locations(&locations, "Bhopal");
        let names: Vec<&str> = matched.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Bhopal High Court", "Bhopal Secretariat"]);
    }

    #[test]
    fn test_officer_search_matches_username_or_email() {
        let o = officer(1, "RaviKumar", Some(5));
        assert!(officer_matches_search(&o, "ravi"));
        assert!(officer_matches_search(&o, "PROTOCOL.GOV"));
        assert!(!officer_matches_search(&o, "sharma"));
        assert!(officer_matches_search(&o, "  "));
    }
}
