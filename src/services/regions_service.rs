// src/services/regions_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::begin_rls_transaction, error::AppError},
    db::RegionsRepository,
    models::{
        auth::Actor,
        regions::{CitiesOverview, City, CityListing, CityToggleResponse, Region},
    },
    services::access,
};

#[derive(Clone)]
pub struct RegionsService {
    repo: RegionsRepository,
    pool: PgPool,
}

impl RegionsService {
    pub fn new(repo: RegionsRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list_regions(&self, actor: &Actor) -> Result<Vec<Region>, AppError> {
        let mut tx = begin_rls_transaction(&self.pool, actor.id).await?;
        let regions = self.repo.list_regions(&mut *tx).await?;
        tx.commit().await?;
        Ok(regions)
    }

    /// Todas as cidades (ativas ou não) com o nome da região, filtradas pela busca.
    pub async fn list_cities(
        &self,
        actor: &Actor,
        search: Option<&str>,
    ) -> Result<CitiesOverview, AppError> {
        let mut tx = begin_rls_transaction(&self.pool, actor.id).await?;
        let regions = self.repo.list_regions(&mut *tx).await?;
        let cities = self.repo.list_cities(&mut *tx).await?;
        tx.commit().await?;

        let total = cities.len();
        let cities = filter_cities(cities, &regions, search.unwrap_or_default());

        Ok(CitiesOverview {
            total,
            can_edit: access::can_edit_config(actor),
            cities,
        })
    }

    /// Liga/desliga uma cidade. Somente administradores.
    pub async fn toggle_city(&self, actor: &Actor, id: Uuid) -> Result<CityToggleResponse, AppError> {
        access::ensure_can_edit_config(actor)?;

        let mut tx = begin_rls_transaction(&self.pool, actor.id).await?;

        let city = self
            .repo
            .find_city(&mut *tx, id)
            .await?
            .ok_or(AppError::CityNotFound)?;
        let requested = !city.is_active;

        // Se o banco não devolver a linha, assume o valor pedido
        let is_active = self
            .repo
            .set_city_active(&mut *tx, id, requested)
            .await?
            .unwrap_or(requested);

        tx.commit().await?;

        tracing::info!(city = %id, is_active, actor = %actor.id, "Cidade atualizada");
        Ok(CityToggleResponse { id, is_active })
    }
}

/// Busca sem diferenciar maiúsculas, no nome da cidade ou da região.
pub(crate) fn filter_cities(cities: Vec<City>, regions: &[Region], search: &str) -> Vec<CityListing> {
    let region_names: HashMap<Uuid, &str> = regions
        .iter()
        .map(|region| (region.id, region.name.as_str()))
        .collect();
    let term = search.trim().to_lowercase();

    cities
        .into_iter()
        .filter_map(|city| {
            let region_name = region_names.get(&city.region_id).copied();

            let matches = term.is_empty()
                || city.name.to_lowercase().contains(&term)
                || region_name.unwrap_or_default().to_lowercase().contains(&term);

            matches.then(|| CityListing {
                id: city.id,
                region_name: region_name.map(str::to_string),
                name: city.name,
                region_id: city.region_id,
                is_active: city.is_active,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> (Vec<City>, Vec<Region>) {
        let norte = Region { id: Uuid::new_v4(), name: "Litoral Norte".into() };
        let sul = Region { id: Uuid::new_v4(), name: "Região Sul".into() };
        let cities = vec![
            City { id: Uuid::new_v4(), name: "Caucaia".into(), region_id: norte.id, is_active: true },
            City { id: Uuid::new_v4(), name: "Fortaleza".into(), region_id: sul.id, is_active: false },
            City { id: Uuid::new_v4(), name: "Sobral".into(), region_id: Uuid::new_v4(), is_active: true },
        ];
        (cities, vec![norte, sul])
    }

    #[test]
    fn empty_search_returns_everything_with_region_names() {
        let (cities, regions) = fixtures();
        let listed = filter_cities(cities, &regions, "   ");
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].region_name.as_deref(), Some("Litoral Norte"));
        assert_eq!(listed[2].region_name, None);
    }

    #[test]
    fn search_matches_city_or_region_ignoring_case() {
        let (cities, regions) = fixtures();
        let by_city = filter_cities(cities.clone(), &regions, "FORTAL");
        assert_eq!(by_city.len(), 1);
        assert_eq!(by_city[0].name, "Fortaleza");
        assert!(!by_city[0].is_active);

        let by_region = filter_cities(cities.clone(), &regions, " norte ");
        assert_eq!(by_region.len(), 1);
        assert_eq!(by_region[0].name, "Caucaia");

        assert!(filter_cities(cities, &regions, "recife").is_empty());
    }
}
