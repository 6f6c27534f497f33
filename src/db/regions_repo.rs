use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::regions::{City, CityOption, Region},
};

// Leituras e escritas no schema 'config' (cidades e regiões)
#[derive(Clone, Default)]
pub struct RegionsRepository;

impl RegionsRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_regions<'e, E>(&self, executor: E) -> Result<Vec<Region>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let regions = sqlx::query_as::<_, Region>(
            "SELECT id, name FROM config.regions ORDER BY name ASC",
        )
        .fetch_all(executor)
        .await?;

        Ok(regions)
    }

    pub async fn list_cities<'e, E>(&self, executor: E) -> Result<Vec<City>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cities = sqlx::query_as::<_, City>(
            "SELECT id, name, region_id, is_active FROM config.cities ORDER BY name ASC",
        )
        .fetch_all(executor)
        .await?;

        Ok(cities)
    }

    /// Cidades que aparecem no formulário de registros
    pub async fn list_active_cities<'e, E>(&self, executor: E) -> Result<Vec<CityOption>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cities = sqlx::query_as::<_, CityOption>(
            "SELECT id, name FROM config.cities WHERE is_active = true ORDER BY name ASC",
        )
        .fetch_all(executor)
        .await?;

        Ok(cities)
    }

    /// Grava o novo `is_active` e devolve o valor que ficou no banco.
    /// `None` quando a cidade não existe (ou a política RLS escondeu a linha).
    pub async fn set_city_active<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<bool>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stored = sqlx::query_scalar::<_, bool>(
            "UPDATE config.cities SET is_active = $2 WHERE id = $1 RETURNING is_active",
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(executor)
        .await?;

        Ok(stored)
    }

    pub async fn find_city<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<City>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let city = sqlx::query_as::<_, City>(
            "SELECT id, name, region_id, is_active FROM config.cities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(city)
    }
}
