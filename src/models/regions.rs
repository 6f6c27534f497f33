// src/models/regions.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: Uuid,
    pub name: String,
}

/// Linha de `config.cities`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub region_id: Uuid,
    pub is_active: bool,
}

/// Opção de cidade para o formulário de registros (somente ativas).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityOption {
    pub id: Uuid,
    pub name: String,
}

/// Cidade já com o nome da região resolvido, para a tela de configuração.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityListing {
    pub id: Uuid,
    pub name: String,
    pub region_id: Uuid,
    pub region_name: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CitiesOverview {
    pub total: usize,
    pub can_edit: bool,
    pub cities: Vec<CityListing>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CitySearchQuery {
    /// Trecho do nome da cidade ou da região (sem diferenciar maiúsculas).
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityToggleResponse {
    pub id: Uuid,
    pub is_active: bool,
}
