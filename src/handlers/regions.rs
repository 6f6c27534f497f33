// src/handlers/regions.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::Actor,
        regions::{CitiesOverview, CitySearchQuery, CityToggleResponse, Region},
    },
};

// GET /api/config/regions
#[utoipa::path(
    get,
    path = "/api/config/regions",
    tag = "Configuração",
    responses(
        (status = 200, description = "Regiões ordenadas por nome", body = Vec<Region>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_regions(
    State(app_state): State<AppState>,
    actor: Actor,
) -> Result<impl IntoResponse, AppError> {
    let regions = app_state.regions_service.list_regions(&actor).await?;

    Ok((StatusCode::OK, Json(regions)))
}

// GET /api/config/cities?search=
#[utoipa::path(
    get,
    path = "/api/config/cities",
    tag = "Configuração",
    params(CitySearchQuery),
    responses(
        (status = 200, description = "Cidades com o nome da região", body = CitiesOverview)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_cities(
    State(app_state): State<AppState>,
    actor: Actor,
    Query(query): Query<CitySearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let overview = app_state
        .regions_service
        .list_cities(&actor, query.search.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(overview)))
}

// PATCH /api/config/cities/{id}/toggle
#[utoipa::path(
    patch,
    path = "/api/config/cities/{id}/toggle",
    tag = "Configuração",
    responses(
        (status = 200, description = "Novo valor de is_active", body = CityToggleResponse),
        (status = 403, description = "Somente administradores"),
        (status = 404, description = "Cidade não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da cidade")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_city(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let toggled = app_state.regions_service.toggle_city(&actor, id).await?;

    Ok((StatusCode::OK, Json(toggled)))
}
