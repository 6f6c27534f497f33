// src/handlers/crm.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::i18n::Locale,
    models::{
        auth::Actor,
        crm::{CrmListing, CrmRecord, SaveRecordPayload, StatusChangeResponse, UpdateStatusPayload},
        regions::CityOption,
    },
};

// =============================================================================
//  LEITURA
// =============================================================================

// GET /api/crm/records
#[utoipa::path(
    get,
    path = "/api/crm/records",
    tag = "CRM",
    responses(
        (status = 200, description = "Últimos 50 registros com resumo", body = CrmListing),
        (status = 401, description = "Sessão inválida")
    ),
    params(
        ("accept-language" = Option<String>, Header, description = "pt (padrão) ou en")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_records(
    State(app_state): State<AppState>,
    Locale(locale): Locale,
    actor: Actor,
) -> Result<impl IntoResponse, AppError> {
    let listing = app_state.crm_service.list_records(&actor, locale).await?;

    Ok((StatusCode::OK, Json(listing)))
}

// GET /api/crm/cities
#[utoipa::path(
    get,
    path = "/api/crm/cities",
    tag = "CRM",
    responses(
        (status = 200, description = "Cidades ativas para o formulário", body = Vec<CityOption>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_city_options(
    State(app_state): State<AppState>,
    actor: Actor,
) -> Result<impl IntoResponse, AppError> {
    let cities = app_state.crm_service.list_city_options(&actor).await?;

    Ok((StatusCode::OK, Json(cities)))
}

// =============================================================================
//  ESCRITA
// =============================================================================

// POST /api/crm/records
#[utoipa::path(
    post,
    path = "/api/crm/records",
    tag = "CRM",
    request_body = SaveRecordPayload,
    responses(
        (status = 201, description = "Registro criado", body = CrmRecord),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_record(
    State(app_state): State<AppState>,
    actor: Actor,
    Json(payload): Json<SaveRecordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let record = app_state.crm_service.create_record(&actor, payload).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

// PUT /api/crm/records/{id}
#[utoipa::path(
    put,
    path = "/api/crm/records/{id}",
    tag = "CRM",
    request_body = SaveRecordPayload,
    responses(
        (status = 200, description = "Registro atualizado", body = CrmRecord),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Registro de outro vendedor"),
        (status = 404, description = "Registro não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do registro")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_record(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveRecordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let record = app_state.crm_service.update_record(&actor, id, payload).await?;

    Ok((StatusCode::OK, Json(record)))
}

// PATCH /api/crm/records/{id}/status
#[utoipa::path(
    patch,
    path = "/api/crm/records/{id}/status",
    tag = "CRM",
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status gravado", body = StatusChangeResponse),
        (status = 403, description = "Registro de outro vendedor"),
        (status = 404, description = "Registro não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do registro")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_record_status(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let status = app_state
        .crm_service
        .change_status(&actor, id, payload.status)
        .await?;

    Ok((
        StatusCode::OK,
        Json(StatusChangeResponse {
            id,
            planilha_status: status.to_planilha(),
            status,
        }),
    ))
}

// DELETE /api/crm/records/{id}
#[utoipa::path(
    delete,
    path = "/api/crm/records/{id}",
    tag = "CRM",
    responses(
        (status = 204, description = "Registro excluído"),
        (status = 403, description = "Registro de outro vendedor"),
        (status = 404, description = "Registro não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do registro")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_record(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.crm_service.delete_record(&actor, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
