use axum::{extract::State, http::StatusCode, Json};

use crate::{common::error::AppError, config::AppState, models::auth::Actor};

// Handler da rota protegida /me: quem sou eu e se sou admin
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário autenticado", body = Actor),
        (status = 401, description = "Sessão inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(actor: Actor) -> Json<Actor> {
    Json(actor)
}

// Handler de saúde; também confirma que o banco responde
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Serviço e banco no ar", body = String),
        (status = 500, description = "Banco indisponível")
    )
)]
pub async fn health(State(app_state): State<AppState>) -> Result<(StatusCode, &'static str), AppError> {
    sqlx::query("SELECT 1").execute(&app_state.db_pool).await?;
    Ok((StatusCode::OK, "OK"))
}
