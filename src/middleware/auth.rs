use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, config::AppState, models::auth::Actor};

// O middleware em si: valida o Bearer token e resolve o Actor uma única vez
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::InvalidToken)?;

    let actor = app_state.auth_service.resolve_actor(bearer.token()).await?;

    // Insere o Actor nos "extensions" da requisição
    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

// Extrator para obter o Actor diretamente nos handlers
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .copied()
            .ok_or(AppError::InvalidToken)
    }
}
