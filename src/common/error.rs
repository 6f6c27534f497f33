use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Data inválida: '{0}'")]
    InvalidDate(String),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Sem permissão: {0}")]
    Forbidden(&'static str),

    #[error("Registro não encontrado")]
    RecordNotFound,

    #[error("Cidade não encontrada")]
    CityNotFound,

    // Única origem de 500: tudo que falha no banco
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::RecordNotFound | AppError::CityNotFound => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message: String = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Preencha data, cidade e bairro.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::InvalidDate(raw) => format!("Data do registro inválida: '{}'.", raw),
            AppError::InvalidToken => "Sessão inválida. Faça login novamente.".into(),
            AppError::Forbidden(action) => format!("Sem permissão para {}.", action),
            AppError::RecordNotFound => "Registro não encontrado.".into(),
            AppError::CityNotFound => "Cidade não encontrada.".into(),

            // Erros de banco viram 500; o `tracing` guarda a mensagem detalhada.
            AppError::DatabaseError(e) => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "Ocorreu um erro inesperado. Tente novamente.".into()
            }
        };

        // Em builds de desenvolvimento o detalhe técnico acompanha a resposta.
        let body = if cfg!(debug_assertions) && status.is_server_error() {
            Json(json!({ "error": error_message, "details": self.to_string() }))
        } else {
            Json(json!({ "error": error_message }))
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_http_status() {
        assert_eq!(AppError::InvalidToken.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Forbidden("editar este registro").into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::RecordNotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InvalidDate("31/02".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(sqlx::Error::RowNotFound).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn database_errors_hide_behind_a_generic_message() {
        let response = AppError::from(sqlx::Error::PoolTimedOut).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Ocorreu um erro inesperado. Tente novamente.");
    }
}
