//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::middleware::auth::auth_guard;

fn build_router(app_state: AppState) -> Router {
    // Registros de vendas/leads
    let crm_routes = Router::new()
        .route(
            "/records",
            get(handlers::crm::list_records).post(handlers::crm::create_record),
        )
        .route(
            "/records/{id}",
            put(handlers::crm::update_record).delete(handlers::crm::delete_record),
        )
        .route("/records/{id}/status", patch(handlers::crm::update_record_status))
        .route("/cities", get(handlers::crm::list_city_options));

    // Cidades e regiões (edição só para admin)
    let config_routes = Router::new()
        .route("/regions", get(handlers::regions::list_regions))
        .route("/cities", get(handlers::regions::list_cities))
        .route("/cities/{id}/toggle", patch(handlers::regions::toggle_city));

    // Tudo abaixo exige um Bearer token válido
    let protected = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .nest("/crm", crm_routes)
        .nest("/config", config_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        // Documentação pública; as rotas documentadas continuam protegidas
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .route("/api/health", get(handlers::auth::health))
        .nest("/api", protected)
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    let app = build_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
