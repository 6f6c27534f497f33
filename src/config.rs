// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{CrmRepository, ProfileRepository, RegionsRepository},
    services::{auth::AuthService, CrmService, RegionsService},
};

/// Variáveis de ambiente (ou `.env`) lidas na inicialização.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_audience: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let jwt_audience = env::var("JWT_AUDIENCE").unwrap_or_else(|_| "authenticated".into());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: '{}'", raw))?,
            Err(_) => 5,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_audience,
            bind_addr,
            db_max_connections,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub crm_service: CrmService,
    pub regions_service: RegionsService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(db_pool: PgPool, config: &Config) -> Self {
        let profile_repo = ProfileRepository::new();
        let crm_repo = CrmRepository::new();
        let regions_repo = RegionsRepository::new();

        let auth_service = AuthService::new(
            profile_repo.clone(),
            db_pool.clone(),
            config.jwt_secret.clone(),
            config.jwt_audience.clone(),
        );
        let crm_service = CrmService::new(
            crm_repo,
            profile_repo,
            regions_repo.clone(),
            db_pool.clone(),
        );
        let regions_service = RegionsService::new(regions_repo, db_pool.clone());

        Self {
            db_pool,
            auth_service,
            crm_service,
            regions_service,
        }
    }
}
