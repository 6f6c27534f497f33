// src/services/auth.rs

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sqlx::PgPool;

use crate::{
    common::{db_utils::begin_rls_transaction, error::AppError},
    db::ProfileRepository,
    models::auth::{Actor, Claims},
};

/// Valida os tokens do provedor de autenticação e resolve o `Actor` da requisição.
#[derive(Clone)]
pub struct AuthService {
    profile_repo: ProfileRepository,
    pool: PgPool,
    jwt_secret: String,
    jwt_audience: String,
}

impl AuthService {
    pub fn new(
        profile_repo: ProfileRepository,
        pool: PgPool,
        jwt_secret: String,
        jwt_audience: String,
    ) -> Self {
        Self { profile_repo, pool, jwt_secret, jwt_audience }
    }

    pub fn decode_claims(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.jwt_audience.as_str()]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Token recusado: {}", e);
            AppError::InvalidToken
        })
    }

    /// Token -> Actor. Sem perfil cadastrado o usuário segue como não-admin.
    pub async fn resolve_actor(&self, token: &str) -> Result<Actor, AppError> {
        let claims = self.decode_claims(token)?;
        tracing::debug!(user = %claims.sub, email = ?claims.email, "Token validado");

        // O perfil também passa pelo RLS, com as claims do próprio token
        let mut tx = begin_rls_transaction(&self.pool, claims.sub).await?;
        let profile = self.profile_repo.find_by_id(&mut *tx, claims.sub).await?;
        tx.commit().await?;

        let is_admin = match profile {
            Some(profile) => profile.is_admin(),
            None => {
                tracing::warn!(user = %claims.sub, "Perfil não encontrado; seguindo como vendedor");
                false
            }
        };

        Ok(Actor { id: claims.sub, is_admin })
    }
}
