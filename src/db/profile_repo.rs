use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::Profile};

// Repositório de perfis, responsável pelas leituras em 'app.profiles'
#[derive(Clone, Default)]
pub struct ProfileRepository;

impl ProfileRepository {
    pub fn new() -> Self {
        Self
    }

    // Busca o perfil do usuário autenticado (papel decide se é admin).
    // Precisa rodar dentro da transação RLS do próprio usuário.
    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Profile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT id, full_name, role FROM app.profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(profile)
    }

    // Nomes dos vendedores exibidos na tabela de registros
    pub async fn find_names<'e, E>(
        &self,
        executor: E,
        ids: &[Uuid],
    ) -> Result<Vec<Profile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let profiles = sqlx::query_as::<_, Profile>(
            "SELECT id, full_name, role FROM app.profiles WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;

        Ok(profiles)
    }
}
