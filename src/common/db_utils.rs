use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::common::error::AppError;

/// Papel do banco assumido pelas requisições. As políticas RLS são escritas para ele.
pub(crate) const RLS_ROLE: &str = "authenticated";

// ---
// Helper RLS: A "Chave" para o Banco de Dados
// ---
/// Abre uma transação com as claims do usuário publicadas para as políticas RLS
/// e troca para o papel `authenticated`, que é quem as políticas enxergam.
/// Tudo é local à transação (`set_config(..., true)` e `SET LOCAL`), por isso o
/// chamador precisa fazer todo o trabalho dentro dela e dar `commit`.
pub(crate) async fn begin_rls_transaction(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Transaction<'static, Postgres>, AppError> {
    // O operador '?' converte automaticamente sqlx::Error -> AppError::DatabaseError
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT set_config('request.jwt.claims', $1, true)")
        .bind(rls_claims(user_id))
        .execute(&mut *tx)
        .await?;

    sqlx::query("SELECT set_config('request.jwt.claim.sub', $1, true)")
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await?;

    // Sem isso um usuário com BYPASSRLS (ex.: postgres) ignora as políticas
    sqlx::query(&format!("SET LOCAL ROLE {}", RLS_ROLE))
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}

/// JSON publicado em `request.jwt.claims`, no formato que `auth.uid()` lê.
pub(crate) fn rls_claims(user_id: Uuid) -> String {
    json!({ "sub": user_id, "role": RLS_ROLE }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_carry_the_user_and_the_policy_role() {
        let user_id = Uuid::new_v4();
        let claims: serde_json::Value = serde_json::from_str(&rls_claims(user_id)).unwrap();

        assert_eq!(claims["sub"], user_id.to_string());
        assert_eq!(claims["role"], "authenticated");
    }
}
