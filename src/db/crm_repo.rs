// src/db/crm_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        crm::{CrmRecord, RecordDraft},
        status::StatusTriple,
    },
};

const RECORD_COLUMNS: &str = "id, data_registro, tipo, status, inviabilidade, cancel_subtype, \
     qnt, bairro, city_id, seller_id, created_at, nome_completo, contato";

/// Máximo de linhas devolvidas pela listagem.
pub const RECORD_LIST_LIMIT: i64 = 50;

#[derive(Clone, Default)]
pub struct CrmRepository;

impl CrmRepository {
    pub fn new() -> Self {
        Self
    }

    /// Últimos registros criados, do mais novo para o mais antigo
    pub async fn list_recent<'e, E>(
        &self,
        executor: E,
        limit: i64,
    ) -> Result<Vec<CrmRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM app.crm_records ORDER BY created_at DESC LIMIT $1"
        );

        let records = sqlx::query_as::<_, CrmRecord>(&sql)
            .bind(limit)
            .fetch_all(executor)
            .await?;

        Ok(records)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<CrmRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM app.crm_records WHERE id = $1");

        let record = sqlx::query_as::<_, CrmRecord>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(record)
    }

    /// Novo registro; `qnt` é sempre 1 e o vendedor é quem criou
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        seller_id: Uuid,
        draft: &RecordDraft,
    ) -> Result<CrmRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO app.crm_records (
                data_registro, qnt, tipo, status, inviabilidade, cancel_subtype,
                city_id, bairro, nome_completo, contato, seller_id
            )
            VALUES ($1, 1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {RECORD_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, CrmRecord>(&sql)
            .bind(draft.data_registro)
            .bind(draft.tipo.as_str())
            .bind(draft.status.status.as_str())
            .bind(draft.status.inviabilidade_str())
            .bind(draft.status.cancel_subtype_str())
            .bind(draft.city_id)
            .bind(&draft.bairro)
            .bind(draft.nome_completo.as_deref())
            .bind(draft.contato.as_deref())
            .bind(seller_id)
            .fetch_one(executor)
            .await?;

        Ok(record)
    }

    /// Edição completa; o vendedor original é mantido
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        draft: &RecordDraft,
    ) -> Result<Option<CrmRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE app.crm_records
            SET data_registro = $2, qnt = 1, tipo = $3, status = $4,
                inviabilidade = $5, cancel_subtype = $6, city_id = $7,
                bairro = $8, nome_completo = $9, contato = $10
            WHERE id = $1
            RETURNING {RECORD_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, CrmRecord>(&sql)
            .bind(id)
            .bind(draft.data_registro)
            .bind(draft.tipo.as_str())
            .bind(draft.status.status.as_str())
            .bind(draft.status.inviabilidade_str())
            .bind(draft.status.cancel_subtype_str())
            .bind(draft.city_id)
            .bind(&draft.bairro)
            .bind(draft.nome_completo.as_deref())
            .bind(draft.contato.as_deref())
            .fetch_optional(executor)
            .await?;

        Ok(record)
    }

    /// Atualiza só as três colunas de status
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: &StatusTriple,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE app.crm_records
            SET status = $2, inviabilidade = $3, cancel_subtype = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.status.as_str())
        .bind(status.inviabilidade_str())
        .bind(status.cancel_subtype_str())
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM app.crm_records WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
