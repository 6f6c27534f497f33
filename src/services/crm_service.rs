// src/services/crm_service.rs

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        dates::{self, DateLocale},
        db_utils::begin_rls_transaction,
        error::AppError,
    },
    db::{crm_repo::RECORD_LIST_LIMIT, CrmRepository, ProfileRepository, RegionsRepository},
    models::{
        auth::Actor,
        crm::{
            tipo_label, CrmListing, CrmRecord, CrmRecordView, CrmSummary, RecordDraft,
            SaveRecordPayload, StatusCount, Tipo,
        },
        regions::CityOption,
        status::{PlanilhaStatus, StatusTriple},
    },
    services::access,
};

#[derive(Clone)]
pub struct CrmService {
    repo: CrmRepository,
    profile_repo: ProfileRepository,
    regions_repo: RegionsRepository,
    pool: PgPool,
}

impl CrmService {
    pub fn new(
        repo: CrmRepository,
        profile_repo: ProfileRepository,
        regions_repo: RegionsRepository,
        pool: PgPool,
    ) -> Self {
        Self { repo, profile_repo, regions_repo, pool }
    }

    // =========================================================================
    //  1. LEITURA
    // =========================================================================

    pub async fn list_records(
        &self,
        actor: &Actor,
        locale: DateLocale,
    ) -> Result<CrmListing, AppError> {
        let mut tx = begin_rls_transaction(&self.pool, actor.id).await?;

        let records = self.repo.list_recent(&mut *tx, RECORD_LIST_LIMIT).await?;

        let cities: HashMap<Uuid, String> = self
            .regions_repo
            .list_active_cities(&mut *tx)
            .await?
            .into_iter()
            .map(|city| (city.id, city.name))
            .collect();

        let seller_ids: Vec<Uuid> = records
            .iter()
            .map(|record| record.seller_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        // Sem os nomes a tabela ainda funciona (cai no ID abreviado)
        let seller_names: HashMap<Uuid, String> =
            match self.profile_repo.find_names(&mut *tx, &seller_ids).await {
                Ok(profiles) => profiles
                    .into_iter()
                    .filter_map(|profile| profile.full_name.map(|name| (profile.id, name)))
                    .collect(),
                Err(e) => {
                    tracing::warn!("Falha ao carregar nomes dos vendedores: {}", e);
                    HashMap::new()
                }
            };

        tx.commit().await?;

        let summary = summarize(&records);
        let records = records
            .iter()
            .map(|record| present_record(record, actor, locale, &cities, &seller_names))
            .collect();

        Ok(CrmListing { summary, records })
    }

    pub async fn list_city_options(&self, actor: &Actor) -> Result<Vec<CityOption>, AppError> {
        let mut tx = begin_rls_transaction(&self.pool, actor.id).await?;
        let cities = self.regions_repo.list_active_cities(&mut *tx).await?;
        tx.commit().await?;
        Ok(cities)
    }

    // =========================================================================
    //  2. ESCRITA (sempre depois da checagem de acesso)
    // =========================================================================

    pub async fn create_record(
        &self,
        actor: &Actor,
        payload: SaveRecordPayload,
    ) -> Result<CrmRecord, AppError> {
        let draft = build_draft(payload, dates::today_local())?;

        let mut tx = begin_rls_transaction(&self.pool, actor.id).await?;
        let record = self.repo.insert(&mut *tx, actor.id, &draft).await?;
        tx.commit().await?;

        tracing::info!(record = %record.id, seller = %actor.id, "Registro criado");
        Ok(record)
    }

    pub async fn update_record(
        &self,
        actor: &Actor,
        id: Uuid,
        payload: SaveRecordPayload,
    ) -> Result<CrmRecord, AppError> {
        let draft = build_draft(payload, dates::today_local())?;

        let mut tx = begin_rls_transaction(&self.pool, actor.id).await?;

        let existing = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::RecordNotFound)?;
        access::ensure_can_edit_record(actor, existing.seller_id, "editar este registro")?;

        let record = self
            .repo
            .update(&mut *tx, id, &draft)
            .await?
            .ok_or(AppError::RecordNotFound)?;

        tx.commit().await?;

        tracing::info!(record = %id, actor = %actor.id, "Registro atualizado");
        Ok(record)
    }

    /// Troca de status direto na tabela. Devolve a tripla gravada.
    pub async fn change_status(
        &self,
        actor: &Actor,
        id: Uuid,
        status: StatusTriple,
    ) -> Result<StatusTriple, AppError> {
        let mut tx = begin_rls_transaction(&self.pool, actor.id).await?;

        let existing = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::RecordNotFound)?;
        access::ensure_can_edit_record(actor, existing.seller_id, "editar este registro")?;

        if !self.repo.update_status(&mut *tx, id, &status).await? {
            return Err(AppError::RecordNotFound);
        }

        tx.commit().await?;

        tracing::info!(record = %id, status = status.to_planilha().as_str(), "Status atualizado");
        Ok(status)
    }

    pub async fn delete_record(&self, actor: &Actor, id: Uuid) -> Result<(), AppError> {
        let mut tx = begin_rls_transaction(&self.pool, actor.id).await?;

        let existing = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::RecordNotFound)?;
        access::ensure_can_edit_record(actor, existing.seller_id, "excluir este registro")?;

        if !self.repo.delete(&mut *tx, id).await? {
            return Err(AppError::RecordNotFound);
        }

        tx.commit().await?;

        tracing::info!(record = %id, actor = %actor.id, "Registro excluído");
        Ok(())
    }
}

// =========================================================================
//  Funções puras de apoio
// =========================================================================

/// Normaliza o payload: data padrão, textos aparados, status pela planilha.
pub(crate) fn build_draft(
    payload: SaveRecordPayload,
    today: NaiveDate,
) -> Result<RecordDraft, AppError> {
    let data_registro = match payload.data_registro.as_deref().map(str::trim) {
        None | Some("") => today,
        Some(raw) => dates::parse_date_input(raw)
            .ok_or_else(|| AppError::InvalidDate(raw.to_string()))?,
    };

    let city_id = payload.city_id.ok_or_else(|| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("city_id", validator::ValidationError::new("required"));
        AppError::ValidationError(errors)
    })?;

    Ok(RecordDraft {
        data_registro,
        tipo: payload.tipo,
        status: payload.status.to_internal(),
        city_id,
        bairro: payload.bairro.trim().to_string(),
        nome_completo: clean_optional(payload.nome_completo),
        contato: clean_optional(payload.contato),
    })
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn summarize(records: &[CrmRecord]) -> CrmSummary {
    let planilha: Vec<_> = records.iter().map(CrmRecord::planilha_status).collect();

    let by_status = PlanilhaStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            label: status.label(),
            count: planilha.iter().filter(|p| p.planilha() == Some(status)).count(),
        })
        .collect();

    let count_tipo = |tipo: Tipo| records.iter().filter(|r| r.tipo == tipo.as_str()).count();

    CrmSummary {
        shown: records.len(),
        total_qnt: records.iter().map(|r| i64::from(r.qnt)).sum(),
        vendas: count_tipo(Tipo::Venda),
        leads: count_tipo(Tipo::Lead),
        by_status,
    }
}

/// "abcd...wxyz" para IDs longos.
pub(crate) fn abbreviate_id(value: &str) -> String {
    if value.is_empty() {
        return "-".to_string();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return value.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

pub(crate) fn seller_label(
    actor: &Actor,
    seller_id: Uuid,
    seller_names: &HashMap<Uuid, String>,
) -> String {
    if seller_id == actor.id {
        return "Você".to_string();
    }
    seller_names
        .get(&seller_id)
        .cloned()
        .unwrap_or_else(|| abbreviate_id(&seller_id.to_string()))
}

pub(crate) fn present_record(
    record: &CrmRecord,
    actor: &Actor,
    locale: DateLocale,
    cities: &HashMap<Uuid, String>,
    seller_names: &HashMap<Uuid, String>,
) -> CrmRecordView {
    let status = record.status_triple();
    let planilha_status = status.to_planilha();

    CrmRecordView {
        id: record.id,
        data_registro: record.data_registro,
        data_display: dates::date_with_weekday(&record.data_registro, locale),
        weekday: dates::weekday_long(&record.data_registro, locale),
        tipo: record.tipo.clone(),
        tipo_label: tipo_label(&record.tipo).to_string(),
        planilha_label: planilha_status.label().to_string(),
        planilha_status,
        status,
        qnt: record.qnt,
        bairro: record.bairro.clone(),
        city_id: record.city_id,
        city_name: cities.get(&record.city_id).cloned(),
        seller_id: record.seller_id,
        seller_label: seller_label(actor, record.seller_id, seller_names),
        created_at: record.created_at,
        nome_completo: record.nome_completo.clone(),
        contato: record.contato.clone(),
        can_edit: access::can_edit_record(actor, record.seller_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::status::{CancelSubtype, DisplayStatus, RecordStatus};
    use chrono::Utc;

    fn record(tipo: &str, status: &str, cancel_subtype: Option<&str>, seller_id: Uuid) -> CrmRecord {
        CrmRecord {
            id: Uuid::new_v4(),
            data_registro: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            tipo: tipo.into(),
            status: status.into(),
            inviabilidade: None,
            cancel_subtype: cancel_subtype.map(Into::into),
            qnt: 1,
            bairro: "Centro".into(),
            city_id: Uuid::new_v4(),
            seller_id,
            created_at: Utc::now(),
            nome_completo: None,
            contato: None,
        }
    }

    fn payload(json: serde_json::Value) -> SaveRecordPayload {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn draft_defaults_date_to_today_and_trims_text() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let city = Uuid::new_v4();
        let draft = build_draft(
            payload(serde_json::json!({
                "cityId": city,
                "bairro": "  Aldeota ",
                "nomeCompleto": "   ",
                "contato": " 85 99999-0000 ",
                "status": "CANC TRANBORDO",
            })),
            today,
        )
        .unwrap();

        assert_eq!(draft.data_registro, today);
        assert_eq!(draft.city_id, city);
        assert_eq!(draft.bairro, "Aldeota");
        assert_eq!(draft.nome_completo, None);
        assert_eq!(draft.contato.as_deref(), Some("85 99999-0000"));
        assert_eq!(draft.status.status, RecordStatus::Cancelado);
        assert_eq!(draft.status.cancel_subtype, Some(CancelSubtype::Tranbordo));
    }

    #[test]
    fn draft_rejects_invalid_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let result = build_draft(
            payload(serde_json::json!({
                "dataRegistro": "2024-02-30",
                "cityId": Uuid::new_v4(),
                "bairro": "Centro",
            })),
            today,
        );
        assert!(matches!(result, Err(AppError::InvalidDate(raw)) if raw == "2024-02-30"));

        let explicit = build_draft(
            payload(serde_json::json!({
                "dataRegistro": "2024-03-05",
                "cityId": Uuid::new_v4(),
                "bairro": "Centro",
            })),
            today,
        )
        .unwrap();
        assert_eq!(explicit.data_registro, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn summary_counts_by_tipo_and_planilha_status() {
        let seller = Uuid::new_v4();
        let records = vec![
            record("VENDA", "INSTALADO", None, seller),
            record("VENDA", "CANCELADO", Some("TRANBORDO"), seller),
            record("LEAD", "PENDENTE", None, seller),
            record("MIGRACAO", "AGENDADO", None, seller),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.shown, 4);
        assert_eq!(summary.total_qnt, 4);
        assert_eq!(summary.vendas, 2);
        assert_eq!(summary.leads, 1);

        let count = |status: PlanilhaStatus| {
            summary.by_status.iter().find(|c| c.status == status).unwrap().count
        };
        assert_eq!(count(PlanilhaStatus::Sim), 1);
        assert_eq!(count(PlanilhaStatus::Nao), 1);
        assert_eq!(count(PlanilhaStatus::CancTranbordo), 1);
        assert_eq!(count(PlanilhaStatus::Cancelado), 0);
        assert_eq!(summary.by_status.len(), 7);
        assert_eq!(summary.by_status[1].label, "NÃO");
    }

    #[test]
    fn ids_are_abbreviated() {
        assert_eq!(abbreviate_id(""), "-");
        assert_eq!(abbreviate_id("abc"), "abc");
        assert_eq!(abbreviate_id("12345678"), "12345678");
        assert_eq!(
            abbreviate_id("6f1c1bd2-8f27-4c64-9d0c-0d5d2b4f6a11"),
            "6f1c...6a11"
        );
    }

    #[test]
    fn seller_label_prefers_you_then_name_then_id() {
        let actor = Actor { id: Uuid::new_v4(), is_admin: false };
        let named = Uuid::new_v4();
        let unnamed = Uuid::parse_str("6f1c1bd2-8f27-4c64-9d0c-0d5d2b4f6a11").unwrap();
        let names = HashMap::from([(named, "Maria".to_string())]);

        assert_eq!(seller_label(&actor, actor.id, &names), "Você");
        assert_eq!(seller_label(&actor, named, &names), "Maria");
        assert_eq!(seller_label(&actor, unnamed, &names), "6f1c...6a11");
    }

    #[test]
    fn presented_record_carries_display_fields_and_edit_flag() {
        let actor = Actor { id: Uuid::new_v4(), is_admin: false };
        let mine = record("MIGRACAO", "INVIAVEL", None, actor.id);
        let cities = HashMap::from([(mine.city_id, "Fortaleza".to_string())]);

        let view = present_record(&mine, &actor, DateLocale::PtBr, &cities, &HashMap::new());
        assert_eq!(view.data_display, "05/03/2024 (Ter)");
        assert_eq!(view.weekday, "terça-feira");
        assert_eq!(view.tipo_label, "MIGRAÇÃO");
        assert_eq!(view.planilha_status, DisplayStatus::Planilha(PlanilhaStatus::InvRegiao));
        assert_eq!(view.planilha_label, "INV REGIÃO");
        assert_eq!(view.city_name.as_deref(), Some("Fortaleza"));
        assert_eq!(view.seller_label, "Você");
        assert!(view.can_edit);

        let other = record("VENDA", "INSTALADO", None, Uuid::new_v4());
        let view = present_record(&other, &actor, DateLocale::PtBr, &cities, &HashMap::new());
        assert!(!view.can_edit);
        assert_eq!(view.city_name, None);
    }
}
