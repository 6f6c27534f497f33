// src/models/crm.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::status::{DisplayStatus, PlanilhaStatus, StatusTriple};

// --- ENUMS ---

/// Classificação do registro ("Definição" na tela).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tipo {
    #[default]
    Venda,
    Lead,
    Migracao,
    Inadimplencia,
    Reativacao,
}

impl Tipo {
    pub const ALL: [Tipo; 5] = [
        Tipo::Venda,
        Tipo::Lead,
        Tipo::Migracao,
        Tipo::Inadimplencia,
        Tipo::Reativacao,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tipo::Venda => "VENDA",
            Tipo::Lead => "LEAD",
            Tipo::Migracao => "MIGRACAO",
            Tipo::Inadimplencia => "INADIMPLENCIA",
            Tipo::Reativacao => "REATIVACAO",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tipo::Venda => "VENDA",
            Tipo::Lead => "LEAD",
            Tipo::Migracao => "MIGRAÇÃO",
            Tipo::Inadimplencia => "INADIMPLÊNCIA",
            Tipo::Reativacao => "REATIVAÇÃO",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Tipo::ALL.into_iter().find(|tipo| tipo.as_str() == raw)
    }
}

/// Rótulo de um `tipo` vindo do banco; valores desconhecidos aparecem como estão.
pub fn tipo_label(raw: &str) -> &str {
    Tipo::parse(raw).map(Tipo::label).unwrap_or(raw)
}

// --- REGISTRO (linha de app.crm_records) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrmRecord {
    pub id: Uuid,
    pub data_registro: NaiveDate,
    pub tipo: String,

    // Tripla de status, gravada sempre a partir de um PlanilhaStatus
    pub status: String,
    pub inviabilidade: Option<String>,
    pub cancel_subtype: Option<String>,

    pub qnt: i32,
    pub bairro: String,
    pub city_id: Uuid,
    pub seller_id: Uuid,
    pub created_at: DateTime<Utc>,

    pub nome_completo: Option<String>,
    pub contato: Option<String>,
}

impl CrmRecord {
    pub fn status_triple(&self) -> StatusTriple {
        StatusTriple::from_columns(
            &self.status,
            self.inviabilidade.as_deref(),
            self.cancel_subtype.as_deref(),
        )
    }

    pub fn planilha_status(&self) -> DisplayStatus {
        self.status_triple().to_planilha()
    }
}

// --- PAYLOADS ---

fn default_planilha_status() -> PlanilhaStatus {
    PlanilhaStatus::Sim
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Corpo de criação/edição de um registro.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecordPayload {
    /// "YYYY-MM-DD". Ausente: hoje.
    #[schema(example = "2024-03-05")]
    pub data_registro: Option<String>,

    #[serde(default)]
    pub tipo: Tipo,

    #[serde(default = "default_planilha_status")]
    pub status: PlanilhaStatus,

    #[validate(required(message = "Selecione a cidade."))]
    pub city_id: Option<Uuid>,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Preencha o bairro."))]
    #[schema(example = "Centro")]
    pub bairro: String,

    #[serde(default)]
    pub nome_completo: Option<String>,
    #[serde(default)]
    pub contato: Option<String>,
}

/// Mudança rápida de status direto na tabela.
/// O texto da planilha é convertido sem rejeição: fora dos 7 valores vira PENDENTE.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    #[serde(deserialize_with = "StatusTriple::deserialize_planilha")]
    #[schema(value_type = PlanilhaStatus)]
    pub status: StatusTriple,
}

/// Registro já normalizado, pronto para ir ao banco.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub data_registro: NaiveDate,
    pub tipo: Tipo,
    pub status: StatusTriple,
    pub city_id: Uuid,
    pub bairro: String,
    pub nome_completo: Option<String>,
    pub contato: Option<String>,
}

// --- RESPOSTAS ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrmRecordView {
    pub id: Uuid,
    pub data_registro: NaiveDate,
    pub data_display: String, // "05/03/2024 (Ter)"
    pub weekday: String,

    pub tipo: String,
    pub tipo_label: String,

    pub status: StatusTriple,
    #[schema(value_type = String, example = "INV REGIAO")]
    pub planilha_status: DisplayStatus,
    pub planilha_label: String,

    pub qnt: i32,
    pub bairro: String,
    pub city_id: Uuid,
    pub city_name: Option<String>,
    pub seller_id: Uuid,
    pub seller_label: String,
    pub created_at: DateTime<Utc>,
    pub nome_completo: Option<String>,
    pub contato: Option<String>,

    pub can_edit: bool,
}

/// Resposta da mudança rápida de status.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeResponse {
    pub id: Uuid,
    #[schema(value_type = String, example = "CANC TRANBORDO")]
    pub planilha_status: DisplayStatus,
    pub status: StatusTriple,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: PlanilhaStatus,
    #[schema(value_type = String)]
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrmSummary {
    pub shown: usize,
    pub total_qnt: i64,
    pub vendas: usize,
    pub leads: usize,
    pub by_status: Vec<StatusCount>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrmListing {
    pub summary: CrmSummary,
    pub records: Vec<CrmRecordView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tipo_labels_and_fallback() {
        assert_eq!(tipo_label("MIGRACAO"), "MIGRAÇÃO");
        assert_eq!(tipo_label("VENDA"), "VENDA");
        assert_eq!(tipo_label("PARCERIA"), "PARCERIA");
    }

    #[test]
    fn payload_defaults_and_validation() {
        let payload: SaveRecordPayload = serde_json::from_value(serde_json::json!({
            "cityId": "6f1c1bd2-8f27-4c64-9d0c-0d5d2b4f6a11",
            "bairro": "Centro",
        }))
        .unwrap();

        assert_eq!(payload.tipo, Tipo::Venda);
        assert_eq!(payload.status, PlanilhaStatus::Sim);
        assert!(payload.validate().is_ok());

        let blank: SaveRecordPayload = serde_json::from_value(serde_json::json!({
            "bairro": "   ",
            "status": "INV PORTA",
        }))
        .unwrap();
        let errors = blank.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("bairro"));
        assert!(fields.contains_key("city_id"));
    }

    #[test]
    fn status_change_accepts_any_planilha_text() {
        let payload: UpdateStatusPayload =
            serde_json::from_value(serde_json::json!({ "status": "CANC TRANBORDO" })).unwrap();
        assert_eq!(payload.status, PlanilhaStatus::CancTranbordo.to_internal());

        let unknown: UpdateStatusPayload =
            serde_json::from_value(serde_json::json!({ "status": "TALVEZ" })).unwrap();
        assert_eq!(unknown.status, StatusTriple::pendente());

        assert!(serde_json::from_value::<UpdateStatusPayload>(serde_json::json!({ "status": 3 })).is_err());
    }

    #[test]
    fn payload_rejects_values_outside_the_vocabulary() {
        let result = serde_json::from_value::<SaveRecordPayload>(serde_json::json!({
            "tipo": "PARCERIA",
        }));
        assert!(result.is_err());
    }
}
