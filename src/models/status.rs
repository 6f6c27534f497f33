// src/models/status.rs

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use utoipa::ToSchema;

// --- VOCABULÁRIO DA PLANILHA (externo) ---

/// Os 7 valores que o time comercial enxerga na planilha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PlanilhaStatus {
    #[serde(rename = "SIM")]
    Sim,
    #[serde(rename = "NAO")]
    Nao,
    #[serde(rename = "REAGENDAR")]
    Reagendar,
    #[serde(rename = "INV REGIAO")]
    InvRegiao,
    #[serde(rename = "INV PORTA")]
    InvPorta,
    #[serde(rename = "CANCELADO")]
    Cancelado,
    #[serde(rename = "CANC TRANBORDO")]
    CancTranbordo,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Status de planilha desconhecido: '{0}'")]
pub struct UnknownPlanilhaStatus(pub String);

impl PlanilhaStatus {
    /// Ordem canônica (a mesma do seletor e do resumo).
    pub const ALL: [PlanilhaStatus; 7] = [
        PlanilhaStatus::Sim,
        PlanilhaStatus::Nao,
        PlanilhaStatus::Reagendar,
        PlanilhaStatus::InvRegiao,
        PlanilhaStatus::InvPorta,
        PlanilhaStatus::Cancelado,
        PlanilhaStatus::CancTranbordo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlanilhaStatus::Sim => "SIM",
            PlanilhaStatus::Nao => "NAO",
            PlanilhaStatus::Reagendar => "REAGENDAR",
            PlanilhaStatus::InvRegiao => "INV REGIAO",
            PlanilhaStatus::InvPorta => "INV PORTA",
            PlanilhaStatus::Cancelado => "CANCELADO",
            PlanilhaStatus::CancTranbordo => "CANC TRANBORDO",
        }
    }

    /// Texto exibido para o usuário (com acentuação).
    pub fn label(self) -> &'static str {
        match self {
            PlanilhaStatus::Nao => "NÃO",
            PlanilhaStatus::InvRegiao => "INV REGIÃO",
            other => other.as_str(),
        }
    }

    /// Direção "planilha -> banco".
    pub fn to_internal(self) -> StatusTriple {
        let (status, inviabilidade, cancel_subtype) = match self {
            PlanilhaStatus::Sim => (RecordStatus::Instalado, None, None),
            PlanilhaStatus::Nao => (RecordStatus::Pendente, None, None),
            PlanilhaStatus::Reagendar => (RecordStatus::Reagendar, None, None),
            PlanilhaStatus::InvRegiao => (RecordStatus::Inviavel, Some(Inviabilidade::Regiao), None),
            PlanilhaStatus::InvPorta => (RecordStatus::Inviavel, Some(Inviabilidade::Porta), None),
            PlanilhaStatus::Cancelado => (RecordStatus::Cancelado, None, None),
            PlanilhaStatus::CancTranbordo => {
                (RecordStatus::Cancelado, None, Some(CancelSubtype::Tranbordo))
            }
        };

        StatusTriple { status, inviabilidade, cancel_subtype }
    }
}

impl FromStr for PlanilhaStatus {
    type Err = UnknownPlanilhaStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlanilhaStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownPlanilhaStatus(s.to_string()))
    }
}

// --- REPRESENTAÇÃO INTERNA (colunas do banco) ---

/// Coluna `status` de `app.crm_records`.
/// Valores gravados por outros clientes chegam como `Other` e são preservados.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordStatus {
    Pendente,
    Agendado,
    Reagendar,
    Instalado,
    Cancelado,
    Inviavel,
    Other(String),
}

impl RecordStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RecordStatus::Pendente => "PENDENTE",
            RecordStatus::Agendado => "AGENDADO",
            RecordStatus::Reagendar => "REAGENDAR",
            RecordStatus::Instalado => "INSTALADO",
            RecordStatus::Cancelado => "CANCELADO",
            RecordStatus::Inviavel => "INVIAVEL",
            RecordStatus::Other(raw) => raw,
        }
    }
}

impl From<&str> for RecordStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "PENDENTE" => RecordStatus::Pendente,
            "AGENDADO" => RecordStatus::Agendado,
            "REAGENDAR" => RecordStatus::Reagendar,
            "INSTALADO" => RecordStatus::Instalado,
            "CANCELADO" => RecordStatus::Cancelado,
            "INVIAVEL" => RecordStatus::Inviavel,
            other => RecordStatus::Other(other.to_string()),
        }
    }
}

impl Serialize for RecordStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Coluna `inviabilidade`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Inviabilidade {
    Regiao,
    Porta,
}

impl Inviabilidade {
    pub fn as_str(self) -> &'static str {
        match self {
            Inviabilidade::Regiao => "REGIAO",
            Inviabilidade::Porta => "PORTA",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "REGIAO" => Some(Inviabilidade::Regiao),
            "PORTA" => Some(Inviabilidade::Porta),
            _ => None,
        }
    }
}

/// Coluna `cancel_subtype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum CancelSubtype {
    Tranbordo,
}

impl CancelSubtype {
    pub fn as_str(self) -> &'static str {
        match self {
            CancelSubtype::Tranbordo => "TRANBORDO",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "TRANBORDO" => Some(CancelSubtype::Tranbordo),
            _ => None,
        }
    }
}

/// As três colunas que juntas representam o status de um registro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusTriple {
    #[schema(value_type = String, example = "INSTALADO")]
    pub status: RecordStatus,
    pub inviabilidade: Option<Inviabilidade>,
    pub cancel_subtype: Option<CancelSubtype>,
}

impl StatusTriple {
    /// `(PENDENTE, null, null)`: estado inicial e fallback.
    pub fn pendente() -> Self {
        Self {
            status: RecordStatus::Pendente,
            inviabilidade: None,
            cancel_subtype: None,
        }
    }

    /// Converte um valor bruto da planilha. Qualquer string fora dos 7 valores cai em PENDENTE.
    pub fn from_planilha_str(raw: &str) -> Self {
        raw.parse::<PlanilhaStatus>()
            .map(PlanilhaStatus::to_internal)
            .unwrap_or_else(|_| Self::pendente())
    }

    /// `deserialize_with` para campos que chegam como texto da planilha.
    pub fn deserialize_planilha<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let triple = Self::from_planilha_str(&raw);
        if triple == Self::pendente() && raw != PlanilhaStatus::Nao.as_str() {
            tracing::warn!(status = %raw, "Status de planilha desconhecido; gravando como PENDENTE");
        }
        Ok(triple)
    }

    /// Monta a tripla a partir das colunas lidas do banco, sem rejeitar nada.
    pub fn from_columns(
        status: &str,
        inviabilidade: Option<&str>,
        cancel_subtype: Option<&str>,
    ) -> Self {
        Self {
            status: RecordStatus::from(status),
            inviabilidade: inviabilidade.and_then(Inviabilidade::parse),
            cancel_subtype: cancel_subtype.and_then(CancelSubtype::parse),
        }
    }

    /// Direção "banco -> planilha". Status sem equivalente passam adiante sem alteração.
    pub fn to_planilha(&self) -> DisplayStatus {
        let planilha = match &self.status {
            RecordStatus::Instalado => PlanilhaStatus::Sim,
            RecordStatus::Pendente => PlanilhaStatus::Nao,
            RecordStatus::Reagendar => PlanilhaStatus::Reagendar,
            RecordStatus::Inviavel => match self.inviabilidade {
                Some(Inviabilidade::Porta) => PlanilhaStatus::InvPorta,
                _ => PlanilhaStatus::InvRegiao,
            },
            RecordStatus::Cancelado => match self.cancel_subtype {
                Some(CancelSubtype::Tranbordo) => PlanilhaStatus::CancTranbordo,
                None => PlanilhaStatus::Cancelado,
            },
            RecordStatus::Agendado | RecordStatus::Other(_) => {
                return DisplayStatus::Passthrough(self.status.as_str().to_string());
            }
        };

        DisplayStatus::Planilha(planilha)
    }

    pub fn inviabilidade_str(&self) -> Option<&'static str> {
        self.inviabilidade.map(Inviabilidade::as_str)
    }

    pub fn cancel_subtype_str(&self) -> Option<&'static str> {
        self.cancel_subtype.map(CancelSubtype::as_str)
    }
}

impl From<PlanilhaStatus> for StatusTriple {
    fn from(planilha: PlanilhaStatus) -> Self {
        planilha.to_internal()
    }
}

/// Resultado da direção reversa: um valor da planilha ou o status bruto repassado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayStatus {
    Planilha(PlanilhaStatus),
    Passthrough(String),
}

impl DisplayStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DisplayStatus::Planilha(planilha) => planilha.as_str(),
            DisplayStatus::Passthrough(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DisplayStatus::Planilha(planilha) => planilha.label(),
            DisplayStatus::Passthrough(raw) => raw,
        }
    }

    pub fn planilha(&self) -> Option<PlanilhaStatus> {
        match self {
            DisplayStatus::Planilha(planilha) => Some(*planilha),
            DisplayStatus::Passthrough(_) => None,
        }
    }
}

impl Serialize for DisplayStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_planilha_value_survives_the_round_trip() {
        for planilha in PlanilhaStatus::ALL {
            let triple = planilha.to_internal();
            assert_eq!(triple.to_planilha(), DisplayStatus::Planilha(planilha));
        }
    }

    #[test]
    fn mapping_is_stable_when_applied_twice() {
        for planilha in PlanilhaStatus::ALL {
            let first = planilha.to_internal();
            let back = first.to_planilha().planilha().unwrap();
            assert_eq!(back.to_internal(), first);
        }
    }

    #[test]
    fn unknown_planilha_string_falls_back_to_pendente() {
        assert_eq!(StatusTriple::from_planilha_str("TALVEZ"), StatusTriple::pendente());
        assert_eq!(StatusTriple::from_planilha_str(""), StatusTriple::pendente());
        assert_eq!(StatusTriple::from_planilha_str("sim"), StatusTriple::pendente());
    }

    #[test]
    fn known_planilha_string_is_parsed() {
        let triple = StatusTriple::from_planilha_str("INV PORTA");
        assert_eq!(triple.status, RecordStatus::Inviavel);
        assert_eq!(triple.inviabilidade, Some(Inviabilidade::Porta));
        assert_eq!(triple.cancel_subtype, None);
    }

    #[test]
    fn inviavel_without_porta_reads_as_inv_regiao() {
        let triple = StatusTriple::from_columns("INVIAVEL", None, None);
        assert_eq!(triple.to_planilha(), DisplayStatus::Planilha(PlanilhaStatus::InvRegiao));

        let legacy = StatusTriple::from_columns("INVIAVEL", Some("OUTRO"), None);
        assert_eq!(legacy.to_planilha(), DisplayStatus::Planilha(PlanilhaStatus::InvRegiao));
    }

    #[test]
    fn cancelado_subtype_decides_between_the_two_cancel_values() {
        let plain = StatusTriple::from_columns("CANCELADO", None, None);
        assert_eq!(plain.to_planilha(), DisplayStatus::Planilha(PlanilhaStatus::Cancelado));

        let tranbordo = StatusTriple::from_columns("CANCELADO", None, Some("TRANBORDO"));
        assert_eq!(
            tranbordo.to_planilha(),
            DisplayStatus::Planilha(PlanilhaStatus::CancTranbordo)
        );
    }

    #[test]
    fn statuses_without_planilha_value_pass_through() {
        let agendado = StatusTriple::from_columns("AGENDADO", None, None);
        assert_eq!(agendado.to_planilha(), DisplayStatus::Passthrough("AGENDADO".into()));

        let novo = StatusTriple::from_columns("EM_ANALISE", None, None);
        assert_eq!(novo.to_planilha().as_str(), "EM_ANALISE");
        assert_eq!(novo.to_planilha().label(), "EM_ANALISE");
        assert_eq!(novo.to_planilha().planilha(), None);
    }

    #[test]
    fn labels_carry_accents() {
        assert_eq!(PlanilhaStatus::Nao.label(), "NÃO");
        assert_eq!(PlanilhaStatus::InvRegiao.label(), "INV REGIÃO");
        assert_eq!(PlanilhaStatus::CancTranbordo.label(), "CANC TRANBORDO");
    }

    #[test]
    fn serde_uses_the_literal_planilha_strings() {
        let json = serde_json::to_string(&PlanilhaStatus::CancTranbordo).unwrap();
        assert_eq!(json, "\"CANC TRANBORDO\"");

        let parsed: PlanilhaStatus = serde_json::from_str("\"INV REGIAO\"").unwrap();
        assert_eq!(parsed, PlanilhaStatus::InvRegiao);

        assert!(serde_json::from_str::<PlanilhaStatus>("\"INV_REGIAO\"").is_err());
    }

    #[test]
    fn triple_serializes_with_column_values() {
        let value = serde_json::to_value(PlanilhaStatus::InvPorta.to_internal()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "status": "INVIAVEL",
                "inviabilidade": "PORTA",
                "cancelSubtype": null,
            })
        );
    }
}
