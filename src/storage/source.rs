//! Quelldatensatz der Migration: Verkäufe, Tauschanfragen, Dienstpläne und die
//! "Info Dinámica". Wird einmal aus einer JSON-Datei geladen und danach nur gelesen.
//!
//! Die Felder akzeptieren die alten spanischen Schlüssel (`dia`, `zona`, ...)
//! ebenso wie englische Schlüssel. Werte werden nicht typgeprüft: jedes Feld ist
//! ein beliebiger JSON-Wert und fehlt es, bleibt es `null`.

use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Verkauf eines Tickets
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SaleRecord {
    #[serde(default, alias = "dia")]
    pub day: Value,
    #[serde(default, alias = "zona")]
    pub zone: Value,
    /// Preis unverändert übernommen (Ganzzahlen bleiben Ganzzahlen)
    #[serde(default, alias = "precio")]
    pub price: Value,
    #[serde(default, alias = "tel")]
    pub phone: Value,
}

/// Tauschanfrage: gesuchter gegen angebotenen Termin
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ExchangeRequest {
    #[serde(default, rename = "wantedSlot", alias = "busca")]
    pub wanted_slot: Value,
    #[serde(default, rename = "wantedDay", alias = "dia_busca")]
    pub wanted_day: Value,
    #[serde(default, rename = "offeredSlot", alias = "ofrece")]
    pub offered_slot: Value,
    #[serde(default, rename = "offeredDay", alias = "dia_ofrece")]
    pub offered_day: Value,
    #[serde(default, alias = "tel")]
    pub phone: Value,
}

/// Singleton mit den seitenweiten Anzeigetexten; `rules` ist Freitext oder Liste
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DynamicInfo {
    #[serde(default, alias = "titulo")]
    pub title: Value,
    #[serde(default, rename = "adminName", alias = "admin")]
    pub admin_name: Value,
    #[serde(default, alias = "mensaje")]
    pub message: Value,
    #[serde(default, alias = "reglas")]
    pub rules: Value,
}

/// Dienstplan-Eintrag; `owner` ist der alte Besitzername, keine Identity.
/// Einträge ohne Besitzer sind erlaubt und bleiben offen.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ScheduleAssignment {
    #[serde(default, alias = "turno")]
    pub slot: Value,
    #[serde(default, alias = "dia")]
    pub day: Value,
    #[serde(default, alias = "nombre", alias = "ownerUserId")]
    pub owner: Value,
}

impl ScheduleAssignment {
    /// Besitzername als Text; Zahlen werden als Text gelesen
    pub fn owner_name(&self) -> Option<String> {
        match &self.owner {
            Value::String(name) if !name.trim().is_empty() => Some(name.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Tickets {
    #[serde(default, alias = "ventas")]
    pub sales: Vec<SaleRecord>,
    #[serde(default, alias = "cambios")]
    pub exchanges: Vec<ExchangeRequest>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SourceDataset {
    #[serde(alias = "boletos")]
    pub tickets: Tickets,
    #[serde(default, alias = "horarios")]
    pub schedules: Vec<ScheduleAssignment>,
    #[serde(rename = "dynamicInfo", alias = "infoDinamica", alias = "info_dinamica")]
    pub dynamic_info: DynamicInfo,
}

impl SourceDataset {
    /// Lade Datensatz aus JSON-Datei
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| SourceError::Json {
            path: path.display().to_string(),
            source,
        })
    }
}
