use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::storage::source::{DynamicInfo, ExchangeRequest, SaleRecord};

/// Zieltabellen im Backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Sales,
    Exchanges,
    DynamicInfo,
    Schedules,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Sales => "ventas",
            Table::Exchanges => "cambios",
            Table::DynamicInfo => "info_dinamica",
            Table::Schedules => "horarios",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zeile in `ventas`; die ID vergibt die Datenbank.
///
/// Alle Zielzeilen übernehmen die Quellwerte unverändert, nur umbenannt;
/// fehlende Quellfelder werden nicht gesendet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleRow {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub dia: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub zona: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub precio: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub tel: Value,
}

impl From<&SaleRecord> for SaleRow {
    fn from(sale: &SaleRecord) -> Self {
        Self {
            dia: sale.day.clone(),
            zona: sale.zone.clone(),
            precio: sale.price.clone(),
            tel: sale.phone.clone(),
        }
    }
}

/// Zeile in `cambios`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExchangeRow {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub busca: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub dia_busca: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub ofrece: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub dia_ofrece: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub tel: Value,
}

impl From<&ExchangeRequest> for ExchangeRow {
    fn from(exchange: &ExchangeRequest) -> Self {
        Self {
            busca: exchange.wanted_slot.clone(),
            dia_busca: exchange.wanted_day.clone(),
            ofrece: exchange.offered_slot.clone(),
            dia_ofrece: exchange.offered_day.clone(),
            tel: exchange.phone.clone(),
        }
    }
}

/// Zeile in `info_dinamica` (`admin` heißt dort `admin_nombre`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DynamicInfoRow {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub titulo: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub admin_nombre: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub mensaje: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub reglas: Value,
}

impl From<&DynamicInfo> for DynamicInfoRow {
    fn from(info: &DynamicInfo) -> Self {
        Self {
            titulo: info.title.clone(),
            admin_nombre: info.admin_name.clone(),
            mensaje: info.message.clone(),
            reglas: info.rules.clone(),
        }
    }
}

/// Zeile in `horarios`; braucht die ID eines bereits angelegten Users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleRow {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub slot: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub dia: Value,
    pub usuario_id: Uuid,
}
