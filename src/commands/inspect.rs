use clap::Args;
use serde_json::Value;
use std::io::Write;

use crate::storage::Table;
use crate::supabase::{SelectQuery, TableStore};

#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// Tabelle
    #[arg(long, default_value = "cambios")]
    pub table: String,

    /// Spaltenliste, z.B. `dia,tel` (Standard: alle)
    #[arg(long)]
    pub columns: Option<String>,

    /// Sortierspalte
    #[arg(long, default_value = "created_at")]
    pub order_by: String,

    /// Aufsteigend statt absteigend sortieren
    #[arg(long)]
    pub ascending: bool,

    /// Ohne Sortierung abfragen
    #[arg(long, conflicts_with_all = ["order_by", "ascending"])]
    pub unordered: bool,

    #[arg(long)]
    pub limit: Option<usize>,

    /// Nur die Spaltennamen der ersten Zeile ausgeben
    #[arg(long)]
    pub keys_only: bool,
}

impl InspectArgs {
    pub fn query(&self) -> SelectQuery {
        let mut query = SelectQuery::all();
        if let Some(columns) = &self.columns {
            query = query.columns(columns);
        }
        if !self.unordered {
            query = query.order_by(&self.order_by, self.ascending);
        }
        if let Some(limit) = self.limit {
            query = query.limit(limit);
        }
        query
    }
}

/// `verify`: 3 Tickets aus `ventas` lesen und als JSON ausgeben
pub async fn verify(store: &dyn TableStore, out: &mut impl Write) -> anyhow::Result<()> {
    let table = Table::Sales;
    tracing::info!(table = %table, "Fetching 3 tickets from \"{}\"...", table);

    match store.select(table.as_str(), &SelectQuery::all().limit(3)).await {
        Ok(rows) => {
            tracing::info!(table = %table, rows = rows.len(), "Successfully fetched data");
            writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
        }
        Err(e) => tracing::error!(table = %table, error = %e, "Error fetching data"),
    }

    Ok(())
}

/// `inspect`: beliebige Tabelle lesen und Anzahl plus erste Zeile ausgeben
pub async fn inspect(
    store: &dyn TableStore,
    args: &InspectArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    tracing::info!(table = %args.table, "Attempting to fetch {}...", args.table);

    match store.select(&args.table, &args.query()).await {
        Ok(rows) => {
            tracing::info!(table = %args.table, rows = rows.len(), "Fetch success");
            writeln!(out, "{}", describe_rows(&rows, args.keys_only)?)?;
        }
        Err(e) => tracing::error!(table = %args.table, error = %e, "Fetch error"),
    }

    Ok(())
}

pub fn describe_rows(rows: &[Value], keys_only: bool) -> serde_json::Result<String> {
    let mut text = format!("Data length: {}", rows.len());

    match rows.first() {
        Some(Value::Object(first)) if keys_only => {
            let keys: Vec<&str> = first.keys().map(String::as_str).collect();
            text.push_str(&format!("\nFirst item keys: {}", keys.join(", ")));
        }
        Some(first) if !keys_only => {
            text.push_str(&format!(
                "\nFirst item: {}",
                serde_json::to_string_pretty(first)?
            ));
        }
        _ => {}
    }

    Ok(text)
}
