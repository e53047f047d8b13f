use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::supabase::error::{ApiErrorBody, RemoteError, Result};
use crate::supabase::models::SelectQuery;

/// Abstraktion über die Tabellen-API, damit die Migration ohne Netzwerk testbar ist
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Lese Zeilen einer Tabelle
    async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Value>>;

    /// Schreibe alle Zeilen in einem einzigen Request; liefert die Anzahl gesendeter Zeilen
    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<usize>;
}

/// Serialisiere typisierte Zeilen und schreibe sie als ein Batch
pub async fn insert_rows<T: Serialize>(
    store: &dyn TableStore,
    table: &str,
    rows: &[T],
) -> Result<usize> {
    let values = rows
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    store.insert(table, values).await
}

/// REST Client für die gehostete Tabellen-API (`/rest/v1/<table>`)
pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl SupabaseClient {
    /// Erstelle neuen Client mit Base URL und API Key (publishable oder service role)
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn build_select(&self, table: &str, query: &SelectQuery) -> Result<reqwest::Request> {
        let request = self
            .client
            .get(self.table_url(table))
            .query(&query.to_params())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .build()?;

        Ok(request)
    }

    fn build_insert(&self, table: &str, rows: &[Value]) -> Result<reqwest::Request> {
        let request = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(rows)
            .build()?;

        Ok(request)
    }

    /// Sende Request; Nicht-2xx Antworten werden zu `RemoteError::Api`
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        let response = self.client.execute(request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(RemoteError::Api {
                status,
                body: ApiErrorBody::parse(&body),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl TableStore for SupabaseClient {
    async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Value>> {
        let request = self.build_select(table, query)?;
        let start = std::time::Instant::now();
        let response = self.execute(request).await?;
        let rows: Vec<Value> = response.json().await?;

        tracing::debug!(
            table = table,
            rows = rows.len(),
            duration_ms = start.elapsed().as_millis(),
            "Select completed"
        );

        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<usize> {
        let request = self.build_insert(table, &rows)?;
        let start = std::time::Instant::now();
        self.execute(request).await?;

        tracing::debug!(
            table = table,
            rows = rows.len(),
            duration_ms = start.elapsed().as_millis(),
            "Insert completed"
        );

        Ok(rows.len())
    }
}
