use serde::Deserialize;
use std::fmt;

/// Fehler eines Aufrufs gegen die REST Tabellen-API
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request failed with status {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: ApiErrorBody,
    },
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RemoteError>;

/// Fehler-Body wie ihn der Service bei Nicht-2xx Antworten liefert
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl ApiErrorBody {
    /// Parse den Response-Body; kein JSON oder keine `message` -> Rohtext als Message
    pub fn parse(body: &str) -> Self {
        let raw = body.trim();
        let mut parsed: Self = serde_json::from_str(raw).unwrap_or_default();
        if parsed.message.trim().is_empty() {
            parsed.message = raw.to_string();
        }
        parsed
    }
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str("<empty body>")?;
        } else {
            f.write_str(&self.message)?;
        }
        if let Some(code) = &self.code {
            write!(f, " (code {})", code)?;
        }
        if let Some(details) = &self.details {
            write!(f, ", details: {}", details)?;
        }
        if let Some(hint) = &self.hint {
            write!(f, ", hint: {}", hint)?;
        }
        Ok(())
    }
}
