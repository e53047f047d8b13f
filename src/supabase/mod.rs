pub mod client;
pub mod error;
pub mod models;

pub use client::{insert_rows, SupabaseClient, TableStore};
pub use models::SelectQuery;

#[cfg(test)]
pub use client::MockTableStore;
#[cfg(test)]
pub use error::{ApiErrorBody, RemoteError};
