use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::storage::{
    DataMigration, MigrationReport, MigrationStep, ScheduleOwnerMapping, SourceDataset,
    StepOutcome,
};
use crate::supabase::{SupabaseClient, TableStore};
use crate::utils::{Config, ConfigError, Metrics};

#[derive(Debug, Clone, Default, Args)]
pub struct MigrateArgs {
    /// Quelldatensatz (JSON), überschreibt SOURCE_DATA_PATH
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Owner -> User-ID Mapping (JSON), überschreibt SCHEDULE_OWNERS_PATH
    #[arg(long)]
    pub schedule_owners: Option<PathBuf>,

    /// Nur mappen und loggen, nichts schreiben
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics im Prometheus Textformat in diese Datei schreiben
    #[arg(long)]
    pub metrics_out: Option<PathBuf>,
}

/// `migrate`: lade Quelldaten und führe die Migration aus.
///
/// Schritt-Fehler ändern den Exit-Code nicht; nur unbrauchbare Config oder
/// Quelldaten brechen vor dem Start ab.
pub async fn run(config: &Config, args: &MigrateArgs) -> anyhow::Result<()> {
    let source_path = args
        .source
        .clone()
        .unwrap_or_else(|| config.source_data_path.clone());
    let source = SourceDataset::from_path(&source_path)
        .with_context(|| format!("Failed to load source dataset {}", source_path.display()))?;

    tracing::info!(
        path = %source_path.display(),
        sales = source.tickets.sales.len(),
        exchanges = source.tickets.exchanges.len(),
        schedules = source.schedules.len(),
        "Loaded source dataset"
    );

    let owners = match args
        .schedule_owners
        .as_ref()
        .or(config.schedule_owners_path.as_ref())
    {
        Some(path) => ScheduleOwnerMapping::from_path(path)
            .with_context(|| format!("Failed to load owner mapping {}", path.display()))?,
        None => ScheduleOwnerMapping::new(),
    };
    if !owners.is_empty() {
        tracing::info!(owners = owners.len(), "Loaded schedule owner mapping");
    }

    let api_key = match config.service_role_key() {
        Ok(key) => key,
        Err(ConfigError::Missing(name)) if args.dry_run => {
            tracing::warn!("{} not set, dry run only", name);
            ""
        }
        Err(e) => return Err(e.into()),
    };

    let store: Arc<dyn TableStore> = Arc::new(SupabaseClient::new(
        &config.supabase_url,
        api_key,
        config.timeout(),
    )?);
    let metrics = Arc::new(Metrics::new()?);

    let report = execute(store, metrics.clone(), owners, args.dry_run, &source).await;
    log_summary(&report);

    if let Some(path) = &args.metrics_out {
        std::fs::write(path, metrics.encode()?)
            .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Metrics written");
    }

    Ok(())
}

pub async fn execute(
    store: Arc<dyn TableStore>,
    metrics: Arc<Metrics>,
    owners: ScheduleOwnerMapping,
    dry_run: bool,
    source: &SourceDataset,
) -> MigrationReport {
    DataMigration::new(store, metrics)
        .with_owner_mapping(owners)
        .dry_run(dry_run)
        .run(source)
        .await
}

fn log_summary(report: &MigrationReport) {
    for step in MigrationStep::ALL {
        let table = step.table();
        match report.outcome(step) {
            Some(StepOutcome::Inserted { rows }) => {
                tracing::info!(table = %table, rows = *rows, "Step inserted")
            }
            Some(StepOutcome::Skipped { reason }) => {
                tracing::info!(table = %table, reason = %reason, "Step skipped")
            }
            Some(StepOutcome::Failed { error }) => {
                tracing::warn!(table = %table, error = %error, "Step failed")
            }
            None => tracing::warn!(table = %table, "Step did not run"),
        }
    }

    tracing::info!(
        rows = report.rows_inserted(),
        failed = report.failed_steps(),
        duration_ms = (report.finished_at - report.started_at).num_milliseconds(),
        "Migration finished"
    );
}
