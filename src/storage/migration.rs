//! Einmalige Datenmigration: Quelldatensatz -> Tabellen des Backends.
//!
//! Vier Schritte in fester Reihenfolge, strikt sequentiell:
//!
//! 1. `ventas`: alle Verkäufe als ein Batch
//! 2. `cambios`: alle Tauschanfragen als ein Batch
//! 3. `info_dinamica`: das Singleton als Batch mit einem Element
//! 4. `horarios`: wird nie geschrieben (User-IDs fehlen), nur geplant und geloggt
//!
//! Jeder Schritt ist unabhängig. Fehler werden geloggt und nicht weitergereicht;
//! es gibt keine Transaktion über oder innerhalb der Schritte.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::storage::models::{DynamicInfoRow, ExchangeRow, SaleRow, Table};
use crate::storage::schedules::{plan_schedules, ScheduleOwnerMapping};
use crate::storage::source::{
    DynamicInfo, ExchangeRequest, SaleRecord, ScheduleAssignment, SourceDataset,
};
use crate::supabase::{insert_rows, TableStore};
use crate::utils::Metrics;

pub const SCHEDULE_SKIP_NOTICE: &str = "Skipping schedules migration. Schedules need a usuario_id: \
create the users first, then assign schedules manually or provide an owner mapping";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStep {
    Sales,
    Exchanges,
    DynamicInfo,
    Schedules,
}

impl MigrationStep {
    /// Reihenfolge der Ausführung
    pub const ALL: [MigrationStep; 4] = [
        MigrationStep::Sales,
        MigrationStep::Exchanges,
        MigrationStep::DynamicInfo,
        MigrationStep::Schedules,
    ];

    pub fn table(&self) -> Table {
        match self {
            MigrationStep::Sales => Table::Sales,
            MigrationStep::Exchanges => Table::Exchanges,
            MigrationStep::DynamicInfo => Table::DynamicInfo,
            MigrationStep::Schedules => Table::Schedules,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Inserted { rows: usize },
    Failed { error: String },
    Skipped { reason: String },
}

#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: MigrationStep,
    pub outcome: StepOutcome,
}

/// Beobachtung eines Laufs, nur für Logs, Metrics und Tests. Kein Exit-Code.
#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub steps: Vec<StepReport>,
}

impl MigrationReport {
    pub fn outcome(&self, step: MigrationStep) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|report| report.step == step)
            .map(|report| &report.outcome)
    }

    pub fn rows_inserted(&self) -> usize {
        self.steps
            .iter()
            .map(|report| match report.outcome {
                StepOutcome::Inserted { rows } => rows,
                _ => 0,
            })
            .sum()
    }

    pub fn failed_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|report| matches!(report.outcome, StepOutcome::Failed { .. }))
            .count()
    }
}

pub struct DataMigration {
    store: Arc<dyn TableStore>,
    metrics: Arc<Metrics>,
    owners: ScheduleOwnerMapping,
    dry_run: bool,
}

impl DataMigration {
    pub fn new(store: Arc<dyn TableStore>, metrics: Arc<Metrics>) -> Self {
        Self {
            store,
            metrics,
            owners: ScheduleOwnerMapping::default(),
            dry_run: false,
        }
    }

    pub fn with_owner_mapping(mut self, owners: ScheduleOwnerMapping) -> Self {
        self.owners = owners;
        self
    }

    /// Mapping ausführen und loggen, aber nichts senden
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Führe alle vier Schritte nacheinander aus
    pub async fn run(&self, source: &SourceDataset) -> MigrationReport {
        tracing::info!(dry_run = self.dry_run, "Starting migration...");
        let started_at = Utc::now();

        let steps = vec![
            self.migrate_sales(&source.tickets.sales).await,
            self.migrate_exchanges(&source.tickets.exchanges).await,
            self.migrate_dynamic_info(&source.dynamic_info).await,
            self.skip_schedules(&source.schedules),
        ];

        let report = MigrationReport {
            started_at,
            finished_at: Utc::now(),
            steps,
        };

        tracing::info!(
            rows_inserted = report.rows_inserted(),
            failed_steps = report.failed_steps(),
            duration_ms = (report.finished_at - report.started_at).num_milliseconds(),
            "Migration finished"
        );

        report
    }

    /// Schritt 1: Verkäufe
    pub async fn migrate_sales(&self, sales: &[SaleRecord]) -> StepReport {
        tracing::info!("Migrating ventas...");
        let rows: Vec<SaleRow> = sales.iter().map(SaleRow::from).collect();
        self.insert_batch(MigrationStep::Sales, &rows).await
    }

    /// Schritt 2: Tauschanfragen
    pub async fn migrate_exchanges(&self, exchanges: &[ExchangeRequest]) -> StepReport {
        tracing::info!("Migrating cambios...");
        let rows: Vec<ExchangeRow> = exchanges.iter().map(ExchangeRow::from).collect();
        self.insert_batch(MigrationStep::Exchanges, &rows).await
    }

    /// Schritt 3: Info Dinámica, ohne Existenzprüfung
    pub async fn migrate_dynamic_info(&self, info: &DynamicInfo) -> StepReport {
        tracing::info!("Migrating info...");
        let rows = [DynamicInfoRow::from(info)];
        self.insert_batch(MigrationStep::DynamicInfo, &rows).await
    }

    /// Schritt 4: Dienstpläne werden nie geschrieben
    pub fn skip_schedules(&self, assignments: &[ScheduleAssignment]) -> StepReport {
        let step = MigrationStep::Schedules;
        let plan = plan_schedules(assignments, &self.owners);

        tracing::info!(
            table = %step.table(),
            assignments = assignments.len(),
            resolvable = plan.resolved.len(),
            pending = plan.pending.len(),
            unassigned = plan.unassigned(),
            "{}",
            SCHEDULE_SKIP_NOTICE
        );

        if !plan.pending.is_empty() {
            tracing::warn!(
                owners = ?plan.pending_owners(),
                "Schedule owners without a provisioned identity"
            );
        }

        self.metrics.record_skipped(step.table().as_str());

        StepReport {
            step,
            outcome: StepOutcome::Skipped {
                reason: SCHEDULE_SKIP_NOTICE.to_string(),
            },
        }
    }

    async fn insert_batch<T: Serialize + Sync>(
        &self,
        step: MigrationStep,
        rows: &[T],
    ) -> StepReport {
        let table = step.table();

        if self.dry_run {
            match serde_json::to_string(rows) {
                Ok(payload) => tracing::info!(
                    table = %table,
                    rows = rows.len(),
                    payload = %payload,
                    "Dry run, not writing"
                ),
                Err(e) => {
                    tracing::warn!(table = %table, error = %e, "Dry run, rows not serializable")
                }
            }
            self.metrics.record_skipped(table.as_str());

            return StepReport {
                step,
                outcome: StepOutcome::Skipped {
                    reason: format!("dry run: {} rows not written", rows.len()),
                },
            };
        }

        let start = Instant::now();
        let outcome = match insert_rows(self.store.as_ref(), table.as_str(), rows).await {
            Ok(count) => {
                self.metrics
                    .record_inserted(table.as_str(), count, start.elapsed().as_secs_f64());
                tracing::info!(table = %table, rows = count, "Migrated {} {}", count, table);
                StepOutcome::Inserted { rows: count }
            }
            Err(e) => {
                self.metrics
                    .record_failure(table.as_str(), start.elapsed().as_secs_f64());
                tracing::error!(
                    table = %table,
                    operation = "insert",
                    error = %e,
                    "Error migrating {}",
                    table
                );
                StepOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        StepReport { step, outcome }
    }
}
