use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Prometheus Metrics eines Migrationslaufs: geschriebene Zeilen, Fehler, Latenz
pub struct Metrics {
    pub registry: Registry,
    pub rows_inserted: IntCounterVec,
    pub step_failures: IntCounterVec,
    pub steps_skipped: IntCounterVec,
    pub insert_latency: HistogramVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let rows_inserted = IntCounterVec::new(
            Opts::new("migration_rows_inserted_total", "Rows accepted by the backend"),
            &["table"],
        )?;

        let step_failures = IntCounterVec::new(
            Opts::new("migration_step_failures_total", "Failed migration steps"),
            &["table"],
        )?;

        let steps_skipped = IntCounterVec::new(
            Opts::new("migration_steps_skipped_total", "Migration steps without a write"),
            &["table"],
        )?;

        let insert_latency = HistogramVec::new(
            HistogramOpts::new(
                "migration_insert_latency_seconds",
                "Batched insert round-trip latency in seconds",
            ),
            &["table"],
        )?;

        registry.register(Box::new(rows_inserted.clone()))?;
        registry.register(Box::new(step_failures.clone()))?;
        registry.register(Box::new(steps_skipped.clone()))?;
        registry.register(Box::new(insert_latency.clone()))?;

        Ok(Self {
            registry,
            rows_inserted,
            step_failures,
            steps_skipped,
            insert_latency,
        })
    }

    pub fn record_inserted(&self, table: &str, rows: usize, seconds: f64) {
        self.rows_inserted
            .with_label_values(&[table])
            .inc_by(rows as u64);
        self.insert_latency
            .with_label_values(&[table])
            .observe(seconds);
    }

    pub fn record_failure(&self, table: &str, seconds: f64) {
        self.step_failures.with_label_values(&[table]).inc();
        self.insert_latency
            .with_label_values(&[table])
            .observe(seconds);
    }

    pub fn record_skipped(&self, table: &str) {
        self.steps_skipped.with_label_values(&[table]).inc();
    }

    /// Text-Exposition Format für `--metrics-out`
    pub fn encode(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
