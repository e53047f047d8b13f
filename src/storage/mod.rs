pub mod migration;
pub mod models;
pub mod schedules;
pub mod source;

pub use migration::{DataMigration, MigrationReport, MigrationStep, StepOutcome};
pub use models::Table;
pub use schedules::ScheduleOwnerMapping;
pub use source::SourceDataset;
