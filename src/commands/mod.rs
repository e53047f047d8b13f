pub mod inspect;
pub mod migrate;

pub use inspect::InspectArgs;
pub use migrate::MigrateArgs;
