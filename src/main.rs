mod commands;
mod storage;
mod supabase;
mod utils;

#[cfg(test)]
mod tests;

use clap::{Parser, Subcommand};

use commands::{InspectArgs, MigrateArgs};
use supabase::SupabaseClient;

/// Migriert und prüft die Tabellen der SafeTicket Tauschbörse
#[derive(Debug, Parser)]
#[command(name = "safeticket-sync", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Quelldatensatz in die Tabellen ventas, cambios und info_dinamica schreiben
    Migrate(MigrateArgs),
    /// 3 Tickets aus ventas lesen
    Verify,
    /// Eine Tabelle lesen und die erste Zeile zeigen
    Inspect(InspectArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    utils::init_logging();

    let cli = Cli::parse();
    let config = utils::Config::load()?;

    tracing::info!(
        url = %config.supabase_url,
        "Starting safeticket-sync v{}",
        env!("CARGO_PKG_VERSION")
    );

    match cli
        .command
        .unwrap_or_else(|| Command::Migrate(MigrateArgs::default()))
    {
        Command::Migrate(args) => commands::migrate::run(&config, &args).await?,
        Command::Verify => {
            let client = read_client(&config)?;
            commands::inspect::verify(&client, &mut std::io::stdout()).await?
        }
        Command::Inspect(args) => {
            let client = read_client(&config)?;
            commands::inspect::inspect(&client, &args, &mut std::io::stdout()).await?
        }
    }

    Ok(())
}

/// Client mit dem Lese-Key für verify / inspect
fn read_client(config: &utils::Config) -> anyhow::Result<SupabaseClient> {
    Ok(SupabaseClient::new(
        &config.supabase_url,
        config.read_key()?,
        config.timeout(),
    )?)
}
