use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use harvest_notifier::{
    Config, DiscordWebhookTransport, DispatchOutcome, ErrorContext, NotificationDispatcher, Report,
    ReportId,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Send harvest and unwrap batch reports to chat webhooks.
///
/// Endpoints, role pings and chain metadata come from the environment.
#[derive(Parser, Debug)]
#[command(name = "harvest-notifier", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Notify the report channel about a finished run
    Report {
        /// Report JSON file
        path: PathBuf,

        /// Stored report id, used for the "Full report" link
        id: Option<u64>,
    },

    /// Send an error alert to the alert channel
    Alert {
        /// What was being done when the error happened
        doing: String,

        /// Error message
        message: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    if let Err(e) = run(cli.command).await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let config = Config::from_env().context("Configuration error")?;
    let dispatcher =
        NotificationDispatcher::new(Arc::new(DiscordWebhookTransport::default()), config);

    let outcome = match command {
        Commands::Report { path, id } => {
            let report = Report::from_json_file(&path)
                .with_context(|| format!("Failed to load report {}", path.display()))?;
            dispatcher.notify_report(&report, id.map(ReportId::new)).await?
        }
        Commands::Alert { doing, message } => {
            let error = anyhow!(message);
            dispatcher
                .notify_error(&ErrorContext::new(doing, serde_json::Value::Null), &*error)
                .await
        }
    };

    match outcome {
        DispatchOutcome::Sent { level } => tracing::info!(level = %level, "Done"),
        DispatchOutcome::Skipped(reason) => tracing::info!(reason = ?reason, "Nothing sent"),
        // already logged by the dispatcher; delivery problems do not fail the run
        DispatchOutcome::Failed { .. } => {}
    }
    Ok(())
}
