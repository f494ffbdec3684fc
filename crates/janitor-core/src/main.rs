//! janitor: cleanup run-cycle orchestrator CLI
//!
//! Drives scheduled run cycles over the configured state database and
//! exposes the administrative opt-in/opt-out surface. Production cleanup
//! units are registered by embedding [`janitor_core::orchestrator::JanitorEngine`]
//! as a library; this binary runs the orchestration and state tooling.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use janitor_core::calendar::SystemCalendar;
use janitor_core::config::JanitorConfig;
use janitor_core::notify::LogNotifier;
use janitor_core::orchestrator::{JanitorEngine, JanitorMonitor};
use janitor_core::store::{open_db, EventSink, ResourceOptStore};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "janitor")]
#[command(about = "Automated cloud-resource cleanup orchestrator")]
#[command(version)]
struct Args {
    /// Path to the janitor configuration file (TOML)
    #[arg(long, env = "JANITOR_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the state database
    #[arg(long, env = "JANITOR_DB", default_value = "janitor.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single cleanup cycle
    Cycle {
        /// Write the cycle summary to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run cycles on a fixed interval until interrupted
    Run {
        /// Seconds between cycle starts
        #[arg(long, default_value = "3600")]
        interval: u64,
    },

    /// Opt a resource back in to cleanup consideration
    OptIn {
        /// Resource id
        resource_id: String,
        /// Resource region (defaults to the configured home region)
        #[arg(long)]
        region: Option<String>,
    },

    /// Exclude a resource from cleanup
    OptOut {
        /// Resource id
        resource_id: String,
        /// Resource region (defaults to the configured home region)
        #[arg(long)]
        region: Option<String>,
    },

    /// List tracked resources
    Resources,

    /// Show recent opt events
    Events {
        /// Maximum number of events to show
        #[arg(long, default_value = "50")]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => JanitorConfig::from_file(path)?,
        None => JanitorConfig::empty(),
    };

    let pool = open_db(&args.db).await?;
    let store = ResourceOptStore::new(pool.clone());
    let events = EventSink::new(pool);

    let mut engine = JanitorEngine::new(
        Vec::new(),
        cfg,
        Box::new(SystemCalendar),
        store.clone(),
        events.clone(),
        Box::new(LogNotifier::new()),
        JanitorMonitor::new(),
    );

    match args.command {
        Command::Cycle { output } => {
            engine.run_cycle().await?;
            if let (Some(path), Some(summary)) = (output, engine.last_summary()) {
                summary.write_json(&path)?;
            }
            let snap = engine.monitor().snapshot();
            info!(runs = snap.runs, errors = snap.errors, "Cycle finished");
        }

        Command::Run { interval } => {
            let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval));
            info!(interval_secs = interval, "Starting scheduled cycles");
            loop {
                ticker.tick().await;
                engine.reload_config()?;
                engine.run_cycle().await?;
                let snap = engine.monitor().snapshot();
                info!(runs = snap.runs, errors = snap.errors, "Cycle finished");
            }
        }

        Command::OptIn {
            resource_id,
            region,
        } => match engine.opt_in_resource(&resource_id, region.as_deref()).await? {
            Some(event) => println!("Recorded {} ({})", event.event_type, event.event_id),
            None => println!("Resource {resource_id} not found"),
        },

        Command::OptOut {
            resource_id,
            region,
        } => match engine
            .opt_out_resource(&resource_id, region.as_deref())
            .await?
        {
            Some(event) => println!("Recorded {} ({})", event.event_type, event.event_id),
            None => println!("Resource {resource_id} not found"),
        },

        Command::Resources => {
            let resources = store.list_resources().await?;
            if resources.is_empty() {
                println!("No tracked resources");
                return Ok(());
            }
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL_CONDENSED)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Resource ID", "Region", "Kind", "Opted Out", "State"]);
            for r in resources {
                table.add_row(vec![
                    r.id.clone(),
                    r.region.clone(),
                    r.kind.to_string(),
                    r.opt_out_of_cleanup.to_string(),
                    r.state.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }

        Command::Events { limit } => {
            let recent = events.recent_events(limit).await?;
            if recent.is_empty() {
                println!("No recorded events");
                return Ok(());
            }
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL_CONDENSED)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Event ID", "Type", "Resource", "Region", "Timestamp"]);
            for e in recent {
                table.add_row(vec![
                    e.event_id.clone(),
                    e.event_type.to_string(),
                    e.resource_id.clone(),
                    e.region.clone(),
                    e.timestamp.to_rfc3339(),
                ]);
            }
            println!("{table}");
        }
    }

    Ok(())
}
