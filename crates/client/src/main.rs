//! `netenergy-report` -- prints a derived dashboard snapshot as JSON.
//!
//! Logs in (when credentials are configured), fetches the overview
//! endpoints concurrently, and writes the classified snapshot to stdout.
//! With `--cell`, also includes that cell's simulation outcome and policy
//! action timeline.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                 | Description                   |
//! |------------------------|----------|-------------------------|-------------------------------|
//! | `API_BASE`             | no       | `http://localhost:8000` | Analytics API base URL        |
//! | `REQUEST_TIMEOUT_SECS` | no       | `30`                    | Per-request timeout           |
//! | `API_USERNAME`         | no       | --                      | Login user (with password)    |
//! | `API_PASSWORD`         | no       | --                      | Login password                |
//! | `API_TOKEN`            | no       | --                      | Pre-issued bearer token       |

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use netenergy_client::api::DashboardApi;
use netenergy_client::config::ClientConfig;
use netenergy_client::snapshot::{DashboardSnapshot, SimulationView};
use netenergy_client::token::MemoryTokenStore;
use netenergy_core::policy::PolicyTimelinePoint;

/// Print a derived dashboard snapshot from the analytics API.
#[derive(Parser, Debug)]
#[command(name = "netenergy-report", version, about)]
struct Cli {
    /// Also report the what-if simulation and action timeline for this cell.
    #[arg(long, env = "REPORT_CELL_ID")]
    cell: Option<String>,
}

#[derive(Serialize)]
struct CellReport {
    simulation: SimulationView,
    timeline: Vec<PolicyTimelinePoint>,
}

#[derive(Serialize)]
struct Report {
    snapshot: DashboardSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    cell: Option<CellReport>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netenergy_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env().context("Failed to load client configuration")?;
    tracing::info!(base_url = %config.base_url, "Loaded client configuration");

    let api = DashboardApi::new(&config, Arc::new(MemoryTokenStore::new()))
        .context("Failed to build API client")?;

    if let Some(creds) = &config.credentials {
        api.login(&creds.username, &creds.password)
            .await
            .context("Login failed")?;
    }

    let snapshot = DashboardSnapshot::load(&api)
        .await
        .context("Failed to load dashboard snapshot")?;

    let cell = match cli.cell.as_deref() {
        Some(cell_id) => {
            let (simulation, timeline) = tokio::try_join!(
                SimulationView::load(&api, cell_id),
                api.fetch_policy_timeline(cell_id),
            )
            .with_context(|| format!("Failed to load details for cell {cell_id}"))?;
            Some(CellReport {
                simulation,
                timeline,
            })
        }
        None => None,
    };

    let report = Report { snapshot, cell };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
