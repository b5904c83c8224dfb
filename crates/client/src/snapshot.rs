//! Dashboard view models assembled from API records.
//!
//! [`DashboardSnapshot::load`] fetches the independent endpoints
//! concurrently and runs every record through the `netenergy_core`
//! classifiers, so the display layer only renders plain values.

use serde::Serialize;

use netenergy_core::energy::EnergySummary;
use netenergy_core::marker::MarkerStyle;
use netenergy_core::policy::{Action, ActionCount, ActionTally, PolicyDecision};
use netenergy_core::severity::{classify_severity, sort_alerts, Severity};
use netenergy_core::signal::ClassLabel;
use netenergy_core::simulation::{SimulationOutcome, SimulationResult};
use netenergy_core::status::{status_for_action, CellState, CellStatus, StatusTally};
use netenergy_core::telemetry::{CellMetricSample, CellSnapshot};
use netenergy_core::types::{CellId, Timestamp};

use crate::api::DashboardApi;
use crate::error::ClientResult;

/// One row of the alerts panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertView {
    pub cell_id: CellId,
    pub severity: Severity,
    pub rsrp_mean: Option<f64>,
    pub snr_mean: Option<f64>,
    pub ping_avg_mean: Option<f64>,
    pub observed_at: Option<Timestamp>,
}

impl AlertView {
    pub fn from_sample(sample: &CellMetricSample) -> Self {
        Self {
            cell_id: sample.cell_id.clone(),
            severity: classify_severity(sample),
            rsrp_mean: sample.rsrp_mean,
            snr_mean: sample.snr_mean,
            ping_avg_mean: sample.ping_avg_mean,
            observed_at: sample.observed_at(),
        }
    }
}

/// Sort samples most severe first and classify each.
pub fn build_alert_views(mut samples: Vec<CellMetricSample>) -> Vec<AlertView> {
    sort_alerts(&mut samples);
    samples.iter().map(AlertView::from_sample).collect()
}

/// Number of alerts per severity tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn from_alerts(alerts: &[AlertView]) -> Self {
        alerts.iter().fold(Self::default(), |mut acc, a| {
            match a.severity {
                Severity::Critical => acc.critical += 1,
                Severity::Medium => acc.medium += 1,
                Severity::Low => acc.low += 1,
            }
            acc
        })
    }
}

/// One row of the latest-policy-actions table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionView {
    pub cell_id: CellId,
    pub action: Action,
    pub class_label: ClassLabel,
    /// The state the cell enters once the action is applied.
    pub resulting_status: CellState,
    pub decided_at: Option<Timestamp>,
    pub reason: Option<String>,
}

impl ActionView {
    pub fn from_decision(decision: &PolicyDecision) -> Self {
        Self {
            cell_id: decision.cell_id.clone(),
            action: decision.action.clone(),
            class_label: decision.class_label.clone(),
            resulting_status: status_for_action(&decision.action),
            decided_at: decision.decided_at(),
            reason: decision.reason.as_ref().map(|r| r.decoded()),
        }
    }
}

/// A placeable map marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub cell_id: CellId,
    pub latitude: f64,
    pub longitude: f64,
    pub style: MarkerStyle,
}

/// Markers for every cell with coordinates; `selected` highlights one cell.
pub fn build_markers(cells: &[CellSnapshot], selected: Option<&str>) -> Vec<MapMarker> {
    cells
        .iter()
        .filter_map(|cell| {
            let (latitude, longitude) = cell.position()?;
            let is_selected = selected == Some(cell.cell_id.as_str());
            Some(MapMarker {
                cell_id: cell.cell_id.clone(),
                latitude,
                longitude,
                style: MarkerStyle::for_cell(cell, is_selected),
            })
        })
        .collect()
}

/// Simulation figures for one cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationView {
    pub cell_id: CellId,
    pub outcome: SimulationOutcome,
}

impl SimulationView {
    pub fn new(cell_id: &str, result: &SimulationResult) -> Self {
        Self {
            cell_id: result.cell_id.clone().unwrap_or_else(|| cell_id.to_string()),
            outcome: result.outcome(),
        }
    }

    pub async fn load(api: &DashboardApi, cell_id: &str) -> ClientResult<Self> {
        let result = api.fetch_simulation(cell_id).await?;
        Ok(Self::new(cell_id, &result))
    }
}

/// Everything the overview page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub user: String,
    pub alerts: Vec<AlertView>,
    pub severity_counts: SeverityCounts,
    pub status_tally: StatusTally,
    pub statuses: Vec<CellStatus>,
    pub latest_actions: Vec<ActionView>,
    /// Action distribution over the reporting window.
    pub action_tally: ActionTally,
    pub markers: Vec<MapMarker>,
    pub energy: EnergySummary,
}

impl DashboardSnapshot {
    /// Assemble a snapshot from already-fetched records.
    pub fn assemble(
        user: String,
        alerts: Vec<CellMetricSample>,
        statuses: Vec<CellStatus>,
        decisions: &[PolicyDecision],
        action_counts: &[ActionCount],
        cells: &[CellSnapshot],
        energy: EnergySummary,
    ) -> Self {
        let alerts = build_alert_views(alerts);
        Self {
            user,
            severity_counts: SeverityCounts::from_alerts(&alerts),
            alerts,
            status_tally: StatusTally::from_statuses(&statuses),
            statuses,
            latest_actions: decisions.iter().map(ActionView::from_decision).collect(),
            action_tally: ActionTally::from_counts(action_counts),
            markers: build_markers(cells, None),
            energy,
        }
    }

    /// Fetch all overview endpoints concurrently and assemble a snapshot.
    pub async fn load(api: &DashboardApi) -> ClientResult<Self> {
        let (alerts, statuses, decisions, action_counts, cells, energy) = tokio::try_join!(
            api.fetch_alerts(),
            api.fetch_cell_status(),
            api.fetch_latest_policy_actions(),
            api.fetch_policy_summary(),
            api.fetch_cells(),
            api.fetch_energy_summary(),
        )?;

        let snapshot = Self::assemble(
            api.tokens().display_name(),
            alerts,
            statuses,
            &decisions,
            &action_counts,
            &cells,
            energy,
        );
        tracing::info!(
            alerts = snapshot.alerts.len(),
            critical = snapshot.severity_counts.critical,
            cells = snapshot.status_tally.total(),
            actions = snapshot.latest_actions.len(),
            decisions = snapshot.action_tally.total(),
            "Dashboard snapshot loaded",
        );
        Ok(snapshot)
    }
}
