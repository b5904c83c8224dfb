//! Baseline-vs-simulated comparison for a single cell.
//!
//! Percentages are always recomputed here from the raw baseline and
//! simulated figures. Any percentage the server attached to the record is
//! kept for reference only.

use serde::{Deserialize, Serialize};

use crate::types::CellId;

/// Energy and throughput figures for one scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Energy in kWh.
    pub energy: f64,
    /// Downlink throughput in Mbps.
    pub throughput: f64,
}

/// An `/api/simulate/{cell_id}` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(default)]
    pub cell_id: Option<CellId>,
    pub baseline: Measurement,
    pub simulated: Measurement,
    #[serde(default)]
    pub energy_saving_pct: Option<f64>,
    #[serde(default)]
    pub throughput_loss_pct: Option<f64>,
}

/// Derived figures for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub energy_saving_pct: f64,
    pub throughput_loss_pct: f64,
    /// Absolute energy saved, never negative.
    pub energy_saved: f64,
    /// Absolute throughput lost, never negative.
    pub throughput_lost: f64,
}

/// Relative reduction from `baseline` to `simulated`, in percent.
///
/// Returns 0 when the baseline is non-positive or not finite, when the
/// simulated value is not finite, or when the simulated value exceeds the
/// baseline. The result is never negative or NaN.
pub fn percent_change(baseline: f64, simulated: f64) -> f64 {
    if !baseline.is_finite() || baseline <= 0.0 || !simulated.is_finite() {
        return 0.0;
    }
    let pct = (baseline - simulated) / baseline * 100.0;
    pct.max(0.0)
}

/// Absolute reduction from `baseline` to `simulated`, floored at zero.
fn reduction(baseline: f64, simulated: f64) -> f64 {
    let diff = baseline - simulated;
    if diff.is_finite() {
        diff.max(0.0)
    } else {
        0.0
    }
}

impl SimulationResult {
    pub fn energy_saving_pct(&self) -> f64 {
        percent_change(self.baseline.energy, self.simulated.energy)
    }

    pub fn throughput_loss_pct(&self) -> f64 {
        percent_change(self.baseline.throughput, self.simulated.throughput)
    }

    pub fn outcome(&self) -> SimulationOutcome {
        SimulationOutcome {
            energy_saving_pct: self.energy_saving_pct(),
            throughput_loss_pct: self.throughput_loss_pct(),
            energy_saved: reduction(self.baseline.energy, self.simulated.energy),
            throughput_lost: reduction(self.baseline.throughput, self.simulated.throughput),
        }
    }
}
