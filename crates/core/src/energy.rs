//! Annualized energy-saving summary across all cells.
//!
//! The inputs are raw totals over an observation window; the summary
//! scales them to a year and converts the saving into money, CO2 and a
//! tree-equivalent figure.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::simulation::percent_change;

pub const DEFAULT_PRICE_PER_KWH: f64 = 5.00;
pub const DEFAULT_CO2_TON_PER_KWH: f64 = 0.00042;
pub const DEFAULT_TREE_FACTOR: f64 = 23.0;
pub const DEFAULT_OBSERVED_DAYS: f64 = 75.0;

const DAYS_PER_YEAR: f64 = 365.0;

/// Conversion factors for [`summarize_energy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyParams {
    /// Tariff per kWh, in local currency.
    pub price_per_kwh: f64,
    /// Tonnes of CO2 emitted per kWh.
    pub co2_ton_per_kwh: f64,
    /// Trees per tonne of CO2 absorbed.
    pub tree_factor: f64,
    /// Length of the observation window the totals cover.
    pub observed_days: f64,
}

impl Default for EnergyParams {
    fn default() -> Self {
        Self {
            price_per_kwh: DEFAULT_PRICE_PER_KWH,
            co2_ton_per_kwh: DEFAULT_CO2_TON_PER_KWH,
            tree_factor: DEFAULT_TREE_FACTOR,
            observed_days: DEFAULT_OBSERVED_DAYS,
        }
    }
}

impl EnergyParams {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.observed_days.is_finite() && self.observed_days > 0.0) {
            return Err(CoreError::Validation(format!(
                "observed_days must be positive, got {}",
                self.observed_days
            )));
        }
        for (name, value) in [
            ("price_per_kwh", self.price_per_kwh),
            ("co2_ton_per_kwh", self.co2_ton_per_kwh),
            ("tree_factor", self.tree_factor),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CoreError::Validation(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Raw totals over the observation window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyTotals {
    pub total_cells: u64,
    /// Energy actually drawn, in kWh.
    pub total_energy_kwh: f64,
    /// Energy the cells would have drawn without optimization, in kWh.
    pub total_baseline_kwh: f64,
}

/// Annualized summary (also the `/api/cell_energy_summary` response shape).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergySummary {
    #[serde(default)]
    pub total_cells: u64,
    #[serde(default)]
    pub saved_kwh: f64,
    /// `None` when the server had no baseline to divide by.
    #[serde(default)]
    pub saved_pct: Option<f64>,
    #[serde(default)]
    pub co2_ton_saved: f64,
    #[serde(default, alias = "saved_tl")]
    pub saved_money: f64,
    #[serde(default)]
    pub tree_equivalent: f64,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Scale window totals to a year and derive the saving figures.
pub fn summarize_energy(
    totals: &EnergyTotals,
    params: &EnergyParams,
) -> Result<EnergySummary, CoreError> {
    params.validate()?;

    let scale = DAYS_PER_YEAR / params.observed_days;
    let energy_year = non_negative(totals.total_energy_kwh) * scale;
    let baseline_year = non_negative(totals.total_baseline_kwh) * scale;

    let saved_kwh = non_negative(baseline_year - energy_year);
    let saved_pct = (baseline_year > 0.0).then(|| percent_change(baseline_year, energy_year));
    let co2_ton_saved = saved_kwh * params.co2_ton_per_kwh;

    Ok(EnergySummary {
        total_cells: totals.total_cells,
        saved_kwh: round_to(saved_kwh, 2),
        saved_pct: saved_pct.map(|p| round_to(p, 2)),
        co2_ton_saved: round_to(co2_ton_saved, 3),
        saved_money: round_to(saved_kwh * params.price_per_kwh, 2),
        tree_equivalent: (co2_ton_saved * params.tree_factor).round(),
    })
}
