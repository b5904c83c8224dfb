//! Map-marker styling for cells.

use serde::Serialize;

use crate::signal::{classify_signal_band, SignalBand};
use crate::telemetry::CellSnapshot;
use crate::threshold::is_below;

/// Energy draw (kWh per window) below which a cell is flagged low-energy.
pub const LOW_ENERGY_KWH: f64 = 10.0;

/// Everything the map renderer needs to draw one marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerStyle {
    /// `None` when the cell has no usable RSRP reading.
    pub band: Option<SignalBand>,
    pub low_energy: bool,
    pub selected: bool,
}

impl MarkerStyle {
    pub fn for_cell(cell: &CellSnapshot, selected: bool) -> Self {
        let band = cell
            .rsrp_mean
            .filter(|v| v.is_finite())
            .map(classify_signal_band);
        Self {
            band,
            low_energy: is_below(cell.energy_kwh, LOW_ENERGY_KWH),
            selected,
        }
    }
}
