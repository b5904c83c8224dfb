//! Telemetry records received from the analytics API.
//!
//! Every numeric field is optional: the upstream aggregation emits `null`
//! for cells with no readings in a window, and older rows omit columns
//! entirely. Classifiers treat an absent value as "does not meet the
//! threshold" (see [`crate::severity`]).

use serde::{Deserialize, Serialize};

use crate::types::{lenient_timestamp, CellId, Timestamp};

/// One aggregated telemetry reading for a cell (an `/api/alerts` row).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellMetricSample {
    pub cell_id: CellId,
    /// Mean RSRP in dBm.
    #[serde(default)]
    pub rsrp_mean: Option<f64>,
    /// Mean SNR in dB.
    #[serde(default)]
    pub snr_mean: Option<f64>,
    /// Mean ping latency in milliseconds.
    #[serde(default)]
    pub ping_avg_mean: Option<f64>,
    /// Traffic trend class (0 = down, 1 = flat, 2 = up).
    #[serde(default)]
    pub trend_class: Option<i32>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_seen: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub ts: Option<Timestamp>,
}

impl CellMetricSample {
    /// When the sample was taken: `last_seen`, falling back to `ts`.
    pub fn observed_at(&self) -> Option<Timestamp> {
        self.last_seen.or(self.ts)
    }
}

/// Latest per-cell record used by the map view (an `/api/cells` row).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub cell_id: CellId,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub rsrp_mean: Option<f64>,
    #[serde(default)]
    pub snr_mean: Option<f64>,
    #[serde(default)]
    pub dl_mbps_mean: Option<f64>,
    #[serde(default)]
    pub ul_mbps_mean: Option<f64>,
    /// Energy drawn over the aggregation window, in kWh.
    #[serde(default)]
    pub energy_kwh: Option<f64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub ts: Option<Timestamp>,
}

impl CellSnapshot {
    /// Both coordinates, when the cell can be placed on a map.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}
