//! Alert severity classification for cell telemetry.
//!
//! A sample is graded into one of three tiers. Tiers are checked from most
//! to least severe and the first match wins; within a tier any single
//! reading crossing its limit is enough.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::telemetry::CellMetricSample;
use crate::threshold::{is_above, is_below};
use crate::trend::TrendLabel;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// RSRP (dBm) below which a cell is critical.
pub const CRITICAL_RSRP_DBM: f64 = -110.0;
/// SNR (dB) below which a cell is critical.
pub const CRITICAL_SNR_DB: f64 = 3.0;
/// Ping (ms) above which a cell is critical.
pub const CRITICAL_PING_MS: f64 = 150.0;

/// RSRP (dBm) below which a cell needs attention.
pub const MEDIUM_RSRP_DBM: f64 = -100.0;
/// SNR (dB) below which a cell needs attention.
pub const MEDIUM_SNR_DB: f64 = 5.0;
/// Ping (ms) above which a cell needs attention.
pub const MEDIUM_PING_MS: f64 = 100.0;

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Derived alert urgency tier. Ordered so that `Critical` is the greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grade a telemetry sample.
///
/// Missing readings never trigger escalation, so a sample with no readings
/// at all is `Low`.
pub fn classify_severity(sample: &CellMetricSample) -> Severity {
    if is_below(sample.rsrp_mean, CRITICAL_RSRP_DBM)
        || is_below(sample.snr_mean, CRITICAL_SNR_DB)
        || is_above(sample.ping_avg_mean, CRITICAL_PING_MS)
    {
        return Severity::Critical;
    }
    if breaches_medium(sample) {
        return Severity::Medium;
    }
    Severity::Low
}

/// Whether a sample belongs on the alert list at all: any medium-tier
/// breach, or traffic trending upwards.
pub fn is_alert_candidate(sample: &CellMetricSample) -> bool {
    breaches_medium(sample)
        || sample.trend_class.and_then(TrendLabel::from_class) == Some(TrendLabel::Up)
}

/// Sort alerts most severe first, newest first within a tier. Samples
/// without a timestamp go last in their tier.
pub fn sort_alerts(samples: &mut [CellMetricSample]) {
    samples.sort_by(|a, b| {
        classify_severity(b)
            .cmp(&classify_severity(a))
            .then_with(|| match (a.observed_at(), b.observed_at()) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
}

fn breaches_medium(sample: &CellMetricSample) -> bool {
    is_below(sample.rsrp_mean, MEDIUM_RSRP_DBM)
        || is_below(sample.snr_mean, MEDIUM_SNR_DB)
        || is_above(sample.ping_avg_mean, MEDIUM_PING_MS)
}
