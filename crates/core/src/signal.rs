//! Signal strength bands and signal-quality classes.
//!
//! [`classify_signal_band`] is the single source of the RSRP colour bands;
//! the map legend ([`SignalBand::legend`]) is derived from the same
//! constants so the two can never disagree.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Band constants
// ---------------------------------------------------------------------------

/// RSRP (dBm) strictly above which a cell is `Strong`.
pub const STRONG_ABOVE_DBM: f64 = -85.0;
/// RSRP (dBm) strictly above which (and up to `STRONG_ABOVE_DBM`) a cell is `Medium`.
pub const MEDIUM_ABOVE_DBM: f64 = -100.0;

// ---------------------------------------------------------------------------
// Quality constants
// ---------------------------------------------------------------------------

pub const EXCELLENT_MIN_RSRP_DBM: f64 = -80.0;
pub const GOOD_MIN_RSRP_DBM: f64 = -95.0;
pub const WEAK_MIN_RSRP_DBM: f64 = -110.0;

/// SNR (dB) at or above which quality is `Good` when RSRP is missing, and
/// at or above which an RSRP-based class is promoted.
pub const GOOD_SNR_DB: f64 = 10.0;
/// SNR (dB) at or below which an RSRP-based class is demoted.
pub const POOR_SNR_DB: f64 = 0.0;
/// RSRQ (dB) at or above which an RSRP-based class is promoted.
pub const GOOD_RSRQ_DB: f64 = -10.0;
/// RSRQ (dB) at or below which an RSRP-based class is demoted.
pub const POOR_RSRQ_DB: f64 = -15.0;

// ---------------------------------------------------------------------------
// SignalBand
// ---------------------------------------------------------------------------

/// Three-tier colour band for map markers and the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalBand {
    Strong,
    Medium,
    Weak,
}

/// One legend row: the band and its RSRP range `(lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendEntry {
    pub band: SignalBand,
    /// Exclusive lower bound, `None` for unbounded.
    pub above_dbm: Option<f64>,
    /// Inclusive upper bound, `None` for unbounded.
    pub up_to_dbm: Option<f64>,
}

impl SignalBand {
    /// Legend rows, strongest first.
    pub fn legend() -> [LegendEntry; 3] {
        [
            LegendEntry {
                band: Self::Strong,
                above_dbm: Some(STRONG_ABOVE_DBM),
                up_to_dbm: None,
            },
            LegendEntry {
                band: Self::Medium,
                above_dbm: Some(MEDIUM_ABOVE_DBM),
                up_to_dbm: Some(STRONG_ABOVE_DBM),
            },
            LegendEntry {
                band: Self::Weak,
                above_dbm: None,
                up_to_dbm: Some(MEDIUM_ABOVE_DBM),
            },
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Medium => "medium",
            Self::Weak => "weak",
        }
    }
}

impl LegendEntry {
    pub fn contains(&self, rsrp: f64) -> bool {
        self.above_dbm.map_or(true, |lo| rsrp > lo) && self.up_to_dbm.map_or(true, |hi| rsrp <= hi)
    }
}

/// Map an RSRP reading to its band.
///
/// A NaN reading falls through to `Weak`; callers with optional readings
/// should skip classification instead (see [`crate::marker`]).
pub fn classify_signal_band(rsrp: f64) -> SignalBand {
    if rsrp > STRONG_ABOVE_DBM {
        SignalBand::Strong
    } else if rsrp > MEDIUM_ABOVE_DBM {
        SignalBand::Medium
    } else {
        SignalBand::Weak
    }
}

// ---------------------------------------------------------------------------
// ClassLabel
// ---------------------------------------------------------------------------

/// Signal-quality class attached to policy decisions.
///
/// Unrecognised labels are preserved verbatim in `Other` so the display
/// layer can fall back to a generic rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClassLabel {
    Excellent,
    Good,
    Weak,
    VeryWeak,
    Other(String),
}

/// Known classes from worst to best.
const QUALITY_LADDER: [ClassLabel; 4] = [
    ClassLabel::VeryWeak,
    ClassLabel::Weak,
    ClassLabel::Good,
    ClassLabel::Excellent,
];

impl ClassLabel {
    /// Parse a label; never fails.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Excellent" => Self::Excellent,
            "Good" => Self::Good,
            "Weak" => Self::Weak,
            "Very Weak" => Self::VeryWeak,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical token; unknown labels are returned unchanged.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Weak => "Weak",
            Self::VeryWeak => "Very Weak",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    fn rank(&self) -> Option<usize> {
        QUALITY_LADDER.iter().position(|c| c == self)
    }
}

impl From<String> for ClassLabel {
    fn from(raw: String) -> Self {
        match Self::parse(&raw) {
            Self::Other(_) => Self::Other(raw),
            known => known,
        }
    }
}

impl From<ClassLabel> for String {
    fn from(label: ClassLabel) -> Self {
        match label {
            ClassLabel::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grade radio quality from RSRP, RSRQ and SNR.
///
/// RSRP sets the base class; good RSRQ or SNR promotes it one step, then
/// poor RSRQ or SNR demotes it one step. Without RSRP the class comes from
/// SNR alone. Returns `None` when neither RSRP nor SNR is present.
pub fn classify_signal_quality(
    rsrp: Option<f64>,
    rsrq: Option<f64>,
    snr: Option<f64>,
) -> Option<ClassLabel> {
    let rsrp = rsrp.filter(|v| !v.is_nan());
    let snr = snr.filter(|v| !v.is_nan());

    let Some(rsrp) = rsrp else {
        return snr.map(|s| {
            if s >= GOOD_SNR_DB {
                ClassLabel::Good
            } else if s >= POOR_SNR_DB {
                ClassLabel::Weak
            } else {
                ClassLabel::VeryWeak
            }
        });
    };

    let base = if rsrp >= EXCELLENT_MIN_RSRP_DBM {
        ClassLabel::Excellent
    } else if rsrp >= GOOD_MIN_RSRP_DBM {
        ClassLabel::Good
    } else if rsrp >= WEAK_MIN_RSRP_DBM {
        ClassLabel::Weak
    } else {
        ClassLabel::VeryWeak
    };
    let mut idx = base.rank().unwrap_or(0);

    let at_least = |v: Option<f64>, t: f64| matches!(v, Some(x) if x >= t);
    let at_most = |v: Option<f64>, t: f64| matches!(v, Some(x) if x <= t);

    if at_least(rsrq, GOOD_RSRQ_DB) || at_least(snr, GOOD_SNR_DB) {
        idx = (idx + 1).min(QUALITY_LADDER.len() - 1);
    }
    if at_most(rsrq, POOR_RSRQ_DB) || at_most(snr, POOR_SNR_DB) {
        idx = idx.saturating_sub(1);
    }

    Some(QUALITY_LADDER[idx].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(classify_signal_band(-84.0), SignalBand::Strong);
        assert_eq!(classify_signal_band(-85.0), SignalBand::Medium);
        assert_eq!(classify_signal_band(-99.9), SignalBand::Medium);
        assert_eq!(classify_signal_band(-100.0), SignalBand::Weak);
        assert_eq!(classify_signal_band(-130.0), SignalBand::Weak);
    }

    #[test]
    fn legend_agrees_with_classifier() {
        let legend = SignalBand::legend();
        for rsrp in [-60.0, -84.9, -85.0, -92.0, -100.0, -100.1, -140.0] {
            let matching: Vec<SignalBand> = legend
                .iter()
                .filter(|e| e.contains(rsrp))
                .map(|e| e.band)
                .collect();
            assert_eq!(matching, vec![classify_signal_band(rsrp)], "rsrp {rsrp}");
        }
    }

    #[test]
    fn class_label_passes_unknown_through() {
        let label: ClassLabel = serde_json::from_str("\"Marginal\"").unwrap();
        assert_eq!(label, ClassLabel::Other("Marginal".into()));
        assert_eq!(label.as_str(), "Marginal");
        assert_eq!(serde_json::to_string(&label).unwrap(), "\"Marginal\"");

        let very_weak: ClassLabel = serde_json::from_str("\"Very Weak\"").unwrap();
        assert_eq!(very_weak, ClassLabel::VeryWeak);
        assert_eq!(serde_json::to_string(&very_weak).unwrap(), "\"Very Weak\"");
    }

    #[test]
    fn quality_from_rsrp_base() {
        assert_eq!(classify_signal_quality(Some(-80.0), None, None), Some(ClassLabel::Excellent));
        assert_eq!(classify_signal_quality(Some(-95.0), None, None), Some(ClassLabel::Good));
        assert_eq!(classify_signal_quality(Some(-110.0), None, None), Some(ClassLabel::Weak));
        assert_eq!(classify_signal_quality(Some(-111.0), None, None), Some(ClassLabel::VeryWeak));
    }

    #[test]
    fn quality_promotion_and_demotion() {
        // Good RSRQ promotes Weak to Good.
        assert_eq!(
            classify_signal_quality(Some(-105.0), Some(-9.0), Some(5.0)),
            Some(ClassLabel::Good)
        );
        // Excellent cannot be promoted further.
        assert_eq!(
            classify_signal_quality(Some(-70.0), None, Some(20.0)),
            Some(ClassLabel::Excellent)
        );
        // Poor SNR demotes Very Weak nowhere.
        assert_eq!(
            classify_signal_quality(Some(-120.0), None, Some(-3.0)),
            Some(ClassLabel::VeryWeak)
        );
        // Promotion then demotion cancels out.
        assert_eq!(
            classify_signal_quality(Some(-90.0), Some(-16.0), Some(12.0)),
            Some(ClassLabel::Good)
        );
    }

    #[test]
    fn quality_falls_back_on_snr() {
        assert_eq!(classify_signal_quality(None, None, Some(10.0)), Some(ClassLabel::Good));
        assert_eq!(classify_signal_quality(None, None, Some(0.0)), Some(ClassLabel::Weak));
        assert_eq!(classify_signal_quality(None, None, Some(-0.5)), Some(ClassLabel::VeryWeak));
        assert_eq!(classify_signal_quality(None, Some(-5.0), None), None);
    }
}
