//! Traffic trend labelling from current and forecast downlink throughput.

use serde::{Deserialize, Serialize};

/// Default relative change at or above which traffic is trending up.
pub const DEFAULT_TREND_UP: f64 = 0.10;
/// Default relative change at or below which traffic is trending down.
pub const DEFAULT_TREND_DOWN: f64 = -0.10;

/// Floor applied to the current throughput before dividing.
const MIN_DENOMINATOR: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendLabel {
    Down,
    Flat,
    Up,
}

impl TrendLabel {
    /// Numeric class carried by telemetry rows (`trend_class`).
    pub fn class(&self) -> i32 {
        match self {
            Self::Down => 0,
            Self::Flat => 1,
            Self::Up => 2,
        }
    }

    pub fn from_class(class: i32) -> Option<Self> {
        match class {
            0 => Some(Self::Down),
            1 => Some(Self::Flat),
            2 => Some(Self::Up),
            _ => None,
        }
    }

    /// Lower-case key used by policy trend rules.
    pub fn rule_key(&self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Flat => "flat",
            Self::Up => "up",
        }
    }
}

/// Limits for [`classify_trend`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendThresholds {
    pub up: f64,
    pub down: f64,
}

impl Default for TrendThresholds {
    fn default() -> Self {
        Self {
            up: DEFAULT_TREND_UP,
            down: DEFAULT_TREND_DOWN,
        }
    }
}

/// Label the change from `current` to `future` throughput.
///
/// Returns `None` if either reading is missing or not finite.
pub fn classify_trend(
    current: Option<f64>,
    future: Option<f64>,
    thresholds: TrendThresholds,
) -> Option<TrendLabel> {
    let (current, future) = (current?, future?);
    if !current.is_finite() || !future.is_finite() {
        return None;
    }
    let pct = (future - current) / current.max(MIN_DENOMINATOR);
    Some(if pct >= thresholds.up {
        TrendLabel::Up
    } else if pct <= thresholds.down {
        TrendLabel::Down
    } else {
        TrendLabel::Flat
    })
}
