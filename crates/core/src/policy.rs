//! Policy actions, decision records, and rule-based action selection.
//!
//! Action and class tokens come from an external decision engine. Parsing
//! never fails: unknown tokens are kept verbatim so the display layer can
//! render a generic fallback.
//!
//! Rules for [`decide_action`] come from the decision engine's rules file,
//! which is YAML (`policy.yaml`); [`PolicyRules::from_json`] accepts the
//! same document as JSON.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::signal::ClassLabel;
use crate::trend::TrendLabel;
use crate::types::{lenient_timestamp, CellId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const ACTION_INCREASE: &str = "increase";
pub const ACTION_DECREASE: &str = "decrease";
pub const ACTION_HOLD: &str = "hold";
pub const ACTION_MONITOR: &str = "monitor";
pub const ACTION_SLEEP: &str = "sleep";
pub const ACTION_OPTIMIZE: &str = "optimize";

/// Reason recorded when no rule set is loaded.
pub const REASON_NO_RULES: &str = "no-rules";

/// Rule-set version assumed when the rules file does not name one.
pub const DEFAULT_THRESHOLDS_VER: &str = "v1";

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Energy-management action issued for a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Increase,
    Decrease,
    Hold,
    Monitor,
    Sleep,
    Optimize,
    Other(String),
}

impl Action {
    /// Parse an action token; never fails.
    pub fn parse(raw: &str) -> Self {
        match raw {
            ACTION_INCREASE => Self::Increase,
            ACTION_DECREASE => Self::Decrease,
            ACTION_HOLD => Self::Hold,
            ACTION_MONITOR => Self::Monitor,
            ACTION_SLEEP => Self::Sleep,
            ACTION_OPTIMIZE => Self::Optimize,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical token; unknown actions are returned unchanged.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Increase => ACTION_INCREASE,
            Self::Decrease => ACTION_DECREASE,
            Self::Hold => ACTION_HOLD,
            Self::Monitor => ACTION_MONITOR,
            Self::Sleep => ACTION_SLEEP,
            Self::Optimize => ACTION_OPTIMIZE,
            Self::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for Action {
    fn from(raw: String) -> Self {
        match Self::parse(&raw) {
            Self::Other(_) => Self::Other(raw),
            known => known,
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Decision records
// ---------------------------------------------------------------------------

/// Why an action was chosen: either free text or `{"rule": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reason {
    Rule { rule: String },
    Text(String),
}

#[derive(Deserialize)]
struct EncodedRule {
    rule: String,
}

impl Reason {
    /// The stored text as-is. JSON-encoded rules are not unwrapped; use
    /// [`decoded`](Self::decoded) for display.
    pub fn rule_text(&self) -> &str {
        match self {
            Self::Rule { rule } => rule,
            Self::Text(text) => text,
        }
    }

    /// The human-readable rule text.
    ///
    /// The decision engine persists `{"rule": ...}` as a JSON-encoded
    /// string, so text that parses as such an object is unwrapped.
    pub fn decoded(&self) -> String {
        match self {
            Self::Rule { rule } => rule.clone(),
            Self::Text(text) => serde_json::from_str::<EncodedRule>(text)
                .map(|r| r.rule)
                .unwrap_or_else(|_| text.clone()),
        }
    }
}

/// One policy decision for a cell.
///
/// Latest-action rows carry only `decided_at`. Full `cell_policy` rows
/// (`/api/policies`) carry both columns, and the decision engine fills
/// `ts` while leaving `decided_at` null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDecision {
    #[serde(default)]
    pub id: Option<i64>,
    pub cell_id: CellId,
    pub action: Action,
    pub class_label: ClassLabel,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub ts: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub decided_at: Option<Timestamp>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub thresholds_ver: Option<String>,
    #[serde(default)]
    pub reason: Option<Reason>,
}

impl PolicyDecision {
    /// When the decision was made: `decided_at`, falling back to `ts`.
    pub fn decided_at(&self) -> Option<Timestamp> {
        self.decided_at.or(self.ts)
    }
}

/// One entry of a cell's action history (`/api/policy_timeline/{cell_id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyTimelinePoint {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub ts: Option<Timestamp>,
    pub action: Action,
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

/// Server-side count for one action (a `/api/policy_summary` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCount {
    pub action: Action,
    #[serde(default)]
    pub count: u64,
}

/// One slice of the action distribution chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActionShare {
    /// Canonical action token, or `"other"` for unknown actions.
    pub label: &'static str,
    pub count: u64,
    pub pct: f64,
}

/// Per-action decision counts. Unknown actions share the `other` bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActionTally {
    pub increase: u64,
    pub decrease: u64,
    pub hold: u64,
    pub monitor: u64,
    pub sleep: u64,
    pub optimize: u64,
    pub other: u64,
}

impl ActionTally {
    /// Merge server-side counts; repeated actions are summed.
    pub fn from_counts(counts: &[ActionCount]) -> Self {
        let mut tally = Self::default();
        for c in counts {
            tally.record(&c.action, c.count);
        }
        tally
    }

    /// Count one decision per action.
    pub fn from_actions<'a>(actions: impl IntoIterator<Item = &'a Action>) -> Self {
        let mut tally = Self::default();
        for action in actions {
            tally.record(action, 1);
        }
        tally
    }

    pub fn record(&mut self, action: &Action, count: u64) {
        *self.slot_mut(action) += count;
    }

    /// Count for `action`; any unknown action reads the `other` bucket.
    pub fn count(&self, action: &Action) -> u64 {
        self.entries()
            .into_iter()
            .find(|(label, _)| *label == Self::label(action))
            .map_or(0, |(_, count)| count)
    }

    pub fn total(&self) -> u64 {
        self.entries().iter().map(|(_, count)| count).sum()
    }

    /// Percentage of all decisions taken by `action`; 0 when nothing was counted.
    pub fn percent(&self, action: &Action) -> f64 {
        Self::pct(self.count(action), self.total())
    }

    /// Non-empty slices in canonical action order.
    pub fn shares(&self) -> Vec<ActionShare> {
        let total = self.total();
        self.entries()
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(label, count)| ActionShare {
                label,
                count,
                pct: Self::pct(count, total),
            })
            .collect()
    }

    fn pct(count: u64, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        }
    }

    fn label(action: &Action) -> &'static str {
        match action {
            Action::Increase => ACTION_INCREASE,
            Action::Decrease => ACTION_DECREASE,
            Action::Hold => ACTION_HOLD,
            Action::Monitor => ACTION_MONITOR,
            Action::Sleep => ACTION_SLEEP,
            Action::Optimize => ACTION_OPTIMIZE,
            Action::Other(_) => "other",
        }
    }

    fn entries(&self) -> [(&'static str, u64); 7] {
        [
            (ACTION_INCREASE, self.increase),
            (ACTION_DECREASE, self.decrease),
            (ACTION_HOLD, self.hold),
            (ACTION_MONITOR, self.monitor),
            (ACTION_SLEEP, self.sleep),
            (ACTION_OPTIMIZE, self.optimize),
            ("other", self.other),
        ]
    }

    fn slot_mut(&mut self, action: &Action) -> &mut u64 {
        match action {
            Action::Increase => &mut self.increase,
            Action::Decrease => &mut self.decrease,
            Action::Hold => &mut self.hold,
            Action::Monitor => &mut self.monitor,
            Action::Sleep => &mut self.sleep,
            Action::Optimize => &mut self.optimize,
            Action::Other(_) => &mut self.other,
        }
    }
}

// ---------------------------------------------------------------------------
// Rule-based selection
// ---------------------------------------------------------------------------

/// Rule set mapping signal class and traffic trend to actions.
///
/// Mirrors the decision engine's `policy.yaml`:
///
/// ```yaml
/// thresholds_ver: v1
/// energy_actions:
///   class_rules: { Excellent: decrease, Very Weak: increase }
///   trend_rules: { up: increase, down: decrease, flat: hold }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyRules {
    #[serde(default)]
    pub energy_actions: EnergyActionRules,
    #[serde(default = "default_thresholds_ver")]
    pub thresholds_ver: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyActionRules {
    /// Class label (e.g. `"Very Weak"`) to action.
    #[serde(default)]
    pub class_rules: HashMap<String, Action>,
    /// Lower-case trend label (e.g. `"up"`) to action.
    #[serde(default)]
    pub trend_rules: HashMap<String, Action>,
}

fn default_thresholds_ver() -> String {
    DEFAULT_THRESHOLDS_VER.to_string()
}

impl PolicyRules {
    /// Parse a YAML rules document.
    pub fn from_yaml(raw: &str) -> Result<Self, CoreError> {
        serde_yaml::from_str(raw)
            .map_err(|e| CoreError::Validation(format!("Invalid policy rules: {e}")))
    }

    /// Parse the same rules document written as JSON.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw)
            .map_err(|e| CoreError::Validation(format!("Invalid policy rules: {e}")))
    }
}

/// The action picked for a cell and a description of how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub action: Action,
    pub reason: String,
}

/// Pick an action from the signal class and traffic trend.
///
/// The class rule decides the action; the trend rule only shapes the
/// reason. Missing rules, and a missing trend, default to `monitor`.
pub fn decide_action(
    class: &ClassLabel,
    trend: Option<TrendLabel>,
    rules: Option<&PolicyRules>,
) -> Verdict {
    let Some(rules) = rules else {
        return Verdict {
            action: Action::Monitor,
            reason: REASON_NO_RULES.to_string(),
        };
    };

    let class_act = rules
        .energy_actions
        .class_rules
        .get(class.as_str())
        .cloned()
        .unwrap_or(Action::Monitor);
    let trend_act = trend
        .and_then(|t| rules.energy_actions.trend_rules.get(t.rule_key()))
        .cloned()
        .unwrap_or(Action::Monitor);

    let reason = if class_act == trend_act {
        format!("class+trend agree ({class_act})")
    } else {
        format!("class={class_act}, trend={trend_act}")
    };

    Verdict {
        action: class_act,
        reason,
    }
}
