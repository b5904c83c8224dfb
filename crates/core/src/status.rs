//! Operational cell states and their relation to policy actions.

use serde::{Deserialize, Serialize};

use crate::policy::Action;
use crate::types::{lenient_timestamp, CellId, Timestamp};

pub const STATUS_ACTIVE: &str = "ACTIVE";
pub const STATUS_SLEEP: &str = "SLEEP";
pub const STATUS_ALERT: &str = "ALERT";
pub const STATUS_IDLE: &str = "IDLE";
pub const STATUS_OFFLINE: &str = "OFFLINE";

/// Operational state of a cell. Unknown states pass through in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CellState {
    Active,
    Sleep,
    Alert,
    Idle,
    Offline,
    Other(String),
}

impl CellState {
    pub fn parse(raw: &str) -> Self {
        match raw {
            STATUS_ACTIVE => Self::Active,
            STATUS_SLEEP => Self::Sleep,
            STATUS_ALERT => Self::Alert,
            STATUS_IDLE => Self::Idle,
            STATUS_OFFLINE => Self::Offline,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => STATUS_ACTIVE,
            Self::Sleep => STATUS_SLEEP,
            Self::Alert => STATUS_ALERT,
            Self::Idle => STATUS_IDLE,
            Self::Offline => STATUS_OFFLINE,
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for CellState {
    fn from(raw: String) -> Self {
        match Self::parse(&raw) {
            Self::Other(_) => Self::Other(raw),
            known => known,
        }
    }
}

impl From<CellState> for String {
    fn from(state: CellState) -> Self {
        match state {
            CellState::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for CellState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `/api/cell_status` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellStatus {
    pub cell_id: CellId,
    pub status: CellState,
    #[serde(default)]
    pub last_action: Option<Action>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<Timestamp>,
}

/// The state a cell enters after an action is applied.
pub fn status_for_action(action: &Action) -> CellState {
    match action {
        Action::Decrease | Action::Sleep => CellState::Sleep,
        _ => CellState::Active,
    }
}

/// Per-state cell counts for the status grid header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub active: usize,
    pub sleep: usize,
    pub alert: usize,
    pub idle: usize,
    pub offline: usize,
    pub other: usize,
}

impl StatusTally {
    pub fn from_statuses(statuses: &[CellStatus]) -> Self {
        let mut tally = Self::default();
        for s in statuses {
            let slot = match s.status {
                CellState::Active => &mut tally.active,
                CellState::Sleep => &mut tally.sleep,
                CellState::Alert => &mut tally.alert,
                CellState::Idle => &mut tally.idle,
                CellState::Offline => &mut tally.offline,
                CellState::Other(_) => &mut tally.other,
            };
            *slot += 1;
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.active + self.sleep + self.alert + self.idle + self.offline + self.other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_to_status() {
        assert_eq!(status_for_action(&Action::Decrease), CellState::Sleep);
        assert_eq!(status_for_action(&Action::Sleep), CellState::Sleep);
        assert_eq!(status_for_action(&Action::Increase), CellState::Active);
        assert_eq!(status_for_action(&Action::Hold), CellState::Active);
        assert_eq!(status_for_action(&Action::Monitor), CellState::Active);
        assert_eq!(status_for_action(&Action::Other("foo".into())), CellState::Active);
    }

    #[test]
    fn tally_counts_every_row() {
        let statuses: Vec<CellStatus> = serde_json::from_value(serde_json::json!([
            { "cell_id": "a", "status": "ACTIVE", "last_action": "hold" },
            { "cell_id": "b", "status": "SLEEP", "last_action": "decrease" },
            { "cell_id": "c", "status": "ACTIVE" },
            { "cell_id": "d", "status": "MAINTENANCE", "updated_at": "2025-01-01T00:00:00" },
            { "cell_id": "e", "status": "OFFLINE" },
        ]))
        .unwrap();

        let tally = StatusTally::from_statuses(&statuses);
        assert_eq!(tally.active, 2);
        assert_eq!(tally.sleep, 1);
        assert_eq!(tally.offline, 1);
        assert_eq!(tally.other, 1);
        assert_eq!(tally.total(), statuses.len());
        assert_eq!(statuses[3].status.as_str(), "MAINTENANCE");
        assert_eq!(statuses[1].last_action, Some(Action::Decrease));
    }
}
