// src/config/options.rs
use serde::{Deserialize, Serialize};

/// Per-call parser switches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Playoff reports have no ranking rows; ranking fields get neutral values.
    pub is_playoff: bool,
    /// Index `i` toggles the season's bonus ranking point `i`.
    /// Missing entries count as enabled.
    pub enabled_extra_ranking_points: Vec<bool>,
    /// Fail when a required schema field never showed up in the report.
    pub require_all_fields: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            is_playoff: false,
            enabled_extra_ranking_points: Vec::new(),
            require_all_fields: true,
        }
    }
}

impl ParseConfig {
    pub fn playoff() -> Self {
        Self { is_playoff: true, ..Self::default() }
    }

    /// No completeness check; for partial reports and fragments.
    pub fn lenient() -> Self {
        Self { require_all_fields: false, ..Self::default() }
    }

    pub fn bonus_enabled(&self, index: usize) -> bool {
        self.enabled_extra_ranking_points
            .get(index)
            .copied()
            .unwrap_or(true)
    }
}
