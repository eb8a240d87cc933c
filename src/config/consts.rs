// src/config/consts.rs

// Report markup
pub const BULLET: &str = "•";
pub const ICON_TRUE: &str = "fa-check";
pub const ICON_FALSE: &str = "fa-times";
pub const HEADER_LABEL: &str = "match score item";
/// Error label for a phase left open by the last row.
pub const MATCH_PHASE: &str = "match phase";

// Output
pub const TEAM_PREFIX: &str = "frc";
pub const UNHANDLED_PREFIX: &str = "!";
pub const UNSET_SCORE: i64 = -1;
pub const YES: &str = "Yes";
pub const NO: &str = "No";

// Ranking points
pub const RP_WIN: i64 = 2;
pub const RP_TIE: i64 = 1;
pub const RP_LOSS: i64 = 0;

// Match codes
pub const QUALIFICATION_LEVEL: &str = "qm";

// Files
pub const EXTRA_INFO_EXT: &str = "extrajson";
pub const DEFAULT_LOG_FILE: &str = ".store/debug.log";
