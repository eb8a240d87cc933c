// src/breakdown/mod.rs
//! Output data model: alliance summaries plus the schema-checked score breakdown.

pub mod alliance;
pub mod record;
pub mod value;

pub use alliance::{Alliance, PerAlliance};
pub use record::{AllianceFields, AllianceSummary, MatchBreakdown, MatchRecord, ScoreBreakdown};
pub use value::{FieldKind, FieldSpec, FieldValue, Link, Schema};
