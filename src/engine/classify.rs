// src/engine/classify.rs
use crate::config::consts::HEADER_LABEL;
use crate::specs::Season;

use super::types::Strategy;

pub enum RowClass<'r, S: Season> {
    /// Blank label or a table header.
    Skip,
    Rule(&'r Strategy<S>),
    /// Unknown label; kept verbatim under `!<label>`.
    Unhandled,
}

/// Exact match on the normalized label.
pub fn classify<S: Season>(label: &str) -> RowClass<'static, S> {
    if label.is_empty() || label == HEADER_LABEL {
        return RowClass::Skip;
    }
    match S::rules().get(label) {
        Some(strategy) => RowClass::Rule(strategy),
        None => RowClass::Unhandled,
    }
}
