// src/engine/mod.rs
//! Table-driven row engine shared by every season.
//!
//! A season supplies a label → [`Strategy`] table plus a few hooks; the engine
//! walks the report rows in order, dispatches each one, collects failures and
//! finally runs the derived-field pass.

pub mod assign;
pub mod classify;
pub mod derive;
pub mod engine;
pub mod phase;
pub mod types;

use std::collections::HashMap;

use log::warn;

use crate::breakdown::{MatchBreakdown, PerAlliance, ScoreBreakdown};
use crate::config::options::ParseConfig;
use crate::error::{DecodeError, FieldError, FieldErrors};
use crate::specs::Season;

pub use engine::run;
pub use phase::PhaseTracker;
pub use types::*;

/// Mutable state of one parse.
pub struct Scan<S: Season> {
    pub breakdown: MatchBreakdown,
    pub acc: PerAlliance<S::Acc>,
    /// Season-private state spanning several rows.
    pub state: S::State,
    pub phase: PhaseTracker,
    pub config: ParseConfig,
    errors: FieldErrors,
    seen: HashMap<String, usize>,
}

impl<S: Season> Scan<S> {
    pub fn new(config: &ParseConfig) -> Self {
        Self {
            breakdown: MatchBreakdown::new(S::YEAR, S::SCHEMA, config.is_playoff),
            acc: PerAlliance::default(),
            state: S::State::default(),
            phase: PhaseTracker::default(),
            config: config.clone(),
            errors: FieldErrors::default(),
            seen: HashMap::new(),
        }
    }

    pub fn sheet(&mut self) -> &mut ScoreBreakdown {
        &mut self.breakdown.score_breakdown
    }

    pub fn breakdown(&self) -> &ScoreBreakdown {
        &self.breakdown.score_breakdown
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Occurrence index of `label`, counting this call.
    fn bump(&mut self, label: &str) -> usize {
        let n = self.seen.entry(s!(label)).or_insert(0);
        *n += 1;
        *n - 1
    }

    pub fn record(&mut self, label: &str, result: Result<(), DecodeError>) {
        if let Err(e) = result {
            self.push_error(FieldError::new(label, e));
        }
    }

    pub fn push_error(&mut self, e: FieldError) {
        warn!("{} report: {e}", S::YEAR);
        self.errors.push(e);
    }
}
