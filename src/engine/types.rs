// src/engine/types.rs
use crate::breakdown::Alliance;
use crate::core::{Cell, Separator};
use crate::error::DecodeError;
use crate::specs::Season;

use super::Scan;

/* Table layout */

/// Column order of the score table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// `blue | label | red` (2018, 2019)
    BlueLabelRed,
    /// `label | blue | red` (2022 onwards)
    LabelBlueRed,
}

impl Layout {
    pub fn label_col(self) -> usize {
        match self {
            Layout::BlueLabelRed => 1,
            Layout::LabelBlueRed => 0,
        }
    }

    pub fn col(self, a: Alliance) -> usize {
        match (self, a) {
            (Layout::BlueLabelRed, Alliance::Blue) => 0,
            (Layout::BlueLabelRed, Alliance::Red) => 2,
            (Layout::LabelBlueRed, Alliance::Blue) => 1,
            (Layout::LabelBlueRed, Alliance::Red) => 2,
        }
    }
}

/* Match phase */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Auto,
    Teleop,
}

impl Phase {
    /// Field-name prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            Phase::Auto => "auto",
            Phase::Teleop => "teleop",
        }
    }
}

/// Phase transition tied to a row label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// Applied before the row is handled.
    Before(Phase),
    /// Applied after the row, whether it decoded or not.
    After(Option<Phase>),
}

/* Rule table */

/// Which shared total an int row feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TotalSlot {
    Auto,
    Teleop,
    Fouls,
}

pub type Handler<S> = fn(&mut Scan<S>, &ScoreRow<'_>) -> Result<(), DecodeError>;
pub type SectionHandler<S> = fn(&mut Scan<S>) -> Result<(), DecodeError>;
pub type Tally<S> = fn(&mut <S as Season>::Acc, i64);

/// How one labelled row is decoded.
pub enum Strategy<S: Season> {
    /// Known row, nothing to store.
    Skip,
    Int(&'static str),
    /// Int that may be negative.
    Signed(&'static str),
    Str(&'static str),
    /// Int that also lands in a shared total.
    Total(&'static str, TotalSlot),
    /// Int that also lands in the season accumulator.
    Tally(&'static str, Tally<S>),
    /// Single check/cross icon.
    Icon(&'static str),
    /// Three icons → `<prefix>1..3` as `Yes`/`No`.
    RobotIcons(&'static str),
    /// Three strings → `<prefix>1..3`.
    Robots(&'static str, Separator),
    /// Several ints packed in one cell.
    Split(&'static [&'static str], Separator),
    /// Int named `<phase><suffix>`.
    Phase(&'static str),
    /// Int whose field depends on how many times the label has been seen.
    Occurrence(&'static [&'static str]),
    Teams(Separator),
    FinalScore,
    Custom(Handler<S>),
    /// Row opening a multi-row widget; fires whatever its cell count.
    Section(SectionHandler<S>),
}

/* Playoff neutral values */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Neutral {
    Int(i64),
    Bool(bool),
    /// Field is left out of playoff breakdowns.
    Absent,
}

/// One forced playoff value. `verified` records whether real playoff
/// reports were checked for this field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayoffRule {
    pub field: &'static str,
    pub neutral: Neutral,
    pub verified: bool,
}

impl PlayoffRule {
    pub const fn verified(field: &'static str, neutral: Neutral) -> Self {
        Self { field, neutral, verified: true }
    }
    pub const fn unverified(field: &'static str, neutral: Neutral) -> Self {
        Self { field, neutral, verified: false }
    }
}

/* Rows */

/// A three-cell score row as seen by handlers.
pub struct ScoreRow<'a> {
    /// Normalized (trimmed, lowercase) label.
    pub label: String,
    /// 0 for the first row with this label, 1 for the second, ...
    pub occurrence: usize,
    pub blue: Cell<'a>,
    pub red: Cell<'a>,
}

impl<'a> ScoreRow<'a> {
    pub fn cell(&self, a: Alliance) -> Cell<'a> {
        match a {
            Alliance::Blue => self.blue,
            Alliance::Red => self.red,
        }
    }

    pub fn text(&self, a: Alliance) -> String {
        self.cell(a).text()
    }
}

/* Accumulators */

/// Points shared by every season.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub auto: i64,
    pub teleop: i64,
    pub fouls: i64,
    pub total: i64,
}

impl Totals {
    pub fn slot_mut(&mut self, slot: TotalSlot) -> &mut i64 {
        match slot {
            TotalSlot::Auto => &mut self.auto,
            TotalSlot::Teleop => &mut self.teleop,
            TotalSlot::Fouls => &mut self.fouls,
        }
    }
}

/// Per-alliance running sums feeding derived fields.
pub trait Accumulator: Default {
    fn totals(&self) -> &Totals;
    fn totals_mut(&mut self) -> &mut Totals;

    /// Season points also excluded from `adjustPoints`.
    fn adjust_extra(&self) -> i64 {
        0
    }
}

impl Accumulator for Totals {
    fn totals(&self) -> &Totals {
        self
    }
    fn totals_mut(&mut self) -> &mut Totals {
        self
    }
}
