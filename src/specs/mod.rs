// src/specs/mod.rs
//! # Season specs
//!
//! One module per game season. Each spec encodes *where the numbers live in
//! that year's FMS match report* and *how they map onto breakdown fields*.
//!
//! ## What lives here
//! - **Rule tables**: normalized row label → [`Strategy`], as static `phf` maps.
//! - **Schemas**: every breakdown field the season may emit, with its kind.
//! - **Season hooks**: structured multi-row widgets (2023 community grid),
//!   document-level extras (2018 game data), derived fields and bonus
//!   ranking point predicates.
//! - **Playoff tables**: neutral values forced on ranking fields, each marked
//!   verified or not against real playoff reports.
//!
//! ## What does **not** live here
//! - Row walking, phase tracking, error collection: `engine`.
//! - Overlay files and match codes: `overlay`, `tba`.
//!
//! ## Conventions
//! - Labels are matched **exactly** after trimming and lowercasing.
//! - 2018/2019 reports are `blue | label | red`; later ones `label | blue | red`.
//! - Field names are the results API's, spelled exactly.
use crate::breakdown::{Alliance, MatchBreakdown, Schema};
use crate::config::options::ParseConfig;
use crate::core::ReportDoc;
use crate::engine::{self, Accumulator, Edge, Layout, PlayoffRule, Scan, ScoreRow, Strategy};
use crate::error::{DecodeError, FieldError, ParseError};

pub mod y2018;
pub mod y2019;
pub mod y2022;
pub mod y2023;

pub const SUPPORTED_SEASONS: [u16; 4] = [2018, 2019, 2022, 2023];

/// A game season's report format and scoring rules.
pub trait Season: Sized + 'static {
    type Acc: Accumulator;
    type State: Default;

    const YEAR: u16;
    const LAYOUT: Layout;
    const SCHEMA: Schema;
    const PHASE_EDGES: &'static [(&'static str, Edge)] = &[];
    /// Bonus ranking point fields, in toggle order.
    const BONUSES: &'static [&'static str];
    const PLAYOFF: &'static [PlayoffRule];

    fn rules() -> &'static phf::Map<&'static str, Strategy<Self>>;

    /// Claim a row before the rule table sees it.
    fn intercept(_scan: &mut Scan<Self>, _row: &ScoreRow<'_>) -> Option<Result<(), DecodeError>> {
        None
    }

    /// Document-level work after the last row.
    fn finish(_scan: &mut Scan<Self>, _doc: &ReportDoc) -> Result<(), FieldError> {
        Ok(())
    }

    /// Season-specific derived fields; runs before adjust points and rp.
    fn derive(_scan: &mut Scan<Self>) -> Result<(), DecodeError> {
        Ok(())
    }

    /// Whether bonus `i` was achieved. `None` leaves the field alone.
    fn bonus(scan: &Scan<Self>, a: Alliance, i: usize) -> Option<bool> {
        scan.breakdown().flag(a, Self::BONUSES.get(i)?)
    }
}

/// Parse a report with the rules of `season`.
pub fn parse(season: u16, doc: &ReportDoc, config: &ParseConfig) -> Result<MatchBreakdown, ParseError> {
    match season {
        2018 => engine::run::<y2018::Y2018>(doc, config),
        2019 => engine::run::<y2019::Y2019>(doc, config),
        2022 => engine::run::<y2022::Y2022>(doc, config),
        2023 => engine::run::<y2023::Y2023>(doc, config),
        other => Err(ParseError::UnsupportedSeason(other)),
    }
}

/// Same as [`parse`], from raw HTML. The season is checked first.
pub fn parse_html(season: u16, html: &str, config: &ParseConfig) -> Result<MatchBreakdown, ParseError> {
    ensure_supported(season)?;
    parse(season, &ReportDoc::parse(html), config)
}

pub fn ensure_supported(season: u16) -> Result<(), ParseError> {
    if SUPPORTED_SEASONS.contains(&season) {
        Ok(())
    } else {
        Err(ParseError::UnsupportedSeason(season))
    }
}

/// Bonus ranking point fields of `season`, in toggle order.
pub fn bonus_fields(season: u16) -> Result<&'static [&'static str], ParseError> {
    match season {
        2018 => Ok(y2018::Y2018::BONUSES),
        2019 => Ok(y2019::Y2019::BONUSES),
        2022 => Ok(y2022::Y2022::BONUSES),
        2023 => Ok(y2023::Y2023::BONUSES),
        other => Err(ParseError::UnsupportedSeason(other)),
    }
}
