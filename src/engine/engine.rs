// src/engine/engine.rs
use log::debug;

use crate::breakdown::{Alliance, FieldValue, MatchBreakdown, PerAlliance};
use crate::config::consts::{MATCH_PHASE, UNHANDLED_PREFIX};
use crate::config::options::ParseConfig;
use crate::core::sanitize::normalize_label;
use crate::core::ReportDoc;
use crate::error::{DecodeError, FieldError, ParseError};
use crate::specs::Season;

use super::classify::{classify, RowClass};
use super::types::{ScoreRow, Strategy};
use super::{assign, derive, Scan};

/// Parse one report with season `S`.
///
/// Row failures do not stop the scan; they are returned together, with the
/// partially built breakdown, once every row has been seen.
pub fn run<S: Season>(doc: &ReportDoc, config: &ParseConfig) -> Result<MatchBreakdown, ParseError> {
    let rows = doc.rows();
    if !rows.iter().any(|r| r.len() == 3) {
        return Err(ParseError::Structural);
    }

    let mut scan = Scan::<S>::new(config);
    let layout = S::LAYOUT;

    for row in &rows {
        if row.is_empty() {
            continue;
        }
        let label = normalize_label(&row.text(layout.label_col()));
        let class = classify::<S>(&label);

        // Section headers span the table, so they are not three cells wide.
        if let RowClass::Rule(Strategy::Section(open)) = &class {
            let result = open(&mut scan);
            scan.record(&label, result);
            continue;
        }
        if row.len() != 3 || matches!(class, RowClass::Skip) {
            continue;
        }
        let (Some(blue), Some(red)) = (row.cell(layout.col(Alliance::Blue)), row.cell(layout.col(Alliance::Red))) else {
            continue;
        };

        let occurrence = scan.bump(&label);
        let sr = ScoreRow { label, occurrence, blue, red };

        scan.phase.before_row(S::PHASE_EDGES, &sr.label);
        if let Some(result) = S::intercept(&mut scan, &sr) {
            scan.record(&sr.label, result);
            continue;
        }

        let result = match class {
            RowClass::Rule(strategy) => assign::apply(&mut scan, &sr, strategy),
            RowClass::Unhandled => passthrough(&mut scan, &sr),
            RowClass::Skip => Ok(()),
        };
        scan.record(&sr.label, result);
        scan.phase.after_row(S::PHASE_EDGES, &sr.label);
    }

    if let Some(phase) = scan.phase.current() {
        scan.push_error(FieldError::new(MATCH_PHASE, DecodeError::PhaseOpen(phase.prefix())));
    }
    if let Err(e) = S::finish(&mut scan, doc) {
        scan.push_error(e);
    }
    finish_derived(&mut scan);

    if scan.errors().is_empty() && config.require_all_fields {
        let exempt = if config.is_playoff { derive::playoff_absent::<S>() } else { Vec::new() };
        for (a, field) in scan.breakdown().missing_required(&exempt) {
            scan.push_error(FieldError::new(a.key(), DecodeError::Missing(s!(field))));
        }
    }

    let Scan { breakdown, errors, .. } = scan;
    if errors.is_empty() {
        Ok(breakdown)
    } else {
        Err(ParseError::Fields { errors, partial: Box::new(breakdown) })
    }
}

fn finish_derived<S: Season>(scan: &mut Scan<S>) {
    let result = S::derive(scan);
    scan.record("derived fields", result);

    let result = derive::adjust_points(scan);
    scan.record("adjustPoints", result);

    let result = if scan.config.is_playoff {
        derive::apply_playoff(scan)
    } else {
        derive::ranking_points(scan)
    };
    scan.record("rp", result);
}

/// Unknown rows are kept as-is for both alliances.
fn passthrough<S: Season>(scan: &mut Scan<S>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    debug!("{}: unhandled row {:?}", S::YEAR, row.label);
    let field = join!(UNHANDLED_PREFIX, &row.label);
    scan.sheet().set_pair(&field, PerAlliance::from_fn(|a| FieldValue::Str(row.text(a))))
}
