// src/engine/assign.rs
//! Field assigners. Each decodes both alliances before writing anything,
//! so a row that fails leaves the breakdown as it was.
use crate::breakdown::{Alliance, FieldValue, PerAlliance};
use crate::config::consts::{ICON_FALSE, ICON_TRUE, NO, TEAM_PREFIX, YES};
use crate::core::html::ICON;
use crate::core::sanitize::{expect_parts, parse_int, parse_signed};
use crate::core::{Cell, Separator};
use crate::error::DecodeError;
use crate::specs::Season;

use super::types::{Accumulator, ScoreRow, Strategy};
use super::Scan;

pub fn apply<S: Season>(scan: &mut Scan<S>, row: &ScoreRow<'_>, strategy: &Strategy<S>) -> Result<(), DecodeError> {
    match strategy {
        Strategy::Skip => Ok(()),
        Strategy::Int(field) => {
            let v = ints(row, field)?;
            write_ints(scan, field, v)
        }
        Strategy::Signed(field) => {
            let v = PerAlliance::try_from_fn(|a| parse_signed(&row.text(a), &format!("{} {field}", a.key())))?;
            write_ints(scan, field, v)
        }
        Strategy::Str(field) => {
            let v = PerAlliance::from_fn(|a| FieldValue::Str(row.text(a)));
            scan.sheet().set_pair(field, v)
        }
        Strategy::Total(field, slot) => {
            let v = ints(row, field)?;
            write_ints(scan, field, v)?;
            for a in Alliance::ALL {
                *scan.acc.get_mut(a).totals_mut().slot_mut(*slot) = *v.get(a);
            }
            Ok(())
        }
        Strategy::Tally(field, tally) => {
            let v = ints(row, field)?;
            write_ints(scan, field, v)?;
            for a in Alliance::ALL {
                tally(scan.acc.get_mut(a), *v.get(a));
            }
            Ok(())
        }
        Strategy::Icon(field) => {
            let v = PerAlliance::try_from_fn(|a| icon_bool(row.cell(a)))?;
            scan.sheet().set_pair(field, v.map(|_, b| b.into()))
        }
        Strategy::RobotIcons(prefix) => {
            let v = PerAlliance::try_from_fn(|a| icons_to_bools(row.cell(a), 3))?;
            write_robots(scan, prefix, v.map(|_, bs| bs.into_iter().map(yes_no).collect()))
        }
        Strategy::Robots(prefix, sep) => {
            let v = PerAlliance::try_from_fn(|a| expect_parts(sep.split(&row.text(a)), 3))?;
            write_robots(scan, prefix, v)
        }
        Strategy::Split(fields, sep) => split_ints(scan, row, fields, *sep),
        Strategy::Phase(suffix) => {
            let phase = scan.phase.require()?;
            let field = join!(phase.prefix(), suffix);
            let v = ints(row, &field)?;
            write_ints(scan, &field, v)
        }
        Strategy::Occurrence(fields) => {
            let field = fields.get(row.occurrence).ok_or_else(|| {
                DecodeError::Invalid(format!("row repeated {} times, expected at most {}", row.occurrence + 1, fields.len()))
            })?;
            let v = ints(row, field)?;
            write_ints(scan, field, v)
        }
        Strategy::Teams(sep) => teams(scan, row, *sep),
        Strategy::FinalScore => final_score(scan, row),
        Strategy::Custom(handler) => handler(scan, row),
        Strategy::Section(handler) => handler(scan),
    }
}

/* ---------------- decoders ---------------- */

/// Both cells as ints; `what` names the field in error messages.
pub fn ints(row: &ScoreRow<'_>, what: &str) -> Result<PerAlliance<i64>, DecodeError> {
    PerAlliance::try_from_fn(|a| parse_int(&row.text(a), &format!("{} {what}", a.key())))
}

/// The cell's single check/cross icon.
pub fn icon_bool(cell: Cell<'_>) -> Result<bool, DecodeError> {
    let mut v = icons_to_bools(cell, 1)?;
    Ok(v.remove(0))
}

/// Exactly `n` icons, each a check or a cross.
pub fn icons_to_bools(cell: Cell<'_>, n: usize) -> Result<Vec<bool>, DecodeError> {
    let icons = cell.find(&ICON);
    if icons.len() != n {
        return Err(DecodeError::IconCount { expected: n, found: icons.len() });
    }
    icons.into_iter().map(decode_icon).collect()
}

fn decode_icon(icon: Cell<'_>) -> Result<bool, DecodeError> {
    match (icon.has_class(ICON_TRUE), icon.has_class(ICON_FALSE)) {
        (true, false) => Ok(true),
        (false, true) => Ok(false),
        _ => Err(DecodeError::IconMarkup(icon.class_list())),
    }
}

pub fn yes_no(b: bool) -> String {
    s!(if b { YES } else { NO })
}

/* ---------------- writers ---------------- */

pub fn write_ints<S: Season>(scan: &mut Scan<S>, field: &str, v: PerAlliance<i64>) -> Result<(), DecodeError> {
    scan.sheet().set_pair(field, v.map(|_, n| n.into()))
}

/// Per-alliance field lists that need not line up; all checked before any write.
pub fn write_each<S: Season>(scan: &mut Scan<S>, v: PerAlliance<Vec<(String, FieldValue)>>) -> Result<(), DecodeError> {
    for a in Alliance::ALL {
        for (field, value) in v.get(a) {
            scan.breakdown().check(field, value)?;
        }
    }
    for (a, fields) in [(Alliance::Blue, v.blue), (Alliance::Red, v.red)] {
        for (field, value) in fields {
            scan.sheet().set(a, &field, value)?;
        }
    }
    Ok(())
}

/// `<prefix>1`, `<prefix>2`, `<prefix>3` in document order.
pub fn write_robots<S: Season>(scan: &mut Scan<S>, prefix: &str, v: PerAlliance<Vec<String>>) -> Result<(), DecodeError> {
    let mut writes = Vec::with_capacity(3);
    for i in 0..3 {
        let field = format!("{prefix}{}", i + 1);
        let pair = PerAlliance::try_from_fn(|a| {
            v.get(a)
                .get(i)
                .map(|s| FieldValue::Str(s.clone()))
                .ok_or(DecodeError::Length { expected: 3, found: v.get(a).len() })
        })?;
        writes.push((field, pair));
    }
    scan.sheet().set_many(writes)
}

fn split_ints<S: Season>(scan: &mut Scan<S>, row: &ScoreRow<'_>, fields: &[&str], sep: Separator) -> Result<(), DecodeError> {
    let v = PerAlliance::try_from_fn(|a| -> Result<Vec<i64>, DecodeError> {
        let parts = expect_parts(sep.split(&row.text(a)), fields.len())?;
        parts
            .iter()
            .zip(fields)
            .map(|(p, f)| parse_int(p, &format!("{} {f}", a.key())))
            .collect()
    })?;
    let writes: Vec<(String, PerAlliance<FieldValue>)> = fields
        .iter()
        .enumerate()
        .map(|(i, f)| (s!(*f), PerAlliance::new(v.blue[i].into(), v.red[i].into())))
        .collect();
    scan.sheet().set_many(writes)
}

fn teams<S: Season>(scan: &mut Scan<S>, row: &ScoreRow<'_>, sep: Separator) -> Result<(), DecodeError> {
    let v = PerAlliance::try_from_fn(|a| {
        let parts = expect_parts(sep.split(&row.text(a)), 3)?;
        Ok::<_, DecodeError>([
            join!(TEAM_PREFIX, &parts[0]),
            join!(TEAM_PREFIX, &parts[1]),
            join!(TEAM_PREFIX, &parts[2]),
        ])
    })?;
    for a in Alliance::ALL {
        scan.breakdown.alliances.get_mut(a).teams = v.get(a).clone();
    }
    Ok(())
}

fn final_score<S: Season>(scan: &mut Scan<S>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    let v = ints(row, "final score")?;
    write_ints(scan, "totalPoints", v)?;
    for a in Alliance::ALL {
        let score = *v.get(a);
        scan.breakdown.alliances.get_mut(a).score = score;
        scan.acc.get_mut(a).totals_mut().total = score;
    }
    Ok(())
}
