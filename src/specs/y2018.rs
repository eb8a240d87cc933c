// src/specs/y2018.rs
//! Power Up. `blue | label | red` reports without phase headers: the auto and
//! teleop halves of the ownership rows are told apart by occurrence.
use phf::phf_map;

use super::Season;
use crate::breakdown::{Alliance, FieldSpec, FieldValue, PerAlliance, Schema};
use crate::core::html::GAME_DATA;
use crate::core::sanitize::{expect_parts, parse_int};
use crate::core::{ReportDoc, Separator};
use crate::engine::{Accumulator, Layout, Neutral, PlayoffRule, Scan, ScoreRow, Strategy, TotalSlot, Totals};
use crate::error::{DecodeError, FieldError};

pub struct Y2018;

#[derive(Debug, Default)]
pub struct Acc2018 {
    totals: Totals,
    auto_run_points: i64,
    auto_switch_sec: i64,
    endgame_points: i64,
}

impl Accumulator for Acc2018 {
    fn totals(&self) -> &Totals {
        &self.totals
    }
    fn totals_mut(&mut self) -> &mut Totals {
        &mut self.totals
    }
}

static RULES: phf::Map<&'static str, Strategy<Y2018>> = phf_map! {
    "teams" => Strategy::Teams(Separator::Bullet),
    "final score" => Strategy::FinalScore,
    "autonomous" => Strategy::Total("autoPoints", TotalSlot::Auto),
    "teleop" => Strategy::Total("teleopPoints", TotalSlot::Teleop),
    "foul points" => Strategy::Total("foulPoints", TotalSlot::Fouls),
    "fouls/techs committed" => Strategy::Split(&["foulCount", "techFoulCount"], Separator::Bullet),
    "ownership points" => Strategy::Occurrence(&["autoOwnershipPoints", "teleopOwnershipPoints"]),
    "auto-run" => Strategy::Robots("autoRobot", Separator::Bullet),
    "auto-run points" => Strategy::Tally("autoRunPoints", set_auto_run),
    "switch / scale ownership seconds" => Strategy::Custom(ownership_seconds),
    "switch / scale boost seconds" => Strategy::Split(&["teleopSwitchBoostSec", "teleopScaleBoostSec"], Separator::Newline),
    "switch / scale force seconds" => Strategy::Split(&["teleopSwitchForceSec", "teleopScaleForceSec"], Separator::Newline),
    "vault points" => Strategy::Int("vaultPoints"),
    "endgame" => Strategy::Robots("endgameRobot", Separator::Bullet),
    "endgame points" => Strategy::Tally("endgamePoints", set_endgame),
    "force powerup" => Strategy::Custom(force_powerup),
    "boost powerup" => Strategy::Custom(boost_powerup),
    "levitate powerup" => Strategy::Custom(levitate_powerup),
};

const SCHEMA: Schema = &[
    FieldSpec::int("adjustPoints"),
    FieldSpec::int("autoOwnershipPoints"),
    FieldSpec::int("autoPoints"),
    FieldSpec::bool("autoQuestRankingPoint"),
    FieldSpec::str("autoRobot1"),
    FieldSpec::str("autoRobot2"),
    FieldSpec::str("autoRobot3"),
    FieldSpec::int("autoRunPoints"),
    FieldSpec::int("autoScaleOwnershipSec"),
    FieldSpec::bool("autoSwitchAtZero"),
    FieldSpec::int("autoSwitchOwnershipSec"),
    FieldSpec::int("endgamePoints"),
    FieldSpec::str("endgameRobot1"),
    FieldSpec::str("endgameRobot2"),
    FieldSpec::str("endgameRobot3"),
    FieldSpec::bool("faceTheBossRankingPoint"),
    FieldSpec::int("foulCount"),
    FieldSpec::int("foulPoints"),
    FieldSpec::int("rp"),
    FieldSpec::str("tba_gameData"),
    FieldSpec::int("techFoulCount"),
    FieldSpec::int("teleopOwnershipPoints"),
    FieldSpec::int("teleopPoints"),
    FieldSpec::int("teleopScaleBoostSec"),
    FieldSpec::int("teleopScaleForceSec"),
    FieldSpec::int("teleopScaleOwnershipSec"),
    FieldSpec::int("teleopSwitchBoostSec"),
    FieldSpec::int("teleopSwitchForceSec"),
    FieldSpec::int("teleopSwitchOwnershipSec"),
    FieldSpec::int("totalPoints"),
    FieldSpec::int("vaultBoostPlayed"),
    FieldSpec::int("vaultBoostTotal"),
    FieldSpec::int("vaultForcePlayed"),
    FieldSpec::int("vaultForceTotal"),
    FieldSpec::int("vaultLevitatePlayed"),
    FieldSpec::int("vaultLevitateTotal"),
    FieldSpec::int("vaultPoints"),
];

/// Auto-run points for a full alliance crossing.
const AUTO_QUEST_RUN_POINTS: i64 = 15;
const FACE_THE_BOSS_POINTS: i64 = 90;
const LEVITATE_CUBES: i64 = 3;

impl Season for Y2018 {
    type Acc = Acc2018;
    type State = ();

    const YEAR: u16 = 2018;
    const LAYOUT: Layout = Layout::BlueLabelRed;
    const SCHEMA: Schema = SCHEMA;
    const BONUSES: &'static [&'static str] = &["autoQuestRankingPoint", "faceTheBossRankingPoint"];
    const PLAYOFF: &'static [PlayoffRule] = &[
        PlayoffRule::verified("rp", Neutral::Int(0)),
        PlayoffRule::verified("autoQuestRankingPoint", Neutral::Absent),
        PlayoffRule::verified("faceTheBossRankingPoint", Neutral::Bool(false)),
    ];

    fn rules() -> &'static phf::Map<&'static str, Strategy<Self>> {
        &RULES
    }

    /// The power cube game data shown under the table, same for both alliances.
    fn finish(scan: &mut Scan<Self>, doc: &ReportDoc) -> Result<(), FieldError> {
        let game_data = doc.select_text(&GAME_DATA);
        scan.sheet()
            .set_both("tba_gameData", game_data)
            .map_err(|e| FieldError::new("tba_gameData", e))
    }

    /// There is no way to tell whether the switch was lost before T=0, so it wasn't.
    fn derive(scan: &mut Scan<Self>) -> Result<(), DecodeError> {
        for a in Alliance::ALL {
            let at_zero = scan.acc.get(a).auto_switch_sec > 0;
            scan.sheet().set(a, "autoSwitchAtZero", at_zero)?;
        }
        Ok(())
    }

    fn bonus(scan: &Scan<Self>, a: Alliance, i: usize) -> Option<bool> {
        let acc = scan.acc.get(a);
        match i {
            0 => Some(acc.auto_switch_sec > 0 && acc.auto_run_points == AUTO_QUEST_RUN_POINTS),
            1 => Some(acc.endgame_points >= FACE_THE_BOSS_POINTS),
            _ => None,
        }
    }
}

fn set_auto_run(acc: &mut Acc2018, n: i64) {
    acc.auto_run_points = n;
}

fn set_endgame(acc: &mut Acc2018, n: i64) {
    acc.endgame_points = n;
}

/// `switch\nscale` seconds; the first row is auto, the second teleop.
fn ownership_seconds(scan: &mut Scan<Y2018>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    let period = match row.occurrence {
        0 => "auto",
        1 => "teleop",
        n => {
            return Err(DecodeError::Invalid(format!("row repeated {} times, expected at most 2", n + 1)));
        }
    };
    let switch = join!(period, "SwitchOwnershipSec");
    let scale = join!(period, "ScaleOwnershipSec");
    let v = PerAlliance::try_from_fn(|a| -> Result<(i64, i64), DecodeError> {
        let parts = expect_parts(Separator::Newline.split(&row.text(a)), 2)?;
        Ok((
            parse_int(&parts[0], &format!("{} {switch}", a.key()))?,
            parse_int(&parts[1], &format!("{} {scale}", a.key()))?,
        ))
    })?;
    scan.sheet().set_many(vec![
        (switch, v.map(|_, (sw, _)| FieldValue::Int(sw))),
        (scale, v.map(|_, (_, sc)| FieldValue::Int(sc))),
    ])?;
    if period == "auto" {
        for a in Alliance::ALL {
            scan.acc.get_mut(a).auto_switch_sec = v.get(a).0;
        }
    }
    Ok(())
}

/// `(total, played)` of a force or boost powerup cell. The leading digit is the
/// cube count, the trailing one the level played.
fn powerup_counts(text: &str, what: &str) -> Result<(i64, i64), DecodeError> {
    let total = leading_digit(text, what)?;
    if total == 0 || text.ends_with("Not Played") {
        return Ok((total, 0));
    }
    let last = text.chars().last().map(String::from).unwrap_or_default();
    Ok((total, parse_int(&last, &join!(what, " played"))?))
}

fn leading_digit(text: &str, what: &str) -> Result<i64, DecodeError> {
    let first = text.chars().next().map(String::from).unwrap_or_default();
    parse_int(&first, &join!(what, " total"))
}

fn vault_powerup(scan: &mut Scan<Y2018>, row: &ScoreRow<'_>, powerup: &str) -> Result<(), DecodeError> {
    let v = PerAlliance::try_from_fn(|a| powerup_counts(&row.text(a), &format!("{} {powerup}", a.key())))?;
    scan.sheet().set_many(vec![
        (format!("vault{powerup}Total"), v.map(|_, (t, _)| FieldValue::Int(t))),
        (format!("vault{powerup}Played"), v.map(|_, (_, p)| FieldValue::Int(p))),
    ])
}

fn force_powerup(scan: &mut Scan<Y2018>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    vault_powerup(scan, row, "Force")
}

fn boost_powerup(scan: &mut Scan<Y2018>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    vault_powerup(scan, row, "Boost")
}

/// Levitate is all or nothing: played only with three cubes in.
fn levitate_powerup(scan: &mut Scan<Y2018>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    let v = PerAlliance::try_from_fn(|a| -> Result<(i64, i64), DecodeError> {
        let text = row.text(a);
        let total = leading_digit(&text, &format!("{} Levitate", a.key()))?;
        let played = if total == LEVITATE_CUBES && text.ends_with(", Played") { LEVITATE_CUBES } else { 0 };
        Ok((total, played))
    })?;
    scan.sheet().set_many(vec![
        (s!("vaultLevitateTotal"), v.map(|_, (t, _)| FieldValue::Int(t))),
        (s!("vaultLevitatePlayed"), v.map(|_, (_, p)| FieldValue::Int(p))),
    ])
}
