// src/specs/y2019.rs
//! Destination: Deep Space. `blue | label | red`, with cargo ship and rocket
//! rows packed as `N`/`P`/`B` tokens.
use phf::phf_map;

use super::Season;
use crate::breakdown::{Alliance, FieldSpec, FieldValue, PerAlliance, Schema};
use crate::core::sanitize::expect_parts;
use crate::core::Separator;
use crate::engine::assign::write_robots;
use crate::engine::{Accumulator, Layout, Neutral, PlayoffRule, Scan, ScoreRow, Strategy, TotalSlot, Totals};
use crate::error::DecodeError;

pub struct Y2019;

#[derive(Debug, Default)]
pub struct Acc2019 {
    totals: Totals,
    rocket_complete: bool,
    hab_climb_points: i64,
    /// Panels seen on the cargo ship and rockets, pre-loaded ones included.
    hatch_panels: i64,
    /// Panels placed during the match, from the points row.
    scored_hatch_panels: i64,
}

impl Accumulator for Acc2019 {
    fn totals(&self) -> &Totals {
        &self.totals
    }
    fn totals_mut(&mut self) -> &mut Totals {
        &mut self.totals
    }
}

static RULES: phf::Map<&'static str, Strategy<Y2019>> = phf_map! {
    "teams" => Strategy::Teams(Separator::Bullet),
    "final score" => Strategy::FinalScore,
    "ranking points" => Strategy::Skip,
    "sandstorm" => Strategy::Total("autoPoints", TotalSlot::Auto),
    "teleop" => Strategy::Total("teleopPoints", TotalSlot::Teleop),
    "foul points" => Strategy::Total("foulPoints", TotalSlot::Fouls),
    "fouls/techs committed" => Strategy::Split(&["foulCount", "techFoulCount"], Separator::Bullet),
    "pre-match robot levels" => Strategy::Robots("preMatchLevelRobot", Separator::Bullet),
    "hab line" => Strategy::Custom(hab_line),
    "hab line in sandstorm" => Strategy::Skip,
    "hab endgame climb" => Strategy::Robots("endgameRobot", Separator::Bullet),
    "cargoships" => Strategy::Custom(cargo_ship),
    "far siderocket" => Strategy::Custom(far_rocket),
    "scoring table siderocket" => Strategy::Custom(near_rocket),
    "cargo points" => Strategy::Int("cargoPoints"),
    "hab climb points" => Strategy::Tally("habClimbPoints", set_hab_climb),
    "hatch panel points" => Strategy::Tally("hatchPanelPoints", set_hatch_panel_points),
    "sandstorm bonus points" => Strategy::Int("sandStormBonusPoints"),
    "adjustments" => Strategy::Signed("adjustPoints"),
};

const SCHEMA: Schema = &[
    FieldSpec::int("adjustPoints"),
    FieldSpec::int("autoPoints"),
    FieldSpec::str("bay1"),
    FieldSpec::str("bay2"),
    FieldSpec::str("bay3"),
    FieldSpec::str("bay4"),
    FieldSpec::str("bay5"),
    FieldSpec::str("bay6"),
    FieldSpec::str("bay7"),
    FieldSpec::str("bay8"),
    FieldSpec::int("cargoPoints"),
    FieldSpec::bool("completeRocketRankingPoint"),
    FieldSpec::bool("completedRocketFar"),
    FieldSpec::bool("completedRocketNear"),
    FieldSpec::str("endgameRobot1"),
    FieldSpec::str("endgameRobot2"),
    FieldSpec::str("endgameRobot3"),
    FieldSpec::int("foulCount"),
    FieldSpec::int("foulPoints"),
    FieldSpec::int("habClimbPoints"),
    FieldSpec::bool("habDockingRankingPoint"),
    FieldSpec::str("habLineRobot1"),
    FieldSpec::str("habLineRobot2"),
    FieldSpec::str("habLineRobot3"),
    FieldSpec::int("hatchPanelPoints"),
    FieldSpec::str("lowLeftRocketFar"),
    FieldSpec::str("lowLeftRocketNear"),
    FieldSpec::str("lowRightRocketFar"),
    FieldSpec::str("lowRightRocketNear"),
    FieldSpec::str("midLeftRocketFar"),
    FieldSpec::str("midLeftRocketNear"),
    FieldSpec::str("midRightRocketFar"),
    FieldSpec::str("midRightRocketNear"),
    FieldSpec::str("preMatchBay1"),
    FieldSpec::str("preMatchBay2"),
    FieldSpec::str("preMatchBay3"),
    FieldSpec::str("preMatchBay6"),
    FieldSpec::str("preMatchBay7"),
    FieldSpec::str("preMatchBay8"),
    FieldSpec::str("preMatchLevelRobot1"),
    FieldSpec::str("preMatchLevelRobot2"),
    FieldSpec::str("preMatchLevelRobot3"),
    FieldSpec::int("rp"),
    FieldSpec::int("sandStormBonusPoints"),
    FieldSpec::int("techFoulCount"),
    FieldSpec::int("teleopPoints"),
    FieldSpec::str("topLeftRocketFar"),
    FieldSpec::str("topLeftRocketNear"),
    FieldSpec::str("topRightRocketFar"),
    FieldSpec::str("topRightRocketNear"),
    FieldSpec::int("totalPoints"),
];

const BAY_NONE: &str = "None";
const BAY_PANEL: &str = "Panel";
/// Only ever a pre-match state.
const BAY_CARGO: &str = "Cargo";
const BAY_PANEL_AND_CARGO: &str = "PanelAndCargo";

const CARGO_SHIP_BAYS: usize = 8;
const ROCKET_BAYS: usize = 6;

/// Report token index of bays 1..8. The two alliances see the ship mirrored.
const BLUE_BAY_ORDER: [usize; CARGO_SHIP_BAYS] = [7, 6, 5, 4, 3, 0, 1, 2];
const RED_BAY_ORDER: [usize; CARGO_SHIP_BAYS] = [5, 6, 7, 4, 3, 2, 1, 0];

const ROCKET_SLOTS: [&str; ROCKET_BAYS] = ["topLeft", "topRight", "midLeft", "midRight", "lowLeft", "lowRight"];

/// Bays that may hold a null hatch panel, most likely first.
const NULL_PANEL_BAYS: [&str; 6] = ["1", "8", "2", "7", "3", "6"];

const HAB_DOCKING_POINTS: i64 = 15;
const POINTS_PER_PANEL: i64 = 2;

impl Season for Y2019 {
    type Acc = Acc2019;
    type State = ();

    const YEAR: u16 = 2019;
    const LAYOUT: Layout = Layout::BlueLabelRed;
    const SCHEMA: Schema = SCHEMA;
    const BONUSES: &'static [&'static str] = &["completeRocketRankingPoint", "habDockingRankingPoint"];
    const PLAYOFF: &'static [PlayoffRule] = &[
        PlayoffRule::verified("rp", Neutral::Int(0)),
        PlayoffRule::unverified("completeRocketRankingPoint", Neutral::Bool(false)),
        PlayoffRule::unverified("habDockingRankingPoint", Neutral::Bool(false)),
    ];

    fn rules() -> &'static phf::Map<&'static str, Strategy<Self>> {
        &RULES
    }

    /// Guess which bays started with a panel: any panel on the field that
    /// wasn't scored was pre-loaded.
    fn derive(scan: &mut Scan<Self>) -> Result<(), DecodeError> {
        let writes = NULL_PANEL_BAYS
            .iter()
            .enumerate()
            .map(|(i, bay)| {
                let pair = PerAlliance::from_fn(|a| {
                    let acc = scan.acc.get(a);
                    let null_panels = acc.hatch_panels - acc.scored_hatch_panels;
                    FieldValue::from(if (i as i64) < null_panels { BAY_PANEL } else { BAY_CARGO })
                });
                (join!("preMatchBay", bay), pair)
            })
            .collect();
        scan.sheet().set_many(writes)
    }

    fn bonus(scan: &Scan<Self>, a: Alliance, i: usize) -> Option<bool> {
        let acc = scan.acc.get(a);
        match i {
            0 => Some(acc.rocket_complete),
            1 => Some(acc.hab_climb_points >= HAB_DOCKING_POINTS),
            _ => None,
        }
    }
}

fn set_hab_climb(acc: &mut Acc2019, n: i64) {
    acc.hab_climb_points = n;
}

fn set_hatch_panel_points(acc: &mut Acc2019, n: i64) {
    acc.scored_hatch_panels = n / POINTS_PER_PANEL;
}

fn hab_line(scan: &mut Scan<Y2019>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    let v = PerAlliance::try_from_fn(|a| expect_parts(Separator::Bullet.split(&row.text(a)), 3))?;
    let v = v.map(|_, robots| {
        robots
            .iter()
            .map(|r| {
                if r.contains("Sandstorm") {
                    s!("CrossedHabLineInSandstorm")
                } else if r.contains("Teleop") {
                    s!("CrossedHabLineInTeleop")
                } else {
                    s!(BAY_NONE)
                }
            })
            .collect::<Vec<_>>()
    });
    write_robots(scan, "habLineRobot", v)
}

/// `N`, `P` and `B` tokens, bullets or whitespace between them.
fn bay_tokens(text: &str, expected: usize) -> Result<Vec<&'static str>, DecodeError> {
    let tokens = expect_parts(Separator::Space.split(text), expected)?;
    tokens
        .iter()
        .map(|t| match t.as_str() {
            "N" => Ok(BAY_NONE),
            "P" => Ok(BAY_PANEL),
            "B" => Ok(BAY_PANEL_AND_CARGO),
            other => Err(DecodeError::Invalid(format!("invalid cargo/rocket ship item: {other}"))),
        })
        .collect()
}

fn panel_count(bays: &[&str]) -> i64 {
    bays.iter().filter(|b| **b != BAY_NONE).count() as i64
}

fn cargo_ship(scan: &mut Scan<Y2019>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    let v = PerAlliance::try_from_fn(|a| bay_tokens(&row.text(a), CARGO_SHIP_BAYS))?;
    let writes = (0..CARGO_SHIP_BAYS)
        .map(|i| {
            let pair = PerAlliance::from_fn(|a| {
                let order = match a {
                    Alliance::Blue => BLUE_BAY_ORDER,
                    Alliance::Red => RED_BAY_ORDER,
                };
                FieldValue::from(v.get(a)[order[i]])
            });
            (format!("bay{}", i + 1), pair)
        })
        .collect();
    scan.sheet().set_many(writes)?;
    for a in Alliance::ALL {
        scan.acc.get_mut(a).hatch_panels += panel_count(v.get(a));
    }
    Ok(())
}

fn far_rocket(scan: &mut Scan<Y2019>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    rocket(scan, row, "Far")
}

fn near_rocket(scan: &mut Scan<Y2019>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    rocket(scan, row, "Near")
}

/// A rocket is complete when every bay holds both a panel and cargo.
fn rocket(scan: &mut Scan<Y2019>, row: &ScoreRow<'_>, side: &str) -> Result<(), DecodeError> {
    let v = PerAlliance::try_from_fn(|a| bay_tokens(&row.text(a), ROCKET_BAYS))?;
    let complete = v.as_ref().map(|_, bays| bays.iter().all(|b| *b == BAY_PANEL_AND_CARGO));

    let mut writes: Vec<(String, PerAlliance<FieldValue>)> = ROCKET_SLOTS
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let pair = PerAlliance::from_fn(|a| FieldValue::from(v.get(a)[i]));
            (format!("{slot}Rocket{side}"), pair)
        })
        .collect();
    writes.push((join!("completedRocket", side), complete.map(|_, c| FieldValue::Bool(c))));
    scan.sheet().set_many(writes)?;

    for a in Alliance::ALL {
        let acc = scan.acc.get_mut(a);
        acc.hatch_panels += panel_count(v.get(a));
        acc.rocket_complete |= *complete.get(a);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::Alliance::{Blue, Red};
    use crate::config::options::ParseConfig;
    use crate::core::ReportDoc;
    use crate::engine;
    use crate::error::ParseError;

    fn doc(rows: &str) -> ReportDoc {
        ReportDoc::parse(&format!("<table>{rows}</table>"))
    }

    #[test]
    fn bay_tokens_accept_bullets_and_spaces() {
        assert_eq!(bay_tokens("N • P  B\nN N P", 6).unwrap(), vec!["None", "Panel", "PanelAndCargo", "None", "None", "Panel"]);
        assert!(matches!(bay_tokens("N N", 6), Err(DecodeError::Length { expected: 6, found: 2 })));
        assert!(matches!(bay_tokens("N N N N N X", 6), Err(DecodeError::Invalid(_))));
    }

    #[test]
    fn cargo_ship_is_mirrored_per_alliance() {
        let d = doc("<tr><td>P N N N N N N B</td><td>Cargoships</td><td>P N N N N N N B</td></tr>");
        let out = engine::run::<Y2019>(&d, &ParseConfig::lenient()).unwrap();
        let sb = &out.score_breakdown;
        assert_eq!(sb.string(Blue, "bay1"), Some("PanelAndCargo"));
        assert_eq!(sb.string(Blue, "bay6"), Some("Panel"));
        assert_eq!(sb.string(Red, "bay8"), Some("Panel"));
        assert_eq!(sb.string(Red, "bay3"), Some("PanelAndCargo"));
    }

    #[test]
    fn rockets_and_pre_match_bays() {
        let d = doc(
            "<tr><td>B B B B B B</td><td>Far SideRocket</td><td>P N N N N N</td></tr>
             <tr><td>N N N N N N</td><td>Scoring Table SideRocket</td><td>N N N N N N</td></tr>
             <tr><td>P P N N N N N N</td><td>Cargoships</td><td>P N N N N N N N</td></tr>
             <tr><td>12</td><td>Hatch Panel Points</td><td>2</td></tr>
             <tr><td>15</td><td>HAB Climb Points</td><td>12</td></tr>",
        );
        let out = engine::run::<Y2019>(&d, &ParseConfig::lenient()).unwrap();
        let sb = &out.score_breakdown;
        assert_eq!(sb.flag(Blue, "completedRocketFar"), Some(true));
        assert_eq!(sb.flag(Blue, "completedRocketNear"), Some(false));
        assert_eq!(sb.string(Red, "topLeftRocketFar"), Some("Panel"));
        assert_eq!(sb.flag(Blue, "completeRocketRankingPoint"), Some(true));
        assert_eq!(sb.flag(Blue, "habDockingRankingPoint"), Some(true));
        assert_eq!(sb.flag(Red, "habDockingRankingPoint"), Some(false));
        // blue: 8 panels, 6 scored → two null panels
        assert_eq!(sb.string(Blue, "preMatchBay1"), Some("Panel"));
        assert_eq!(sb.string(Blue, "preMatchBay8"), Some("Panel"));
        assert_eq!(sb.string(Blue, "preMatchBay2"), Some("Cargo"));
        // red: 2 panels, 1 scored
        assert_eq!(sb.string(Red, "preMatchBay1"), Some("Panel"));
        assert_eq!(sb.string(Red, "preMatchBay8"), Some("Cargo"));
        // tie 1 + two bonuses
        assert_eq!(sb.int(Blue, "rp"), Some(3));
        assert_eq!(sb.int(Red, "rp"), Some(1));
    }

    #[test]
    fn disabled_bonus_is_written_false() {
        let d = doc("<tr><td>15</td><td>HAB Climb Points</td><td>3</td></tr>");
        let cfg = ParseConfig { enabled_extra_ranking_points: vec![true, false], ..ParseConfig::lenient() };
        let out = engine::run::<Y2019>(&d, &cfg).unwrap();
        assert_eq!(out.score_breakdown.flag(Blue, "habDockingRankingPoint"), Some(false));
        assert_eq!(out.score_breakdown.int(Blue, "rp"), Some(1));
    }

    #[test]
    fn hab_line_names() {
        let d = doc(
            "<tr><td>Sandstorm • Teleop • None</td><td>HAB Line</td><td>None • None</td></tr>
             <tr><td>3</td><td>Cargo Points</td><td>6</td></tr>",
        );
        let Err(ParseError::Fields { errors, partial }) = engine::run::<Y2019>(&d, &ParseConfig::lenient()) else {
            panic!("expected field errors");
        };
        assert!(matches!(
            errors.for_label("hab line").unwrap().source,
            DecodeError::Length { expected: 3, found: 2 }
        ));
        assert!(!partial.score_breakdown.contains(Blue, "habLineRobot1"));
        assert_eq!(partial.score_breakdown.int(Red, "cargoPoints"), Some(6));

        let d = doc("<tr><td>Sandstorm • Teleop • None</td><td>HAB Line</td><td>None • None • Teleop</td></tr>");
        let out = engine::run::<Y2019>(&d, &ParseConfig::lenient()).unwrap();
        assert_eq!(out.score_breakdown.string(Blue, "habLineRobot1"), Some("CrossedHabLineInSandstorm"));
        assert_eq!(out.score_breakdown.string(Blue, "habLineRobot2"), Some("CrossedHabLineInTeleop"));
        assert_eq!(out.score_breakdown.string(Red, "habLineRobot3"), Some("CrossedHabLineInTeleop"));
    }
}
