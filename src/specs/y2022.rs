// src/specs/y2022.rs
//! Rapid React. `label | blue | red` reports; cargo rows depend on the match phase.
use phf::phf_map;

use super::Season;
use crate::breakdown::{FieldSpec, FieldValue, PerAlliance, Schema};
use crate::core::html::{TITLED, TITLED_DIV};
use crate::core::sanitize::parse_int;
use crate::core::Separator;
use crate::engine::assign::write_each;
use crate::engine::{Edge, Layout, Neutral, Phase, PlayoffRule, Scan, ScoreRow, Strategy, TotalSlot, Totals};
use crate::error::DecodeError;

pub struct Y2022;

static RULES: phf::Map<&'static str, Strategy<Y2022>> = phf_map! {
    "teams" => Strategy::Teams(Separator::BulletOrNewline),
    "final score" => Strategy::FinalScore,
    "ranking points" => Strategy::Int("rp"),
    "autonomous points" => Strategy::Total("autoPoints", TotalSlot::Auto),
    "teleop points" => Strategy::Total("teleopPoints", TotalSlot::Teleop),
    "foul points" => Strategy::Total("foulPoints", TotalSlot::Fouls),
    "fouls/techs committed" => Strategy::Split(&["foulCount", "techFoulCount"], Separator::Bullet),
    "auto cargo total scored" => Strategy::Int("autoCargoTotal"),
    "teleop cargo total scored" => Strategy::Int("teleopCargoTotal"),
    "match cargo total scored" => Strategy::Int("matchCargoTotal"),
    "endgame points" => Strategy::Int("endgamePoints"),
    "taxi points" => Strategy::Int("autoTaxiPoints"),
    "adjustments" => Strategy::Signed("adjustPoints"),
    "taxi" => Strategy::RobotIcons("taxiRobot"),
    "cargo points" => Strategy::Phase("CargoPoints"),
    "quintet achieved?" => Strategy::Icon("quintetAchieved"),
    "lower hub cargo scored" => Strategy::Custom(lower_hub),
    "upper hub cargo scored" => Strategy::Custom(upper_hub),
    "endgame" => Strategy::Robots("endgameRobot", Separator::Newline),
    "achievement badges" => Strategy::Custom(badges),
};

const BADGES: &[(&str, &str)] = &[
    ("Cargo Bonus Ranking Point Achieved", "cargoBonusRankingPoint"),
    ("Hangar Bonus Ranking Point Achieved", "hangarBonusRankingPoint"),
];

const HUB_EXITS: usize = 4;

const SCHEMA: Schema = &[
    FieldSpec::int("adjustPoints"),
    FieldSpec::int("autoCargoLowerBlue"),
    FieldSpec::int("autoCargoLowerFar"),
    FieldSpec::int("autoCargoLowerNear"),
    FieldSpec::int("autoCargoLowerRed"),
    FieldSpec::int("autoCargoPoints"),
    FieldSpec::int("autoCargoTotal"),
    FieldSpec::int("autoCargoUpperBlue"),
    FieldSpec::int("autoCargoUpperFar"),
    FieldSpec::int("autoCargoUpperNear"),
    FieldSpec::int("autoCargoUpperRed"),
    FieldSpec::int("autoPoints"),
    FieldSpec::int("autoTaxiPoints"),
    FieldSpec::bool("cargoBonusRankingPoint"),
    FieldSpec::int("endgamePoints"),
    FieldSpec::str("endgameRobot1"),
    FieldSpec::str("endgameRobot2"),
    FieldSpec::str("endgameRobot3"),
    FieldSpec::int("foulCount"),
    FieldSpec::int("foulPoints"),
    FieldSpec::bool("hangarBonusRankingPoint"),
    FieldSpec::int("matchCargoTotal"),
    FieldSpec::bool("quintetAchieved"),
    FieldSpec::int("rp"),
    FieldSpec::str("taxiRobot1"),
    FieldSpec::str("taxiRobot2"),
    FieldSpec::str("taxiRobot3"),
    FieldSpec::int("techFoulCount"),
    FieldSpec::int("teleopCargoLowerBlue"),
    FieldSpec::int("teleopCargoLowerFar"),
    FieldSpec::int("teleopCargoLowerNear"),
    FieldSpec::int("teleopCargoLowerRed"),
    FieldSpec::int("teleopCargoPoints"),
    FieldSpec::int("teleopCargoTotal"),
    FieldSpec::int("teleopCargoUpperBlue"),
    FieldSpec::int("teleopCargoUpperFar"),
    FieldSpec::int("teleopCargoUpperNear"),
    FieldSpec::int("teleopCargoUpperRed"),
    FieldSpec::int("teleopPoints"),
    FieldSpec::int("totalPoints"),
];

impl Season for Y2022 {
    type Acc = Totals;
    type State = ();

    const YEAR: u16 = 2022;
    const LAYOUT: Layout = Layout::LabelBlueRed;
    const SCHEMA: Schema = SCHEMA;
    const PHASE_EDGES: &'static [(&'static str, Edge)] = &[
        ("taxi", Edge::Before(Phase::Auto)),
        ("autonomous points", Edge::After(Some(Phase::Teleop))),
        ("teleop points", Edge::After(None)),
    ];
    const BONUSES: &'static [&'static str] = &["cargoBonusRankingPoint", "hangarBonusRankingPoint"];
    const PLAYOFF: &'static [PlayoffRule] = &[
        PlayoffRule::verified("rp", Neutral::Int(0)),
        PlayoffRule::verified("cargoBonusRankingPoint", Neutral::Bool(false)),
        PlayoffRule::verified("hangarBonusRankingPoint", Neutral::Bool(false)),
    ];

    fn rules() -> &'static phf::Map<&'static str, Strategy<Self>> {
        &RULES
    }
}

fn lower_hub(scan: &mut Scan<Y2022>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    hub_cargo(scan, row, "Lower")
}

fn upper_hub(scan: &mut Scan<Y2022>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    hub_cargo(scan, row, "Upper")
}

/// Four `div[title]` counters, one per hub exit; the exit is the title's second word.
fn hub_cargo(scan: &mut Scan<Y2022>, row: &ScoreRow<'_>, hub: &str) -> Result<(), DecodeError> {
    let phase = scan.phase.require()?;
    let v = PerAlliance::try_from_fn(|a| -> Result<Vec<(String, FieldValue)>, DecodeError> {
        let exits = row.cell(a).find(&TITLED_DIV);
        if exits.len() != HUB_EXITS {
            return Err(DecodeError::Length { expected: HUB_EXITS, found: exits.len() });
        }
        exits
            .iter()
            .map(|exit| -> Result<(String, FieldValue), DecodeError> {
                let title = exit.attr("title").unwrap_or_default();
                let name = title
                    .split(' ')
                    .nth(1)
                    .ok_or_else(|| DecodeError::Invalid(format!("hub exit title {title:?}")))?;
                let n = parse_int(&exit.text(), &format!("{} {hub} hub {title}", a.key()))?;
                Ok((format!("{}Cargo{hub}{name}", phase.prefix()), FieldValue::Int(n)))
            })
            .collect()
    })?;
    write_each(scan, v)
}

/// Each known badge title present in the cell sets its ranking point flag.
fn badges(scan: &mut Scan<Y2022>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    let titles = PerAlliance::from_fn(|a| {
        row.cell(a)
            .find(&TITLED)
            .iter()
            .filter_map(|c| c.attr("title"))
            .map(String::from)
            .collect::<Vec<_>>()
    });
    let writes = BADGES
        .iter()
        .map(|(title, field)| {
            let pair = PerAlliance::from_fn(|a| FieldValue::Bool(titles.get(a).iter().any(|t| t.as_str() == *title)));
            (s!(*field), pair)
        })
        .collect();
    scan.sheet().set_many(writes)
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

    fn hub(values: [(&str, i64); 4]) -> String {
        values
            .iter()
            .map(|(exit, n)| format!(r#"<div title="Exit {exit}">{n}</div>"#))
            .collect()
    }

    #[test]
    fn hub_cargo_is_phase_prefixed() {
        let d = doc(&format!(
            r#"<tr><td>Taxi</td><td><i class="fa fa-check"></i><i class="fa fa-times"></i><i class="fa fa-check"></i></td>
                   <td><i class="fa fa-times"></i><i class="fa fa-times"></i><i class="fa fa-times"></i></td></tr>
               <tr><td>Upper Hub Cargo Scored</td><td>{}</td><td>{}</td></tr>
               <tr><td>Autonomous Points</td><td>0</td><td>0</td></tr>
               <tr><td>Teleop Points</td><td>0</td><td>0</td></tr>"#,
            hub([("Blue", 1), ("Far", 2), ("Near", 0), ("Red", 3)]),
            hub([("Near", 4), ("Red", 0), ("Blue", 0), ("Far", 1)]),
        ));
        let out = engine::run::<Y2022>(&d, &ParseConfig::lenient()).unwrap();
        let sb = &out.score_breakdown;
        assert_eq!(sb.int(Blue, "autoCargoUpperFar"), Some(2));
        assert_eq!(sb.int(Red, "autoCargoUpperNear"), Some(4));
        assert_eq!(sb.string(Blue, "taxiRobot2"), Some("No"));
        assert_eq!(sb.string(Blue, "taxiRobot3"), Some("Yes"));
    }

    #[test]
    fn hub_cargo_needs_a_phase_and_four_exits() {
        let d = doc(&format!(
            r#"<tr><td>Lower Hub Cargo Scored</td><td>{}</td><td>{}</td></tr>"#,
            hub([("Blue", 1), ("Far", 2), ("Near", 0), ("Red", 3)]),
            hub([("Blue", 1), ("Far", 2), ("Near", 0), ("Red", 3)]),
        ));
        let Err(ParseError::Fields { errors, .. }) = engine::run::<Y2022>(&d, &ParseConfig::lenient()) else {
            panic!("expected field errors");
        };
        assert_eq!(errors.for_label("lower hub cargo scored").unwrap().source, DecodeError::NoPhase);

        let d = doc(
            r#"<tr><td>Taxi Points</td><td>2</td><td>4</td></tr>
               <tr><td>Autonomous Points</td><td>2</td><td>4</td></tr>
               <tr><td>Lower Hub Cargo Scored</td><td><div title="Exit Blue">1</div></td><td></td></tr>"#,
        );
        let Err(ParseError::Fields { errors, partial }) = engine::run::<Y2022>(&d, &ParseConfig::lenient()) else {
            panic!("expected field errors");
        };
        assert!(matches!(
            errors.for_label("lower hub cargo scored").unwrap().source,
            DecodeError::Length { expected: 4, found: 1 }
        ));
        assert!(!partial.score_breakdown.contains(Blue, "teleopCargoLowerBlue"));
        assert_eq!(partial.score_breakdown.int(Red, "autoTaxiPoints"), Some(4));
    }

    #[test]
    fn badges_become_flags() {
        let d = doc(
            r#"<tr><td>Achievement Badges</td>
                   <td><span title="Hangar Bonus Ranking Point Achieved"></span></td>
                   <td><span title="Cargo Bonus Ranking Point Achieved"></span><span title="Hangar Bonus Ranking Point Achieved"></span></td></tr>"#,
        );
        let out = engine::run::<Y2022>(&d, &ParseConfig::lenient()).unwrap();
        let sb = &out.score_breakdown;
        assert_eq!(sb.flag(Blue, "cargoBonusRankingPoint"), Some(false));
        assert_eq!(sb.flag(Blue, "hangarBonusRankingPoint"), Some(true));
        assert_eq!(sb.flag(Red, "cargoBonusRankingPoint"), Some(true));
        // no final score row: tie, 1 + bonuses
        assert_eq!(sb.int(Blue, "rp"), Some(2));
        assert_eq!(sb.int(Red, "rp"), Some(3));
    }
}
