// src/specs/y2023.rs
//! Charged Up. Adds the community grid, a widget spread over a header row and
//! three grid rows, once in auto and once in teleop.
use std::collections::BTreeMap;

use phf::phf_map;

use super::Season;
use crate::breakdown::{Alliance, FieldSpec, FieldValue, Link, PerAlliance, Schema};
use crate::core::html::{SPAN_ICON, SVG, TITLED};
use crate::core::{Cell, ReportDoc, Separator};
use crate::core::sanitize::expect_parts;
use crate::engine::assign::{ints, write_ints, write_robots};
use crate::engine::{
    Accumulator, Edge, Layout, Neutral, Phase, PlayoffRule, Scan, ScoreRow, Strategy, TotalSlot, Totals,
};
use crate::error::{DecodeError, FieldError};

pub struct Y2023;

#[derive(Debug, Default)]
pub struct Acc2023 {
    totals: Totals,
    auto_charge_station: i64,
    teleop_charge_station: i64,
    link: i64,
}

impl Accumulator for Acc2023 {
    fn totals(&self) -> &Totals {
        &self.totals
    }
    fn totals_mut(&mut self) -> &mut Totals {
        &mut self.totals
    }
    fn adjust_extra(&self) -> i64 {
        self.link
    }
}

static RULES: phf::Map<&'static str, Strategy<Y2023>> = phf_map! {
    "teams" => Strategy::Teams(Separator::BulletOrNewline),
    "final score" => Strategy::FinalScore,
    "ranking points" => Strategy::Int("rp"),
    "autonomous points" => Strategy::Total("autoPoints", TotalSlot::Auto),
    "teleop points" => Strategy::Total("teleopPoints", TotalSlot::Teleop),
    "foul points" => Strategy::Total("foulPoints", TotalSlot::Fouls),
    "fouls/techs committed" => Strategy::Split(&["foulCount", "techFoulCount"], Separator::Bullet),
    "coop game piece count" => Strategy::Int("coopGamePieceCount"),
    "mobility points" => Strategy::Int("autoMobilityPoints"),
    "endgame park points" => Strategy::Int("endGameParkPoints"),
    "extra game piece count" => Strategy::Int("extraGamePieceCount"),
    "adjustments" => Strategy::Signed("adjustPoints"),
    "game piece count" => Strategy::Phase("GamePieceCount"),
    "game piece points" => Strategy::Phase("GamePiecePoints"),
    "auto charge station" => Strategy::Str("autoBridgeState"),
    "endgame charge station" => Strategy::Str("endGameBridgeState"),
    "docked?" => Strategy::Icon("autoDocked"),
    "activation bonus?" => Strategy::Icon("activationBonusAchieved"),
    "sustainability bonus?" => Strategy::Icon("sustainabilityBonusAchieved"),
    "coopertition criteria met?" => Strategy::Icon("coopertitionCriteriaMet"),
    "mobility" => Strategy::RobotIcons("mobilityRobot"),
    "charge station points" => Strategy::Custom(charge_station_points),
    "charge station" => Strategy::Custom(charge_station_robots),
    "link points" => Strategy::Tally("linkPoints", add_link),
    "penalties" => Strategy::Custom(penalties),
    "community" => Strategy::Section(open_community),
};

const PENALTIES: &[(&str, &str)] = &[("G405", "g405Penalty"), ("H111", "h111Penalty")];

const SCHEMA: Schema = &[
    FieldSpec::bool("activationBonusAchieved"),
    FieldSpec::int("adjustPoints"),
    FieldSpec::str("autoBridgeState"),
    FieldSpec::int("autoChargeStationPoints"),
    FieldSpec::str("autoChargeStationRobot1"),
    FieldSpec::str("autoChargeStationRobot2"),
    FieldSpec::str("autoChargeStationRobot3"),
    FieldSpec::grid("autoCommunity"),
    FieldSpec::bool("autoDocked"),
    FieldSpec::int("autoGamePieceCount"),
    FieldSpec::int("autoGamePiecePoints"),
    FieldSpec::int("autoMobilityPoints"),
    FieldSpec::int("autoPoints"),
    FieldSpec::int("coopGamePieceCount"),
    FieldSpec::bool("coopertitionCriteriaMet"),
    FieldSpec::str("endGameBridgeState"),
    FieldSpec::int("endGameChargeStationPoints"),
    FieldSpec::str("endGameChargeStationRobot1"),
    FieldSpec::str("endGameChargeStationRobot2"),
    FieldSpec::str("endGameChargeStationRobot3"),
    FieldSpec::int("endGameParkPoints"),
    FieldSpec::int("extraGamePieceCount").optional(),
    FieldSpec::int("foulCount"),
    FieldSpec::int("foulPoints"),
    FieldSpec::bool("g405Penalty").optional(),
    FieldSpec::bool("h111Penalty").optional(),
    FieldSpec::int("linkPoints"),
    FieldSpec::links("links"),
    FieldSpec::str("mobilityRobot1"),
    FieldSpec::str("mobilityRobot2"),
    FieldSpec::str("mobilityRobot3"),
    FieldSpec::int("rp"),
    FieldSpec::bool("sustainabilityBonusAchieved"),
    FieldSpec::int("techFoulCount"),
    FieldSpec::grid("teleopCommunity"),
    FieldSpec::int("teleopGamePieceCount"),
    FieldSpec::int("teleopGamePiecePoints"),
    FieldSpec::int("teleopPoints"),
    FieldSpec::int("totalChargeStationPoints"),
    FieldSpec::int("totalPoints"),
];

impl Season for Y2023 {
    type Acc = Acc2023;
    /// The grid being filled, between a `Community` row and its `Top` row.
    type State = Option<PerAlliance<Community>>;

    const YEAR: u16 = 2023;
    const LAYOUT: Layout = Layout::LabelBlueRed;
    const SCHEMA: Schema = SCHEMA;
    const PHASE_EDGES: &'static [(&'static str, Edge)] = &[
        ("mobility", Edge::Before(Phase::Auto)),
        ("autonomous points", Edge::After(Some(Phase::Teleop))),
        ("teleop points", Edge::After(None)),
    ];
    const BONUSES: &'static [&'static str] = &["activationBonusAchieved", "sustainabilityBonusAchieved"];
    const PLAYOFF: &'static [PlayoffRule] = &[
        PlayoffRule::verified("rp", Neutral::Int(0)),
        PlayoffRule::unverified("activationBonusAchieved", Neutral::Bool(false)),
        PlayoffRule::unverified("sustainabilityBonusAchieved", Neutral::Bool(false)),
    ];

    fn rules() -> &'static phf::Map<&'static str, Strategy<Self>> {
        &RULES
    }

    /// While a grid is open every data row belongs to it.
    fn intercept(scan: &mut Scan<Self>, row: &ScoreRow<'_>) -> Option<Result<(), DecodeError>> {
        scan.state.as_ref()?;
        Some(community_row(scan, row))
    }

    fn finish(scan: &mut Scan<Self>, _doc: &ReportDoc) -> Result<(), FieldError> {
        match scan.state {
            Some(_) => Err(FieldError::new("community", DecodeError::Invalid(s!("grid still open at end of report")))),
            None => Ok(()),
        }
    }

    fn derive(scan: &mut Scan<Self>) -> Result<(), DecodeError> {
        for a in Alliance::ALL {
            let acc = scan.acc.get(a);
            let total = acc.auto_charge_station + acc.teleop_charge_station;
            scan.sheet().set(a, "totalChargeStationPoints", total)?;
        }
        Ok(())
    }
}

/* ---------------- charge station ---------------- */

/// Teleop charge station rows are named for the endgame.
fn station_prefix(phase: Phase) -> &'static str {
    match phase {
        Phase::Auto => "auto",
        Phase::Teleop => "endGame",
    }
}

fn charge_station_points(scan: &mut Scan<Y2023>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    let phase = scan.phase.require()?;
    let field = join!(station_prefix(phase), "ChargeStationPoints");
    let v = ints(row, &field)?;
    write_ints(scan, &field, v)?;
    for a in Alliance::ALL {
        let acc = scan.acc.get_mut(a);
        match phase {
            Phase::Auto => acc.auto_charge_station = *v.get(a),
            Phase::Teleop => acc.teleop_charge_station = *v.get(a),
        }
    }
    Ok(())
}

fn charge_station_robots(scan: &mut Scan<Y2023>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    let phase = scan.phase.require()?;
    let prefix = join!(station_prefix(phase), "ChargeStationRobot");
    let v = PerAlliance::try_from_fn(|a| expect_parts(Separator::Newline.split(&row.text(a)), 3))?;
    write_robots(scan, &prefix, v)
}

fn add_link(acc: &mut Acc2023, n: i64) {
    acc.link = n;
}

/// A penalty is set when its rule code shows in the cell text or a tooltip.
fn penalties(scan: &mut Scan<Y2023>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    let text = PerAlliance::from_fn(|a| {
        let cell = row.cell(a);
        let mut all = cell.text();
        for t in cell.find(&TITLED).iter().filter_map(|c| c.attr("title")) {
            all.push('\n');
            all.push_str(t);
        }
        all
    });
    let writes = PENALTIES
        .iter()
        .map(|(code, field)| (s!(*field), text.as_ref().map(|_, t| FieldValue::Bool(t.contains(code)))))
        .collect();
    scan.sheet().set_many(writes)
}

/* ---------------- community grid ---------------- */

const GRID_WIDTH: usize = 9;
const LINK_SIZE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GridRow {
    Bottom,
    Middle,
    Top,
}

impl GridRow {
    const ALL: [GridRow; 3] = [GridRow::Bottom, GridRow::Middle, GridRow::Top];

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "bottom" => Some(GridRow::Bottom),
            "middle" => Some(GridRow::Middle),
            "top" => Some(GridRow::Top),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Key in the `<phase>Community` map.
    fn key(self) -> &'static str {
        match self {
            GridRow::Bottom => "B",
            GridRow::Middle => "M",
            GridRow::Top => "T",
        }
    }

    /// Row name in `links`.
    fn link_name(self) -> &'static str {
        match self {
            GridRow::Bottom => "Bottom",
            GridRow::Middle => "Mid",
            GridRow::Top => "Top",
        }
    }
}

#[derive(Debug, Default)]
enum Slot {
    #[default]
    Empty,
    Filled(GridLine),
    /// Row seen but undecodable; its error is already recorded.
    Broken,
}

#[derive(Debug)]
struct GridLine {
    pieces: Vec<String>,
    link_starts: Vec<usize>,
}

/// One alliance's grid, three rows of nine nodes.
#[derive(Debug, Default)]
pub struct Community {
    rows: [Slot; 3],
}

impl Community {
    fn is_complete(&self) -> bool {
        self.rows.iter().all(|s| !matches!(s, Slot::Empty))
    }

    fn is_broken(&self) -> bool {
        self.rows.iter().any(|s| matches!(s, Slot::Broken))
    }

    fn pieces(&self) -> FieldValue {
        let mut grid = BTreeMap::new();
        for r in GridRow::ALL {
            if let Slot::Filled(line) = &self.rows[r.index()] {
                grid.insert(s!(r.key()), line.pieces.clone());
            }
        }
        FieldValue::Grid(grid)
    }

    fn links(&self) -> FieldValue {
        let mut links = Vec::new();
        for r in GridRow::ALL {
            if let Slot::Filled(line) = &self.rows[r.index()] {
                for &start in &line.link_starts {
                    links.push(Link { row: s!(r.link_name()), nodes: [start, start + 1, start + 2] });
                }
            }
        }
        FieldValue::Links(links)
    }
}

fn open_community(scan: &mut Scan<Y2023>) -> Result<(), DecodeError> {
    if scan.state.is_some() {
        return Err(DecodeError::Invalid(s!("community row before the previous grid was complete")));
    }
    scan.state = Some(PerAlliance::default());
    Ok(())
}

fn community_row(scan: &mut Scan<Y2023>, row: &ScoreRow<'_>) -> Result<(), DecodeError> {
    let which = GridRow::from_label(&row.label)
        .ok_or_else(|| DecodeError::Invalid(format!("invalid community row name: {}", row.label)))?;
    let Some(grid) = scan.state.as_mut() else {
        return Ok(());
    };
    if Alliance::ALL.iter().any(|&a| !matches!(grid.get(a).rows[which.index()], Slot::Empty)) {
        return Err(DecodeError::Invalid(format!("community row {} repeated", row.label)));
    }

    let decoded = PerAlliance::try_from_fn(|a| grid_line(row.cell(a)));
    let result = match decoded {
        Ok(lines) => {
            let PerAlliance { blue, red } = lines;
            grid.blue.rows[which.index()] = Slot::Filled(blue);
            grid.red.rows[which.index()] = Slot::Filled(red);
            Ok(())
        }
        Err(e) => {
            grid.blue.rows[which.index()] = Slot::Broken;
            grid.red.rows[which.index()] = Slot::Broken;
            Err(e)
        }
    };

    if grid.blue.is_complete() && grid.red.is_complete() {
        if let Some(done) = scan.state.take() {
            if !(done.blue.is_broken() || done.red.is_broken()) {
                flush(scan, &done)?;
            }
        }
    }
    result
}

fn flush(scan: &mut Scan<Y2023>, grid: &PerAlliance<Community>) -> Result<(), DecodeError> {
    let phase = scan.phase.require()?;
    let mut writes = vec![(join!(phase.prefix(), "Community"), grid.as_ref().map(|_, c| c.pieces()))];
    if phase == Phase::Teleop {
        writes.push((s!("links"), grid.as_ref().map(|_, c| c.links())));
    }
    scan.sheet().set_many(writes)
}

/// Nine node icons; link members come in runs of three, clustered from the left.
fn grid_line(cell: Cell<'_>) -> Result<GridLine, DecodeError> {
    let icons = cell.find(&SPAN_ICON);
    if icons.len() != GRID_WIDTH {
        return Err(DecodeError::IconCount { expected: GRID_WIDTH, found: icons.len() });
    }
    let pieces = icons.iter().map(|icon| node_piece(*icon)).collect::<Result<Vec<_>, _>>()?;
    let members: Vec<bool> = icons.iter().map(|icon| icon.has_class("community-img-link")).collect();

    let mut link_starts = Vec::new();
    let mut i = 0;
    while i < GRID_WIDTH {
        if members[i] {
            link_starts.push(i);
            i += LINK_SIZE;
        } else {
            i += 1;
        }
    }
    Ok(GridLine { pieces, link_starts })
}

fn node_piece(icon: Cell<'_>) -> Result<String, DecodeError> {
    let Some(svg) = icon.find(&SVG).into_iter().next() else {
        return Err(DecodeError::IconMarkup(icon.class_list()));
    };
    let piece = if svg.has_class("bi-dot") {
        "None"
    } else if svg.has_class("bi-box") {
        "Cube"
    } else if svg.has_class("bi-cone") {
        "Cone"
    } else {
        return Err(DecodeError::IconMarkup(svg.class_list()));
    };
    Ok(s!(piece))
}
