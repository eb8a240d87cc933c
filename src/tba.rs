// src/tba.rs
//! Match codes in the results API's vocabulary (`comp_level`, `set_number`, `match_number`).
use serde::{Deserialize, Serialize};

use crate::config::consts::QUALIFICATION_LEVEL;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCode {
    pub comp_level: String,
    pub set_number: u32,
    pub match_number: u32,
}

impl MatchCode {
    pub fn new(level: &str, set_number: u32, match_number: u32) -> Self {
        Self { comp_level: s!(level), set_number, match_number }
    }

    pub fn is_playoff(&self) -> bool {
        self.comp_level != QUALIFICATION_LEVEL
    }
}

/// Playoff format of the event; decides how FMS playoff match ids map to codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum BracketType {
    #[default]
    Bracket8Team,
    RoundRobin6Team,
    DoubleElim8Team,
    DoubleElim4Team,
    Custom,
}

struct Round {
    level: &'static str,
    sets: u32,
    matches_per_set: u32,
}

const fn round(level: &'static str, sets: u32, matches_per_set: u32) -> Round {
    Round { level, sets, matches_per_set }
}

// Finals carry 6 slots to leave room for overtime matches.
const BRACKET_8: &[Round] = &[round("qf", 4, 3), round("sf", 2, 3), round("f", 1, 6)];
const ROUND_ROBIN_6: &[Round] = &[round("sf", 1, 15), round("f", 1, 6)];
const DOUBLE_ELIM_8: &[Round] = &[round("sf", 13, 1), round("f", 1, 6)];
const DOUBLE_ELIM_4: &[Round] = &[round("sf", 5, 1), round("f", 1, 6)];

impl BracketType {
    fn rounds(self) -> &'static [Round] {
        match self {
            BracketType::Bracket8Team => BRACKET_8,
            BracketType::RoundRobin6Team => ROUND_ROBIN_6,
            BracketType::DoubleElim8Team => DOUBLE_ELIM_8,
            BracketType::DoubleElim4Team => DOUBLE_ELIM_4,
            BracketType::Custom => &[],
        }
    }

    /// Every code of the bracket, indexed from FMS playoff match 1.
    /// Within a round sets rotate fastest: qf1-1, qf2-1, ..., qf1-2.
    pub fn codes(self) -> Vec<MatchCode> {
        let mut out = Vec::new();
        for r in self.rounds() {
            for m in 1..=r.matches_per_set {
                for set in 1..=r.sets {
                    out.push(MatchCode::new(r.level, set, m));
                }
            }
        }
        out
    }
}

/// Code for FMS playoff match `match_id` (1-based), if the bracket has one.
pub fn playoff_code(bracket: BracketType, match_id: u32) -> Option<MatchCode> {
    let mut remaining = match_id.checked_sub(1)?;
    for r in bracket.rounds() {
        let size = r.sets * r.matches_per_set;
        if remaining < size {
            return Some(MatchCode::new(
                r.level,
                remaining % r.sets + 1,
                remaining / r.sets + 1,
            ));
        }
        remaining -= size;
    }
    None
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum MatchLevel {
    Qualification,
    Playoff,
}

/// Override first, then the playoff bracket, then a plain qualification code.
pub fn resolve_match_code(
    level: MatchLevel,
    match_number: u32,
    bracket: BracketType,
    code_override: Option<&MatchCode>,
) -> Option<MatchCode> {
    if let Some(code) = code_override {
        return Some(code.clone());
    }
    match level {
        MatchLevel::Playoff => playoff_code(bracket, match_number),
        MatchLevel::Qualification => Some(MatchCode::new(QUALIFICATION_LEVEL, 1, match_number)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(level: &str, set: u32, m: u32) -> Option<MatchCode> {
        Some(MatchCode::new(level, set, m))
    }

    #[test]
    fn bracket_8_team_rotates_sets() {
        let b = BracketType::Bracket8Team;
        assert_eq!(playoff_code(b, 1), code("qf", 1, 1));
        assert_eq!(playoff_code(b, 4), code("qf", 4, 1));
        assert_eq!(playoff_code(b, 5), code("qf", 1, 2));
        assert_eq!(playoff_code(b, 12), code("qf", 4, 3));
        assert_eq!(playoff_code(b, 13), code("sf", 1, 1));
        assert_eq!(playoff_code(b, 14), code("sf", 2, 1));
        assert_eq!(playoff_code(b, 18), code("sf", 2, 3));
        assert_eq!(playoff_code(b, 19), code("f", 1, 1));
        assert_eq!(playoff_code(b, 24), code("f", 1, 6));
        assert_eq!(playoff_code(b, 25), None);
        assert_eq!(playoff_code(b, 0), None);
    }

    #[test]
    fn round_robin_6_team() {
        let b = BracketType::RoundRobin6Team;
        assert_eq!(playoff_code(b, 15), code("sf", 1, 15));
        assert_eq!(playoff_code(b, 16), code("f", 1, 1));
        assert_eq!(playoff_code(b, 21), code("f", 1, 6));
        assert_eq!(playoff_code(b, 22), None);
    }

    #[test]
    fn double_elimination() {
        let b = BracketType::DoubleElim8Team;
        assert_eq!(playoff_code(b, 13), code("sf", 13, 1));
        assert_eq!(playoff_code(b, 14), code("f", 1, 1));
        assert_eq!(playoff_code(b, 20), None);

        let b = BracketType::DoubleElim4Team;
        assert_eq!(playoff_code(b, 5), code("sf", 5, 1));
        assert_eq!(playoff_code(b, 11), code("f", 1, 6));
        assert_eq!(playoff_code(b, 12), None);
    }

    #[test]
    fn custom_bracket_has_no_codes() {
        assert!(BracketType::Custom.codes().is_empty());
        assert_eq!(playoff_code(BracketType::Custom, 1), None);
    }

    #[test]
    fn codes_agree_with_lookup() {
        let b = BracketType::Bracket8Team;
        for (i, c) in b.codes().into_iter().enumerate() {
            assert_eq!(playoff_code(b, i as u32 + 1), Some(c));
        }
    }

    #[test]
    fn override_wins() {
        let forced = MatchCode::new("f", 1, 4);
        assert_eq!(
            resolve_match_code(MatchLevel::Qualification, 40, BracketType::Bracket8Team, Some(&forced)),
            Some(forced.clone())
        );
        assert!(forced.is_playoff());
        assert_eq!(
            resolve_match_code(MatchLevel::Qualification, 40, BracketType::Bracket8Team, None),
            code("qm", 1, 40)
        );
        assert_eq!(
            resolve_match_code(MatchLevel::Playoff, 13, BracketType::Bracket8Team, None),
            code("sf", 1, 1)
        );
    }
}
