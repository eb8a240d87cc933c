// src/overlay.rs
//! Hand-entered extra match info (`<report>.extrajson`): disqualifications,
//! surrogates, a match code override and forced bonus ranking points.
//!
//! Applied to a finished breakdown; nothing here touches the report.
use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::breakdown::{Alliance, FieldValue, MatchBreakdown, PerAlliance, ScoreBreakdown};
use crate::engine::derive::checked_add;
use crate::error::{ParseError, Result};
use crate::specs;
use crate::tba::MatchCode;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraMatchInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_code_override: Option<MatchCode>,
    pub blue: ExtraAllianceInfo,
    pub red: ExtraAllianceInfo,
}

/// Season flags are `None` when the file leaves them out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraAllianceInfo {
    pub dqs: Vec<String>,
    pub surrogates: Vec<String>,
    /// 2018: flip the computed auto quest ranking point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invert_auto: Option<bool>,
    /// 2019: award the complete rocket ranking point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_rp_rocket: Option<bool>,
    /// 2019: award the HAB docking ranking point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_rp_hab_climb: Option<bool>,
    /// Bonus field → forced value. Wins over everything else.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub bonus_overrides: BTreeMap<String, bool>,
}

/// Season-specific overlay flags and the bonus field each one acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flag {
    InvertAuto,
    AddRpRocket,
    AddRpHabClimb,
}

impl Flag {
    const ALL: [Flag; 3] = [Flag::InvertAuto, Flag::AddRpRocket, Flag::AddRpHabClimb];

    fn name(self) -> &'static str {
        match self {
            Flag::InvertAuto => "invert_auto",
            Flag::AddRpRocket => "add_rp_rocket",
            Flag::AddRpHabClimb => "add_rp_hab_climb",
        }
    }

    fn season(self) -> u16 {
        match self {
            Flag::InvertAuto => 2018,
            Flag::AddRpRocket | Flag::AddRpHabClimb => 2019,
        }
    }

    fn field(self) -> &'static str {
        match self {
            Flag::InvertAuto => "autoQuestRankingPoint",
            Flag::AddRpRocket => "completeRocketRankingPoint",
            Flag::AddRpHabClimb => "habDockingRankingPoint",
        }
    }

    fn get(self, info: &ExtraAllianceInfo) -> Option<bool> {
        match self {
            Flag::InvertAuto => info.invert_auto,
            Flag::AddRpRocket => info.add_rp_rocket,
            Flag::AddRpHabClimb => info.add_rp_hab_climb,
        }
    }

    /// New value of the bonus flag given its computed value.
    fn apply(self, set: bool, current: bool) -> bool {
        match self {
            Flag::InvertAuto => current != set,
            Flag::AddRpRocket | Flag::AddRpHabClimb => current || set,
        }
    }
}

impl ExtraAllianceInfo {
    fn for_season(season: u16) -> Self {
        let mut info = Self::default();
        for flag in Flag::ALL.iter().filter(|f| f.season() == season) {
            match flag {
                Flag::InvertAuto => info.invert_auto = Some(false),
                Flag::AddRpRocket => info.add_rp_rocket = Some(false),
                Flag::AddRpHabClimb => info.add_rp_hab_climb = Some(false),
            }
        }
        info
    }
}

impl ExtraMatchInfo {
    pub fn from_json(src: &str) -> Result<Self> {
        Ok(serde_json::from_str(src)?)
    }

    /// Blank overlay with only the flags `season` understands.
    pub fn template(season: u16) -> Result<Self> {
        specs::ensure_supported(season)?;
        Ok(Self {
            match_code_override: None,
            blue: ExtraAllianceInfo::for_season(season),
            red: ExtraAllianceInfo::for_season(season),
        })
    }

    /// An override's level decides; otherwise `default`.
    pub fn is_playoff(&self, default: bool) -> bool {
        self.match_code_override
            .as_ref()
            .map(MatchCode::is_playoff)
            .unwrap_or(default)
    }

    pub fn alliance(&self, a: Alliance) -> &ExtraAllianceInfo {
        match a {
            Alliance::Blue => &self.blue,
            Alliance::Red => &self.red,
        }
    }

    /// Every flag and override must belong to `season`.
    pub fn validate(&self, season: u16) -> Result<()> {
        let bonuses = specs::bonus_fields(season)?;
        for a in Alliance::ALL {
            let info = self.alliance(a);
            for flag in Flag::ALL {
                if flag.get(info).is_some() && flag.season() != season {
                    return Err(ParseError::OverlayFlag { season, flag: flag.name() });
                }
            }
            if let Some(field) = info.bonus_overrides.keys().find(|k| !bonuses.contains(&k.as_str())) {
                return Err(ParseError::UnknownBonus { season, field: field.clone() });
            }
        }
        Ok(())
    }
}

/// Copy dqs and surrogates, then force bonus flags and move `rp` with them.
/// Forced flags are ignored in playoffs, where ranking fields stay neutral.
///
/// Every write is worked out and checked first; on error the breakdown is
/// left exactly as parsed.
pub fn apply(breakdown: &mut MatchBreakdown, extra: &ExtraMatchInfo) -> Result<()> {
    extra.validate(breakdown.season)?;

    let writes = if breakdown.is_playoff {
        PerAlliance::from_fn(|_| Vec::new())
    } else {
        let bonuses = specs::bonus_fields(breakdown.season)?;
        let sheet = &breakdown.score_breakdown;
        PerAlliance::try_from_fn(|a| forced_writes(sheet, a, extra.alliance(a), bonuses))?
    };

    for a in Alliance::ALL {
        let info = extra.alliance(a);
        let summary = breakdown.alliances.get_mut(a);
        summary.dqs = info.dqs.clone();
        summary.surrogates = info.surrogates.clone();
    }
    let sheet = &mut breakdown.score_breakdown;
    for a in Alliance::ALL {
        for (field, value) in writes.get(a) {
            debug!("{} {field}: {value:?} from extra match info", a.key());
            sheet.set(a, field, value.clone()).map_err(ParseError::OverlayWrite)?;
        }
    }
    Ok(())
}

/// Bonus flags that change for one alliance, then `rp` moved by the net change.
fn forced_writes(
    sheet: &ScoreBreakdown,
    a: Alliance,
    info: &ExtraAllianceInfo,
    bonuses: &[&'static str],
) -> Result<Vec<(&'static str, FieldValue)>> {
    let mut writes = Vec::new();
    let mut delta = 0;
    for field in bonuses {
        let before = sheet.flag(a, field);
        let mut after = before.unwrap_or(false);
        for flag in Flag::ALL.iter().filter(|f| f.field() == *field) {
            if let Some(set) = flag.get(info) {
                after = flag.apply(set, after);
            }
        }
        if let Some(v) = info.bonus_overrides.get(*field) {
            after = *v;
        }
        // absent flags are only written when forced on
        if before == Some(after) || (before.is_none() && !after) {
            continue;
        }
        delta += i64::from(after) - i64::from(before.unwrap_or(false));
        writes.push((*field, FieldValue::Bool(after)));
    }
    if delta != 0 {
        if let Some(rp) = sheet.int(a, "rp") {
            let rp = checked_add(rp, delta, "rp").map_err(ParseError::OverlayWrite)?;
            writes.push(("rp", FieldValue::Int(rp)));
        }
    }
    for (field, value) in &writes {
        sheet.check(field, value).map_err(ParseError::OverlayWrite)?;
    }
    Ok(writes)
}
