// src/breakdown/record.rs
use std::collections::BTreeMap;

use serde::Serialize;

use super::alliance::{Alliance, PerAlliance};
use super::value::{lookup, FieldValue, Schema};
use crate::config::consts::{UNHANDLED_PREFIX, UNSET_SCORE};
use crate::error::DecodeError;
use crate::tba::MatchCode;

pub type AllianceFields = BTreeMap<String, FieldValue>;

/// The alliance-keyed score breakdown, checked against a season schema.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreBreakdown {
    #[serde(skip)]
    schema: Schema,
    fields: PerAlliance<AllianceFields>,
}

impl ScoreBreakdown {
    pub fn new(schema: Schema) -> Self {
        Self { schema, fields: PerAlliance::default() }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn alliance(&self, a: Alliance) -> &AllianceFields {
        self.fields.get(a)
    }

    pub fn get(&self, a: Alliance, name: &str) -> Option<&FieldValue> {
        self.fields.get(a).get(name)
    }

    pub fn int(&self, a: Alliance, name: &str) -> Option<i64> {
        self.get(a, name).and_then(FieldValue::as_int)
    }

    pub fn flag(&self, a: Alliance, name: &str) -> Option<bool> {
        self.get(a, name).and_then(FieldValue::as_bool)
    }

    pub fn string(&self, a: Alliance, name: &str) -> Option<&str> {
        self.get(a, name).and_then(FieldValue::as_str)
    }

    pub fn contains(&self, a: Alliance, name: &str) -> bool {
        self.fields.get(a).contains_key(name)
    }

    /// Schema check for one write. Passthrough `!label` fields are strings.
    pub fn check(&self, name: &str, value: &FieldValue) -> Result<(), DecodeError> {
        if name.starts_with(UNHANDLED_PREFIX) {
            return match value {
                FieldValue::Str(_) => Ok(()),
                other => Err(DecodeError::TypeMismatch {
                    field: s!(name),
                    expected: "string",
                    found: other.kind().name(),
                }),
            };
        }
        let spec = lookup(self.schema, name)
            .ok_or_else(|| DecodeError::Invalid(format!("{name} is not a breakdown field")))?;
        if spec.kind != value.kind() {
            return Err(DecodeError::TypeMismatch {
                field: s!(name),
                expected: spec.kind.name(),
                found: value.kind().name(),
            });
        }
        Ok(())
    }

    pub fn set(&mut self, a: Alliance, name: &str, value: impl Into<FieldValue>) -> Result<(), DecodeError> {
        let value = value.into();
        self.check(name, &value)?;
        self.fields.get_mut(a).insert(s!(name), value);
        Ok(())
    }

    /// Write one field for both alliances, or neither.
    pub fn set_pair(&mut self, name: &str, values: PerAlliance<FieldValue>) -> Result<(), DecodeError> {
        self.check(name, &values.blue)?;
        self.check(name, &values.red)?;
        let PerAlliance { blue, red } = values;
        self.fields.blue.insert(s!(name), blue);
        self.fields.red.insert(s!(name), red);
        Ok(())
    }

    /// Several paired writes; all are checked before any is stored.
    pub fn set_many(&mut self, writes: Vec<(String, PerAlliance<FieldValue>)>) -> Result<(), DecodeError> {
        for (name, values) in &writes {
            self.check(name, &values.blue)?;
            self.check(name, &values.red)?;
        }
        for (name, PerAlliance { blue, red }) in writes {
            self.fields.blue.insert(name.clone(), blue);
            self.fields.red.insert(name, red);
        }
        Ok(())
    }

    pub fn set_both(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), DecodeError> {
        let value = value.into();
        self.set_pair(name, PerAlliance::new(value.clone(), value))
    }

    pub fn remove(&mut self, a: Alliance, name: &str) -> Option<FieldValue> {
        self.fields.get_mut(a).remove(name)
    }

    /// Required schema fields absent from either alliance, skipping `exempt`.
    pub fn missing_required(&self, exempt: &[&str]) -> Vec<(Alliance, &'static str)> {
        let mut out = Vec::new();
        for a in Alliance::ALL {
            for spec in self.schema.iter().filter(|f| f.required) {
                if exempt.contains(&spec.name) {
                    continue;
                }
                if !self.contains(a, spec.name) {
                    out.push((a, spec.name));
                }
            }
        }
        out
    }
}

/// The `alliances` section of an uploaded match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AllianceSummary {
    pub teams: [String; 3],
    pub score: i64,
    pub surrogates: Vec<String>,
    pub dqs: Vec<String>,
}

impl Default for AllianceSummary {
    fn default() -> Self {
        Self {
            teams: Default::default(),
            score: UNSET_SCORE,
            surrogates: Vec::new(),
            dqs: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchBreakdown {
    #[serde(skip)]
    pub season: u16,
    #[serde(skip)]
    pub is_playoff: bool,
    pub alliances: PerAlliance<AllianceSummary>,
    pub score_breakdown: ScoreBreakdown,
}

impl MatchBreakdown {
    pub fn new(season: u16, schema: Schema, is_playoff: bool) -> Self {
        Self {
            season,
            is_playoff,
            alliances: PerAlliance::default(),
            score_breakdown: ScoreBreakdown::new(schema),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// A breakdown plus its match code, as uploaded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchRecord {
    #[serde(flatten)]
    pub code: Option<MatchCode>,
    #[serde(flatten)]
    pub breakdown: MatchBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::value::FieldSpec;
    use serde_json::json;

    const SCHEMA: Schema = &[
        FieldSpec::int("totalPoints"),
        FieldSpec::bool("quintetAchieved"),
        FieldSpec::int("extraGamePieceCount").optional(),
    ];

    #[test]
    fn kind_mismatch_is_rejected() {
        let mut sb = ScoreBreakdown::new(SCHEMA);
        let err = sb.set(Alliance::Blue, "totalPoints", "ten").unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { expected: "int", found: "string", .. }));
        assert!(!sb.contains(Alliance::Blue, "totalPoints"));
    }

    #[test]
    fn unknown_field_is_rejected_but_passthrough_is_not() {
        let mut sb = ScoreBreakdown::new(SCHEMA);
        assert!(sb.set(Alliance::Red, "totlPoints", 3).is_err());
        sb.set(Alliance::Red, "!mystery row", "7").unwrap();
        assert_eq!(sb.string(Alliance::Red, "!mystery row"), Some("7"));
    }

    #[test]
    fn set_pair_writes_both_or_neither() {
        let mut sb = ScoreBreakdown::new(SCHEMA);
        let bad = PerAlliance::new(FieldValue::Int(1), FieldValue::Bool(true));
        assert!(sb.set_pair("totalPoints", bad).is_err());
        assert!(!sb.contains(Alliance::Blue, "totalPoints"));
    }

    #[test]
    fn missing_required_ignores_optional_and_exempt() {
        let mut sb = ScoreBreakdown::new(SCHEMA);
        sb.set_both("totalPoints", 5).unwrap();
        assert_eq!(
            sb.missing_required(&[]),
            vec![(Alliance::Blue, "quintetAchieved"), (Alliance::Red, "quintetAchieved")]
        );
        assert!(sb.missing_required(&["quintetAchieved"]).is_empty());
    }

    #[test]
    fn record_serializes_flat() {
        let mut m = MatchBreakdown::new(2022, SCHEMA, false);
        m.score_breakdown.set_both("totalPoints", 0).unwrap();
        let rec = MatchRecord {
            code: Some(MatchCode::new("qm", 1, 4)),
            breakdown: m,
        };
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["comp_level"], json!("qm"));
        assert_eq!(v["match_number"], json!(4));
        assert_eq!(v["alliances"]["red"]["score"], json!(-1));
        assert_eq!(v["alliances"]["blue"]["teams"], json!(["", "", ""]));
        assert_eq!(v["score_breakdown"]["blue"]["totalPoints"], json!(0));

        let bare = MatchRecord { code: None, breakdown: rec.breakdown };
        let v = serde_json::to_value(&bare).unwrap();
        assert!(v.get("comp_level").is_none());
    }
}
