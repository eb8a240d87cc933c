// src/breakdown/value.rs
use std::collections::BTreeMap;

use serde::Serialize;

/// One node link in the 2023 community grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Link {
    pub row: String,
    pub nodes: [usize; 3],
}

/// A breakdown value. Serialized untagged so the JSON is the bare value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Grid(BTreeMap<String, Vec<String>>),
    Links(Vec<Link>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int,
    Str,
    Grid,
    Links,
}

impl FieldKind {
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Int => "int",
            FieldKind::Str => "string",
            FieldKind::Grid => "grid",
            FieldKind::Links => "links",
        }
    }
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Str(_) => FieldKind::Str,
            FieldValue::Grid(_) => FieldKind::Grid,
            FieldValue::Links(_) => FieldKind::Links,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Int(i64::from(n))
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s!(s))
    }
}

/// Schema entry: the name, kind and presence rule of one breakdown field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn int(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Int, required: true }
    }
    pub const fn str(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Str, required: true }
    }
    pub const fn bool(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Bool, required: true }
    }
    pub const fn grid(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Grid, required: true }
    }
    pub const fn links(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Links, required: true }
    }
    pub const fn optional(self) -> Self {
        Self { required: false, ..self }
    }
}

pub type Schema = &'static [FieldSpec];

pub fn lookup(schema: Schema, name: &str) -> Option<&'static FieldSpec> {
    schema.iter().find(|f| f.name == name)
}
