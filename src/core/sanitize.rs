// src/core/sanitize.rs
use std::num::ParseIntError;

use crate::config::consts::BULLET;
use crate::error::DecodeError;

/// How one cell's text is broken into parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Separator {
    Bullet,
    Newline,
    /// Bullets become spaces, then split on any whitespace run.
    Space,
    /// Bullet when the text has one, newline otherwise.
    BulletOrNewline,
}

impl Separator {
    pub fn split(self, text: &str) -> Vec<String> {
        match self {
            Separator::Bullet => split_and_strip(text, BULLET),
            Separator::Newline => split_and_strip(text, "\n"),
            Separator::Space => text
                .replace(BULLET, " ")
                .split_whitespace()
                .map(String::from)
                .collect(),
            Separator::BulletOrNewline => {
                if text.contains(BULLET) {
                    split_and_strip(text, BULLET)
                } else {
                    split_and_strip(text, "\n")
                }
            }
        }
    }
}

/// `"a • b • c"` → `["a", "b", "c"]`. Empty parts are kept.
pub fn split_and_strip(text: &str, sep: &str) -> Vec<String> {
    text.trim().split(sep).map(|p| s!(p.trim())).collect()
}

/// Labels are matched trimmed and lowercase.
pub fn normalize_label(s: &str) -> String {
    normalize_ws(s).to_lowercase()
}

/// Trim and collapse every whitespace run to one space.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Report counts and points. A sign, or anything past `u32`, is an error.
pub fn parse_int(text: &str, what: &str) -> Result<i64, DecodeError> {
    text.trim()
        .parse::<u32>()
        .map(i64::from)
        .map_err(|source| int_error(text, what, source))
}

/// Only the adjustments row may go below zero.
pub fn parse_signed(text: &str, what: &str) -> Result<i64, DecodeError> {
    text.trim().parse::<i64>().map_err(|source| int_error(text, what, source))
}

fn int_error(text: &str, what: &str, source: ParseIntError) -> DecodeError {
    DecodeError::Int {
        what: s!(what),
        text: s!(text.trim()),
        source,
    }
}

/// Exactly `expected` parts or a length error.
pub fn expect_parts(parts: Vec<String>, expected: usize) -> Result<Vec<String>, DecodeError> {
    if parts.len() != expected {
        return Err(DecodeError::Length { expected, found: parts.len() });
    }
    Ok(parts)
}
