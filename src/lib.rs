// src/lib.rs
// #![allow(dead_code)]

#[macro_use]
pub mod macros;

pub mod breakdown;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod log;
pub mod overlay;
pub mod specs;
pub mod tba;

#[cfg(feature = "cli")]
pub mod cli;

pub use breakdown::{MatchBreakdown, MatchRecord};
pub use config::options::ParseConfig;
pub use error::ParseError;
pub use specs::{parse, parse_html};
