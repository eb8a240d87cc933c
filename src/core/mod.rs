// src/core/mod.rs

pub mod html;
pub mod sanitize;

pub use html::{Cell, ReportDoc, Row};
pub use sanitize::Separator;
