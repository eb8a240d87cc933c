// tests/common/mod.rs
//
// Builds synthetic FMS match report pages.
//
#![allow(dead_code)]

use fms_scrape::config::options::ParseConfig;
use fms_scrape::error::ParseError;
use fms_scrape::{parse_html, MatchBreakdown};

/// Column order of the score table.
#[derive(Clone, Copy)]
pub enum Columns {
    /// 2018, 2019
    BlueLabelRed,
    /// 2022 onwards
    LabelBlueRed,
}

pub struct Report {
    columns: Columns,
    rows: Vec<String>,
    game_data: Option<String>,
}

impl Report {
    pub fn new(columns: Columns) -> Self {
        Self { columns, rows: Vec::new(), game_data: None }
    }

    pub fn row(mut self, label: &str, blue: &str, red: &str) -> Self {
        let tr = match self.columns {
            Columns::BlueLabelRed => format!("<tr><td>{blue}</td><td>{label}</td><td>{red}</td></tr>"),
            Columns::LabelBlueRed => format!("<tr><td>{label}</td><td>{blue}</td><td>{red}</td></tr>"),
        };
        self.rows.push(tr);
        self
    }

    /// A row spanning the whole table, like a section header.
    pub fn banner(mut self, label: &str) -> Self {
        self.rows.push(format!(r#"<tr><td colspan="3">{label}</td></tr>"#));
        self
    }

    pub fn game_data(mut self, text: &str) -> Self {
        self.game_data = Some(text.to_string());
        self
    }

    pub fn html(&self) -> String {
        let header = match self.columns {
            Columns::BlueLabelRed => "<tr><th>Blue</th><th>Match Score Item</th><th>Red</th></tr>",
            Columns::LabelBlueRed => "<tr><th>Match Score Item</th><th>Blue</th><th>Red</th></tr>",
        };
        let footer = self
            .game_data
            .as_ref()
            .map(|g| format!(r#"<div class="panel"><div class="panel-body text-center">{g}</div></div>"#))
            .unwrap_or_default();
        format!(
            "<html><body><div class=\"container\"><table class=\"table\"><thead>{header}</thead><tbody>{}</tbody></table>{footer}</div></body></html>",
            self.rows.join("\n")
        )
    }

    pub fn parse(&self, season: u16, config: &ParseConfig) -> Result<MatchBreakdown, ParseError> {
        parse_html(season, &self.html(), config)
    }
}

/// Check/cross icons, one per flag.
pub fn icons(flags: &[bool]) -> String {
    flags
        .iter()
        .map(|f| format!(r#"<i class="fa {}"></i>"#, if *f { "fa-check" } else { "fa-times" }))
        .collect()
}

/// 2022 hub counters: `(exit, count)` pairs as titled divs.
pub fn hub(exits: [(&str, i64); 4]) -> String {
    exits
        .iter()
        .map(|(exit, n)| format!(r#"<div title="Exit {exit}">{n}</div>"#))
        .collect()
}

/// 2023 grid row: `.` empty, `b` cube, `c` cone; uppercase marks a link member.
pub fn nodes(spec: &str) -> String {
    spec.chars()
        .map(|ch| {
            let svg = match ch.to_ascii_lowercase() {
                'b' => "bi-box",
                'c' => "bi-cone",
                _ => "bi-dot",
            };
            let link = if ch.is_ascii_uppercase() { " community-img-link" } else { "" };
            format!(r#"<span class="icon{link}"><svg class="bi {svg}" viewBox="0 0 16 16"><path d=""/></svg></span>"#)
        })
        .collect()
}

/// The whole breakdown as JSON.
pub fn json(b: &MatchBreakdown) -> serde_json::Value {
    b.to_json().unwrap()
}
