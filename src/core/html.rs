// src/core/html.rs
//! Thin adapter over `scraper`: the report is parsed once, then walked row by row.
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|_| unreachable!("static selector {css}"))
}

pub static TR: Lazy<Selector> = Lazy::new(|| selector("tr"));
pub static ICON: Lazy<Selector> = Lazy::new(|| selector("i"));
pub static TITLED_DIV: Lazy<Selector> = Lazy::new(|| selector("div[title]"));
pub static TITLED: Lazy<Selector> = Lazy::new(|| selector("[title]"));
pub static SPAN_ICON: Lazy<Selector> = Lazy::new(|| selector("span.icon"));
pub static SVG: Lazy<Selector> = Lazy::new(|| selector("svg"));
pub static GAME_DATA: Lazy<Selector> = Lazy::new(|| selector(".panel-body.text-center"));

/// A parsed match report page.
pub struct ReportDoc {
    html: Html,
}

impl ReportDoc {
    pub fn parse(src: &str) -> Self {
        Self { html: Html::parse_document(src) }
    }

    /// Every `tr` in document order, with its direct element children as cells.
    pub fn rows(&self) -> Vec<Row<'_>> {
        self.html
            .select(&TR)
            .map(|tr| Row {
                cells: tr
                    .children()
                    .filter_map(ElementRef::wrap)
                    .map(Cell)
                    .collect(),
            })
            .collect()
    }

    /// Concatenated text of every element matching `sel`, trimmed.
    pub fn select_text(&self, sel: &Selector) -> String {
        let mut out = s!();
        for el in self.html.select(sel) {
            for t in el.text() {
                out.push_str(t);
            }
        }
        s!(out.trim())
    }
}

pub struct Row<'a> {
    cells: Vec<Cell<'a>>,
}

impl<'a> Row<'a> {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, i: usize) -> Option<Cell<'a>> {
        self.cells.get(i).copied()
    }

    /// Trimmed text of cell `i`, empty when the cell is missing.
    pub fn text(&self, i: usize) -> String {
        self.cell(i).map(|c| c.text()).unwrap_or_default()
    }
}

#[derive(Clone, Copy)]
pub struct Cell<'a>(ElementRef<'a>);

impl<'a> Cell<'a> {
    pub fn text(&self) -> String {
        let raw: String = self.0.text().collect();
        s!(raw.trim())
    }

    pub fn find(&self, sel: &Selector) -> Vec<Cell<'a>> {
        self.0.select(sel).map(Cell).collect()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.value().classes().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    pub fn class_list(&self) -> String {
        self.attr("class").unwrap_or_default().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_keep_direct_children_only() {
        let doc = ReportDoc::parse(
            r#"<table>
                <tr><td>10</td><td>Final Score</td><td><span>20</span></td></tr>
                <tr><th colspan=3>Community</th></tr>
            </table>"#,
        );
        let rows = doc.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[0].text(1), "Final Score");
        assert_eq!(rows[0].text(2), "20");
        assert_eq!(rows[1].len(), 1);
        assert_eq!(rows[1].text(7), "");
    }

    #[test]
    fn cell_queries() {
        let doc = ReportDoc::parse(
            r#"<table><tr><td class="x y"><i class="fa fa-check"></i><div title="Cargo Blue">3</div></td></tr></table>"#,
        );
        let rows = doc.rows();
        let cell = rows[0].cell(0).unwrap();
        assert!(cell.has_class("y"));
        assert!(!cell.has_class("fa"));
        let icons = cell.find(&ICON);
        assert_eq!(icons.len(), 1);
        assert!(icons[0].has_class("fa-check"));
        let divs = cell.find(&TITLED_DIV);
        assert_eq!(divs[0].attr("title"), Some("Cargo Blue"));
        assert_eq!(divs[0].text(), "3");
    }

    #[test]
    fn select_text_trims() {
        let doc = ReportDoc::parse(r#"<div class="panel-body text-center"> LRL </div>"#);
        assert_eq!(doc.select_text(&GAME_DATA), "LRL");
    }
}
