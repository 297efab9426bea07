use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;

// Compiled once; the selector strings are constants so parse cannot fail.
static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static TR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td, th").unwrap());
static TD: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static LABEL: Lazy<Selector> = Lazy::new(|| Selector::parse("label").unwrap());

/// The BOE templates expose no ids or classes, only positions. Every
/// positional lookup against a page lives in this module so a template
/// change means editing one function instead of scattered index math.
///
/// Table index 2 is where all three page types keep their payload: the
/// race grid on the home page, the results grid on detail pages, the
/// candidate summary on ADI pages.
pub const RESULTS_TABLE_INDEX: usize = 2;

pub fn nth_table(document: &Html, index: usize) -> Result<ElementRef<'_>, ScrapeError> {
    let tables: Vec<ElementRef<'_>> = document.select(&TABLE).collect();
    tables.get(index).copied().ok_or_else(|| {
        ScrapeError::Structure(format!(
            "expected at least {} tables, found {}",
            index + 1,
            tables.len()
        ))
    })
}

pub fn rows<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    table.select(&TR).collect()
}

pub fn inner_rows<'a>(row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.select(&TR).collect()
}

/// `<td>` elements of a row, positionally, empties included. Used where the
/// cells themselves matter (the race grid keeps its links in fixed columns).
pub fn data_cells<'a>(row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.select(&TD).collect()
}

pub fn anchors<'a>(element: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    element.select(&ANCHOR).collect()
}

pub fn href(anchor: ElementRef<'_>) -> Option<String> {
    anchor.value().attr("href").map(str::to_string)
}

/// Trimmed text content with non-breaking spaces stripped. The source pages
/// pad empty cells with `&nbsp;`, which must read as empty.
pub fn text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.replace('\u{a0}', " ").trim().to_string()
}

/// Cell texts of a row, normalized and filtered to non-empty values. This is
/// the input shape the row classifier expects.
pub fn cell_texts(row: ElementRef<'_>) -> Vec<String> {
    row.select(&CELL)
        .map(text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Cell texts of a row with empties kept in place, so header-derived column
/// indices stay valid for data rows (summary tables leave cells blank).
pub fn positional_cell_texts(row: ElementRef<'_>) -> Vec<String> {
    row.select(&CELL).map(text).collect()
}

/// The reporting percentage lives in the last `<label>` of the results
/// table; labels elsewhere on the page (footers, boilerplate) do not count.
pub fn last_label_text(element: ElementRef<'_>) -> Option<String> {
    element.select(&LABEL).last().map(text)
}
