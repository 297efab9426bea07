use std::collections::BTreeMap;

use scraper::{ElementRef, Html};

use crate::classify;
use crate::error::ScrapeError;
use crate::page;
use crate::types::Metadata;

/// Minimum populated cells for a summary row to count as data. Decorative
/// and spacer rows never reach this width.
const MIN_DATA_CELLS: usize = 6;

/// Parse a race's summary (ADI) page into candidate totals, percentages and
/// party breakdowns.
///
/// Rows whose Party cell is blank are a candidate's grand total; rows with a
/// party are one party-line breakdown for that candidate. The reporting
/// percentage comes from the last `<label>` inside the summary table; when
/// the template omits it, the request URL is substituted so the field is
/// still traceable.
pub fn parse_race_summary(document: &Html, request_url: &str) -> Result<Metadata, ScrapeError> {
    let table = page::nth_table(document, page::RESULTS_TABLE_INDEX)
        .map_err(|_| ScrapeError::Structure(format!("summary grid missing at {request_url}")))?;
    let header = find_header_row(table).ok_or_else(|| {
        ScrapeError::Structure(format!(
            "summary table at {request_url} has no \"Name\" header row"
        ))
    })?;

    let columns = header_columns(header);
    let name_col = *columns.get("Name").ok_or_else(|| {
        ScrapeError::Structure(format!(
            "summary table at {request_url} lost its \"Name\" column"
        ))
    })?;
    let party_col = columns.get("Party").copied();
    let votes_col = columns.get("Votes").copied();
    let percent_col = columns.get("Percent").copied();

    let mut metadata = Metadata::not_available();

    for row in rows_after(table, header) {
        let cells = page::positional_cell_texts(row);
        let populated = cells.iter().filter(|c| !c.is_empty()).count();
        if populated < MIN_DATA_CELLS {
            continue;
        }

        let Some(name) = cells.get(name_col).filter(|n| !n.is_empty()) else {
            continue;
        };
        let name = name.clone();
        let party = party_col
            .and_then(|i| cells.get(i))
            .filter(|p| !p.is_empty())
            .cloned();

        let (votes, percent) = row_tally(&cells, votes_col, percent_col);

        match party {
            // No party: this row is the candidate's cross-party grand total.
            None => {
                *metadata.candidate_total_votes.entry(name.clone()).or_insert(0) += votes;
                metadata.candidate_percentage.insert(name, percent);
            }
            Some(party) => {
                metadata
                    .candidate_parties
                    .entry(name)
                    .or_default()
                    .push(party.clone());
                metadata.party_votes.insert(party.clone(), votes);
                metadata.party_percentages.insert(party, percent);
            }
        }
    }

    metadata.candidates = metadata.candidate_total_votes.keys().cloned().collect();
    metadata.total_percentage_reporting = match page::last_label_text(table) {
        Some(label) if !label.is_empty() => label,
        _ => request_url.to_string(),
    };

    Ok(metadata)
}

/// Locate the header row carrying the literal "Name" column label. Some
/// summary templates double-wrap their header; when the matched row is
/// itself a container of rows, descend one level to the real header.
fn find_header_row(table: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let row = page::rows(table)
        .into_iter()
        .find(|row| page::cell_texts(*row).iter().any(|c| c == "Name"))?;

    let inner = page::inner_rows(row);
    match inner
        .into_iter()
        .find(|r| page::cell_texts(*r).iter().any(|c| c == "Name"))
    {
        Some(inner_header) => Some(inner_header),
        None => Some(row),
    }
}

/// Column label -> positional index, from header cells with non-empty text.
fn header_columns(header: ElementRef<'_>) -> BTreeMap<String, usize> {
    page::positional_cell_texts(header)
        .into_iter()
        .enumerate()
        .filter(|(_, label)| !label.is_empty())
        .map(|(i, label)| (label, i))
        .collect()
}

/// All rows of `table` following `header` in document order.
fn rows_after<'a>(table: ElementRef<'a>, header: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    page::rows(table)
        .into_iter()
        .skip_while(|row| row.id() != header.id())
        .skip(1)
        .collect()
}

/// Vote count and percentage of one data row. The labelled columns win when
/// the template names them; older templates only imply them, in which case
/// the last two populated cells are (votes, percent).
fn row_tally(cells: &[String], votes_col: Option<usize>, percent_col: Option<usize>) -> (u64, String) {
    if let (Some(v), Some(p)) = (votes_col, percent_col) {
        let votes = cells.get(v).filter(|c| !c.is_empty());
        let percent = cells.get(p).filter(|c| !c.is_empty());
        if let (Some(votes), Some(percent)) = (votes, percent) {
            return (classify::parse_vote(votes), percent.clone());
        }
    }

    let mut populated = cells.iter().filter(|c| !c.is_empty());
    let percent = populated.next_back().cloned().unwrap_or_default();
    let votes = populated
        .next_back()
        .map(|c| classify::parse_vote(c))
        .unwrap_or(0);
    (votes, percent)
}
