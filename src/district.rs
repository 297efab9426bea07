use std::collections::BTreeMap;

use scraper::Html;

use crate::classify::{self, RowKind};
use crate::error::ScrapeError;
use crate::page;
use crate::types::CandidateVoteRow;

/// Parse one assembly district's results grid into per-election-district
/// tallies keyed by zero-padded district code.
///
/// The grid is always the third table on the page. Its first row names the
/// candidates; a name appearing twice means two party-line columns for the
/// same person, and those columns are summed into one key (fusion). Rows
/// between the header and the first ED row are metadata, the final row is
/// the grand total; neither is accumulated here.
pub fn parse_district_table(
    document: &Html,
    detail_url: &str,
) -> Result<BTreeMap<String, CandidateVoteRow>, ScrapeError> {
    let table = page::nth_table(document, page::RESULTS_TABLE_INDEX)
        .map_err(|_| ScrapeError::Structure(format!("results grid missing at {detail_url}")))?;

    let rows: Vec<Vec<String>> = page::rows(table)
        .into_iter()
        .map(page::cell_texts)
        .filter(|cells| !cells.is_empty())
        .collect();

    let Some(candidates) = rows.first() else {
        return Err(ScrapeError::Structure(format!(
            "results grid at {detail_url} has no rows"
        )));
    };
    if candidates.is_empty() {
        return Err(ScrapeError::Structure(format!(
            "results grid at {detail_url} has no candidate columns"
        )));
    }

    let mut districts = BTreeMap::new();

    // Skip the header and the trailing grand-total row; classification
    // drops whatever metadata rows sit in between.
    let body_len = rows.len().saturating_sub(1);
    for cells in rows.iter().take(body_len).skip(1) {
        let RowKind::ElectionDistrict(code) = classify::classify(cells) else {
            continue;
        };

        if cells.len() < 2 + candidates.len() {
            return Err(ScrapeError::Structure(format!(
                "row {code} at {detail_url} has {} cells, expected at least {}",
                cells.len(),
                2 + candidates.len()
            )));
        }

        let mut votes: BTreeMap<String, u64> =
            candidates.iter().map(|name| (name.clone(), 0)).collect();
        for (i, name) in candidates.iter().enumerate() {
            *votes.entry(name.clone()).or_insert(0) += classify::parse_vote(&cells[2 + i]);
        }

        districts.insert(
            code,
            CandidateVoteRow {
                reporting: cells[1].clone(),
                votes,
            },
        );
    }

    Ok(districts)
}
