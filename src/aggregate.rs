use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use scraper::Html;

use crate::classify;
use crate::config::Config;
use crate::district;
use crate::error::ScrapeError;
use crate::fetch::{DocumentSource, join_url};
use crate::page;
use crate::summary;
use crate::types::{AggregatedResult, CandidateVoteRow, Metadata, Race};

/// Aggregate one race: summary metadata plus one district table per
/// assembly district linked from the race's detail page.
///
/// Fail-fast: any network or structural failure aborts the whole race and
/// no partial result is emitted. With `fetch_threads > 1` the data-
/// independent AD pages are fetched on a bounded rayon pool; collecting
/// into a `BTreeMap` keyed on AD number restores ordering.
pub fn assemble<S: DocumentSource + Sync>(
    source: &S,
    race: &Race,
    config: &Config,
) -> Result<AggregatedResult, ScrapeError> {
    let total = if race.metadata_url.is_empty() {
        Metadata::not_available()
    } else {
        let body = source.fetch(&race.metadata_url)?;
        summary::parse_race_summary(&Html::parse_document(&body), &race.metadata_url)?
    };

    let body = source.fetch(&race.url)?;
    let document = Html::parse_document(&body);
    let ad_links = assembly_district_links(&document, &config.base_url);
    vprintln!(
        config.verbose,
        1,
        "race {:?}: {} assembly districts to fetch",
        race.name,
        ad_links.len()
    );

    let detailed: BTreeMap<u32, BTreeMap<String, CandidateVoteRow>> = if config.fetch_threads <= 1 {
        let mut out = BTreeMap::new();
        for (ad, url) in &ad_links {
            out.insert(*ad, fetch_district_table(source, url)?);
        }
        out
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.fetch_threads)
            .build()?;
        pool.install(|| {
            ad_links
                .par_iter()
                .map(|(ad, url)| Ok((*ad, fetch_district_table(source, url)?)))
                .collect::<Result<BTreeMap<_, _>, ScrapeError>>()
        })?
    };

    let candidates = if total.candidates.is_empty() {
        candidate_union(&detailed)
    } else {
        total.candidates.clone()
    };

    Ok(AggregatedResult {
        total,
        candidates,
        detailed,
    })
}

/// AD links on a race detail page: anchors whose text is an "AD <n>" key
/// and which actually carry an href.
fn assembly_district_links(document: &Html, base_url: &str) -> Vec<(u32, String)> {
    let mut links = Vec::new();
    for anchor in page::anchors(document.root_element()) {
        let Some(ad) = classify::assembly_district_number(&page::text(anchor)) else {
            continue;
        };
        let Some(href) = page::href(anchor) else {
            continue;
        };
        links.push((ad, join_url(base_url, &href)));
    }
    links
}

fn fetch_district_table<S: DocumentSource>(
    source: &S,
    url: &str,
) -> Result<BTreeMap<String, CandidateVoteRow>, ScrapeError> {
    let body = source.fetch(url)?;
    district::parse_district_table(&Html::parse_document(&body), url)
}

/// Fallback candidate list when a race has no summary page: the union of
/// candidate keys across all detail rows (sorted, so output stays stable).
fn candidate_union(detailed: &BTreeMap<u32, BTreeMap<String, CandidateVoteRow>>) -> Vec<String> {
    let mut names = BTreeSet::new();
    for districts in detailed.values() {
        for row in districts.values() {
            names.extend(row.votes.keys().cloned());
        }
    }
    names.into_iter().collect()
}
