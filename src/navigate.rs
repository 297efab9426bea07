use std::collections::BTreeMap;

use scraper::Html;

use crate::config::Config;
use crate::error::ScrapeError;
use crate::fetch::{DocumentSource, join_url};
use crate::page;
use crate::types::Race;

/// Anchor text marking a race's detail link in the top-level grid.
const AD_DETAILS_LINK: &str = "AD Details";
/// Summary-page href suffix; rewriting it yields the vote-detail page.
const SUMMARY_SUFFIX: &str = "ADI0.html";
const DETAIL_SUFFIX: &str = "AD0.html";
/// The race grid ends in four footer rows (legend and timestamps).
const FOOTER_ROWS: usize = 4;

/// Walk the top-level race list and expand every compound ("district") race
/// into its per-assembly-district sub-races. The returned map is keyed on
/// race name; a `BTreeMap` keeps `--show` numbering stable across runs.
pub fn gather_races<S: DocumentSource>(
    source: &S,
    config: &Config,
) -> Result<BTreeMap<String, Race>, ScrapeError> {
    vprintln!(config.verbose, 1, "requesting race list from {}", config.base_url);
    let body = source.fetch(&config.base_url)?;
    let document = Html::parse_document(&body);

    let mut races = race_grid(&document, &config.base_url)?;

    let compound: Vec<String> = races
        .iter()
        .filter(|(_, race)| race.district_race)
        .map(|(name, _)| name.clone())
        .collect();

    for name in compound {
        let Some(parent) = races.remove(&name) else {
            continue;
        };
        vprintln!(config.verbose, 1, "expanding compound race: {name}");

        let body = source.fetch(&parent.url)?;
        let document = Html::parse_document(&body);
        for race in sub_races(&document, &parent, &config.base_url) {
            insert_race(&mut races, race);
        }
    }

    Ok(races)
}

/// INITIAL phase: read the race grid (table index 2, minus the footer) on
/// the home page. Column 2 is the race name, column 3 the party; the later
/// columns hold the "AD Details" anchor.
fn race_grid(document: &Html, base_url: &str) -> Result<BTreeMap<String, Race>, ScrapeError> {
    let table = page::nth_table(document, page::RESULTS_TABLE_INDEX)
        .map_err(|_| ScrapeError::Structure("race list grid missing".to_string()))?;

    let rows = page::rows(table);
    let body_len = rows.len().saturating_sub(FOOTER_ROWS);

    let mut races = BTreeMap::new();
    for row in rows.into_iter().take(body_len) {
        let cells = page::data_cells(row);
        if cells.len() <= 3 {
            continue;
        }

        let party = page::text(cells[3]);
        let name = format!("{} {}", page::text(cells[2]), party)
            .trim_end()
            .to_string();

        for cell in &cells[4..] {
            for anchor in page::anchors(*cell) {
                if page::text(anchor) != AD_DETAILS_LINK {
                    continue;
                }
                let Some(href) = page::href(anchor) else {
                    continue;
                };

                let summary_link = href.ends_with(SUMMARY_SUFFIX);
                let race = Race {
                    name: name.clone(),
                    url: join_url(base_url, &href.replace(SUMMARY_SUFFIX, DETAIL_SUFFIX)),
                    district_race: !summary_link,
                    party: party.clone(),
                    metadata_url: if summary_link {
                        join_url(base_url, &href)
                    } else {
                        String::new()
                    },
                };
                insert_race(&mut races, race);
            }
        }
    }

    Ok(races)
}

/// EXPAND phase: enumerate a compound race's per-AD sub-races. The Nth
/// anchor ending in the summary suffix is the Nth sub-race; that positional
/// correspondence is a template assumption, not independently validated.
fn sub_races(document: &Html, parent: &Race, base_url: &str) -> Vec<Race> {
    let mut out = Vec::new();
    for anchor in page::anchors(document.root_element()) {
        let Some(href) = page::href(anchor) else {
            continue;
        };
        if !href.ends_with(SUMMARY_SUFFIX) {
            continue;
        }

        let label = page::text(anchor);
        if label.is_empty() {
            continue;
        }

        // Disambiguate the name with the parent's party unless the label
        // already carries it.
        let name = if !parent.party.is_empty() && !label.contains(&parent.party) {
            format!("{label} {}", parent.party)
        } else {
            label
        };

        out.push(Race {
            name,
            url: join_url(base_url, &href.replace(SUMMARY_SUFFIX, DETAIL_SUFFIX)),
            district_race: true,
            party: parent.party.clone(),
            metadata_url: join_url(base_url, &href),
        });
    }
    out
}

/// Later entries win on a name collision, as the source site's templates
/// have always implied; the overwrite is logged so it never passes silently.
fn insert_race(races: &mut BTreeMap<String, Race>, race: Race) {
    if races.contains_key(&race.name) {
        eprintln!(
            "warning: race name collision, overwriting earlier entry: {}",
            race.name
        );
    }
    races.insert(race.name.clone(), race);
}
