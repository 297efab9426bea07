use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

/// One entry in the race list. Compound ("district") races are expanded into
/// per-assembly-district sub-races before selection; only the expanded form
/// is ever shown to the user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Race {
    pub name: String,
    /// Vote-detail page (the `AD0.html` view with per-AD links).
    pub url: String,
    pub district_race: bool,
    /// Party label from the race list; empty for nonpartisan contests.
    pub party: String,
    /// Summary page (the `ADI0.html` view); empty when the site exposes none.
    pub metadata_url: String,
}

/// Per-election-district tallies for one table row. The candidate key set is
/// identical across all rows of the same table and matches the header row;
/// fusion candidates (one name under several party columns) are merged into
/// a single key whose value is the sum over all party lines.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CandidateVoteRow {
    #[serde(rename = "Reporting")]
    pub reporting: String,
    #[serde(flatten)]
    pub votes: BTreeMap<String, u64>,
}

/// Race-level totals derived from the summary table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Metadata {
    pub candidates: Vec<String>,
    pub candidate_total_votes: BTreeMap<String, u64>,
    pub candidate_percentage: BTreeMap<String, String>,
    pub candidate_parties: BTreeMap<String, Vec<String>>,
    pub party_votes: BTreeMap<String, u64>,
    pub party_percentages: BTreeMap<String, String>,
    pub total_percentage_reporting: String,
}

impl Metadata {
    /// Sentinel form used when a race carries no summary URL.
    pub fn not_available() -> Self {
        Metadata {
            candidates: Vec::new(),
            candidate_total_votes: BTreeMap::new(),
            candidate_percentage: BTreeMap::new(),
            candidate_parties: BTreeMap::new(),
            party_votes: BTreeMap::new(),
            party_percentages: BTreeMap::new(),
            total_percentage_reporting: "NA".to_string(),
        }
    }
}

/// The final externally-observable artifact: one race, fully aggregated.
/// `detailed` maps assembly-district number -> zero-padded election-district
/// code -> vote row, so iteration order (and therefore serialized output) is
/// stable across runs.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AggregatedResult {
    #[serde(rename = "Total")]
    pub total: Metadata,
    #[serde(rename = "Candidates")]
    pub candidates: Vec<String>,
    #[serde(rename = "Detailed")]
    pub detailed: BTreeMap<u32, BTreeMap<String, CandidateVoteRow>>,
}
