use once_cell::sync::Lazy;
use regex::Regex;

static ED_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ED\s*(\d+)").unwrap());
static AD_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^AD\s*(\d+)").unwrap());

/// What a table row turned out to be, decided from its normalized,
/// non-empty cell texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// Per-election-district result row; carries the 3-digit zero-padded
    /// district code ("ED 7" -> "007").
    ElectionDistrict(String),
    /// Assembly-district link row; carries the AD number.
    AssemblyDistrict(u32),
    /// Header, footer, grand-total or decorative row. Disambiguated
    /// positionally by the caller (first row = header, last row = total).
    Other,
}

pub fn classify(cells: &[String]) -> RowKind {
    let Some(first) = cells.first() else {
        return RowKind::Other;
    };

    if let Some(code) = election_district_code(first) {
        return RowKind::ElectionDistrict(code);
    }

    if let Some(num) = assembly_district_number(first) {
        return RowKind::AssemblyDistrict(num);
    }

    RowKind::Other
}

/// "ED 7" -> "007", "ED 042" -> "042". None when the text is not an
/// election-district key.
pub fn election_district_code(text: &str) -> Option<String> {
    let caps = ED_KEY.captures(text.trim())?;
    let num: u64 = caps[1].parse().ok()?;
    Some(format!("{num:03}"))
}

pub fn assembly_district_number(text: &str) -> Option<u32> {
    let caps = AD_KEY.captures(text.trim())?;
    caps[1].parse().ok()
}

/// Vote cells may hold placeholders ("-", blank) for districts that have
/// not reported yet; those count as zero rather than failing the parse.
pub fn parse_vote(cell: &str) -> u64 {
    cell.trim().replace(',', "").parse().unwrap_or(0)
}
