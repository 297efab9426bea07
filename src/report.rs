use std::io::Write;

use anyhow::Context;

use crate::types::AggregatedResult;

/// JSON mode: the aggregated result verbatim. All maps are ordered, so
/// repeated runs against unchanged pages are byte-identical.
pub fn write_json<W: Write>(result: &AggregatedResult, mut out: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut out, result).context("serializing result to JSON")?;
    writeln!(out)?;
    Ok(())
}

/// CSV mode: `Detailed` flattened to one row per "<AD>-<ED>" key, plus a
/// trailing synthetic "Total" row from the summary metadata. The candidate
/// column set comes from the first emitted row; for a race with no detail
/// rows it falls back to the aggregated candidate list.
pub fn write_csv<W: Write>(result: &AggregatedResult, out: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let candidates: Vec<String> = result
        .detailed
        .values()
        .flat_map(|districts| districts.values())
        .next()
        .map(|row| row.votes.keys().cloned().collect())
        .unwrap_or_else(|| result.candidates.clone());

    let mut header = vec!["AD-ED".to_string(), "Reporting".to_string()];
    header.extend(candidates.iter().cloned());
    writer.write_record(&header)?;

    for (ad, districts) in &result.detailed {
        for (ed, row) in districts {
            let mut record = vec![format!("{ad}-{ed}"), row.reporting.clone()];
            for candidate in &candidates {
                record.push(
                    row.votes
                        .get(candidate)
                        .map(u64::to_string)
                        .unwrap_or_default(),
                );
            }
            writer.write_record(&record)?;
        }
    }

    let mut total = vec![
        "Total".to_string(),
        result.total.total_percentage_reporting.clone(),
    ];
    for candidate in &candidates {
        total.push(
            result
                .total
                .candidate_total_votes
                .get(candidate)
                .map(u64::to_string)
                .unwrap_or_default(),
        );
    }
    writer.write_record(&total)?;

    writer.flush().context("flushing CSV output")?;
    Ok(())
}
