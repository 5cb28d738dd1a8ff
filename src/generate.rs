//! The `generate` pipeline: load, classify, sort, emit, report.

use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
};

use anyhow::{Context, Result, bail};
use encoding_rs::Encoding;
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    classify::{self, SkipCounts},
    cli::GenerateArgs,
    emit::{self, EmitOptions},
    io_utils,
    loader::{self, RoleMap},
    region::{self, Region},
};

const SAMPLE_ROWS: usize = 10;
const PROGRESS_INTERVAL: usize = 5000;

pub fn execute(args: &GenerateArgs) -> Result<()> {
    if args.batch_size == 0 {
        bail!("--batch-size must be at least 1");
    }
    if !(1..=4).contains(&args.max_level) {
        bail!("--max-level must be between 1 and 4");
    }

    info!(
        "Generating '{}' from '{}' (max level {}, batch size {})",
        args.output.display(),
        args.input.display(),
        args.max_level,
        args.batch_size
    );

    let mut scan = scan(
        &args.input,
        args.max_level,
        args.delimiter,
        args.input_encoding.as_deref(),
    )?;

    info!(
        "{} record(s) accepted, {} skipped (폐지: {}, 레벨제한: {}, 기타: {})",
        scan.regions.len(),
        scan.skips.total(),
        scan.skips.retired,
        scan.skips.depth_limit,
        scan.skips.malformed
    );

    let duplicates = count_duplicate_codes(&scan.regions);
    if duplicates > 0 {
        warn!("{duplicates} duplicate code(s) among accepted records; all rows will be emitted");
    }

    // Coarse units first so a child's parent always lands in an earlier or
    // equal batch; stable so duplicates keep their source order.
    scan.regions
        .sort_by(|a, b| (a.level, a.code.as_str()).cmp(&(b.level, b.code.as_str())));

    let opts = EmitOptions {
        table: &args.table,
        strategy: args.strategy,
        batch_size: args.batch_size,
        max_level: args.max_level,
    };
    emit::write_script(&args.output, &scan.regions, &opts)?;
    info!("SQL script written to '{}'", args.output.display());

    report_levels(&scan.regions);
    report_sample(&scan.regions);
    Ok(())
}

/// Everything the loader and classifier produce for one input file. `probe`
/// renders this directly; `generate` sorts and emits the records.
pub struct Scan {
    pub regions: Vec<Region>,
    pub skips: SkipCounts,
    pub encoding: &'static Encoding,
    pub delimiter: u8,
    pub roles: RoleMap,
}

pub fn scan(
    input: &Path,
    max_level: u8,
    delimiter: Option<u8>,
    encoding_label: Option<&str>,
) -> Result<Scan> {
    let sniff = io_utils::read_sniff(input)?;
    let encoding = match encoding_label {
        Some(label) => io_utils::resolve_encoding(label)?,
        None => io_utils::detect_encoding(&sniff),
    };
    let delimiter = delimiter.unwrap_or_else(|| {
        let (text, _, _) = encoding.decode(&sniff);
        io_utils::detect_delimiter(&text)
    });
    info!(
        "Reading '{}' (encoding {}, delimiter '{}')",
        input.display(),
        encoding.name(),
        crate::printable_delimiter(delimiter)
    );

    let mut reader = io_utils::open_csv_reader(input, delimiter, encoding)?;
    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("Reading header row from {input:?}"))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    // Propagated bare so the operator sees which role failed to resolve.
    let roles = loader::map_roles(&headers)?;
    debug!(
        "Role mapping: code='{}', name='{}', status={:?}",
        roles.code.header,
        roles.name.header,
        roles.status.as_ref().map(|c| c.header.as_str())
    );

    let mut regions = Vec::new();
    let mut skips = SkipCounts::default();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        let code = record.get(roles.code.index).unwrap_or("");
        let name = record.get(roles.name.index).unwrap_or("");
        let status = roles
            .status
            .as_ref()
            .and_then(|c| record.get(c.index))
            .unwrap_or("");
        match classify::classify_row(code, name, status, max_level) {
            Ok(region) => {
                regions.push(region);
                if regions.len() % PROGRESS_INTERVAL == 0 {
                    debug!("Classified {} record(s)", regions.len());
                }
            }
            Err(reason) => {
                debug!("Row {} skipped ({})", idx + 2, reason.label());
                skips.record(reason);
            }
        }
    }

    Ok(Scan {
        regions,
        skips,
        encoding,
        delimiter,
        roles,
    })
}

#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub encoding: &'static str,
    pub delimiter: String,
    pub code_column: String,
    pub name_column: String,
    pub status_column: Option<String>,
    pub accepted: usize,
    pub skipped_total: usize,
    pub skipped_retired: usize,
    pub skipped_depth_limit: usize,
    pub skipped_malformed: usize,
    pub level_counts: BTreeMap<u8, usize>,
}

impl Scan {
    pub fn report(&self) -> ScanReport {
        ScanReport {
            encoding: self.encoding.name(),
            delimiter: crate::printable_delimiter(self.delimiter),
            code_column: self.roles.code.header.clone(),
            name_column: self.roles.name.header.clone(),
            status_column: self.roles.status.as_ref().map(|c| c.header.clone()),
            accepted: self.regions.len(),
            skipped_total: self.skips.total(),
            skipped_retired: self.skips.retired,
            skipped_depth_limit: self.skips.depth_limit,
            skipped_malformed: self.skips.malformed,
            level_counts: level_counts(&self.regions),
        }
    }
}

fn level_counts(regions: &[Region]) -> BTreeMap<u8, usize> {
    let mut counts = BTreeMap::new();
    for region in regions {
        *counts.entry(region.level).or_insert(0) += 1;
    }
    counts
}

fn count_duplicate_codes(regions: &[Region]) -> usize {
    let mut seen = HashSet::with_capacity(regions.len());
    regions
        .iter()
        .filter(|r| !seen.insert(r.code.as_str()))
        .count()
}

fn report_levels(regions: &[Region]) {
    info!("Level distribution:");
    for (level, count) in level_counts(regions) {
        info!(
            "  Level {} ({}): {} record(s)",
            level,
            region::level_name(level),
            count
        );
    }
}

fn report_sample(regions: &[Region]) {
    info!("Sample (first {} records):", SAMPLE_ROWS.min(regions.len()));
    for region in regions.iter().take(SAMPLE_ROWS) {
        match &region.parent_code {
            Some(parent) => info!(
                "  {} {} (L{}) -> {}",
                region.code, region.name, region.level, parent
            ),
            None => info!("  {} {} (L{})", region.code, region.name, region.level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(code: &str, level: u8) -> Region {
        Region {
            code: code.to_string(),
            name: String::from("이름"),
            parent_code: region::parent_code_of(code, level),
            level,
        }
    }

    #[test]
    fn count_duplicate_codes_counts_repeats_only() {
        let regions = vec![
            region("1100000000", 1),
            region("1111000000", 2),
            region("1100000000", 1),
            region("1100000000", 1),
        ];
        assert_eq!(count_duplicate_codes(&regions), 2);
    }

    #[test]
    fn level_counts_tally_by_level() {
        let regions = vec![
            region("1100000000", 1),
            region("1111000000", 2),
            region("1114000000", 2),
        ];
        let counts = level_counts(&regions);
        assert_eq!(counts.get(&1), Some(&1));
        assert_eq!(counts.get(&2), Some(&2));
        assert_eq!(counts.get(&3), None);
    }
}
