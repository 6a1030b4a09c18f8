//! LCOV text format parser

use std::collections::BTreeMap;

use anyhow::Result;

use super::{CoverageMetric, CoverageParser, CoverageReport, FileCoverage};

/// Parser for LCOV tracefiles.
///
/// LCOV is line-oriented text, not XML: records are separated by the
/// literal `end_of_record` and each line is a `TAG:value` pair. There is no
/// structural validation to hang a rejection on, so nearly any text
/// "parses" into an empty report, which is why the detector runs this
/// parser last.
pub struct LcovParser;

impl CoverageParser for LcovParser {
    fn name(&self) -> &'static str {
        "lcov"
    }

    fn parse(&self, content: &str) -> Result<CoverageReport> {
        let files: Vec<FileCoverage> = content
            .split("end_of_record")
            .filter_map(parse_record)
            .collect();

        // LCOV has no top-level counters; the overall is the field-wise
        // sum of every record.
        let overall = CoverageReport::sum_files(&files);

        Ok(CoverageReport { overall, files })
    }
}

/// Parse one record block. Records that never name a source file via `SF`
/// are discarded entirely.
fn parse_record(record: &str) -> Option<FileCoverage> {
    if record.trim().is_empty() {
        return None;
    }

    let mut file = String::new();
    let mut line_hits: BTreeMap<u32, u64> = BTreeMap::new();
    let mut lines_found: Option<u64> = None;
    let mut lines_hit = 0u64;
    let mut functions = CoverageMetric::default();
    let mut branches = CoverageMetric::default();

    for line in record.lines() {
        let Some((tag, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match tag.trim().to_uppercase().as_str() {
            "SF" => file = value.to_string(),
            "DA" => {
                // DA:<line>,<hits>[,<checksum>]; last write wins for
                // duplicate line numbers.
                let mut parts = value.split(',');
                if let (Some(num), Some(hits)) = (parts.next(), parts.next()) {
                    if let Ok(num) = num.trim().parse::<u32>() {
                        line_hits.insert(num, hits.trim().parse().unwrap_or(0));
                    }
                }
            }
            "LF" => lines_found = value.parse().ok(),
            "LH" => lines_hit = value.parse().unwrap_or(0),
            "FNF" => functions.total = value.parse().unwrap_or(0),
            "FNH" => functions.covered = value.parse().unwrap_or(0),
            "BRF" => branches.total = value.parse().unwrap_or(0),
            "BRH" => branches.covered = value.parse().unwrap_or(0),
            _ => {}
        }
    }

    if file.is_empty() {
        return None;
    }

    let lines = CoverageMetric::new(lines_hit, lines_found.unwrap_or(line_hits.len() as u64));
    let uncovered_lines = line_hits
        .iter()
        .filter(|(_, &hits)| hits == 0)
        .map(|(&num, _)| num)
        .collect();

    Some(FileCoverage {
        file,
        statements: lines,
        lines,
        methods: functions,
        branches,
        uncovered_lines,
    })
}
