//! Coverage report normalization
//!
//! Provides:
//! - Clover, Cobertura and JaCoCo XML parsing
//! - LCOV text parsing
//! - Format auto-detection with first-match-wins ordering

mod clover;
mod cobertura;
mod jacoco;
mod lcov;

pub use clover::CloverParser;
pub use cobertura::CoberturaParser;
pub use jacoco::JacocoParser;
pub use lcov::LcovParser;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Covered/total pair for one coverage dimension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageMetric {
    pub covered: u64,
    pub total: u64,
}

impl CoverageMetric {
    pub fn new(covered: u64, total: u64) -> Self {
        CoverageMetric { covered, total }
    }

    /// Percentage covered. An empty metric counts as fully covered.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.covered as f64 / self.total as f64) * 100.0
    }

    pub fn add(&mut self, other: CoverageMetric) {
        self.covered += other.covered;
        self.total += other.total;
    }
}

/// The four coverage dimensions tracked for every file and directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub statements: CoverageMetric,
    pub lines: CoverageMetric,
    pub methods: CoverageMetric,
    pub branches: CoverageMetric,
}

impl CoverageSummary {
    pub fn add(&mut self, other: &CoverageSummary) {
        self.statements.add(other.statements);
        self.lines.add(other.lines);
        self.methods.add(other.methods);
        self.branches.add(other.branches);
    }
}

/// Coverage data for a single source file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileCoverage {
    pub file: String,
    pub statements: CoverageMetric,
    pub lines: CoverageMetric,
    pub methods: CoverageMetric,
    pub branches: CoverageMetric,
    pub uncovered_lines: Vec<u32>,
}

impl FileCoverage {
    pub fn summary(&self) -> CoverageSummary {
        CoverageSummary {
            statements: self.statements,
            lines: self.lines,
            methods: self.methods,
            branches: self.branches,
        }
    }
}

/// Normalized coverage data from any source format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub overall: CoverageSummary,
    pub files: Vec<FileCoverage>,
}

impl CoverageReport {
    /// Field-wise sum of every file's metrics
    pub fn sum_files(files: &[FileCoverage]) -> CoverageSummary {
        let mut overall = CoverageSummary::default();
        for file in files {
            overall.add(&file.summary());
        }
        overall
    }
}

/// Contract implemented by every format parser.
///
/// `parse` is a pure function: it either converts the raw report text into
/// the normalized model or rejects when the content does not match the
/// parser's schema.
pub trait CoverageParser {
    fn name(&self) -> &'static str;
    fn parse(&self, content: &str) -> Result<CoverageReport>;
}

/// Parsers in detection order. LCOV accepts nearly any text, so it must
/// stay last or it would claim reports meant for the XML formats.
pub fn parsers() -> [&'static dyn CoverageParser; 4] {
    [&JacocoParser, &CoberturaParser, &CloverParser, &LcovParser]
}

/// Try each parser in order, returning the first that accepts the content
pub fn detect_format(content: &str) -> Option<(&'static dyn CoverageParser, CoverageReport)> {
    for parser in parsers() {
        if let Ok(report) = parser.parse(content) {
            return Some((parser, report));
        }
    }
    None
}

/// Read a coverage report file and parse it with whichever format matches
pub fn parse_coverage_file(path: &Path) -> Result<CoverageReport> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read coverage file: {}", path.display()))?;

    match detect_format(&content) {
        Some((_, report)) => Ok(report),
        None => anyhow::bail!(
            "Could not determine coverage report type for {}. None of the available parsers succeeded.",
            path.display()
        ),
    }
}
