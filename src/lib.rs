//! covreport - coverage report normalizer
//!
//! A library for turning coverage reports from different test toolchains
//! into one canonical model:
//! - Clover, Cobertura and JaCoCo XML parsing
//! - LCOV text parsing
//! - Format auto-detection with first-match-wins ordering
//! - Colorized console table and Markdown summary rendering

pub mod coverage;
pub mod report;

pub use coverage::{
    detect_format, parse_coverage_file, CoverageMetric, CoverageParser, CoverageReport,
    CoverageSummary, FileCoverage,
};
pub use report::{format_line_ranges, render_console, render_summary, SummaryOptions};
