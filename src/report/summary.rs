//! Markdown summary renderer

use super::format_line_ranges;
use super::tree::{build_tree, TreeNode};
use crate::coverage::{CoverageMetric, CoverageReport, CoverageSummary};

/// Where the pre-rendered progress-bar SVGs are served from by default.
/// The files themselves come from the `generate-assets` binary.
pub const DEFAULT_ASSETS_URL: &str =
    "https://cdn.jsdelivr.net/gh/covreport/covreport@master/dist/res";

/// Uncovered-line cells wider than this collapse to a first-last span.
const UNCOVERED_MAX_LEN: usize = 15;

/// Inputs needed to link the summary back to the repository
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Base repository URL, e.g. `https://github.com/acme/widget`
    pub repo_url: String,
    /// Commit the file links should point at
    pub sha: String,
    /// Optional directory prefix stripped from report paths
    pub root_dir: Option<String>,
    /// Base URL for the progress-bar SVG assets
    pub assets_url: String,
}

impl SummaryOptions {
    pub fn new(repo_url: impl Into<String>, sha: impl Into<String>) -> Self {
        SummaryOptions {
            repo_url: repo_url.into(),
            sha: sha.into(),
            root_dir: None,
            assets_url: DEFAULT_ASSETS_URL.to_string(),
        }
    }
}

/// Render the coverage report as a GitHub-flavored Markdown table with
/// progress-bar images, per-file links and linked uncovered-line ranges.
pub fn render_summary(report: &CoverageReport, options: &SummaryOptions) -> String {
    let tree = build_tree(&report.files, options.root_dir.as_deref());

    let mut rows = Vec::new();
    render_tree(&tree, options, 0, "", &mut rows);
    let summary_row = build_row("**All Files**", &report.overall, options, 0, None, None);

    let mut out = vec![
        "### Code Coverage Report 📊".to_string(),
        String::new(),
        "Here are the details about the code coverage for the latest commit.".to_string(),
        String::new(),
        "| File | Statements | Branches | Functions | Lines | Uncovered Lines |".to_string(),
        "| :--- | :--- | :--- | :--- | :--- | :--- |".to_string(),
    ];
    out.extend(rows);
    out.push(summary_row);
    out.join("\n")
}

fn render_tree(
    node: &TreeNode,
    options: &SummaryOptions,
    indent: usize,
    prefix: &str,
    rows: &mut Vec<String>,
) {
    for (name, child) in &node.children {
        let current_path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", prefix, name)
        };

        if let Some(file) = &child.file {
            rows.push(build_row(
                name,
                &child.totals,
                options,
                indent,
                Some(&current_path),
                Some(&file.uncovered_lines),
            ));
        } else {
            let dir_name = format!("**{}/**", name);
            rows.push(build_row(&dir_name, &child.totals, options, indent, None, None));
            render_tree(child, options, indent + 2, &current_path, rows);
        }
    }
}

fn build_row(
    name: &str,
    totals: &CoverageSummary,
    options: &SummaryOptions,
    indent: usize,
    file_path: Option<&str>,
    uncovered: Option<&[u32]>,
) -> String {
    let bullet = if indent > 0 { "•  " } else { "" };
    let indent_str = format!("{}{}", " ".repeat(indent), bullet);

    let file_cell = match file_path {
        Some(path) => format!(
            "{}[{}]({}/blob/{}/{})",
            indent_str, name, options.repo_url, options.sha, path
        ),
        None => format!("{}{}", indent_str, name),
    };

    let cols = [
        file_cell,
        format_metric(totals.statements, options),
        format_metric(totals.branches, options),
        format_metric(totals.methods, options),
        format_metric(totals.lines, options),
        format_uncovered_cell(uncovered, file_path, options),
    ];
    format!("| {} |", cols.join(" | "))
}

fn format_metric(metric: CoverageMetric, options: &SummaryOptions) -> String {
    let pct = metric.percentage();
    format!("{} {:.2}%", progress_bar(pct, &options.assets_url), pct)
}

/// Inline image reference for one metric cell. The URL encodes the color
/// bucket and the percentage rounded to the nearest multiple of 5,
/// zero-padded to three digits.
fn progress_bar(percentage: f64, assets_url: &str) -> String {
    let pct = percentage.round() as i64;
    let color = if pct < 50 {
        "red"
    } else if pct < 80 {
        "yellow"
    } else {
        "green"
    };
    let bucket = ((pct as f64 / 5.0).round() as i64) * 5;
    format!("![{}%]({}/progress-{}-{:03}.svg)", pct, assets_url, color, bucket)
}

/// Uncovered-line ranges as linked code fragments pointing at the
/// `#L<start>-L<end>` (or `#L<start>`) anchors of the file at the given
/// commit. Directory and summary rows get an empty cell.
fn format_uncovered_cell(
    uncovered: Option<&[u32]>,
    file_path: Option<&str>,
    options: &SummaryOptions,
) -> String {
    let (Some(lines), Some(path)) = (uncovered, file_path) else {
        return String::new();
    };
    if lines.is_empty() {
        return String::new();
    }

    let file_url = format!("{}/blob/{}/{}", options.repo_url, options.sha, path);
    format_line_ranges(lines, Some(UNCOVERED_MAX_LEN))
        .split(',')
        .map(|range| {
            let anchor = match range.split_once('-') {
                Some((start, end)) => format!("#L{}-L{}", start, end),
                None => format!("#L{}", range),
            };
            format!("[`{}`]({}{})", range, file_url, anchor)
        })
        .collect::<Vec<_>>()
        .join(", ")
}
