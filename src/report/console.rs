//! Console table renderer

use colored::{Color, ColoredString, Colorize};

use super::format_line_ranges;
use super::tree::{build_tree, TreeNode};
use crate::coverage::{CoverageReport, CoverageSummary};

/// Uncovered-line cells wider than this collapse to a first-last span.
const UNCOVERED_MAX_LEN: usize = 30;

/// Render the coverage report as a Jest-style colorized table.
///
/// One row per tree node in depth-first pre-order, directories marked with
/// a trailing `/` and indented two spaces per level, followed by an
/// "All files" row computed from the report's overall metrics.
pub fn render_console(report: &CoverageReport, root_dir: Option<&str>) -> String {
    let tree = build_tree(&report.files, root_dir);
    let name_width = name_column_width(&tree, 0).max("All files".len());

    let header = build_header(name_width);
    let separator = "-".repeat(header.len());

    let mut body = Vec::new();
    render_tree(&tree, name_width, 0, &mut body);
    let summary = build_row("All files", 0, &report.overall, "", name_width);

    let mut out = vec![separator.clone(), header, separator.clone()];
    out.extend(body);
    out.push(separator.clone());
    out.push(summary);
    out.push(separator);
    out.join("\n")
}

fn render_tree(node: &TreeNode, width: usize, indent: usize, rows: &mut Vec<String>) {
    for (name, child) in &node.children {
        if let Some(file) = &child.file {
            let uncovered = format_line_ranges(&file.uncovered_lines, Some(UNCOVERED_MAX_LEN));
            rows.push(build_row(name, indent, &child.totals, &uncovered, width));
        } else {
            let dir_name = format!("{}/", name);
            rows.push(build_row(&dir_name, indent, &child.totals, "", width));
            render_tree(child, width, indent + 2, rows);
        }
    }
}

fn build_row(
    name: &str,
    indent: usize,
    totals: &CoverageSummary,
    uncovered: &str,
    width: usize,
) -> String {
    let stmts_pct = totals.statements.percentage();
    let branch_pct = totals.branches.percentage();
    let funcs_pct = totals.methods.percentage();
    let lines_pct = totals.lines.percentage();

    let name_cell = format!("{:<width$}", format!("{}{}", " ".repeat(indent), name));

    [
        colorize(lines_pct, &name_cell).to_string(),
        colorize(stmts_pct, &format!("{:>8.2}", stmts_pct)).to_string(),
        colorize(branch_pct, &format!("{:>9.2}", branch_pct)).to_string(),
        colorize(funcs_pct, &format!("{:>8.2}", funcs_pct)).to_string(),
        colorize(lines_pct, &format!("{:>8.2}", lines_pct)).to_string(),
        format!(" {}", uncovered.red()),
    ]
    .join(" |")
}

fn build_header(width: usize) -> String {
    [
        format!("{:<width$}", "File"),
        format!("{:>8}", "% Stmts"),
        format!("{:>9}", "% Branch"),
        format!("{:>8}", "% Funcs"),
        format!("{:>8}", "% Lines"),
        " Uncovered Line #s".to_string(),
    ]
    .join(" |")
}

/// Widest name cell in the tree, accounting for indentation and the
/// trailing `/` on directories.
fn name_column_width(node: &TreeNode, indent: usize) -> usize {
    let mut max = 0;
    for (name, child) in &node.children {
        let marker = if child.is_file() { 0 } else { 1 };
        max = max.max(indent + name.len() + marker);
        if !child.is_file() {
            max = max.max(name_column_width(child, indent + 2));
        }
    }
    max
}

fn color_for(pct: f64) -> Color {
    if pct < 50.0 {
        Color::Red
    } else if pct < 80.0 {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn colorize(pct: f64, text: &str) -> ColoredString {
    text.color(color_for(pct))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{CoverageMetric, FileCoverage};

    fn sample_report() -> CoverageReport {
        let files = vec![
            FileCoverage {
                file: "src/app.rs".to_string(),
                statements: CoverageMetric::new(9, 10),
                lines: CoverageMetric::new(9, 10),
                methods: CoverageMetric::new(2, 2),
                branches: CoverageMetric::new(3, 4),
                uncovered_lines: vec![42],
            },
            FileCoverage {
                file: "src/util/math.rs".to_string(),
                statements: CoverageMetric::new(2, 10),
                lines: CoverageMetric::new(2, 10),
                methods: CoverageMetric::new(1, 3),
                branches: CoverageMetric::new(0, 2),
                uncovered_lines: vec![3, 4, 5, 8, 10, 11],
            },
        ];
        CoverageReport {
            overall: CoverageReport::sum_files(&files),
            files,
        }
    }

    /// Drop ANSI escape sequences so structure asserts are independent of
    /// whether color output is enabled in the test environment.
    fn strip_ansi(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_render_console_structure() {
        let out = strip_ansi(&render_console(&sample_report(), None));
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[1].starts_with("File"));
        assert!(lines[1].contains("% Stmts"));
        assert!(lines[1].ends_with(" Uncovered Line #s"));
        assert!(lines[0].chars().all(|c| c == '-'));
        assert_eq!(lines[0].len(), lines[1].len());

        // Pre-order: the src/ directory row precedes its children.
        assert!(lines[3].trim_start().starts_with("src/"));
        assert!(lines[4].contains("app.rs"));
        assert!(out.contains("All files"));
    }

    #[test]
    fn test_rows_show_percentages_and_ranges() {
        let out = render_console(&sample_report(), None);

        assert!(out.contains("90.00"));
        assert!(out.contains("20.00"));
        assert!(out.contains("3-5,8,10-11"));
    }

    #[test]
    fn test_directories_indent_children() {
        let out = strip_ansi(&render_console(&sample_report(), None));
        let util_row = out.lines().find(|l| l.contains("util/")).unwrap();
        let math_row = out.lines().find(|l| l.contains("math.rs")).unwrap();

        assert!(util_row.starts_with("  util/"));
        assert!(math_row.starts_with("    math.rs"));
    }

    #[test]
    fn test_ansi_colors_emitted() {
        colored::control::set_override(true);
        let out = render_console(&sample_report(), None);

        assert!(out.contains("\x1b[31m"));
        assert!(out.contains("\x1b[32m"));
        assert!(out.contains("\x1b[0m"));
    }

    #[test]
    fn test_color_buckets() {
        assert_eq!(color_for(49.99), Color::Red);
        // Exactly 50 is yellow, not red.
        assert_eq!(color_for(50.0), Color::Yellow);
        assert_eq!(color_for(79.99), Color::Yellow);
        // Exactly 80 is green, not yellow.
        assert_eq!(color_for(80.0), Color::Green);
    }
}
