//! Cobertura XML format parser

use anyhow::Result;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::{CoverageMetric, CoverageParser, CoverageReport, CoverageSummary, FileCoverage};

/// Parser for Cobertura XML coverage reports.
///
/// Expects a `coverage` root with a `sources/source` base directory; the
/// source element is the rejection signal that keeps Clover documents out,
/// since both dialects share the `coverage` root. Cobertura has no native
/// statement or method counters, so statements mirror lines and method
/// coverage is derived from each method's first line.
pub struct CoberturaParser;

impl CoverageParser for CoberturaParser {
    fn name(&self) -> &'static str {
        "cobertura"
    }

    fn parse(&self, content: &str) -> Result<CoverageReport> {
        let mut reader = Reader::from_str(content);
        reader.trim_text(true);

        let mut overall = CoverageSummary::default();
        let mut source_dir: Option<String> = None;
        let mut in_source = false;
        let mut in_methods = false;
        let mut method_line_seen = false;

        let mut current_class: Option<FileCoverage> = None;
        let mut files: Vec<FileCoverage> = Vec::new();

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"coverage" => {
                        let mut lines_valid = 0u64;
                        let mut lines_covered = 0u64;
                        let mut branches_valid = 0u64;
                        let mut branches_covered = 0u64;
                        for attr in e.attributes().filter_map(|a| a.ok()) {
                            let value = String::from_utf8_lossy(&attr.value);
                            match attr.key.as_ref() {
                                b"lines-valid" => lines_valid = value.parse().unwrap_or(0),
                                b"lines-covered" => lines_covered = value.parse().unwrap_or(0),
                                b"branches-valid" => branches_valid = value.parse().unwrap_or(0),
                                b"branches-covered" => {
                                    branches_covered = value.parse().unwrap_or(0)
                                }
                                _ => {}
                            }
                        }
                        overall.lines = CoverageMetric::new(lines_covered, lines_valid);
                        overall.statements = overall.lines;
                        overall.branches = CoverageMetric::new(branches_covered, branches_valid);
                    }
                    b"source" => in_source = true,
                    b"class" => {
                        let mut file = FileCoverage::default();
                        for attr in e.attributes().filter_map(|a| a.ok()) {
                            if attr.key.as_ref() == b"filename" {
                                file.file = String::from_utf8_lossy(&attr.value).to_string();
                            }
                        }
                        current_class = Some(file);
                    }
                    b"methods" => in_methods = true,
                    b"method" => {
                        method_line_seen = false;
                        if let Some(ref mut class) = current_class {
                            class.methods.total += 1;
                        }
                    }
                    b"line" => {
                        if let Some(ref mut class) = current_class {
                            let mut number = 0u32;
                            let mut hits = 0u64;
                            let mut is_branch = false;
                            let mut condition_coverage: Option<String> = None;
                            for attr in e.attributes().filter_map(|a| a.ok()) {
                                let value = String::from_utf8_lossy(&attr.value);
                                match attr.key.as_ref() {
                                    b"number" => number = value.parse().unwrap_or(0),
                                    b"hits" => hits = value.parse().unwrap_or(0),
                                    b"branch" => is_branch = value == "true",
                                    b"condition-coverage" => {
                                        condition_coverage = Some(value.to_string())
                                    }
                                    _ => {}
                                }
                            }

                            if in_methods {
                                // Only a method's first line decides its coverage.
                                if !method_line_seen {
                                    method_line_seen = true;
                                    if hits > 0 {
                                        class.methods.covered += 1;
                                    }
                                }
                            } else {
                                class.lines.total += 1;
                                if hits > 0 {
                                    class.lines.covered += 1;
                                } else if number > 0 {
                                    class.uncovered_lines.push(number);
                                }
                                if is_branch {
                                    if let Some((covered, total)) =
                                        condition_coverage.as_deref().and_then(parse_conditions)
                                    {
                                        class.branches.covered += covered;
                                        class.branches.total += total;
                                    }
                                }
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::Text(ref e)) => {
                    if in_source && source_dir.is_none() {
                        source_dir = Some(e.unescape().unwrap_or_default().to_string());
                    }
                }
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"source" => in_source = false,
                    b"methods" => in_methods = false,
                    b"class" => {
                        if let Some(mut class) = current_class.take() {
                            class.statements = class.lines;
                            overall.methods.add(class.methods);
                            files.push(class);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(anyhow::anyhow!("Error parsing Cobertura XML: {}", e)),
                _ => {}
            }
            buf.clear();
        }

        let source_dir = match source_dir {
            Some(dir) => dir,
            None => anyhow::bail!("Not a Cobertura report: missing sources/source element"),
        };

        for file in &mut files {
            file.file = join_source(&source_dir, &file.file);
        }

        Ok(CoverageReport { overall, files })
    }
}

/// Pull the `(covered/total)` pair out of a `condition-coverage` value like
/// `"50% (1/2)"`. Malformed values yield `None` and are skipped.
fn parse_conditions(value: &str) -> Option<(u64, u64)> {
    let inner = value.split_once('(')?.1.split_once(')')?.0;
    let (covered, total) = inner.split_once('/')?;
    Some((covered.trim().parse().ok()?, total.trim().parse().ok()?))
}

fn join_source(source_dir: &str, filename: &str) -> String {
    let dir = source_dir.trim_end_matches('/');
    if dir.is_empty() || dir == "." {
        filename.to_string()
    } else {
        format!("{}/{}", dir, filename)
    }
}
