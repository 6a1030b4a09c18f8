//! Clover XML format parser

use anyhow::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{CoverageMetric, CoverageParser, CoverageReport, CoverageSummary, FileCoverage};

/// Parser for Clover XML coverage reports.
///
/// Expects a `coverage` root holding a `project` with its own `metrics`
/// element. Files may sit under `package` groupings or directly under the
/// project; both layouts are merged into one flat file list. Clover draws
/// no statement-vs-line distinction, so both buckets carry the statement
/// counters.
pub struct CloverParser;

impl CoverageParser for CloverParser {
    fn name(&self) -> &'static str {
        "clover"
    }

    fn parse(&self, content: &str) -> Result<CoverageReport> {
        let mut reader = Reader::from_str(content);
        reader.trim_text(true);

        let mut in_coverage = false;
        let mut in_project = false;
        let mut in_package = false;
        let mut project_metrics: Option<CoverageSummary> = None;
        let mut current_file: Option<FileCoverage> = None;
        let mut files: Vec<FileCoverage> = Vec::new();

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"coverage" => in_coverage = true,
                    b"project" if in_coverage => in_project = true,
                    b"package" if in_project => in_package = true,
                    b"file" if in_project => {
                        let mut file = FileCoverage::default();
                        for attr in e.attributes().filter_map(|a| a.ok()) {
                            if attr.key.as_ref() == b"name" {
                                file.file = String::from_utf8_lossy(&attr.value).to_string();
                            }
                        }
                        current_file = Some(file);
                    }
                    b"metrics" => {
                        let metrics = read_metrics(e);
                        if let Some(ref mut file) = current_file {
                            file.statements = metrics.statements;
                            file.lines = metrics.lines;
                            file.methods = metrics.methods;
                            file.branches = metrics.branches;
                        } else if in_project && !in_package && project_metrics.is_none() {
                            project_metrics = Some(metrics);
                        }
                    }
                    b"line" => {
                        if let Some(ref mut file) = current_file {
                            let mut num = 0u32;
                            let mut count = 0u64;
                            for attr in e.attributes().filter_map(|a| a.ok()) {
                                match attr.key.as_ref() {
                                    b"num" => {
                                        num = String::from_utf8_lossy(&attr.value)
                                            .parse()
                                            .unwrap_or(0)
                                    }
                                    b"count" => {
                                        count = String::from_utf8_lossy(&attr.value)
                                            .parse()
                                            .unwrap_or(0)
                                    }
                                    _ => {}
                                }
                            }
                            if count == 0 && num > 0 {
                                file.uncovered_lines.push(num);
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"file" => {
                        if let Some(file) = current_file.take() {
                            files.push(file);
                        }
                    }
                    b"package" => in_package = false,
                    b"project" => in_project = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(anyhow::anyhow!("Error parsing Clover XML: {}", e)),
                _ => {}
            }
            buf.clear();
        }

        let overall = match project_metrics {
            Some(metrics) => metrics,
            None => anyhow::bail!("Not a Clover report: missing coverage/project metrics"),
        };

        Ok(CoverageReport { overall, files })
    }
}

/// Map a Clover `metrics` element onto the four shared buckets. Statements
/// and lines are the same pair; branches come from the conditional counters.
fn read_metrics(e: &BytesStart) -> CoverageSummary {
    let mut statements = 0u64;
    let mut covered_statements = 0u64;
    let mut conditionals = 0u64;
    let mut covered_conditionals = 0u64;
    let mut methods = 0u64;
    let mut covered_methods = 0u64;

    for attr in e.attributes().filter_map(|a| a.ok()) {
        let value = String::from_utf8_lossy(&attr.value);
        match attr.key.as_ref() {
            b"statements" => statements = value.parse().unwrap_or(0),
            b"coveredstatements" => covered_statements = value.parse().unwrap_or(0),
            b"conditionals" => conditionals = value.parse().unwrap_or(0),
            b"coveredconditionals" => covered_conditionals = value.parse().unwrap_or(0),
            b"methods" => methods = value.parse().unwrap_or(0),
            b"coveredmethods" => covered_methods = value.parse().unwrap_or(0),
            _ => {}
        }
    }

    CoverageSummary {
        statements: CoverageMetric::new(covered_statements, statements),
        lines: CoverageMetric::new(covered_statements, statements),
        methods: CoverageMetric::new(covered_methods, methods),
        branches: CoverageMetric::new(covered_conditionals, conditionals),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOVER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<coverage generated="1700000000000" clover="3.2.0">
    <project timestamp="1700000000000">
        <metrics statements="15" coveredstatements="11" conditionals="6" coveredconditionals="4" methods="3" coveredmethods="2"/>
        <package name="app">
            <metrics statements="5" coveredstatements="5" conditionals="2" coveredconditionals="2" methods="1" coveredmethods="1"/>
            <file name="src/app/handler.ts">
                <metrics statements="5" coveredstatements="5" conditionals="2" coveredconditionals="2" methods="1" coveredmethods="1"/>
                <line num="1" count="4" type="stmt"/>
                <line num="2" count="4" type="stmt"/>
            </file>
        </package>
        <file name="src/util.ts">
            <metrics statements="10" coveredstatements="6" conditionals="4" coveredconditionals="2" methods="2" coveredmethods="1"/>
            <line num="12" count="0" type="stmt"/>
            <line num="13" count="0" type="stmt"/>
            <line num="14" count="3" type="stmt"/>
        </file>
    </project>
</coverage>"#;

    #[test]
    fn test_parse_clover() {
        let report = CloverParser.parse(CLOVER).unwrap();

        assert_eq!(report.overall.lines, CoverageMetric::new(11, 15));
        assert_eq!(report.overall.statements, CoverageMetric::new(11, 15));
        assert_eq!(report.overall.branches, CoverageMetric::new(4, 6));
        assert_eq!(report.overall.methods, CoverageMetric::new(2, 3));

        assert_eq!(report.files.len(), 2);
        assert_eq!(report.files[0].file, "src/app/handler.ts");
        assert_eq!(report.files[0].lines, CoverageMetric::new(5, 5));
        assert!(report.files[0].uncovered_lines.is_empty());

        assert_eq!(report.files[1].file, "src/util.ts");
        assert_eq!(report.files[1].lines, CoverageMetric::new(6, 10));
        assert_eq!(report.files[1].uncovered_lines, vec![12, 13]);
    }

    #[test]
    fn test_package_metrics_do_not_shadow_project_metrics() {
        let report = CloverParser.parse(CLOVER).unwrap();
        // Project metrics come first in document order, but the package
        // metrics element must never overwrite them either way.
        assert_eq!(report.overall.statements.total, 15);
    }

    #[test]
    fn test_rejects_cobertura_shape() {
        let xml = r#"<coverage lines-valid="2" lines-covered="1">
            <sources><source>src</source></sources>
            <packages/>
        </coverage>"#;
        assert!(CloverParser.parse(xml).is_err());
    }

    #[test]
    fn test_rejects_jacoco_shape() {
        let xml = r#"<report name="x"><counter type="LINE" missed="1" covered="1"/></report>"#;
        assert!(CloverParser.parse(xml).is_err());
    }

    #[test]
    fn test_rejects_non_xml() {
        assert!(CloverParser.parse("SF:src/main.rs\nend_of_record").is_err());
    }
}
