//! JaCoCo XML format parser

use anyhow::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{CoverageMetric, CoverageParser, CoverageReport, CoverageSummary, FileCoverage};

/// Parser for JaCoCo XML coverage reports.
///
/// Expects a `report` root. Report-level `counter` elements give the
/// project totals; each `package/sourcefile` carries its own counters and
/// `line` entries. Counters nested under `class` or `method` elements are
/// per-symbol detail and are excluded from both levels. File paths are
/// synthesized as `package-name/sourcefile-name`.
pub struct JacocoParser;

impl CoverageParser for JacocoParser {
    fn name(&self) -> &'static str {
        "jacoco"
    }

    fn parse(&self, content: &str) -> Result<CoverageReport> {
        let mut reader = Reader::from_str(content);
        reader.trim_text(true);

        let mut saw_report = false;
        let mut overall = CoverageSummary::default();
        let mut package_name = String::new();
        let mut in_package = false;
        let mut in_class = false;
        let mut in_method = false;
        let mut current_file: Option<FileCoverage> = None;
        let mut files: Vec<FileCoverage> = Vec::new();

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"report" => saw_report = true,
                    b"package" => {
                        in_package = true;
                        package_name = attr_value(e, b"name");
                    }
                    b"class" => in_class = true,
                    b"method" => in_method = true,
                    b"sourcefile" => {
                        let name = attr_value(e, b"name");
                        current_file = Some(FileCoverage {
                            file: format!("{}/{}", package_name, name),
                            ..Default::default()
                        });
                    }
                    b"counter" => {
                        if in_class || in_method {
                            // Per-class/per-method counters are not tracked.
                        } else if let Some(ref mut file) = current_file {
                            apply_counter(e, &mut file.statements, &mut file.lines, &mut file.methods, &mut file.branches);
                        } else if saw_report && !in_package {
                            apply_counter(e, &mut overall.statements, &mut overall.lines, &mut overall.methods, &mut overall.branches);
                        }
                    }
                    b"line" => {
                        if let Some(ref mut file) = current_file {
                            let mut nr = 0u32;
                            let mut ci = 0u64;
                            for attr in e.attributes().filter_map(|a| a.ok()) {
                                let value = String::from_utf8_lossy(&attr.value);
                                match attr.key.as_ref() {
                                    b"nr" => nr = value.parse().unwrap_or(0),
                                    b"ci" => ci = value.parse().unwrap_or(0),
                                    _ => {}
                                }
                            }
                            if ci == 0 && nr > 0 {
                                file.uncovered_lines.push(nr);
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"sourcefile" => {
                        if let Some(file) = current_file.take() {
                            files.push(file);
                        }
                    }
                    b"package" => in_package = false,
                    b"class" => in_class = false,
                    b"method" => in_method = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(anyhow::anyhow!("Error parsing JaCoCo XML: {}", e)),
                _ => {}
            }
            buf.clear();
        }

        if !saw_report {
            anyhow::bail!("Not a JaCoCo report: missing report root element");
        }

        Ok(CoverageReport { overall, files })
    }
}

fn attr_value(e: &BytesStart, key: &[u8]) -> String {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
        .unwrap_or_default()
}

/// Route one `counter` element into the matching bucket. Counter types not
/// in the mapping (COMPLEXITY, CLASS, ...) are ignored; absent types leave
/// their bucket at zero.
fn apply_counter(
    e: &BytesStart,
    statements: &mut CoverageMetric,
    lines: &mut CoverageMetric,
    methods: &mut CoverageMetric,
    branches: &mut CoverageMetric,
) {
    let mut counter_type = String::new();
    let mut missed = 0u64;
    let mut covered = 0u64;
    for attr in e.attributes().filter_map(|a| a.ok()) {
        let value = String::from_utf8_lossy(&attr.value);
        match attr.key.as_ref() {
            b"type" => counter_type = value.to_lowercase(),
            b"missed" => missed = value.parse().unwrap_or(0),
            b"covered" => covered = value.parse().unwrap_or(0),
            _ => {}
        }
    }

    let metric = CoverageMetric::new(covered, covered + missed);
    match counter_type.as_str() {
        "line" => *lines = metric,
        "branch" => *branches = metric,
        "method" => *methods = metric,
        "instruction" => *statements = metric,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JACOCO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<report name="demo">
    <sessioninfo id="host-1" start="1" dump="2"/>
    <package name="com/example">
        <class name="com/example/App" sourcefilename="App.java">
            <method name="run" desc="()V" line="5">
                <counter type="INSTRUCTION" missed="0" covered="9"/>
                <counter type="LINE" missed="0" covered="3"/>
            </method>
            <counter type="LINE" missed="2" covered="8"/>
        </class>
        <sourcefile name="App.java">
            <line nr="5" mi="0" ci="2" mb="0" cb="0"/>
            <line nr="6" mi="1" ci="0" mb="0" cb="0"/>
            <line nr="7" mi="1" ci="0"/>
            <counter type="INSTRUCTION" missed="5" covered="15"/>
            <counter type="LINE" missed="2" covered="8"/>
            <counter type="BRANCH" missed="1" covered="3"/>
            <counter type="METHOD" missed="1" covered="2"/>
        </sourcefile>
    </package>
    <counter type="INSTRUCTION" missed="5" covered="15"/>
    <counter type="LINE" missed="2" covered="8"/>
    <counter type="BRANCH" missed="1" covered="3"/>
    <counter type="METHOD" missed="1" covered="2"/>
    <counter type="COMPLEXITY" missed="4" covered="6"/>
</report>"#;

    #[test]
    fn test_parse_jacoco() {
        let report = JacocoParser.parse(JACOCO).unwrap();

        assert_eq!(report.overall.lines, CoverageMetric::new(8, 10));
        assert_eq!(report.overall.statements, CoverageMetric::new(15, 20));
        assert_eq!(report.overall.branches, CoverageMetric::new(3, 4));
        assert_eq!(report.overall.methods, CoverageMetric::new(2, 3));

        assert_eq!(report.files.len(), 1);
        let file = &report.files[0];
        assert_eq!(file.file, "com/example/App.java");
        assert_eq!(file.lines, CoverageMetric::new(8, 10));
        assert_eq!(file.uncovered_lines, vec![6, 7]);
    }

    #[test]
    fn test_class_and_method_counters_are_excluded() {
        let report = JacocoParser.parse(JACOCO).unwrap();
        // The class-level LINE counter (8/10) and the method-level counters
        // must corrupt neither the file metrics nor the overall totals.
        assert_eq!(report.files[0].lines, CoverageMetric::new(8, 10));
        assert_eq!(report.overall.lines, CoverageMetric::new(8, 10));
    }

    #[test]
    fn test_missing_counter_types_default_to_zero() {
        let xml = r#"<report name="x">
            <package name="pkg">
                <sourcefile name="a.kt">
                    <counter type="LINE" missed="1" covered="1"/>
                </sourcefile>
            </package>
        </report>"#;
        let report = JacocoParser.parse(xml).unwrap();
        assert_eq!(report.files[0].branches, CoverageMetric::new(0, 0));
        assert_eq!(report.files[0].methods, CoverageMetric::new(0, 0));
        assert_eq!(report.files[0].statements, CoverageMetric::new(0, 0));
    }

    #[test]
    fn test_rejects_cobertura_shape() {
        let xml = r#"<coverage lines-valid="2"><sources><source>src</source></sources></coverage>"#;
        assert!(JacocoParser.parse(xml).is_err());
    }

    #[test]
    fn test_rejects_clover_shape() {
        let xml = r#"<coverage><project><metrics statements="1"/></project></coverage>"#;
        assert!(JacocoParser.parse(xml).is_err());
    }

    #[test]
    fn test_rejects_lcov_text() {
        assert!(JacocoParser.parse("SF:a\nend_of_record").is_err());
    }
}
