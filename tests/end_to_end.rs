//! Full pipeline: raw report text → detection → normalized model →
//! rendered output.

use covreport::coverage::{detect_format, CoverageMetric};
use covreport::report::{render_console, render_summary, SummaryOptions};

const CLOVER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<coverage generated="1700000000000">
    <project timestamp="1700000000000">
        <metrics statements="15" coveredstatements="11" conditionals="6" coveredconditionals="4" methods="3" coveredmethods="2"/>
        <file name="src/full.ts">
            <metrics statements="5" coveredstatements="5" conditionals="2" coveredconditionals="2" methods="1" coveredmethods="1"/>
        </file>
        <file name="src/partial.ts">
            <metrics statements="10" coveredstatements="6" conditionals="4" coveredconditionals="2" methods="2" coveredmethods="1"/>
            <line num="7" count="0" type="stmt"/>
            <line num="8" count="0" type="stmt"/>
        </file>
    </project>
</coverage>"#;

#[test]
fn clover_report_renders_project_percentage() {
    let (parser, report) = detect_format(CLOVER).unwrap();
    assert_eq!(parser.name(), "clover");
    assert_eq!(report.overall.lines, CoverageMetric::new(11, 15));

    let options = SummaryOptions::new("https://github.com/acme/widget", "03ab23e");
    let summary = render_summary(&report, &options);
    assert!(summary.contains("73.33%"));
    assert!(summary.contains("[partial.ts](https://github.com/acme/widget/blob/03ab23e/src/partial.ts)"));
    assert!(summary.contains("#L7-L8"));
}

#[test]
fn clover_report_renders_console_table() {
    let (_, report) = detect_format(CLOVER).unwrap();
    let table = render_console(&report, None);

    assert!(table.contains("All files"));
    assert!(table.contains("73.33"));
    assert!(table.contains("7-8"));
}
