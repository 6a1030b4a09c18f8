//! Line-range compaction

/// Compress a list of line numbers into a compact ranges string.
///
/// Input is sorted internally; consecutive runs render as `start-end` and
/// singletons as the bare number, joined with commas. When the full
/// rendering would exceed `max_len`, the whole input collapses to a single
/// `first-last` span. That collapse is lossy and used only to keep
/// display cells narrow.
///
/// ```
/// use covreport::report::format_line_ranges;
///
/// assert_eq!(format_line_ranges(&[3, 5, 4, 8, 11, 10], None), "3-5,8,10-11");
/// assert_eq!(format_line_ranges(&[], None), "");
/// ```
pub fn format_line_ranges(lines: &[u32], max_len: Option<usize>) -> String {
    if lines.is_empty() {
        return String::new();
    }

    let mut sorted = lines.to_vec();
    sorted.sort_unstable();

    let mut parts: Vec<String> = Vec::new();
    let mut start = sorted[0];
    let mut prev = sorted[0];
    for &n in &sorted[1..] {
        if n > prev + 1 {
            parts.push(range_text(start, prev));
            start = n;
        }
        prev = n;
    }
    parts.push(range_text(start, prev));

    let rendered = parts.join(",");
    match max_len {
        Some(max) if rendered.len() > max => {
            format!("{}-{}", sorted[0], sorted[sorted.len() - 1])
        }
        _ => rendered,
    }
}

fn range_text(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{}-{}", start, end)
    }
}
