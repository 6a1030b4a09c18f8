//! Generates the progress-bar SVG assets referenced by the Markdown
//! summary: 101 percentages × 3 colors, written once at release time and
//! served from a CDN, never rendered at runtime.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

const WIDTH: u32 = 100;
const HEIGHT: u32 = 16;
const RADIUS: u32 = 4;
const BACKGROUND: &str = "#e9ecef";
const COLORS: [(&str, &str); 3] = [
    ("red", "#dc3545"),
    ("yellow", "#ffc107"),
    ("green", "#28a745"),
];

#[derive(Parser)]
#[command(name = "generate-assets")]
#[command(about = "Generate the progress-bar SVG assets for the Markdown summary")]
struct Cli {
    /// Directory to write the SVG files into
    #[arg(short, long, default_value = "dist/res")]
    output: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("Could not create {}", cli.output.display()))?;

    let mut count = 0;
    for (name, fill) in COLORS {
        for pct in 0..=100u32 {
            let path = cli.output.join(format!("progress-{}-{:03}.svg", name, pct));
            fs::write(&path, progress_svg(pct, fill))
                .with_context(|| format!("Could not write {}", path.display()))?;
            count += 1;
        }
        println!("Generated {} progress bars (101 files)", name);
    }

    println!("\nTotal files created: {} SVG files", count);
    println!("Output directory: {}", cli.output.display());
    Ok(())
}

/// A two-rectangle bar: full-width background plus a fill scaled to the
/// percentage (omitted entirely at zero).
fn progress_svg(percentage: u32, fill: &str) -> String {
    let progress_width = (percentage as f64 / 100.0) * WIDTH as f64;
    let bar = if percentage > 0 {
        format!(
            "\n  <rect width=\"{}\" height=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"{}\"/>",
            progress_width, HEIGHT, RADIUS, RADIUS, fill
        )
    } else {
        String::new()
    };

    format!(
        "<svg width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">\n  <rect width=\"{w}\" height=\"{h}\" rx=\"{r}\" ry=\"{r}\" fill=\"{bg}\"/>{bar}\n</svg>",
        w = WIDTH,
        h = HEIGHT,
        r = RADIUS,
        bg = BACKGROUND,
        bar = bar
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_percent_has_no_fill_rect() {
        let svg = progress_svg(0, "#dc3545");
        assert_eq!(svg.matches("<rect").count(), 1);
    }

    #[test]
    fn test_fill_scales_with_percentage() {
        let svg = progress_svg(50, "#28a745");
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("width=\"50\""));
    }
}
