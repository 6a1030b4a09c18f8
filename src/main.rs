use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use covreport::coverage::parse_coverage_file;
use covreport::report::{render_console, render_summary, SummaryOptions, DEFAULT_ASSETS_URL};

#[derive(Parser)]
#[command(name = "covreport")]
#[command(about = "Normalize coverage reports (Clover, Cobertura, JaCoCo, LCOV) and render summaries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a colorized coverage table to the terminal
    Show {
        /// Path to the coverage report file
        file: PathBuf,

        /// Strip this directory prefix from report paths
        #[arg(long)]
        root_dir: Option<String>,
    },

    /// Render a Markdown summary with progress bars and source links
    Summary {
        /// Path to the coverage report file
        file: PathBuf,

        /// Base repository URL used for file links
        #[arg(long)]
        repo_url: String,

        /// Commit SHA the file links should point at
        #[arg(long)]
        sha: String,

        /// Strip this directory prefix from report paths
        #[arg(long)]
        root_dir: Option<String>,

        /// Base URL for the progress-bar SVG assets
        #[arg(long, default_value = DEFAULT_ASSETS_URL)]
        assets_url: String,

        /// Write the summary to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dump the normalized coverage model as JSON
    Json {
        /// Path to the coverage report file
        file: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Show { file, root_dir } => {
            let report = parse_coverage_file(&file)?;
            println!("{}", render_console(&report, root_dir.as_deref()));
        }
        Commands::Summary {
            file,
            repo_url,
            sha,
            root_dir,
            assets_url,
            output,
        } => {
            let report = parse_coverage_file(&file)?;
            let options = SummaryOptions {
                repo_url,
                sha,
                root_dir,
                assets_url,
            };
            let markdown = render_summary(&report, &options);
            match output {
                Some(path) => {
                    fs::write(&path, markdown)
                        .with_context(|| format!("Could not write {}", path.display()))?;
                    println!("{} Summary written to {}", "✓".green(), path.display());
                }
                None => println!("{}", markdown),
            }
        }
        Commands::Json { file } => {
            let report = parse_coverage_file(&file)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
