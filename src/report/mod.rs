//! Report rendering
//!
//! Provides:
//! - Directory tree aggregation over per-file coverage
//! - Line-range compaction for uncovered line lists
//! - Console table and Markdown summary renderers

mod console;
mod ranges;
mod summary;
mod tree;

pub use console::render_console;
pub use ranges::format_line_ranges;
pub use summary::{render_summary, SummaryOptions, DEFAULT_ASSETS_URL};
pub use tree::{build_tree, TreeNode};
