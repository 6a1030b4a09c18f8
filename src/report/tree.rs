//! Directory tree aggregation

use std::collections::BTreeMap;
use std::path::Path;

use crate::coverage::{CoverageSummary, FileCoverage};

/// A node in the directory tree built for one render call.
///
/// Children are keyed by path segment and ordered by name, which is the
/// order both renderers emit rows in. Directory nodes carry no coverage of
/// their own; `totals` is the sum over all descendant files. The tree is
/// transient: rebuilt from the flat file list on every render and
/// discarded afterwards.
#[derive(Debug, Default)]
pub struct TreeNode {
    pub children: BTreeMap<String, TreeNode>,
    pub file: Option<FileCoverage>,
    pub totals: CoverageSummary,
}

impl TreeNode {
    pub fn is_file(&self) -> bool {
        self.file.is_some()
    }
}

/// Build a directory tree from flat per-file records.
///
/// Paths are made relative to `root_dir` when given (records outside the
/// root keep their full path), then split on `/` into one node per
/// segment with the record attached at the final one.
pub fn build_tree(files: &[FileCoverage], root_dir: Option<&str>) -> TreeNode {
    let mut root = TreeNode::default();

    for record in files {
        let display = match root_dir {
            Some(dir) => Path::new(&record.file)
                .strip_prefix(dir)
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|_| record.file.clone()),
            None => record.file.clone(),
        };

        let parts: Vec<&str> = display.split('/').filter(|s| !s.is_empty()).collect();
        let Some((leaf_name, dirs)) = parts.split_last() else {
            continue;
        };

        let mut node = &mut root;
        for part in dirs {
            node = node.children.entry((*part).to_string()).or_default();
        }
        node.children
            .entry((*leaf_name).to_string())
            .or_default()
            .file = Some(record.clone());
    }

    aggregate(&mut root);
    root
}

/// Sum every descendant file's metric quadruple into each directory node,
/// returning the flattened leaf summaries.
fn aggregate(node: &mut TreeNode) -> Vec<CoverageSummary> {
    if let Some(file) = &node.file {
        node.totals = file.summary();
        return vec![node.totals];
    }

    let mut leaves = Vec::new();
    let mut totals = CoverageSummary::default();
    for child in node.children.values_mut() {
        for summary in aggregate(child) {
            totals.add(&summary);
            leaves.push(summary);
        }
    }
    node.totals = totals;
    leaves
}
