//! Directory tree over per-file metrics, used for report navigation.
//!
//! Directory nodes carry the sum of their subtree's counters; the percentage
//! at every level is recomputed from the summed statements. Children are
//! ordered directories first, then by name.

use serde::{Serialize, Serializer};

use crate::model::{Counters, FileMetrics};

/// A directory or file in the report tree.
#[derive(Debug, Clone)]
pub struct TreeNode<'a> {
    pub name: String,
    /// Cumulative `/`-separated path from the root.
    pub path: String,
    pub is_directory: bool,
    pub file_metrics: Option<&'a FileMetrics>,
    pub children: Vec<TreeNode<'a>>,
    pub counters: Counters,
    pub coverage_percent: f64,
}

/// Wire shape of a node: directories always carry `children`, files carry
/// `fileMetrics` and never `children`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeRepr<'n, 'a> {
    name: &'n str,
    path: &'n str,
    is_directory: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_metrics: Option<&'a FileMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<&'n [TreeNode<'a>]>,
    #[serde(flatten)]
    counters: &'n Counters,
    coverage_percent: f64,
}

impl Serialize for TreeNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeRepr {
            name: &self.name,
            path: &self.path,
            is_directory: self.is_directory,
            file_metrics: self.file_metrics,
            children: self.is_directory.then_some(self.children.as_slice()),
            counters: &self.counters,
            coverage_percent: self.coverage_percent,
        }
        .serialize(serializer)
    }
}

impl<'a> TreeNode<'a> {
    fn directory(name: String, path: String) -> Self {
        Self {
            name,
            path,
            is_directory: true,
            file_metrics: None,
            children: Vec::new(),
            counters: Counters::default(),
            coverage_percent: 0.0,
        }
    }

    fn file(name: String, metrics: &'a FileMetrics) -> Self {
        Self {
            name,
            path: metrics.local_path.clone(),
            is_directory: false,
            file_metrics: Some(metrics),
            children: Vec::new(),
            counters: metrics.counters,
            coverage_percent: metrics.coverage_percent,
        }
    }

    /// Number of files in this subtree.
    pub fn file_count(&self) -> usize {
        if self.is_directory {
            self.children.iter().map(TreeNode::file_count).sum()
        } else {
            1
        }
    }

    /// The directory child called `name`, created at `path` if missing.
    fn child_dir_mut(&mut self, name: &str, path: &str) -> &mut TreeNode<'a> {
        let idx = match self
            .children
            .iter()
            .position(|c| c.is_directory && c.name == name)
        {
            Some(idx) => idx,
            None => {
                self.children.push(TreeNode::directory(name.to_string(), path.to_string()));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    /// Post-order: children are summed before their parent.
    fn summarize(&mut self) {
        if !self.is_directory {
            return;
        }
        for child in &mut self.children {
            child.summarize();
        }
        self.counters = self.children.iter().map(|c| c.counters).sum();
        self.coverage_percent = self.counters.coverage_percent();
    }

    fn sort(&mut self) {
        self.children.sort_by(|a, b| {
            b.is_directory
                .cmp(&a.is_directory)
                .then_with(|| a.name.cmp(&b.name))
        });
        for child in &mut self.children {
            child.sort();
        }
    }
}

/// Build the report tree from a flat list of files.
pub fn build(files: &[FileMetrics]) -> TreeNode<'_> {
    let mut root = TreeNode::directory("/".to_string(), "/".to_string());
    for file in files {
        insert(&mut root, file);
    }
    root.summarize();
    root.sort();
    root
}

fn insert<'a>(root: &mut TreeNode<'a>, file: &'a FileMetrics) {
    let segments: Vec<&str> = file
        .local_path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    let Some((leaf, dirs)) = segments.split_last() else {
        // Nothing usable in the path; hang the file off the root.
        let name = if file.local_path.is_empty() {
            file.file_name.clone()
        } else {
            file.local_path.clone()
        };
        root.children.push(TreeNode::file(name, file));
        return;
    };

    let mut current = root;
    let mut path = String::new();
    for dir in dirs {
        if !path.is_empty() {
            path.push('/');
        }
        path.push_str(dir);
        current = current.child_dir_mut(dir, &path);
    }
    current.children.push(TreeNode::file(leaf.to_string(), file));
}
