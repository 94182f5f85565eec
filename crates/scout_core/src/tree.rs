use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use scout_logging::scout_warn;
use serde::{Deserialize, Deserializer};

/// Names longer than this many characters are shown truncated.
pub const NAME_DISPLAY_LIMIT: usize = 32;
/// Appended to a directory's name when it is saved as an archive.
pub const ARCHIVE_SUFFIX: &str = ".zip";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// One file-system entry as delivered by the folder-structure endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File,
            children: Vec::new(),
        }
    }

    pub fn directory(
        name: impl Into<String>,
        path: impl Into<String>,
        children: Vec<TreeNode>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory,
            children,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<TreeNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<TreeNode>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    path: String,
    kind: NodeKind,
    depth: usize,
    children: Vec<NodeId>,
}

/// Arena-allocated snapshot of one folder-structure response.
///
/// Children keep the order the server sent them in. A snapshot is never
/// patched; a new response builds a new tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileTree {
    entries: Vec<Entry>,
    by_path: HashMap<String, NodeId>,
}

impl FileTree {
    pub fn from_root(root: TreeNode) -> Self {
        let mut tree = Self::default();
        tree.insert(root, 0);
        tree
    }

    fn insert(&mut self, node: TreeNode, depth: usize) -> Option<NodeId> {
        if self.by_path.contains_key(&node.path) {
            scout_warn!(
                "Skipping duplicate tree path {:?} (name {:?})",
                node.path,
                node.name
            );
            return None;
        }

        let id = NodeId(self.entries.len());
        self.by_path.insert(node.path.clone(), id);
        self.entries.push(Entry {
            name: node.name,
            path: node.path,
            kind: node.kind,
            depth,
            children: Vec::new(),
        });

        if node.kind == NodeKind::File {
            if !node.children.is_empty() {
                scout_warn!(
                    "Ignoring {} children delivered on file {:?}",
                    node.children.len(),
                    self.entries[id.index()].path
                );
            }
            return Some(id);
        }

        for child in node.children {
            if let Some(child_id) = self.insert(child, depth + 1) {
                self.entries[id.index()].children.push(child_id);
            }
        }
        Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn lookup(&self, path: &str) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.entries.get(id.index()).map(|entry| entry.kind)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.entries.get(id.index()).map(|entry| entry.name.as_str())
    }

    pub fn path(&self, id: NodeId) -> Option<&str> {
        self.entries.get(id.index()).map(|entry| entry.path.as_str())
    }

    /// Project the tree into visible rows: depth-first, children of
    /// collapsed directories omitted.
    pub fn visible_rows(&self, expansion: &ExpansionState) -> Vec<crate::TreeRowView> {
        let mut rows = Vec::new();
        if !self.is_empty() {
            self.push_rows(NodeId::ROOT, expansion, &mut rows);
        }
        rows
    }

    fn push_rows(
        &self,
        id: NodeId,
        expansion: &ExpansionState,
        rows: &mut Vec<crate::TreeRowView>,
    ) {
        let entry = &self.entries[id.index()];
        let expanded = entry.kind == NodeKind::Directory && expansion.is_expanded(&entry.path);
        rows.push(crate::TreeRowView {
            path: entry.path.clone(),
            name: entry.name.clone(),
            label: truncate_name(&entry.name, NAME_DISPLAY_LIMIT),
            depth: entry.depth,
            kind: entry.kind,
            category: file_category(entry.kind, &entry.name),
            expanded,
            action: RowAction::for_kind(entry.kind),
        });

        if expanded {
            for child in &entry.children {
                self.push_rows(*child, expansion, rows);
            }
        }
    }
}

/// Paths of expanded directories for one drawer session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpansionState {
    expanded: BTreeSet<String>,
}

impl ExpansionState {
    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    /// Flip one path; returns whether it is now expanded.
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

/// What the per-row download affordance does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    DownloadFile,
    DownloadArchive,
}

impl RowAction {
    fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::File => RowAction::DownloadFile,
            NodeKind::Directory => RowAction::DownloadArchive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Folder,
    Text,
    Markup,
    Data,
    Image,
    Pdf,
    Archive,
    Code,
    Generic,
}

const EXTENSION_CATEGORIES: &[(&str, FileCategory)] = &[
    ("txt", FileCategory::Text),
    ("md", FileCategory::Text),
    ("log", FileCategory::Text),
    ("html", FileCategory::Markup),
    ("htm", FileCategory::Markup),
    ("xml", FileCategory::Markup),
    ("json", FileCategory::Data),
    ("csv", FileCategory::Data),
    ("yaml", FileCategory::Data),
    ("yml", FileCategory::Data),
    ("png", FileCategory::Image),
    ("jpg", FileCategory::Image),
    ("jpeg", FileCategory::Image),
    ("gif", FileCategory::Image),
    ("svg", FileCategory::Image),
    ("webp", FileCategory::Image),
    ("pdf", FileCategory::Pdf),
    ("zip", FileCategory::Archive),
    ("gz", FileCategory::Archive),
    ("tar", FileCategory::Archive),
    ("py", FileCategory::Code),
    ("js", FileCategory::Code),
    ("css", FileCategory::Code),
    ("rs", FileCategory::Code),
];

/// Visual hint for a node. Files are classified by lowercase extension;
/// anything not in the table is `Generic`.
pub fn file_category(kind: NodeKind, name: &str) -> FileCategory {
    if kind == NodeKind::Directory {
        return FileCategory::Folder;
    }
    let Some(extension) = Path::new(name).extension().and_then(|ext| ext.to_str()) else {
        return FileCategory::Generic;
    };
    let extension = extension.to_ascii_lowercase();
    EXTENSION_CATEGORIES
        .iter()
        .find(|(known, _)| *known == extension)
        .map(|(_, category)| *category)
        .unwrap_or(FileCategory::Generic)
}

pub fn truncate_name(name: &str, limit: usize) -> String {
    if name.chars().count() <= limit {
        return name.to_string();
    }
    let mut truncated: String = name.chars().take(limit.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

/// File name a download of this node is saved under.
pub fn save_name(kind: NodeKind, name: &str) -> String {
    match kind {
        NodeKind::File => name.to_string(),
        NodeKind::Directory => format!("{name}{ARCHIVE_SUFFIX}"),
    }
}
