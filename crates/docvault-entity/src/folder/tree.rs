//! Folder tree structures for hierarchical display.

use std::collections::HashMap;

use docvault_core::types::FolderId;
use serde::{Deserialize, Serialize};

use super::model::Folder;

/// A node in a folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Depth level (0 for roots).
    pub depth: u32,
    /// Number of documents directly in this folder.
    pub document_count: u64,
    /// Child folder nodes, ordered by name.
    pub children: Vec<FolderNode>,
}

/// The complete folder forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderTree {
    /// The root node(s) of the tree.
    pub roots: Vec<FolderNode>,
    /// Total number of folders in the tree.
    pub total_folders: u64,
}

impl FolderTree {
    /// Create an empty folder tree.
    pub fn empty() -> Self {
        Self {
            roots: Vec::new(),
            total_folders: 0,
        }
    }

    /// Assemble a tree from a flat folder list and per-folder document counts.
    ///
    /// Folders whose parent is missing from `folders` are treated as roots.
    pub fn build(folders: &[Folder], document_counts: &HashMap<FolderId, u64>) -> Self {
        let known: HashMap<FolderId, &Folder> = folders.iter().map(|f| (f.id, f)).collect();
        let mut children: HashMap<Option<FolderId>, Vec<&Folder>> = HashMap::new();
        for folder in folders {
            let parent = folder.parent_id.filter(|p| known.contains_key(p));
            children.entry(parent).or_default().push(folder);
        }
        for list in children.values_mut() {
            list.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        }

        fn assemble(
            parent: Option<FolderId>,
            depth: u32,
            children: &HashMap<Option<FolderId>, Vec<&Folder>>,
            counts: &HashMap<FolderId, u64>,
        ) -> Vec<FolderNode> {
            children
                .get(&parent)
                .map(|list| {
                    list.iter()
                        .map(|f| FolderNode {
                            id: f.id,
                            name: f.name.clone(),
                            depth,
                            document_count: counts.get(&f.id).copied().unwrap_or(0),
                            children: assemble(Some(f.id), depth + 1, children, counts),
                        })
                        .collect()
                })
                .unwrap_or_default()
        }

        Self {
            roots: assemble(None, 0, &children, document_counts),
            total_folders: folders.len() as u64,
        }
    }
}
