// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rebuild a directory hierarchy from a flat recursive tree listing.
//!
//! ```text
//! [ "Scripts", "Scripts/Player.cs", "README.md" ]
//!        |
//!        v
//! Scripts/
//!   Player.cs
//! README.md
//! ```
//!
//! Directories sort before files, each group by name. Directories that only
//! appear as a prefix of a deeper path are created implicitly. Submodule
//! entries are skipped.

use std::collections::BTreeMap;

use super::types::{EntryKind, TreeEntry};

/// Node of the rebuilt hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Dir {
        name: String,
        path: String,
        children: Vec<Self>,
    },
    File {
        name: String,
        path: String,
        sha: String,
        size: u64,
    },
}

impl TreeNode {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Dir { name, .. } | Self::File { name, .. } => name,
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Dir { path, .. } | Self::File { path, .. } => path,
        }
    }

    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self, Self::Dir { .. })
    }
}

#[derive(Default)]
struct DirBuilder {
    dirs: BTreeMap<String, DirBuilder>,
    files: BTreeMap<String, (String, u64)>,
}

impl DirBuilder {
    fn dir_mut(&mut self, segments: &[&str]) -> &mut Self {
        segments.iter().fold(self, |dir, segment| {
            dir.dirs.entry((*segment).to_string()).or_default()
        })
    }

    fn into_nodes(self, prefix: &str) -> Vec<TreeNode> {
        let join = |name: &str| {
            if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}/{name}")
            }
        };

        let mut nodes: Vec<TreeNode> = self
            .dirs
            .into_iter()
            .map(|(name, dir)| {
                let path = join(&name);
                TreeNode::Dir {
                    children: dir.into_nodes(&path),
                    name,
                    path,
                }
            })
            .collect();

        nodes.extend(self.files.into_iter().map(|(name, (sha, size))| {
            TreeNode::File {
                path: join(&name),
                name,
                sha,
                size,
            }
        }));
        nodes
    }
}

/// Rebuild the hierarchy of `entries`.
#[must_use]
pub fn build_hierarchy(entries: &[TreeEntry]) -> Vec<TreeNode> {
    let mut root = DirBuilder::default();

    for entry in entries {
        let segments: Vec<&str> = entry.path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, parents)) = segments.split_last() else {
            continue;
        };
        match entry.kind {
            EntryKind::Tree => {
                root.dir_mut(&segments);
            }
            EntryKind::Blob => {
                root.dir_mut(parents).files.insert(
                    (*last).to_string(),
                    (entry.sha.clone(), entry.size.unwrap_or(0)),
                );
            }
            EntryKind::Commit => {}
        }
    }

    root.into_nodes("")
}

/// Find the node at `path` in a rebuilt hierarchy.
#[must_use]
pub fn find<'a>(nodes: &'a [TreeNode], path: &str) -> Option<&'a TreeNode> {
    let mut current = nodes;
    let mut found = None;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let node = current.iter().find(|n| n.name() == segment)?;
        current = match node {
            TreeNode::Dir { children, .. } => children.as_slice(),
            TreeNode::File { .. } => &[],
        };
        found = Some(node);
    }
    found
}
