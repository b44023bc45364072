/*!
 * Directory tree building and rendering
 *
 * The walk here is the only traversal in the crate. It builds the tree and
 * hands every kept file to a callback, so the rendered tree and the file
 * blocks always agree on what was excluded.
 */

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{GitMarkdownError, Result};
use crate::filter::{IgnoreResolver, GIT_DIR};

/// One filesystem entry in the tree
///
/// `children` is `Some` (possibly empty) for directories and `None` for
/// files. Children are keyed by name, which fixes the rendering order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Entry name
    pub name: String,
    /// Whether this entry is a directory
    pub is_dir: bool,
    /// Directory contents
    pub children: Option<BTreeMap<String, TreeNode>>,
}

impl TreeNode {
    /// Create a childless file node
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
            children: None,
        }
    }

    /// Create an empty directory node
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
            children: Some(BTreeMap::new()),
        }
    }
}

/// A kept file handed to the walk callback
#[derive(Debug, Clone)]
pub struct FileVisit {
    /// Path on disk, rooted at the walk input
    pub path: PathBuf,
    /// Path relative to the walk root
    pub relative_path: PathBuf,
    /// Size in bytes
    pub size: u64,
}

/// Walk `root`, building its tree and calling `on_file` for every kept file
///
/// Entries are visited depth-first in file name order. Excluded entries are
/// skipped together with everything below them.
pub fn walk_tree<F>(root: &Path, resolver: &IgnoreResolver, mut on_file: F) -> Result<TreeNode>
where
    F: FnMut(&FileVisit) -> Result<()>,
{
    let mut node = walk_directory(root, Path::new(""), resolver, &mut on_file)?;
    node.name = display_name(root);
    Ok(node)
}

/// Build the tree for `directory` without reading any file content
pub fn build_tree(directory: &Path, resolver: &IgnoreResolver) -> Result<TreeNode> {
    walk_tree(directory, resolver, |_| Ok(()))
}

fn walk_directory<F>(
    directory: &Path,
    relative_dir: &Path,
    resolver: &IgnoreResolver,
    on_file: &mut F,
) -> Result<TreeNode>
where
    F: FnMut(&FileVisit) -> Result<()>,
{
    let mut node = TreeNode::directory(display_name(directory));
    let scope = resolver.scope(directory);

    let entries = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in entries {
        let entry = entry.map_err(|source| GitMarkdownError::ReadDir {
            path: directory.to_path_buf(),
            source,
        })?;

        let name = entry.file_name().to_string_lossy().to_string();
        let is_dir = entry.file_type().is_dir();

        if name == GIT_DIR {
            continue;
        }

        let relative_path = relative_dir.join(&name);
        if resolver.is_ignored(&scope, &relative_path, Path::new(&name), is_dir) {
            debug!("Ignoring {}", relative_path.display());
            continue;
        }

        let child = if is_dir {
            walk_directory(entry.path(), &relative_path, resolver, on_file)?
        } else {
            let metadata = fs::metadata(entry.path()).map_err(|source| {
                GitMarkdownError::Metadata {
                    path: entry.path().to_path_buf(),
                    source,
                }
            })?;

            on_file(&FileVisit {
                path: entry.path().to_path_buf(),
                relative_path,
                size: metadata.len(),
            })?;

            TreeNode::file(name.as_str())
        };

        if let Some(children) = node.children.as_mut() {
            children.insert(name, child);
        }
    }

    Ok(node)
}

/// Final path component, falling back to the canonical directory name for
/// inputs such as `.` or `./`
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .or_else(|| {
            fs::canonicalize(path)
                .ok()
                .and_then(|abs| abs.file_name().map(|name| name.to_string_lossy().to_string()))
        })
        .unwrap_or_else(|| path.display().to_string())
}

/// Render the children of `node` with box-drawing connectors
///
/// Directories get a trailing `/`. The result has no trailing newline and
/// is empty when the node has no children.
pub fn format_tree(node: &TreeNode, prefix: &str) -> String {
    let Some(children) = &node.children else {
        return String::new();
    };

    let mut lines = Vec::with_capacity(children.len());
    let last_index = children.len().saturating_sub(1);

    for (i, (name, child)) in children.iter().enumerate() {
        let is_last = i == last_index;
        let connector = if is_last { "└── " } else { "├── " };

        let mut line = format!("{}{}{}", prefix, connector, name);
        if child.is_dir {
            line.push('/');
        }
        lines.push(line);

        if child.is_dir {
            let extension = if is_last { "    " } else { "│   " };
            let deeper = format_tree(child, &format!("{}{}", prefix, extension));
            if !deeper.is_empty() {
                lines.push(deeper);
            }
        }
    }

    lines.join("\n")
}
