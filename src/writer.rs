/*!
 * Markdown writer implementation for gitmarkdown
 */

use std::fs;
use std::io::{self, Write};

use tracing::{info, warn};

use crate::clipboard;
use crate::config::Config;
use crate::error::{GitMarkdownError, Result};
use crate::scanner::{Scanner, Snapshot};
use crate::tree::{display_name, format_tree};

/// Formats one file as a document section
pub trait Exporter {
    /// Format a file's content under its relative path
    fn format(&self, relative_path: &str, content: &str, language: &str) -> String;
}

/// `## File:` heading followed by a fenced code block
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn format(&self, relative_path: &str, content: &str, language: &str) -> String {
        format!(
            "## File: {}\n```{}\n{}\n```\n",
            relative_path, language, content
        )
    }
}

/// Render the tree heading block
pub fn format_tree_section(root_name: &str, tree: &str) -> String {
    format!("## Tree for {}\n```\n{}\n```\n\n", root_name, tree)
}

/// Render a scanned directory: the tree block, then every file block
pub fn render_snapshot(root_name: &str, snapshot: &Snapshot, exporter: &dyn Exporter) -> String {
    let mut output = format_tree_section(root_name, &format_tree(&snapshot.tree, ""));
    for file in &snapshot.files {
        output.push_str(&exporter.format(
            &file.relative_path.to_string_lossy(),
            &file.content,
            &file.language,
        ));
    }
    output
}

/// Markdown writer for directory contents
pub struct MarkdownWriter {
    /// Writer configuration
    config: Config,
    /// Section formatter
    exporter: Box<dyn Exporter>,
}

impl MarkdownWriter {
    /// Create a new Markdown writer
    pub fn new(config: Config) -> Self {
        Self {
            config,
            exporter: Box::new(MarkdownExporter),
        }
    }

    /// Build the document for the configured input
    ///
    /// A file input yields just its own block, headed by the path as given.
    pub fn render(&self, scanner: &Scanner) -> Result<String> {
        let input = &self.config.input;
        let metadata = fs::metadata(input).map_err(|source| GitMarkdownError::Metadata {
            path: input.clone(),
            source,
        })?;

        if !metadata.is_dir() {
            let (content, language) = scanner.convert_file(input)?;
            return Ok(self
                .exporter
                .format(&input.to_string_lossy(), &content, &language));
        }

        let snapshot = scanner.scan()?;
        Ok(render_snapshot(
            &display_name(input),
            &snapshot,
            self.exporter.as_ref(),
        ))
    }

    /// Deliver the document to the configured sinks
    ///
    /// Writing the output file is fatal on failure; a clipboard failure is
    /// only logged. Standard output is used when neither sink is set.
    pub fn write(&self, document: &str) -> Result<()> {
        if let Some(path) = &self.config.output_file {
            fs::write(path, document).map_err(|source| GitMarkdownError::Output {
                path: path.clone(),
                source,
            })?;
            info!("Output written to {}", path.display());
        }

        if self.config.copy {
            match clipboard::copy_to_clipboard(document) {
                Ok(()) => info!("Output copied to clipboard"),
                Err(e) => warn!("Error copying to clipboard: {}", e),
            }
        }

        if self.config.prints_to_stdout() {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", document)?;
            handle.flush()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::scanner::{FileBlock, ScanStatistics};
    use crate::tree::TreeNode;

    #[test]
    fn test_format_with_language() {
        let block = MarkdownExporter.format("a/b.py", "print(1)", "python");
        assert_eq!(block, "## File: a/b.py\n```python\nprint(1)\n```\n");
    }

    #[test]
    fn test_format_without_language() {
        let block = MarkdownExporter.format("LICENSE", "MIT", "");
        assert_eq!(block, "## File: LICENSE\n```\nMIT\n```\n");
    }

    #[test]
    fn test_render_empty_snapshot() {
        let snapshot = Snapshot {
            tree: TreeNode::directory("empty"),
            files: Vec::new(),
            statistics: ScanStatistics::default(),
        };
        let document = render_snapshot("empty", &snapshot, &MarkdownExporter);
        assert_eq!(document, "## Tree for empty\n```\n\n```\n\n");
        assert!(!document.contains("## File:"));
    }

    #[test]
    fn test_render_snapshot_appends_blocks_in_order() {
        let mut tree = TreeNode::directory("proj");
        if let Some(children) = tree.children.as_mut() {
            children.insert("a.md".to_string(), TreeNode::file("a.md"));
            children.insert("b.sh".to_string(), TreeNode::file("b.sh"));
        }
        let snapshot = Snapshot {
            tree,
            files: vec![
                FileBlock {
                    relative_path: PathBuf::from("a.md"),
                    content: "# A".to_string(),
                    language: "markdown".to_string(),
                },
                FileBlock {
                    relative_path: PathBuf::from("b.sh"),
                    content: "echo b".to_string(),
                    language: "bash".to_string(),
                },
            ],
            statistics: ScanStatistics::default(),
        };

        let document = render_snapshot("proj", &snapshot, &MarkdownExporter);
        let expected = concat!(
            "## Tree for proj\n```\n├── a.md\n└── b.sh\n```\n\n",
            "## File: a.md\n```markdown\n# A\n```\n",
            "## File: b.sh\n```bash\necho b\n```\n",
        );
        assert_eq!(document, expected);
    }

    #[test]
    fn test_write_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("snapshot.md");
        let mut config = Config::for_input(dir.path());
        config.output_file = Some(output.clone());

        MarkdownWriter::new(config).write("## Tree for x\n").unwrap();
        assert_eq!(fs::read_to_string(output).unwrap(), "## Tree for x\n");
    }

    #[test]
    fn test_write_to_bad_output_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::for_input(dir.path());
        config.output_file = Some(dir.path().join("missing").join("out.md"));

        let err = MarkdownWriter::new(config).write("doc").unwrap_err();
        assert!(matches!(err, GitMarkdownError::Output { .. }));
    }
}
