/*!
 * gitmarkdown - Generate a Markdown snapshot of directory contents
 *
 * This library renders a file or directory as one Markdown document: a tree
 * of the directory structure followed by a fenced code block per file, with
 * ignore patterns applied consistently to both.
 */

pub mod clipboard;
pub mod config;
pub mod converter;
pub mod error;
pub mod filter;
pub mod scanner;
pub mod tree;
pub mod writer;


// Re-export main components for easier access
pub use config::Config;
pub use converter::{Converter, DefaultConverter};
pub use error::{GitMarkdownError, Result};
pub use filter::{should_ignore, IgnoreResolver};
pub use scanner::{FileBlock, Scanner, Snapshot};
pub use tree::{build_tree, format_tree, TreeNode};
pub use writer::{Exporter, MarkdownExporter, MarkdownWriter};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render the configured input into a Markdown document
pub fn generate(config: &Config) -> Result<String> {
    let scanner = Scanner::from_config(config);
    MarkdownWriter::new(config.clone()).render(&scanner)
}
