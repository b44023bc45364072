/*!
 * Directory and file scanning functionality
 */

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::converter::{select_converter, Converter, DefaultConverter, BINARY_PLACEHOLDER};
use crate::error::{GitMarkdownError, Result};
use crate::filter::IgnoreResolver;
use crate::tree::{walk_tree, FileVisit, TreeNode};

/// Scanner statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStatistics {
    /// Files that produced a block
    pub files_emitted: usize,
    /// Zero-byte files left out of the document
    pub empty_skipped: usize,
    /// Files replaced by the binary placeholder
    pub binary_files: usize,
}

/// Converted content of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    /// Path relative to the scan root
    pub relative_path: PathBuf,
    /// Text for the code block
    pub content: String,
    /// Code fence language, possibly empty
    pub language: String,
}

/// Result of scanning a directory
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Directory tree of everything not excluded
    pub tree: TreeNode,
    /// File blocks in traversal order
    pub files: Vec<FileBlock>,
    /// Counters gathered during the scan
    pub statistics: ScanStatistics,
}

/// Scanner for directory contents
pub struct Scanner {
    /// Ignore decisions for the scan root
    resolver: IgnoreResolver,
    /// Registered converters, tried in order
    converters: Vec<Box<dyn Converter>>,
    /// Converter used when none of the registered ones applies
    fallback: DefaultConverter,
}

impl Scanner {
    /// Create a scanner with a prepared resolver
    pub fn new(resolver: IgnoreResolver) -> Self {
        Self {
            resolver,
            converters: Vec::new(),
            fallback: DefaultConverter,
        }
    }

    /// Create a scanner for the configured input directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(IgnoreResolver::with_global_file(
            &config.input,
            &config.ignore_patterns,
            config.global_ignore_file.as_deref(),
        ))
    }

    /// Register a converter ahead of the fallback
    pub fn with_converter(mut self, converter: Box<dyn Converter>) -> Self {
        self.converters.push(converter);
        self
    }

    /// Root directory being scanned
    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// Scan the root directory, building its tree and file blocks in one pass
    ///
    /// Stops at the first conversion failure.
    pub fn scan(&self) -> Result<Snapshot> {
        let mut files = Vec::new();
        let mut statistics = ScanStatistics::default();

        let tree = walk_tree(self.root(), &self.resolver, |visit| {
            self.process_file(visit, &mut files, &mut statistics)
        })?;

        debug!(
            "Scan complete: {} files emitted, {} empty skipped, {} binary",
            statistics.files_emitted, statistics.empty_skipped, statistics.binary_files
        );

        Ok(Snapshot {
            tree,
            files,
            statistics,
        })
    }

    /// Convert a single file with the first matching converter
    pub fn convert_file(&self, path: &Path) -> Result<(String, String)> {
        let converter = select_converter(path, &self.converters, &self.fallback);
        let content = converter
            .convert(path)
            .map_err(|source| GitMarkdownError::Conversion {
                path: path.to_path_buf(),
                source,
            })?;
        Ok((content, converter.language(path)))
    }

    fn process_file(
        &self,
        visit: &FileVisit,
        files: &mut Vec<FileBlock>,
        statistics: &mut ScanStatistics,
    ) -> Result<()> {
        if visit.size == 0 {
            debug!("Skipping empty file: {}", visit.path.display());
            statistics.empty_skipped += 1;
            return Ok(());
        }

        let (content, language) = self.convert_file(&visit.path)?;
        if content.starts_with(BINARY_PLACEHOLDER) {
            statistics.binary_files += 1;
        }

        statistics.files_emitted += 1;
        files.push(FileBlock {
            relative_path: visit.relative_path.clone(),
            content,
            language,
        });

        Ok(())
    }
}
