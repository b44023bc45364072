/*!
 * Configuration handling for gitmarkdown
 */

use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;

use crate::error::Result;
use crate::filter::{resolve_global_ignore_path, GLOBAL_IGNORE_FILE};

/// Command-line arguments for gitmarkdown
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "gitmarkdown",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate a Markdown snapshot of directory contents for LLM context",
    long_about = "Renders a file or directory as a single Markdown document: a tree of the directory structure followed by one fenced code block per file."
)]
pub struct Args {
    /// Path to file or directory
    #[clap(long, default_value = "./")]
    pub input: String,

    /// Optional output file to save results
    #[clap(long)]
    pub output: Option<String>,

    /// Copy output to clipboard
    #[clap(long)]
    pub copy: bool,

    /// Enable verbose logging
    #[clap(long)]
    pub verbose: bool,

    /// Ignore specific files (comma-separated, supports wildcards, e.g., '*.css,assets/*.html')
    #[clap(long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Global ignore file, resolved against the working directory
    #[clap(long, default_value = GLOBAL_IGNORE_FILE)]
    pub global_ignore: String,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// File or directory to render
    pub input: PathBuf,

    /// Output file path, if any
    pub output_file: Option<PathBuf>,

    /// Copy output to clipboard
    pub copy: bool,

    /// Verbose logging
    pub verbose: bool,

    /// Patterns from the command line
    pub ignore_patterns: Vec<String>,

    /// Absolute path of the global ignore file
    pub global_ignore_file: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            input: PathBuf::from(args.input),
            output_file: args.output.map(PathBuf::from),
            copy: args.copy,
            verbose: args.verbose,
            ignore_patterns: split_patterns(&args.ignore),
            global_ignore_file: resolve_global_ignore_path(Path::new(&args.global_ignore)),
        }
    }

    /// Configuration for `input` with no patterns and no output sinks
    pub fn for_input(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_file: None,
            copy: false,
            verbose: false,
            ignore_patterns: Vec::new(),
            global_ignore_file: None,
        }
    }

    /// Whether the document goes to standard output
    pub fn prints_to_stdout(&self) -> bool {
        self.output_file.is_none() && !self.copy
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(
            self.input.exists(),
            PathNotFound,
            "{}",
            self.input.display()
        );

        if let Some(parent) = self.output_file.as_deref().and_then(Path::parent) {
            crate::ensure!(
                parent.as_os_str().is_empty() || parent.exists(),
                InvalidArgument,
                "Output directory not found: {}",
                parent.display()
            );
        }

        Ok(())
    }
}

/// Trim each pattern and drop the empty ones
fn split_patterns(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|pattern| pattern.trim())
        .filter(|pattern| !pattern.is_empty())
        .map(String::from)
        .collect()
}
