//! Ignore pattern resolution
//!
//! Patterns come from three places: the `--ignore` flag, a global ignore file
//! resolved against the working directory, and `.gitignore` files. They are
//! plain globs with no negation, and an entry is excluded when any pattern
//! from any source matches.
//!
//! Globs use the `globset` dialect with `literal_separator(false)`: `*` and
//! `?` also match the path separator, so `assets/*.html` matches both
//! `assets/index.html` and `assets/nested/index.html`.

use std::fs;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

/// Name of the global ignore file looked up in the working directory
pub const GLOBAL_IGNORE_FILE: &str = ".globalignore";

/// Name of the per-directory ignore file
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Version control directory that is always excluded
pub const GIT_DIR: &str = ".git";

/// Parse ignore file contents into patterns
///
/// Each trimmed, non-empty line that does not start with `#` is one pattern,
/// kept in file order.
pub fn parse_patterns(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Read patterns from an ignore file, treating any failure as "no patterns"
pub fn load_pattern_file(path: &Path) -> Vec<String> {
    match fs::read(path) {
        Ok(bytes) => parse_patterns(&String::from_utf8_lossy(&bytes)),
        Err(e) => {
            debug!("No ignore patterns from {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Absolute location of the global ignore file for this process
///
/// Relative names are resolved against the current working directory.
/// Returns `None` when the working directory cannot be determined.
pub fn resolve_global_ignore_path(name: &Path) -> Option<PathBuf> {
    if name.is_absolute() {
        return Some(name.to_path_buf());
    }
    std::env::current_dir().ok().map(|cwd| cwd.join(name))
}

/// Load the global ignore patterns
pub fn load_global_patterns(path: Option<&Path>) -> Vec<String> {
    path.map(load_pattern_file).unwrap_or_default()
}

/// Load `.gitignore` patterns from exactly `directory`, never its ancestors
pub fn load_directory_patterns(directory: &Path) -> Vec<String> {
    load_pattern_file(&directory.join(GITIGNORE_FILE))
}

/// True for `.git` itself and anything below it
pub fn is_git_path(relative_path: &Path) -> bool {
    matches!(
        relative_path.components().next(),
        Some(Component::Normal(first)) if first == GIT_DIR
    )
}

/// Compile patterns into a single matcher, skipping the ones that fail
pub fn compile_patterns(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match GlobBuilder::new(pattern).literal_separator(false).build() {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!("Invalid glob pattern '{}': {}", pattern, e),
        }
    }

    builder.build().unwrap_or_else(|e| {
        warn!("Failed to build glob set: {}", e);
        GlobSet::empty()
    })
}

/// Decide whether `relative_path` is excluded
///
/// Recompiles `extra_patterns` together with the `.gitignore` of `walk_root`
/// on every call. The traversal uses [`IgnoreResolver`] instead, which
/// compiles each source once.
pub fn should_ignore(relative_path: &Path, extra_patterns: &[String], walk_root: &Path) -> bool {
    if is_git_path(relative_path) {
        return true;
    }

    let mut combined = extra_patterns.to_vec();
    combined.extend(load_directory_patterns(walk_root));

    compile_patterns(&combined).is_match(relative_path)
}

/// A compiled group of patterns
#[derive(Debug, Clone)]
pub struct PatternSet {
    len: usize,
    globs: GlobSet,
}

impl PatternSet {
    /// Compile a pattern list
    pub fn new(patterns: &[String]) -> Self {
        let globs = compile_patterns(patterns);
        Self {
            len: globs.len(),
            globs,
        }
    }

    /// A set that matches nothing
    pub fn empty() -> Self {
        Self {
            len: 0,
            globs: GlobSet::empty(),
        }
    }

    /// Number of patterns that compiled
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no pattern compiled
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Match a relative path; directories are also tried with a trailing
    /// separator so `build/` style patterns apply to them.
    pub fn matches(&self, path: &Path, is_dir: bool) -> bool {
        if self.is_empty() {
            return false;
        }
        self.globs.is_match(path) || (is_dir && self.globs.is_match(path.join("")))
    }
}

/// `.gitignore` patterns of a single directory being listed
#[derive(Debug, Clone)]
pub struct DirectoryScope {
    gitignore: PatternSet,
}

/// Ignore decisions for one traversal
///
/// CLI patterns and the root `.gitignore` are matched against the
/// root-relative path. Global patterns are matched against both the
/// root-relative path and the path relative to the directory being listed.
/// Each directory's own `.gitignore` is loaded through
/// [`IgnoreResolver::scope`] and matched against the directory-relative path.
#[derive(Debug, Clone)]
pub struct IgnoreResolver {
    root: PathBuf,
    cli: PatternSet,
    global: PatternSet,
    root_gitignore: PatternSet,
}

impl IgnoreResolver {
    /// Build a resolver for a walk rooted at `root`
    pub fn new(root: &Path, cli_patterns: &[String], global_patterns: &[String]) -> Self {
        Self {
            root: root.to_path_buf(),
            cli: PatternSet::new(cli_patterns),
            global: PatternSet::new(global_patterns),
            root_gitignore: PatternSet::new(&load_directory_patterns(root)),
        }
    }

    /// Build a resolver that loads the global ignore file from `global_ignore`
    pub fn with_global_file(
        root: &Path,
        cli_patterns: &[String],
        global_ignore: Option<&Path>,
    ) -> Self {
        let global = load_global_patterns(global_ignore);
        if !global.is_empty() {
            debug!("Loaded {} global ignore patterns", global.len());
        }
        Self::new(root, cli_patterns, &global)
    }

    /// Root directory of the walk
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the `.gitignore` of a directory about to be listed
    pub fn scope(&self, directory: &Path) -> DirectoryScope {
        let gitignore = if directory == self.root {
            self.root_gitignore.clone()
        } else {
            PatternSet::new(&load_directory_patterns(directory))
        };
        DirectoryScope { gitignore }
    }

    /// Decide whether an entry is excluded
    ///
    /// `relative_to_root` is the entry's path from the walk root,
    /// `relative_to_dir` its path from the directory being listed.
    pub fn is_ignored(
        &self,
        scope: &DirectoryScope,
        relative_to_root: &Path,
        relative_to_dir: &Path,
        is_dir: bool,
    ) -> bool {
        if is_git_path(relative_to_root) || is_git_path(relative_to_dir) {
            return true;
        }

        self.cli.matches(relative_to_root, is_dir)
            || self.global.matches(relative_to_root, is_dir)
            || self.global.matches(relative_to_dir, is_dir)
            || self.root_gitignore.matches(relative_to_root, is_dir)
            || scope.gitignore.matches(relative_to_dir, is_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_parse_patterns_skips_comments_and_blanks() {
        let text = "# build output\n\n  target  \n*.log\n   # indented comment\nnode_modules\n";
        assert_eq!(parse_patterns(text), vec!["target", "*.log", "node_modules"]);
    }

    #[test]
    fn test_missing_pattern_file_is_empty() {
        let dir = tempdir().unwrap();
        assert!(load_pattern_file(&dir.path().join("nope")).is_empty());
        assert!(load_directory_patterns(dir.path()).is_empty());
        assert!(load_global_patterns(None).is_empty());
    }

    #[test]
    fn test_git_paths_always_ignored() {
        let dir = tempdir().unwrap();
        assert!(should_ignore(Path::new(".git"), &[], dir.path()));
        assert!(should_ignore(Path::new(".git/config"), &[], dir.path()));
        assert!(should_ignore(Path::new(".git/refs/heads/main"), &[], dir.path()));
        assert!(!should_ignore(Path::new(".gitignore"), &[], dir.path()));
        assert!(!should_ignore(Path::new(".github/workflows/ci.yml"), &[], dir.path()));
    }

    #[test]
    fn test_star_crosses_separators() {
        let dir = tempdir().unwrap();
        let extra = patterns(&["*.css", "assets/*.html"]);

        assert!(should_ignore(Path::new("style.css"), &extra, dir.path()));
        assert!(should_ignore(Path::new("web/theme/dark.css"), &extra, dir.path()));
        assert!(should_ignore(Path::new("assets/index.html"), &extra, dir.path()));
        assert!(should_ignore(Path::new("assets/deep/page.html"), &extra, dir.path()));
        assert!(!should_ignore(Path::new("assets/readme.md"), &extra, dir.path()));
        assert!(!should_ignore(Path::new("index.html"), &extra, dir.path()));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let dir = tempdir().unwrap();
        let extra = patterns(&["[unclosed", "*.tmp"]);

        assert!(should_ignore(Path::new("scratch.tmp"), &extra, dir.path()));
        assert!(!should_ignore(Path::new("main.rs"), &extra, dir.path()));
        assert_eq!(PatternSet::new(&extra).len(), 1);
    }

    #[test]
    fn test_should_ignore_reads_walk_root_gitignore() {
        let dir = tempdir().unwrap();
        let mut gitignore = File::create(dir.path().join(GITIGNORE_FILE)).unwrap();
        writeln!(gitignore, "# generated").unwrap();
        writeln!(gitignore, "*.pyc").unwrap();

        assert!(should_ignore(Path::new("pkg/mod.pyc"), &[], dir.path()));
        assert!(!should_ignore(Path::new("pkg/mod.py"), &[], dir.path()));
    }

    #[test]
    fn test_directory_matches_trailing_separator() {
        let set = PatternSet::new(&patterns(&["build/"]));
        assert!(set.matches(Path::new("build"), true));
        assert!(!set.matches(Path::new("build"), false));
    }

    #[test]
    fn test_resolver_scopes() {
        let root = tempdir().unwrap();
        let nested = root.path().join("docs");
        fs::create_dir(&nested).unwrap();
        fs::write(root.path().join(GITIGNORE_FILE), "*.bak\n").unwrap();
        fs::write(nested.join(GITIGNORE_FILE), "draft.md\n").unwrap();

        let resolver = IgnoreResolver::new(root.path(), &patterns(&["*.css"]), &patterns(&["*.log"]));
        let root_scope = resolver.scope(root.path());
        let docs_scope = resolver.scope(&nested);

        let check = |scope: &DirectoryScope, rel: &str, name: &str| {
            resolver.is_ignored(scope, Path::new(rel), Path::new(name), false)
        };

        assert!(check(&root_scope, "site.css", "site.css"));
        assert!(check(&root_scope, "run.log", "run.log"));
        assert!(check(&docs_scope, "docs/old.bak", "old.bak"));
        assert!(check(&docs_scope, "docs/draft.md", "draft.md"));
        assert!(!check(&docs_scope, "docs/guide.md", "guide.md"));
        // A sub-directory's .gitignore does not leak into the root
        assert!(!check(&root_scope, "draft.md", "draft.md"));
    }

    #[test]
    fn test_global_patterns_match_directory_relative_path() {
        let root = tempdir().unwrap();
        let nested = root.path().join("sub");
        fs::create_dir(&nested).unwrap();

        let resolver = IgnoreResolver::new(root.path(), &patterns(&["notes.txt"]), &patterns(&["secret.txt"]));
        let scope = resolver.scope(&nested);

        assert!(resolver.is_ignored(&scope, Path::new("sub/secret.txt"), Path::new("secret.txt"), false));
        // CLI patterns only see the root-relative path
        assert!(!resolver.is_ignored(&scope, Path::new("sub/notes.txt"), Path::new("notes.txt"), false));
    }

    #[test]
    fn test_resolver_loads_global_file() {
        let dir = tempdir().unwrap();
        let global = dir.path().join(GLOBAL_IGNORE_FILE);
        fs::write(&global, "# secrets\n.env\n").unwrap();

        let resolver = IgnoreResolver::with_global_file(dir.path(), &[], Some(&global));
        let scope = resolver.scope(dir.path());
        assert!(resolver.is_ignored(&scope, Path::new(".env"), Path::new(".env"), false));
        assert!(!resolver.is_ignored(&scope, Path::new("app.py"), Path::new("app.py"), false));
    }

    #[test]
    fn test_resolve_global_ignore_path() {
        let resolved = resolve_global_ignore_path(Path::new(GLOBAL_IGNORE_FILE)).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with(GLOBAL_IGNORE_FILE));

        let absolute = std::env::temp_dir().join("custom.ignore");
        assert_eq!(resolve_global_ignore_path(&absolute), Some(absolute.clone()));
    }
}
