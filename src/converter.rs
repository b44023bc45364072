/*!
 * File content conversion
 *
 * A converter turns a file into the text placed in its code block and names
 * the language tag for the fence. `DefaultConverter` handles every file and
 * replaces binary content with a placeholder line.
 */

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use once_cell::sync::Lazy;

/// Number of leading bytes inspected by the fast text check
pub const SNIFF_LEN: usize = 512;

/// Fraction of non-printable characters at which content counts as binary
pub const BINARY_THRESHOLD: f64 = 0.1;

/// Leading text of the block body emitted for binary files
pub const BINARY_PLACEHOLDER: &str = "Skipping binary file: ";

/// Block body standing in for a binary file
pub fn binary_placeholder(path: &Path) -> String {
    format!("{}{}", BINARY_PLACEHOLDER, path.display())
}

/// Trait for file converters
pub trait Converter {
    /// Whether this converter handles the file
    fn supports(&self, path: &Path) -> bool;

    /// Produce the text for the file's code block
    fn convert(&self, path: &Path) -> io::Result<String>;

    /// Language tag for the code fence, empty when unknown
    fn language(&self, path: &Path) -> String;
}

/// Pick the first converter that supports `path`, else `fallback`
pub fn select_converter<'a>(
    path: &Path,
    converters: &'a [Box<dyn Converter>],
    fallback: &'a dyn Converter,
) -> &'a dyn Converter {
    converters
        .iter()
        .find(|converter| converter.supports(path))
        .map(|converter| &**converter)
        .unwrap_or(fallback)
}

/// Fallback converter for any file
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConverter;

impl Converter for DefaultConverter {
    fn supports(&self, _path: &Path) -> bool {
        true
    }

    fn convert(&self, path: &Path) -> io::Result<String> {
        let mut file = File::open(path)?;

        let mut header = [0u8; SNIFF_LEN];
        let header_len = read_header(&mut file, &mut header)?;

        file.seek(SeekFrom::Start(0))?;
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;

        if !looks_like_text(&header[..header_len]) && is_binary(&content) {
            return Ok(binary_placeholder(path));
        }

        Ok(String::from_utf8_lossy(&content).trim().to_string())
    }

    fn language(&self, path: &Path) -> String {
        language_for_path(path).to_string()
    }
}

fn read_header(file: &mut File, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match file.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Fast check on the leading bytes
///
/// Text is valid UTF-8 free of the control bytes that never occur in plain
/// text (everything below 0x20 except tab, newline, form feed, carriage
/// return and escape). A full header may end partway through a character.
pub fn looks_like_text(header: &[u8]) -> bool {
    if header.iter().any(|&b| is_binary_byte(b)) {
        return false;
    }

    match std::str::from_utf8(header) {
        Ok(_) => true,
        Err(e) => header.len() == SNIFF_LEN && e.error_len().is_none(),
    }
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

/// Whether content is binary by its share of non-printable characters
///
/// Each invalid UTF-8 byte counts as one non-printable character. Empty
/// content is never binary.
pub fn is_binary(data: &[u8]) -> bool {
    let mut total = 0usize;
    let mut non_printable = 0usize;

    for chunk in data.utf8_chunks() {
        for c in chunk.valid().chars() {
            total += 1;
            if is_non_printable(c) {
                non_printable += 1;
            }
        }
        total += chunk.invalid().len();
        non_printable += chunk.invalid().len();
    }

    if total == 0 {
        return false;
    }

    non_printable as f64 / total as f64 >= BINARY_THRESHOLD
}

fn is_non_printable(c: char) -> bool {
    c == char::REPLACEMENT_CHARACTER || (c.is_control() && !c.is_whitespace())
}

/// Extension to code fence language
static LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("py", "python"),
        ("js", "javascript"),
        ("ts", "typescript"),
        ("html", "html"),
        ("css", "css"),
        ("java", "java"),
        ("cpp", "cpp"),
        ("cc", "cpp"),
        ("cxx", "cpp"),
        ("h", "cpp"),
        ("hpp", "cpp"),
        ("hxx", "cpp"),
        ("c", "c"),
        ("cs", "csharp"),
        ("rb", "ruby"),
        ("php", "php"),
        ("json", "json"),
        ("xml", "xml"),
        ("sh", "bash"),
        ("md", "markdown"),
        ("lua", "lua"),
        ("yml", "yaml"),
        ("yaml", "yaml"),
        ("go", "go"),
    ])
});

/// Language tag for a path's extension, case-insensitive
pub fn language_for_path(path: &Path) -> &'static str {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .and_then(|ext| LANGUAGES.get(ext.as_str()).copied())
        .unwrap_or("")
}
