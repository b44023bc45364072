/*!
 * Clipboard support for gitmarkdown
 *
 * Pipes the document into the platform's clipboard command. Providers are
 * tried in order until one succeeds.
 */

use std::env;
use std::io::{self, Write};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("clipboard not supported on this platform")]
    Unsupported,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Trait for clipboard operations
pub trait Clipboard {
    /// Copy text to the clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

/// Available clipboard providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardProvider {
    /// macOS clipboard
    MacOS,
    /// Windows clipboard, also reachable from WSL
    Windows,
    /// Wayland clipboard
    Wayland,
    /// X11 clipboard with xclip
    Xclip,
    /// X11 clipboard with xsel
    Xsel,
    /// Termux clipboard
    Termux,
}

impl ClipboardProvider {
    /// Command line for this provider
    fn command(&self) -> (&'static str, Vec<&'static str>) {
        match self {
            Self::MacOS => ("pbcopy", vec![]),
            Self::Windows if cfg!(target_os = "windows") => ("cmd", vec!["/c", "clip"]),
            Self::Windows => ("clip.exe", vec![]),
            Self::Wayland => ("wl-copy", vec![]),
            Self::Xclip => ("xclip", vec!["-selection", "clipboard"]),
            Self::Xsel => ("xsel", vec!["--clipboard", "--input"]),
            Self::Termux => ("termux-clipboard-set", vec![]),
        }
    }

    /// Bytes fed to the command's stdin
    fn payload(&self, text: &str) -> Vec<u8> {
        match self {
            Self::Windows => encode_utf16le(text),
            _ => text.as_bytes().to_vec(),
        }
    }
}

impl Clipboard for ClipboardProvider {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let (cmd, args) = self.command();
        execute_clipboard_command(cmd, &args, &self.payload(text))
    }
}

//--------------------------------------------------------------------
// Public API
//--------------------------------------------------------------------

/// Copy text to the clipboard
///
/// Tries each provider for the current platform in order and returns the
/// last failure when none succeeds.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut last_error = ClipboardError::Unsupported;

    for provider in determine_clipboard_providers() {
        match provider.copy_to_clipboard(text) {
            Ok(()) => return Ok(()),
            Err(e) => {
                debug!("Clipboard provider {:?} failed: {}", provider, e);
                last_error = e;
            }
        }
    }

    Err(last_error)
}

/// Encode text as UTF-16 little-endian with a byte order mark
pub fn encode_utf16le(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    bytes.extend_from_slice(&[0xFF, 0xFE]);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

//--------------------------------------------------------------------
// Internal Implementation
//--------------------------------------------------------------------

/// Spawn `cmd`, write `input` to its stdin and wait for it to exit
fn execute_clipboard_command(cmd: &str, args: &[&str], input: &[u8]) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| ClipboardError::CommandFailed(format!("Failed to spawn {}: {}", cmd, e)))?;

    {
        let stdin = child.stdin.as_mut().ok_or_else(|| {
            ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd))
        })?;
        stdin.write_all(input)?;
    }
    // Close stdin so the command sees EOF
    drop(child.stdin.take());

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}

/// Whether the session runs under Wayland
fn is_wayland() -> bool {
    env::var("XDG_SESSION_TYPE").is_ok_and(|session| session == "wayland")
        || env::var_os("WAYLAND_DISPLAY").is_some()
}

/// Providers to try for this platform, in order
fn determine_clipboard_providers() -> Vec<ClipboardProvider> {
    if cfg!(target_os = "macos") {
        vec![ClipboardProvider::MacOS]
    } else if cfg!(target_os = "windows") || env::var_os("WSL_DISTRO_NAME").is_some() {
        vec![ClipboardProvider::Windows]
    } else if cfg!(target_os = "android") {
        vec![ClipboardProvider::Termux]
    } else if cfg!(target_os = "linux") {
        if is_wayland() {
            vec![ClipboardProvider::Wayland]
        } else {
            vec![ClipboardProvider::Xclip, ClipboardProvider::Xsel]
        }
    } else {
        Vec::new()
    }
}
