//! Markup codecs and extension-based format detection
//!
//! Checkpoint files are self-describing by extension: `.json` files are JSON,
//! `.yaml`/`.yml` files are YAML. A path without an extension resolves to the
//! default codec, and callers append that codec's canonical extension.

mod codec;

pub use codec::{Codec, CodecError};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extensions with a registered codec, canonical ones first.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".json", ".yaml", ".yml"];

/// Maps a file path to the codec that reads and writes it.
pub trait FormatResolver {
    /// Returns the codec for `path` (or `None` when the extension is not
    /// supported) together with the extension that was matched, including the
    /// leading dot. An extensionless path yields the default codec and its
    /// canonical extension.
    fn detect(&self, path: &Path) -> (Option<Codec>, String);
}

/// Resolves codecs from file extensions, falling back to a default codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionResolver {
    default_codec: Codec,
}

impl ExtensionResolver {
    pub fn new(default_codec: Codec) -> Self {
        Self { default_codec }
    }

    pub fn default_codec(&self) -> Codec {
        self.default_codec
    }
}

impl Default for ExtensionResolver {
    fn default() -> Self {
        Self::new(Codec::Json)
    }
}

impl FormatResolver for ExtensionResolver {
    fn detect(&self, path: &Path) -> (Option<Codec>, String) {
        let ext = dotted_extension(path);
        if ext.is_empty() {
            let codec = self.default_codec;
            return (Some(codec), codec.extension().to_string());
        }
        (Codec::from_extension(&ext), ext)
    }
}

/// The extension of `path` with its leading dot, or an empty string.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Appends `ext` to the final component of `path` (`env/prod` + `.json`).
pub fn with_appended_extension(path: &Path, ext: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(ext);
    PathBuf::from(raw)
}
