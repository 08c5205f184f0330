use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

/// How a file's state is reduced to a comparable fingerprint.
///
/// - `Content`: blake3 hash of the file's bytes. Detects every real content
///   change, ignores metadata-only changes (e.g. `touch`).
/// - `Modified`: last-modification timestamp. Cheaper for large files, but
///   changes within the timestamp resolution can be missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintMode {
    Content,
    #[serde(rename = "mtime")]
    #[value(name = "mtime")]
    Modified,
}

impl Default for FingerprintMode {
    fn default() -> Self {
        FingerprintMode::Content
    }
}

impl fmt::Display for FingerprintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FingerprintMode::Content => f.write_str("content"),
            FingerprintMode::Modified => f.write_str("mtime"),
        }
    }
}
