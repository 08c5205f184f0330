// src/snapshot/pattern.rs

use std::fmt;
use std::path::Path;

use globset::{Glob, GlobMatcher};
use regex::Regex;

use crate::errors::{PollwatchError, Result};

/// Filter applied to the *file name* of every listed entry.
///
/// Directory parts of the path never take part in matching, so `*.rs`
/// selects `main.rs` in any watched directory.
#[derive(Clone, Default)]
pub enum NamePattern {
    #[default]
    Any,
    Glob(GlobMatcher),
    Regex(Regex),
}

impl fmt::Debug for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamePattern::Any => f.write_str("Any"),
            NamePattern::Glob(m) => f.debug_tuple("Glob").field(&m.glob().glob()).finish(),
            NamePattern::Regex(r) => f.debug_tuple("Regex").field(&r.as_str()).finish(),
        }
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamePattern::Any => f.write_str("*"),
            NamePattern::Glob(m) => write!(f, "glob:{}", m.glob().glob()),
            NamePattern::Regex(r) => write!(f, "regex:{}", r.as_str()),
        }
    }
}

impl NamePattern {
    pub fn glob(pattern: &str) -> Result<Self> {
        let glob = Glob::new(pattern).map_err(|e| {
            PollwatchError::InvalidPattern(format!("invalid glob pattern {pattern:?}: {e}"))
        })?;
        Ok(NamePattern::Glob(glob.compile_matcher()))
    }

    pub fn regex(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).map_err(|e| {
            PollwatchError::InvalidPattern(format!("invalid regex pattern {pattern:?}: {e}"))
        })?;
        Ok(NamePattern::Regex(re))
    }

    /// Build from the optional glob / regex pair found in config and CLI.
    ///
    /// Giving both is ambiguous and rejected.
    pub fn from_parts(glob: Option<&str>, regex: Option<&str>) -> Result<Self> {
        match (glob, regex) {
            (Some(_), Some(_)) => Err(PollwatchError::ConfigError(
                "only one of `pattern` (glob) and `regex` may be set".to_string(),
            )),
            (Some(g), None) => Self::glob(g),
            (None, Some(r)) => Self::regex(r),
            (None, None) => Ok(NamePattern::Any),
        }
    }

    /// True if the final component of `path` matches.
    pub fn matches(&self, path: &Path) -> bool {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => return false,
        };
        match self {
            NamePattern::Any => true,
            NamePattern::Glob(m) => m.is_match(&*name),
            NamePattern::Regex(r) => r.is_match(&name),
        }
    }
}
