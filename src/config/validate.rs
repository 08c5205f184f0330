// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::PollwatchError;
use crate::snapshot::NamePattern;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::PollwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let watch = raw.watch;

        if watch.roots.is_empty() {
            return Err(PollwatchError::ConfigError(
                "[watch].roots must list at least one directory".to_string(),
            ));
        }
        if watch.roots.iter().any(|r| r.trim().is_empty()) {
            return Err(PollwatchError::ConfigError(
                "[watch].roots must not contain empty paths".to_string(),
            ));
        }

        let interval = parse_duration(&watch.interval)
            .map_err(|e| PollwatchError::ConfigError(format!("[watch].interval: {e}")))?;
        if interval.is_zero() {
            return Err(PollwatchError::ConfigError(
                "[watch].interval must be greater than zero".to_string(),
            ));
        }

        let pattern = NamePattern::from_parts(watch.pattern.as_deref(), watch.regex.as_deref())?;

        if let Some(cmd) = &raw.on_change.cmd {
            if cmd.trim().is_empty() {
                return Err(PollwatchError::ConfigError(
                    "[on_change].cmd must not be empty".to_string(),
                ));
            }
        }

        Ok(ConfigFile {
            roots: watch.roots.into_iter().map(PathBuf::from).collect(),
            pattern,
            mode: watch.fingerprint,
            interval,
            recursive: watch.recursive,
            on_change: raw.on_change,
        })
    }
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{}' is too large", s))
}
