// src/config/mod.rs

//! TOML configuration: raw model, loading, and validation.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_raw_or_default};
pub use model::{ConfigFile, OnChangeSection, RawConfigFile, WatchSection};
