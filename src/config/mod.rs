// src/config/mod.rs

//! Configuration loading and validation for cronwrap.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and apply environment overrides (`loader.rs`).
//! - Validate basic invariants like non-empty paths (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{apply_env_overrides, load_and_validate, load_from_env, load_from_path, load_with};
pub use model::{Config, NotifyConfig, NotifySection, RawConfig};
