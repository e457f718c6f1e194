//! Shared types, error model, and configuration for ariacrawl.
//!
//! This crate is the foundation depended on by all other ariacrawl crates.
//! It provides:
//! - [`AriaCrawlError`] — the unified error type
//! - Entity types ([`Role`], [`PropertyOrState`], [`Value`], [`AriaData`])
//! - Configuration ([`AppConfig`], [`FetchConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CacheConfig, CacheMode, FetchConfig, HTML_ARIA_URL, HttpConfig, SourcesConfig,
    WAI_ARIA_URL, config_dir, config_file_path, load_config, load_config_from,
};
pub use error::{AriaCrawlError, Result};
pub use types::{AriaData, AttributeRef, PropertyKind, PropertyOrState, Role, Value};
