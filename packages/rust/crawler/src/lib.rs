//! Document fetching and ARIA entity extraction.
//!
//! This crate provides:
//! - [`fetch`] — HTTP GET with a transparent on-disk response cache
//! - [`extract`] — role, state/property, and value extractors over parsed HTML

pub mod extract;
pub mod fetch;

pub use extract::{
    AnchorClass, IndexDescriptions, ValueEvent, classify_anchor_tuple, extract_property_sections,
    extract_roles, extract_values, fold_value_events, value_events,
};
pub use fetch::{CacheMeta, CachedFetcher};
