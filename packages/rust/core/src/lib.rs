//! Crawl orchestration for ariacrawl.
//!
//! This crate ties fetching and extraction together into the end-to-end
//! [`pipeline::crawl_aria`] run and its JSON output.

pub mod pipeline;

pub use pipeline::{
    CrawlSources, Definitions, assemble, crawl_aria, extract_definitions, extract_role_mapping,
    to_pretty_json,
};
