//! Extractors that turn parsed W3C documents into ARIA entities.
//!
//! Each extractor reads one structure from an already-parsed [`scraper::Html`] tree and
//! never re-parses fragments; subtrees are queried in place through
//! [`ElementRef`].

mod properties;
mod roles;
mod values;

use scraper::{ElementRef, Selector};

use ariacrawl_shared::{AriaCrawlError, Result};

pub use properties::{IndexDescriptions, extract_property_sections};
pub use roles::{AnchorClass, classify_anchor_tuple, extract_roles};
pub use values::{ValueEvent, extract_values, fold_value_events, value_events};

/// Compile a CSS selector, reporting the offending source on failure.
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AriaCrawlError::selector(css, e))
}

/// Concatenated text of all descendant text nodes.
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Trimmed text, or `None` if nothing but whitespace remains.
pub(crate) fn trimmed_text(el: ElementRef<'_>) -> Option<String> {
    let text = element_text(el);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// First element in the document matching `css`.
#[cfg(test)]
pub(crate) fn first_match<'a>(doc: &'a scraper::Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css).ok()?;
    doc.select(&sel).next()
}
