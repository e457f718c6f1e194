//! Value type list (`#propcharacteristic_value dl`) from the WAI-ARIA document.
//!
//! The list is a flat run of `<dt>`/`<dd>` siblings. It is read as a sequence
//! of [`ValueEvent`]s and folded into [`Value`]s: a definition always lands on
//! the most recently opened term, so malformed alternation attaches text to
//! the wrong value instead of failing.

use scraper::Html;
use tracing::{debug, trace, warn};

use ariacrawl_shared::{AriaCrawlError, Result, Value};

use super::{element_text, selector};

/// Direct children of the value definition list.
const LIST_ITEMS_SELECTOR: &str = "#propcharacteristic_value dl > *";

/// One step of the value list walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueEvent {
    /// A `<dt>`: starts a new value.
    Open { id: String, name: String },
    /// A `<dd>`: describes the most recently opened value.
    Describe { text: String },
}

/// Turn the list's children into events, in document order.
///
/// `<dt>` names are trimmed, `<dd>` text is kept verbatim, and any other child
/// element is skipped. A `<dt>` without an `id` fails the extraction.
pub fn value_events(doc: &Html) -> Result<Vec<ValueEvent>> {
    let items = selector(LIST_ITEMS_SELECTOR)?;

    let mut events = Vec::new();
    for item in doc.select(&items) {
        match item.value().name() {
            "dt" => {
                let id = item
                    .value()
                    .id()
                    .ok_or_else(|| AriaCrawlError::parse("value term without an id attribute"))?;
                events.push(ValueEvent::Open {
                    id: id.to_string(),
                    name: element_text(item).trim().to_string(),
                });
            }
            "dd" => events.push(ValueEvent::Describe {
                text: element_text(item),
            }),
            other => trace!(element = other, "ignoring value list child"),
        }
    }

    Ok(events)
}

/// Fold events into values.
///
/// `Describe` overwrites the description of the last opened value, even if it
/// already has one. A `Describe` before any `Open` is dropped.
pub fn fold_value_events(events: impl IntoIterator<Item = ValueEvent>) -> Vec<Value> {
    events
        .into_iter()
        .fold(Vec::new(), |mut values: Vec<Value>, event| {
            match event {
                ValueEvent::Open { id, name } => values.push(Value {
                    id,
                    name,
                    description: None,
                }),
                ValueEvent::Describe { text } => match values.last_mut() {
                    Some(open) => open.description = Some(text),
                    None => warn!("value definition before any term, dropping it"),
                },
            }
            values
        })
}

/// Extract the value list.
pub fn extract_values(doc: &Html) -> Result<Vec<Value>> {
    let values = fold_value_events(value_events(doc)?);
    debug!(values = values.len(), "extracted value list");
    Ok(values)
}
