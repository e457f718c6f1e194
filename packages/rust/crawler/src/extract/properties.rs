//! State and property definition sections from the WAI-ARIA document.
//!
//! States and properties share one layout; only the class-name word differs
//! (`section.state` / `.state-features` vs `section.property` /
//! `.property-features`). [`SectionSelectors::for_kind`] builds every selector
//! from that word. Short descriptions live in a separate index `<dl>` and are
//! collected once per document into [`IndexDescriptions`].

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use ariacrawl_shared::{AriaCrawlError, PropertyKind, PropertyOrState, Result};

use super::{selector, trimmed_text};

/// Container of every definition section.
const SECTIONS_ROOT: &str = "#state_prop_def";

/// Container of the short-description index.
const INDEX_ROOT: &str = "#index_state_prop";

static VALUE_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#valuetype_(.+)").expect("value type pattern is valid"));

// ---------------------------------------------------------------------------
// Index descriptions
// ---------------------------------------------------------------------------

/// Section id → short description, read from the index `<dl>`.
#[derive(Debug, Clone, Default)]
pub struct IndexDescriptions {
    by_id: HashMap<String, String>,
}

impl IndexDescriptions {
    /// Scan the index once. Each `.property-reference` / `.state-reference`
    /// anchor pointing at `#<id>` pairs with the `<dd>` right after its `<dt>`.
    /// Blank definitions are not recorded; the first non-blank one per id wins.
    pub fn from_document(doc: &Html) -> Result<Self> {
        let css = [PropertyKind::Property, PropertyKind::State]
            .map(|kind| format!("{INDEX_ROOT} .{kind}-reference"))
            .join(", ");
        let anchors = selector(&css)?;

        let mut by_id = HashMap::new();
        for anchor in doc.select(&anchors) {
            let Some(id) = anchor.value().attr("href").and_then(|h| h.strip_prefix('#')) else {
                continue;
            };
            if by_id.contains_key(id) {
                continue;
            }
            if let Some(description) = paired_definition(anchor).and_then(trimmed_text) {
                by_id.insert(id.to_string(), description);
            }
        }

        debug!(entries = by_id.len(), "indexed state/property descriptions");
        Ok(Self { by_id })
    }

    /// Description for section `id`, if the index has one.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// The `<dd>` immediately following the anchor's enclosing `<dt>`.
fn paired_definition(anchor: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let term = anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "dt")?;

    term.next_siblings()
        .find_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "dd")
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Selectors for one kind of definition section.
struct SectionSelectors {
    sections: Selector,
    features: Selector,
    value_link: Selector,
    applicability: Selector,
    descendants: Selector,
    related: Selector,
}

impl SectionSelectors {
    fn for_kind(kind: PropertyKind) -> Result<Self> {
        Ok(Self {
            sections: selector(&format!("{SECTIONS_ROOT} section.{kind}"))?,
            features: selector(&format!(".{kind}-features"))?,
            value_link: selector(&format!(".{kind}-value a"))?,
            applicability: selector(&format!(".{kind}-applicability a.role-reference"))?,
            descendants: selector(&format!(".{kind}-descendants a.role-reference"))?,
            related: selector(&format!(".{kind}-related"))?,
        })
    }
}

/// Extract every definition section of `kind`, in document order.
///
/// A section without an `id` fails the extraction; every other missing piece
/// becomes `None` or an empty list.
pub fn extract_property_sections(
    doc: &Html,
    kind: PropertyKind,
    index: &IndexDescriptions,
) -> Result<Vec<PropertyOrState>> {
    let selectors = SectionSelectors::for_kind(kind)?;

    let entries = doc
        .select(&selectors.sections)
        .map(|section| parse_section(section, kind, index, &selectors))
        .collect::<Result<Vec<_>>>()?;

    debug!(%kind, sections = entries.len(), "extracted definition sections");
    Ok(entries)
}

fn parse_section(
    section: ElementRef<'_>,
    kind: PropertyKind,
    index: &IndexDescriptions,
    selectors: &SectionSelectors,
) -> Result<PropertyOrState> {
    let id = section
        .value()
        .id()
        .ok_or_else(|| AriaCrawlError::parse(format!("{kind} section without an id attribute")))?
        .to_string();

    let long_description = descendant_by_id(section, &format!("desc-{id}")).and_then(trimmed_text);

    let features = section.select(&selectors.features).next();

    let value_type = features
        .and_then(|table| table.select(&selectors.value_link).next())
        .and_then(|link| link.value().attr("href"))
        .and_then(value_type_from_href);

    let applicable_roles = features
        .map(|table| role_references(table, &selectors.applicability))
        .unwrap_or_default();

    let inherits_into_roles = features
        .map(|table| role_references(table, &selectors.descendants))
        .unwrap_or_default();

    let related_concepts = features
        .and_then(|table| table.select(&selectors.related).next())
        .and_then(trimmed_text);

    Ok(PropertyOrState {
        description: index.get(&id).map(str::to_string),
        id,
        kind,
        value_type,
        long_description,
        related_concepts,
        applicable_roles,
        inherits_into_roles,
    })
}

fn descendant_by_id<'a>(root: ElementRef<'a>, id: &str) -> Option<ElementRef<'a>> {
    root.descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().id() == Some(id))
}

/// Role ids from anchor `href`s with the leading `#` removed. Order and
/// duplicates are kept.
fn role_references(table: ElementRef<'_>, anchors: &Selector) -> Vec<String> {
    table
        .select(anchors)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.strip_prefix('#').unwrap_or(href).to_string())
        .collect()
}

fn value_type_from_href(href: &str) -> Option<String> {
    VALUE_TYPE_RE
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
