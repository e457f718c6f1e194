//! Role table extraction from the HTML-ARIA document.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use ariacrawl_shared::{AriaCrawlError, AttributeRef, Result, Role};

use super::{element_text, selector};

/// Body rows of the role table.
const ROW_SELECTOR: &str = "table#aria-table tbody tr";

/// Row id of the "global states and properties" pseudo-role.
const GLOBAL_STATES_ROW_ID: &str = "index-aria-global";

/// Cells every role row must carry.
const EXPECTED_CELLS: usize = 6;

/// How a required/supported anchor is filed on its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorClass {
    Property,
    State,
}

/// Classify an anchor's whitespace-split text `[identifier, ...qualifiers]`.
///
/// Only the qualifier words are inspected: the tuple is a state when they,
/// joined by single spaces, contain `state`. A tuple without qualifiers is
/// always a property.
pub fn classify_anchor_tuple<S: AsRef<str>>(tuple: &[S]) -> AnchorClass {
    let qualifiers = tuple
        .iter()
        .skip(1)
        .map(|word| word.as_ref())
        .collect::<Vec<_>>()
        .join(" ");

    if qualifiers.contains("state") {
        AnchorClass::State
    } else {
        AnchorClass::Property
    }
}

/// Extract every role row except the global-states sentinel, in document order.
///
/// A row with fewer than six cells, or a role cell without text, fails the
/// whole extraction.
pub fn extract_roles(doc: &Html) -> Result<Vec<Role>> {
    let rows = selector(ROW_SELECTOR)?;
    let anchors = selector("a")?;

    let mut roles = Vec::new();
    for (index, row) in doc.select(&rows).enumerate() {
        if row.value().id() == Some(GLOBAL_STATES_ROW_ID) {
            trace!(index, "skipping global states row");
            continue;
        }
        roles.push(parse_role_row(row, index, &anchors)?);
    }

    debug!(roles = roles.len(), "extracted role table");
    Ok(roles)
}

fn parse_role_row(row: ElementRef<'_>, index: usize, anchors: &Selector) -> Result<Role> {
    let cells: Vec<ElementRef<'_>> = row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "td")
        .collect();

    // Kind-of-content and descendant-restriction cells are not modeled yet.
    let [role, description, required, supported, _kind_of_content, _descendant_restrictions, ..] =
        cells.as_slice()
    else {
        return Err(AriaCrawlError::parse(format!(
            "role row {index} has {} cells, expected {EXPECTED_CELLS}",
            cells.len()
        )));
    };

    let id = role
        .text()
        .find(|t| !t.trim().is_empty())
        .and_then(|t| t.split_whitespace().next())
        .ok_or_else(|| AriaCrawlError::parse(format!("role row {index} has an empty role cell")))?
        .to_string();

    let mut props = Vec::new();
    let mut states = Vec::new();
    for (cell, is_required) in [(required, true), (supported, false)] {
        for tuple in anchor_tuples(*cell, anchors) {
            let attr = AttributeRef {
                id: tuple[0].clone(),
                is_required,
            };
            match classify_anchor_tuple(tuple.as_slice()) {
                AnchorClass::Property => props.push(attr),
                AnchorClass::State => states.push(attr),
            }
        }
    }

    Ok(Role {
        id,
        description: element_text(*description),
        props,
        states,
    })
}

/// Whitespace-split text of each anchor in `cell`; anchors without text are dropped.
fn anchor_tuples(cell: ElementRef<'_>, anchors: &Selector) -> Vec<Vec<String>> {
    cell.select(anchors)
        .map(|a| {
            element_text(a)
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|tuple| !tuple.is_empty())
        .collect()
}
