//! Entity model for extracted ARIA data.
//!
//! Field names serialize in camelCase. Cross references between collections
//! (`Role::props[].id` → `PropertyOrState::id`, `applicable_roles` → `Role::id`)
//! are by convention only and never checked.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// A reference from a role to a property or state it requires or supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRef {
    /// Property/state identifier, e.g. `aria-checked`.
    pub id: String,
    /// `true` when listed under required properties.
    pub is_required: bool,
}

/// One row of the role table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier, e.g. `checkbox`.
    pub id: String,
    /// Full text of the description cell.
    pub description: String,
    /// Referenced properties, required ones first.
    pub props: Vec<AttributeRef>,
    /// Referenced states, required ones first.
    pub states: Vec<AttributeRef>,
}

// ---------------------------------------------------------------------------
// PropertyOrState
// ---------------------------------------------------------------------------

/// Which section collection a [`PropertyOrState`] was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Property,
    State,
}

impl PropertyKind {
    /// The word used in section classes and class-name prefixes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::State => "state",
        }
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property or state definition section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOrState {
    /// Section id, e.g. `aria-busy`.
    pub id: String,
    /// Source collection.
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    /// Value type fragment (`true-false`, `idref_list`, ...). Omitted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    /// Short description from the index table.
    pub description: Option<String>,
    /// Long description from the section body.
    pub long_description: Option<String>,
    /// Related concepts text from the features table.
    pub related_concepts: Option<String>,
    /// Roles this attribute is used in.
    pub applicable_roles: Vec<String>,
    /// Roles this attribute is inherited into.
    pub inherits_into_roles: Vec<String>,
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A value type definition from the characteristic value list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    /// Term id, e.g. `valuetype_true-false`.
    pub id: String,
    /// Trimmed term text.
    pub name: String,
    /// Raw definition text. Omitted when no definition followed the term.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// AriaData
// ---------------------------------------------------------------------------

/// The aggregated crawl output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AriaData {
    pub roles: Vec<Role>,
    pub states: Vec<PropertyOrState>,
    pub properties: Vec<PropertyOrState>,
    pub values: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn property_serializes_absent_fields_per_kind() {
        let prop = PropertyOrState {
            id: "aria-label".into(),
            kind: PropertyKind::Property,
            value_type: None,
            description: None,
            long_description: Some("Defines a string value.".into()),
            related_concepts: None,
            applicable_roles: vec![],
            inherits_into_roles: vec![],
        };
        let value = serde_json::to_value(&prop).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "aria-label",
                "type": "property",
                "description": null,
                "longDescription": "Defines a string value.",
                "relatedConcepts": null,
                "applicableRoles": [],
                "inheritsIntoRoles": []
            })
        );
    }

    #[test]
    fn attribute_ref_is_camel_case() {
        let r = AttributeRef {
            id: "aria-checked".into(),
            is_required: true,
        };
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({ "id": "aria-checked", "isRequired": true })
        );
    }

    #[test]
    fn aria_data_has_four_keys_in_order() {
        let out = serde_json::to_string(&AriaData::default()).unwrap();
        assert_eq!(out, r#"{"roles":[],"states":[],"properties":[],"values":[]}"#);
    }
}
