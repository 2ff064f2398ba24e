use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::extensions::Extensions;

/// Vendor field naming the cloud module a model belongs to.
pub const X_JDCLOUD_MODULE: &str = "x-jdcloud-module";

/// A Swagger 2.0 schema object.
///
/// Validation keywords not modelled here are carried through `extensions`
/// unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    /// Either a single type name or an array of them.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,

    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    #[serde(rename = "x-jdcloud-module", skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}

impl Schema {
    /// A schema that is nothing but a `$ref`.
    pub fn reference(ref_path: impl Into<String>) -> Self {
        Self {
            ref_path: Some(ref_path.into()),
            ..Self::default()
        }
    }

    /// Visit every schema nested below this one: properties, items, allOf
    /// members and schema-valued additionalProperties. Depth first, parents
    /// before children; `self` is not visited.
    pub fn walk_children_mut(&mut self, f: &mut impl FnMut(&mut Schema)) {
        for prop in self.properties.values_mut() {
            f(prop);
            prop.walk_children_mut(f);
        }
        if let Some(items) = self.items.as_deref_mut() {
            f(items);
            items.walk_children_mut(f);
        }
        for member in &mut self.all_of {
            f(member);
            member.walk_children_mut(f);
        }
        if let Some(AdditionalProperties::Schema(extra)) = self.additional_properties.as_mut() {
            let extra: &mut Schema = extra;
            f(extra);
            extra.walk_children_mut(f);
        }
    }
}
