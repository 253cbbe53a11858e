//! Attribute declarations for the SSO application resource.

use serde::Serialize;
use thiserror::Error;

use crate::record::ApplicationRecord;

pub const RESOURCE_TYPE: &str = "jumpcloud_application";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    List,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    Required,
    Optional,
    /// Produced by reads; never accepted from configuration.
    Computed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub mode: AttributeMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub description: &'static str,
}

impl Attribute {
    const fn new(name: &'static str, kind: AttributeType, mode: AttributeMode) -> Self {
        Self {
            name,
            kind,
            mode,
            default: None,
            sensitive: false,
            description: "",
        }
    }

    const fn with_default(mut self, value: bool) -> Self {
        self.default = Some(value);
        self
    }

    const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn is_required(&self) -> bool {
        self.mode == AttributeMode::Required
    }
}

/// Element schema of a list attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NestedBlock {
    pub name: &'static str,
    pub attributes: &'static [Attribute],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub description: &'static str,
    pub attributes: &'static [Attribute],
    pub blocks: &'static [NestedBlock],
}

impl ResourceSchema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    pub fn block(&self, name: &str) -> Option<&NestedBlock> {
        self.blocks.iter().find(|block| block.name == name)
    }
}

use AttributeMode::{Computed, Optional, Required};
use AttributeType::{Bool, List, String as Str};

static ATTRIBUTES: [Attribute; 12] = [
    Attribute::new("name", Str, Required).describe("Name of the application"),
    Attribute::new("beta", Bool, Optional).with_default(false),
    Attribute::new("display_label", Str, Required).describe("Name of the application to display"),
    Attribute::new("sso_url", Str, Required).describe("The SSO URL suffix to use"),
    Attribute::new("learn_more", Str, Optional),
    Attribute::new("constant_attributes", List, Optional),
    Attribute::new("idp_certificate", Str, Required),
    Attribute::new("idp_entity_id", Str, Required),
    Attribute::new("idp_private_key", Str, Required).sensitive(),
    Attribute::new("sp_entity_id", Str, Required),
    Attribute::new("acs_url", Str, Required),
    Attribute::new("metadata_xml", Str, Computed).describe("The SAML metadata XML document."),
];

static CONSTANT_ATTRIBUTES: [Attribute; 5] = [
    Attribute::new("name", Str, Required),
    Attribute::new("value", Str, Required),
    Attribute::new("read_only", Bool, Optional).with_default(false),
    Attribute::new("required", Bool, Optional).with_default(false),
    Attribute::new("visible", Bool, Optional).with_default(true),
];

static BLOCKS: [NestedBlock; 1] = [NestedBlock {
    name: "constant_attributes",
    attributes: &CONSTANT_ATTRIBUTES,
}];

static SCHEMA: ResourceSchema = ResourceSchema {
    type_name: RESOURCE_TYPE,
    description: "SAML SSO application (for example an AWS account) managed through the \
                  application management API.",
    attributes: &ATTRIBUTES,
    blocks: &BLOCKS,
};

pub fn schema() -> &'static ResourceSchema {
    &SCHEMA
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("required attributes are empty: {}", .0.join(", "))]
    MissingRequired(Vec<String>),
}

/// Checks every required string attribute, including those of each constant.
///
/// Missing attributes are reported together; list elements are addressed as
/// `constant_attributes.<index>.<name>`.
pub fn validate(record: &ApplicationRecord) -> Result<(), SchemaError> {
    let mut missing = Vec::new();

    for attr in SCHEMA.attributes.iter() {
        if attr.is_required()
            && attr.kind == AttributeType::String
            && record.string_attribute(attr.name).is_none_or(str::is_empty)
        {
            missing.push(attr.name.to_string());
        }
    }

    for (index, constant) in record.constant_attributes.iter().enumerate() {
        for attr in CONSTANT_ATTRIBUTES.iter().filter(|attr| attr.is_required()) {
            if constant.string_attribute(attr.name).is_none_or(str::is_empty) {
                missing.push(format!("constant_attributes.{index}.{}", attr.name));
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingRequired(missing))
    }
}

#[cfg(feature = "schemas")]
/// JSON Schema for persisted application records.
pub fn record_json_schema() -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(schemars::schema_for!(ApplicationRecord))
}
