//! Fixed UI presentation for the application's configuration fields.
//!
//! The management console renders each wrapped field with the type, label and
//! position sent by the client. None of it is user-configurable.

use std::collections::BTreeMap;

use serde::Serialize;

/// Configuration values that travel inside a field wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    IdpEntityId,
    IdpPrivateKey,
    IdpCertificate,
    AcsUrl,
    SpEntityId,
}

impl ConfigField {
    pub const ALL: [ConfigField; 5] = [
        ConfigField::IdpEntityId,
        ConfigField::IdpPrivateKey,
        ConfigField::IdpCertificate,
        ConfigField::AcsUrl,
        ConfigField::SpEntityId,
    ];

    /// Record attribute that holds this field's value.
    pub fn attribute(self) -> &'static str {
        match self {
            ConfigField::IdpEntityId => "idp_entity_id",
            ConfigField::IdpPrivateKey => "idp_private_key",
            ConfigField::IdpCertificate => "idp_certificate",
            ConfigField::AcsUrl => "acs_url",
            ConfigField::SpEntityId => "sp_entity_id",
        }
    }

    pub fn presentation(self) -> &'static FieldPresentation {
        PRESENTATION
            .iter()
            .find(|entry| entry.field == self)
            .unwrap_or_else(|| unreachable!("every config field has a presentation entry"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Text,
    File,
}

impl WidgetType {
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetType::Text => "text",
            WidgetType::File => "file",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FieldPresentation {
    pub field: ConfigField,
    pub widget: WidgetType,
    pub label: &'static str,
    pub position: i32,
}

// ACS URL and SP Entity ID share position 4. Existing applications in the
// console were created with this layout, so it stays on the wire; see
// `duplicate_positions`.
pub static PRESENTATION: [FieldPresentation; 5] = [
    FieldPresentation {
        field: ConfigField::IdpEntityId,
        widget: WidgetType::Text,
        label: "IdP Entity ID:",
        position: 0,
    },
    FieldPresentation {
        field: ConfigField::IdpPrivateKey,
        widget: WidgetType::File,
        label: "IdP Private Key:",
        position: 1,
    },
    FieldPresentation {
        field: ConfigField::IdpCertificate,
        widget: WidgetType::File,
        label: "IdP Certificate:",
        position: 2,
    },
    FieldPresentation {
        field: ConfigField::AcsUrl,
        widget: WidgetType::Text,
        label: "ACS Url:",
        position: 4,
    },
    FieldPresentation {
        field: ConfigField::SpEntityId,
        widget: WidgetType::Text,
        label: "SP Entity ID:",
        position: 4,
    },
];

/// Positions claimed by more than one field, in ascending order.
pub fn duplicate_positions() -> Vec<(i32, Vec<ConfigField>)> {
    let mut by_position: BTreeMap<i32, Vec<ConfigField>> = BTreeMap::new();
    for entry in PRESENTATION.iter() {
        by_position.entry(entry.position).or_default().push(entry.field);
    }
    by_position
        .into_iter()
        .filter(|(_, fields)| fields.len() > 1)
        .collect()
}
