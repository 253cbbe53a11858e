//! JSON shapes of the `/applications` management API.

use serde::{Deserialize, Serialize};

use crate::presentation::ConfigField;

/// Body of create and update requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationPayload {
    pub beta: bool,
    pub name: String,
    pub display_label: String,
    pub sso_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub learn_more: String,
    pub config: ApplicationConfig,
}

/// An application as returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoteApplication {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub display_label: String,
    pub sso_url: String,
    pub beta: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub learn_more: String,
    pub config: ApplicationConfig,
}

impl RemoteApplication {
    /// The object a server would hold after accepting `payload` under `id`.
    pub fn from_payload(id: impl Into<String>, payload: &ApplicationPayload) -> Self {
        Self {
            id: id.into(),
            name: payload.name.clone(),
            display_label: payload.display_label.clone(),
            sso_url: payload.sso_url.clone(),
            beta: payload.beta,
            learn_more: payload.learn_more.clone(),
            config: payload.config.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationConfig {
    pub acs_url: FieldWrapper,
    pub constant_attributes: ConstantAttributes,
    pub database_attributes: DatabaseAttributes,
    pub idp_certificate: FieldWrapper,
    pub idp_entity_id: FieldWrapper,
    pub idp_private_key: FieldWrapper,
    pub sp_entity_id: FieldWrapper,
}

impl ApplicationConfig {
    pub fn field(&self, field: ConfigField) -> &FieldWrapper {
        match field {
            ConfigField::IdpEntityId => &self.idp_entity_id,
            ConfigField::IdpPrivateKey => &self.idp_private_key,
            ConfigField::IdpCertificate => &self.idp_certificate,
            ConfigField::AcsUrl => &self.acs_url,
            ConfigField::SpEntityId => &self.sp_entity_id,
        }
    }

    pub fn field_mut(&mut self, field: ConfigField) -> &mut FieldWrapper {
        match field {
            ConfigField::IdpEntityId => &mut self.idp_entity_id,
            ConfigField::IdpPrivateKey => &mut self.idp_private_key,
            ConfigField::IdpCertificate => &mut self.idp_certificate,
            ConfigField::AcsUrl => &mut self.acs_url,
            ConfigField::SpEntityId => &mut self.sp_entity_id,
        }
    }
}

/// A single configuration value plus the console metadata used to render it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldWrapper {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub value: String,
    pub required: bool,
    pub visible: bool,
    pub read_only: bool,
    pub position: i32,
}

/// Wrapper around the constant list. The API may attach presentation
/// metadata to it; clients only ever send `value`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConstantAttributes {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    pub value: Vec<ConstantValue>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConstantValue {
    pub name: String,
    pub value: String,
    pub read_only: bool,
    pub required: bool,
    pub visible: bool,
}

/// Required by the API, unused by this application type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn remote_application_ignores_unknown_fields() {
        let remote: RemoteApplication = serde_json::from_value(json!({
            "_id": "5d64",
            "name": "aws",
            "displayLabel": "AWS",
            "ssoUrl": "https://sso.example.com/saml2/aws",
            "beta": false,
            "active": true,
            "organization": "org-1",
            "config": {
                "acsUrl": {
                    "type": "text",
                    "label": "ACS Url:",
                    "value": "https://signin.aws.amazon.com/saml",
                    "required": true,
                    "visible": true,
                    "readOnly": false,
                    "position": 4,
                    "tooltip": { "template": "" }
                },
                "constantAttributes": {
                    "label": "Constant Attributes",
                    "mutable": true,
                    "value": [
                        { "name": "role", "value": "admin", "readOnly": false, "required": true, "visible": true }
                    ]
                }
            }
        }))
        .unwrap();

        assert_eq!(remote.id, "5d64");
        assert_eq!(remote.config.acs_url.position, 4);
        assert_eq!(
            remote.config.constant_attributes.label.as_deref(),
            Some("Constant Attributes")
        );
        assert_eq!(remote.config.constant_attributes.value[0].name, "role");
        assert_eq!(remote.config.sp_entity_id, FieldWrapper::default());
    }

    #[test]
    fn payload_uses_api_field_names() {
        let payload = ApplicationPayload {
            name: "aws".into(),
            display_label: "AWS".into(),
            sso_url: "aws".into(),
            ..ApplicationPayload::default()
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["displayLabel"], json!("AWS"));
        assert_eq!(value["ssoUrl"], json!("aws"));
        assert!(value.get("learnMore").is_none());
        assert_eq!(value["config"]["databaseAttributes"], json!({}));
        assert_eq!(value["config"]["constantAttributes"], json!({ "value": [] }));
        assert!(value["config"]["acsUrl"].get("type").is_some());
    }
}
