use serde::{Deserialize, Serialize};

/// Declared (and, after a read, observed) state of one SSO application.
///
/// Every attribute deserializes with its schema default so that a partially
/// filled record can still be validated as a whole; see [`crate::schema`].
#[cfg_attr(feature = "schemas", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationRecord {
    pub state: ResourceState,
    pub name: String,
    pub beta: bool,
    pub display_label: String,
    pub sso_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub learn_more: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constant_attributes: Vec<Constant>,
    pub idp_certificate: String,
    pub idp_entity_id: String,
    pub idp_private_key: String,
    pub sp_entity_id: String,
    pub acs_url: String,
    /// Computed by reads; never sent to the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_xml: Option<String>,
}

impl ApplicationRecord {
    /// Record carrying nothing but a remote identifier, ready to be refreshed by a read.
    pub fn imported(id: impl Into<String>) -> Self {
        Self {
            state: ResourceState::Present { id: id.into() },
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.state.id()
    }

    /// Looks up a scalar string attribute by its schema name.
    pub fn string_attribute(&self, name: &str) -> Option<&str> {
        let value = match name {
            "name" => &self.name,
            "display_label" => &self.display_label,
            "sso_url" => &self.sso_url,
            "learn_more" => &self.learn_more,
            "idp_certificate" => &self.idp_certificate,
            "idp_entity_id" => &self.idp_entity_id,
            "idp_private_key" => &self.idp_private_key,
            "sp_entity_id" => &self.sp_entity_id,
            "acs_url" => &self.acs_url,
            "metadata_xml" => return self.metadata_xml.as_deref(),
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// A named constant attached to the application.
#[cfg_attr(feature = "schemas", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constant {
    pub name: String,
    pub value: String,
    pub read_only: bool,
    pub required: bool,
    pub visible: bool,
}

impl Constant {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn string_attribute(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "value" => Some(&self.value),
            _ => None,
        }
    }
}

impl Default for Constant {
    fn default() -> Self {
        Self {
            name: String::new(),
            value: String::new(),
            read_only: false,
            required: false,
            visible: true,
        }
    }
}

/// Whether, and why, a record is bound to a remote object.
///
/// `New`, `Gone` and `Deleted` are all absent; they only record how the
/// record got there.
#[cfg_attr(feature = "schemas", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResourceState {
    #[default]
    New,
    Present {
        id: String,
    },
    /// A read found the remote object missing.
    Gone {
        last_id: String,
    },
    Deleted {
        last_id: String,
    },
}

impl ResourceState {
    pub fn id(&self) -> Option<&str> {
        match self {
            ResourceState::Present { id } => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, ResourceState::Present { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceState::New => "new",
            ResourceState::Present { .. } => "present",
            ResourceState::Gone { .. } => "gone",
            ResourceState::Deleted { .. } => "deleted",
        }
    }

    /// Present -> gone. Absent states are left as they are.
    pub fn mark_gone(&mut self) {
        if let ResourceState::Present { id } = self {
            let last_id = std::mem::take(id);
            *self = ResourceState::Gone { last_id };
        }
    }

    /// Present -> deleted. Absent states are left as they are.
    pub fn mark_deleted(&mut self) {
        if let ResourceState::Present { id } = self {
            let last_id = std::mem::take(id);
            *self = ResourceState::Deleted { last_id };
        }
    }
}
