use std::sync::Arc;

use greentic_sso_app_core::{ApplicationPayload, BetaMapping, RemoteApplication};

use crate::error::ApiError;

/// The `/applications` endpoints of the management API.
pub trait ApplicationsApi: Send + Sync {
    fn create_application(&self, payload: &ApplicationPayload)
    -> Result<RemoteApplication, ApiError>;

    /// Returns [`ApiError::NotFound`] when the application no longer exists.
    fn get_application(&self, id: &str) -> Result<RemoteApplication, ApiError>;

    fn update_application(
        &self,
        id: &str,
        payload: &ApplicationPayload,
    ) -> Result<RemoteApplication, ApiError>;

    fn delete_application(&self, id: &str) -> Result<(), ApiError>;
}

/// Retrieval of an application's SAML metadata document.
pub trait MetadataSource: Send + Sync {
    fn fetch_metadata_xml(
        &self,
        org_id: &str,
        application_id: &str,
        api_key: &str,
    ) -> Result<String, ApiError>;
}

/// Organization-scoped API credentials.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub org_id: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(org_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            api_key: api_key.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("org_id", &self.org_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Authenticated client handed to every lifecycle operation.
#[derive(Clone)]
pub struct ClientHandle {
    applications: Arc<dyn ApplicationsApi>,
    metadata: Arc<dyn MetadataSource>,
    credentials: Credentials,
    beta: BetaMapping,
}

impl ClientHandle {
    pub fn new(
        applications: Arc<dyn ApplicationsApi>,
        metadata: Arc<dyn MetadataSource>,
        credentials: Credentials,
    ) -> Self {
        Self {
            applications,
            metadata,
            credentials,
            beta: BetaMapping::default(),
        }
    }

    /// Handle backed by a single client serving both the API and metadata calls.
    pub fn from_client<C>(client: Arc<C>, credentials: Credentials) -> Self
    where
        C: ApplicationsApi + MetadataSource + 'static,
    {
        Self::new(client.clone(), client, credentials)
    }

    pub fn with_beta_mapping(mut self, beta: BetaMapping) -> Self {
        self.beta = beta;
        self
    }

    pub fn applications(&self) -> &dyn ApplicationsApi {
        self.applications.as_ref()
    }

    pub fn metadata(&self) -> &dyn MetadataSource {
        self.metadata.as_ref()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn beta_mapping(&self) -> BetaMapping {
        self.beta
    }
}

impl std::fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle")
            .field("credentials", &self.credentials)
            .field("beta", &self.beta)
            .finish()
    }
}
