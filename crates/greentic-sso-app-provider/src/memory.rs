use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use greentic_sso_app_core::{ApplicationPayload, RemoteApplication};
use reqwest::StatusCode;
use ulid::Ulid;

use crate::{
    api::{ApplicationsApi, MetadataSource},
    error::ApiError,
};

/// Which call an injected failure applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Call {
    Create,
    Get,
    Update,
    Delete,
    Metadata,
}

/// In-process stand-in for the application API.
///
/// Accepted payloads are stored as remote applications under `mock-<ulid>`
/// identifiers. Every call is recorded so tests can assert on the sequence.
#[derive(Default)]
pub struct InMemoryApplications {
    apps: Mutex<BTreeMap<String, RemoteApplication>>,
    failures: Mutex<BTreeMap<Call, String>>,
    calls: Mutex<Vec<Call>>,
    omit_created_id: Mutex<bool>,
}

impl InMemoryApplications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `app` as if it had been created out of band.
    pub fn insert(&self, app: RemoteApplication) {
        lock(&self.apps).insert(app.id.clone(), app);
    }

    pub fn get(&self, id: &str) -> Option<RemoteApplication> {
        lock(&self.apps).get(id).cloned()
    }

    /// Drops an application without going through the API.
    pub fn remove(&self, id: &str) -> Option<RemoteApplication> {
        lock(&self.apps).remove(id)
    }

    pub fn len(&self) -> usize {
        lock(&self.apps).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes every subsequent `call` fail with a 500 carrying `message`.
    pub fn fail_on(&self, call: Call, message: impl Into<String>) {
        lock(&self.failures).insert(call, message.into());
    }

    /// Makes create answer with an empty identifier.
    pub fn omit_created_id(&self) {
        *lock(&self.omit_created_id) = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    fn enter(&self, call: Call) -> Result<(), ApiError> {
        lock(&self.calls).push(call);
        match lock(&self.failures).get(&call) {
            Some(message) => Err(ApiError::status(
                StatusCode::INTERNAL_SERVER_ERROR,
                message.clone(),
            )),
            None => Ok(()),
        }
    }
}

impl ApplicationsApi for InMemoryApplications {
    fn create_application(
        &self,
        payload: &ApplicationPayload,
    ) -> Result<RemoteApplication, ApiError> {
        self.enter(Call::Create)?;
        let id = format!("mock-{}", Ulid::new());
        let app = RemoteApplication::from_payload(id.clone(), payload);
        lock(&self.apps).insert(id, app.clone());
        if *lock(&self.omit_created_id) {
            return Ok(RemoteApplication {
                id: String::new(),
                ..app
            });
        }
        Ok(app)
    }

    fn get_application(&self, id: &str) -> Result<RemoteApplication, ApiError> {
        self.enter(Call::Get)?;
        self.get(id)
            .ok_or_else(|| ApiError::NotFound { id: id.to_string() })
    }

    fn update_application(
        &self,
        id: &str,
        payload: &ApplicationPayload,
    ) -> Result<RemoteApplication, ApiError> {
        self.enter(Call::Update)?;
        let mut apps = lock(&self.apps);
        if !apps.contains_key(id) {
            return Err(ApiError::status(StatusCode::NOT_FOUND, "application not found"));
        }
        let app = RemoteApplication::from_payload(id, payload);
        apps.insert(id.to_string(), app.clone());
        Ok(app)
    }

    fn delete_application(&self, id: &str) -> Result<(), ApiError> {
        self.enter(Call::Delete)?;
        match lock(&self.apps).remove(id) {
            Some(_) => Ok(()),
            None => Err(ApiError::status(StatusCode::NOT_FOUND, "application not found")),
        }
    }
}

impl MetadataSource for InMemoryApplications {
    fn fetch_metadata_xml(
        &self,
        org_id: &str,
        application_id: &str,
        _api_key: &str,
    ) -> Result<String, ApiError> {
        self.enter(Call::Metadata)?;
        let apps = lock(&self.apps);
        let app = apps.get(application_id).ok_or_else(|| ApiError::NotFound {
            id: application_id.to_string(),
        })?;
        Ok(format!(
            r#"<md:EntityDescriptor xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata" entityID="{}" ID="{application_id}" data-org="{org_id}"/>"#,
            app.config.idp_entity_id.value
        ))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
