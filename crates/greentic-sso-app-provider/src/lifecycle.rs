//! Create, read, update, delete and import for SSO application records.
//!
//! Each operation performs at most one mutating call followed by a read, all
//! blocking. Nothing is retried; every error other than a read's not-found
//! goes back to the caller unchanged.

use greentic_sso_app_core::{ApplicationRecord, ResourceState, build_payload};
use tracing::{info, instrument, warn};

use crate::{
    api::ClientHandle,
    error::{ApiError, ProviderError},
    populate::populate,
};

/// Creates the remote application and refreshes `record` from it.
///
/// If the create call fails the record stays absent. Once the identifier is
/// bound it is kept even when the follow-up read fails, so callers must
/// persist the record on either outcome.
#[instrument(skip_all, fields(name = %record.name))]
pub fn create(record: &mut ApplicationRecord, client: &ClientHandle) -> Result<(), ProviderError> {
    let payload = build_payload(record, client.beta_mapping());
    let created = client.applications().create_application(&payload)?;
    if created.id.is_empty() {
        return Err(ApiError::InvalidResponse(
            "create response did not include an application id".into(),
        )
        .into());
    }

    info!(application_id = %created.id, "application created");
    record.state = ResourceState::Present { id: created.id };
    read(record, client)
}

/// Refreshes `record` from the remote application.
///
/// A missing remote object, or a response without an identifier, moves the
/// record to `gone` and is not an error. Reading an absent record does nothing.
#[instrument(skip_all, fields(application_id = record.id().unwrap_or_default()))]
pub fn read(record: &mut ApplicationRecord, client: &ClientHandle) -> Result<(), ProviderError> {
    let Some(id) = record.id().map(str::to_owned) else {
        info!(state = record.state.as_str(), "record is absent; nothing to read");
        return Ok(());
    };

    let response = match client.applications().get_application(&id) {
        Ok(response) => response,
        Err(ApiError::NotFound { .. }) => {
            warn!(application_id = %id, "application no longer exists; removing from state");
            record.state.mark_gone();
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    if response.id.is_empty() {
        warn!(application_id = %id, "response carried no application id; removing from state");
        record.state.mark_gone();
        return Ok(());
    }

    populate(record, &response, client)?;
    Ok(())
}

/// Pushes the declared attributes to the remote application, then reads it back.
///
/// As with [`create`], the record can hold useful state even when this fails.
#[instrument(skip_all, fields(application_id = record.id().unwrap_or_default()))]
pub fn update(record: &mut ApplicationRecord, client: &ClientHandle) -> Result<(), ProviderError> {
    let id = present_id(record, "update")?;
    let payload = build_payload(record, client.beta_mapping());
    client.applications().update_application(&id, &payload)?;
    info!(application_id = %id, "application updated");
    read(record, client)
}

/// Deletes the remote application. The record stays present if the call fails.
#[instrument(skip_all, fields(application_id = record.id().unwrap_or_default()))]
pub fn delete(record: &mut ApplicationRecord, client: &ClientHandle) -> Result<(), ProviderError> {
    let id = present_id(record, "delete")?;
    client.applications().delete_application(&id)?;
    info!(application_id = %id, "application deleted");
    record.state.mark_deleted();
    Ok(())
}

/// Builds a record for an existing application from its identifier alone.
///
/// Unlike [`read`], a missing application is an error here.
#[instrument(skip(client))]
pub fn import(id: &str, client: &ClientHandle) -> Result<ApplicationRecord, ProviderError> {
    let mut record = ApplicationRecord::imported(id);
    read(&mut record, client)?;
    if !record.state.is_present() {
        return Err(ApiError::NotFound { id: id.to_string() }.into());
    }
    Ok(record)
}

fn present_id(record: &ApplicationRecord, operation: &'static str) -> Result<String, ProviderError> {
    record
        .id()
        .map(str::to_owned)
        .ok_or(ProviderError::NotPresent {
            operation,
            state: record.state.as_str(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::Credentials,
        memory::{Call, InMemoryApplications},
    };
    use greentic_sso_app_core::{Constant, RemoteApplication};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn desired() -> ApplicationRecord {
        ApplicationRecord {
            name: "aws-app".into(),
            display_label: "AWS".into(),
            sso_url: "aws".into(),
            constant_attributes: vec![Constant {
                required: true,
                ..Constant::new("role", "admin")
            }],
            idp_certificate: "cert".into(),
            idp_entity_id: "https://sso.example.com/aws".into(),
            idp_private_key: "key".into(),
            sp_entity_id: "urn:amazon:webservices".into(),
            acs_url: "https://signin.aws.amazon.com/saml".into(),
            ..ApplicationRecord::default()
        }
    }

    fn setup() -> (Arc<InMemoryApplications>, ClientHandle) {
        let api = Arc::new(InMemoryApplications::new());
        let client = ClientHandle::from_client(api.clone(), Credentials::new("org-1", "key-1"));
        (api, client)
    }

    #[test]
    fn create_binds_id_and_reads_back() {
        let (api, client) = setup();
        let mut record = desired();

        create(&mut record, &client).expect("create");

        let id = record.id().expect("present").to_string();
        assert!(id.starts_with("mock-"));
        assert_eq!(api.calls(), vec![Call::Create, Call::Get, Call::Metadata]);
        assert!(record.metadata_xml.as_deref().unwrap().contains(&id));

        let mut expected = desired();
        expected.state = ResourceState::Present { id };
        expected.metadata_xml = record.metadata_xml.clone();
        assert_eq!(record, expected);
    }

    #[test]
    fn create_failure_leaves_record_new() {
        let (api, client) = setup();
        api.fail_on(Call::Create, "quota exceeded");
        let mut record = desired();

        let err = create(&mut record, &client).unwrap_err();

        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(record.state, ResourceState::New);
        assert_eq!(api.calls(), vec![Call::Create]);
    }

    #[test]
    fn create_rejects_response_without_id() {
        let (api, client) = setup();
        api.omit_created_id();
        let mut record = desired();

        let err = create(&mut record, &client).unwrap_err();

        assert!(matches!(err.api(), Some(ApiError::InvalidResponse(_))));
        assert_eq!(record.state, ResourceState::New);
        assert_eq!(api.calls(), vec![Call::Create]);
    }

    #[test]
    fn read_of_vanished_application_marks_gone() {
        let (api, client) = setup();
        let mut record = desired();
        create(&mut record, &client).expect("create");
        let id = record.id().unwrap().to_string();
        api.remove(&id);

        read(&mut record, &client).expect("not found is not an error");

        assert_eq!(record.state, ResourceState::Gone { last_id: id });
    }

    #[test]
    fn create_keeps_identity_when_follow_up_read_fails() {
        let (api, client) = setup();
        api.fail_on(Call::Metadata, "metadata down");
        let mut record = desired();

        let err = create(&mut record, &client).unwrap_err();

        assert!(err.to_string().contains("metadata down"));
        let id = record.id().expect("identity survives the failed read");
        assert!(api.get(id).is_some());
        assert_eq!(api.len(), 1);
    }

    struct IdlessApplications;

    impl crate::api::ApplicationsApi for IdlessApplications {
        fn create_application(
            &self,
            payload: &greentic_sso_app_core::ApplicationPayload,
        ) -> Result<RemoteApplication, ApiError> {
            Ok(RemoteApplication::from_payload("", payload))
        }

        fn get_application(&self, _id: &str) -> Result<RemoteApplication, ApiError> {
            Ok(RemoteApplication::default())
        }

        fn update_application(
            &self,
            _id: &str,
            payload: &greentic_sso_app_core::ApplicationPayload,
        ) -> Result<RemoteApplication, ApiError> {
            Ok(RemoteApplication::from_payload("", payload))
        }

        fn delete_application(&self, _id: &str) -> Result<(), ApiError> {
            Ok(())
        }
    }

    #[test]
    fn read_of_response_without_id_marks_gone_and_keeps_attributes() {
        let metadata = Arc::new(InMemoryApplications::new());
        let client = ClientHandle::new(
            Arc::new(IdlessApplications),
            metadata.clone(),
            Credentials::new("org-1", "key-1"),
        );
        let mut record = ApplicationRecord {
            state: ResourceState::Present { id: "app-1".into() },
            ..desired()
        };

        read(&mut record, &client).expect("treated as not found");

        assert_eq!(
            record.state,
            ResourceState::Gone {
                last_id: "app-1".into()
            }
        );
        assert_eq!(record.name, "aws-app");
        assert_eq!(record.acs_url, "https://signin.aws.amazon.com/saml");
        assert!(metadata.calls().is_empty());
    }

    #[test]
    fn read_error_leaves_record_untouched() {
        let (api, client) = setup();
        let mut record = desired();
        create(&mut record, &client).expect("create");
        let before = record.clone();
        api.fail_on(Call::Get, "bad gateway");

        assert!(read(&mut record, &client).is_err());
        assert_eq!(record, before);
    }

    #[test]
    fn read_of_absent_record_makes_no_calls() {
        let (api, client) = setup();
        let mut record = desired();
        read(&mut record, &client).expect("noop");
        assert!(api.calls().is_empty());
    }

    #[test]
    fn update_pushes_changes_then_reads() {
        let (api, client) = setup();
        let mut record = desired();
        create(&mut record, &client).expect("create");
        let id = record.id().unwrap().to_string();

        record.display_label = "AWS Production".into();
        record.constant_attributes.push(Constant::new("session", "3600"));
        update(&mut record, &client).expect("update");

        let stored = api.get(&id).expect("stored");
        assert_eq!(stored.display_label, "AWS Production");
        assert_eq!(stored.config.constant_attributes.value.len(), 2);
        assert_eq!(record.constant_attributes[1].name, "session");
        assert_eq!(
            api.calls()[3..].to_vec(),
            vec![Call::Update, Call::Get, Call::Metadata]
        );
    }

    #[test]
    fn update_failure_skips_read() {
        let (api, client) = setup();
        let mut record = desired();
        create(&mut record, &client).expect("create");
        api.fail_on(Call::Update, "conflict");

        assert!(update(&mut record, &client).is_err());
        assert_eq!(api.calls().last(), Some(&Call::Update));
    }

    #[test]
    fn delete_clears_identity() {
        let (api, client) = setup();
        let mut record = desired();
        create(&mut record, &client).expect("create");
        let id = record.id().unwrap().to_string();

        delete(&mut record, &client).expect("delete");

        assert_eq!(record.state, ResourceState::Deleted { last_id: id });
        assert!(api.is_empty());
    }

    #[test]
    fn delete_failure_keeps_record_present() {
        let (api, client) = setup();
        let mut record = desired();
        create(&mut record, &client).expect("create");
        api.fail_on(Call::Delete, "locked");

        assert!(delete(&mut record, &client).is_err());
        assert!(record.state.is_present());
    }

    #[test]
    fn update_and_delete_require_present_record() {
        let (api, client) = setup();
        let mut record = desired();

        let err = update(&mut record, &client).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::NotPresent {
                operation: "update",
                state: "new"
            }
        ));
        assert!(delete(&mut record, &client).is_err());
        assert!(api.calls().is_empty());
    }

    #[test]
    fn import_repopulates_from_id() {
        let (api, client) = setup();
        let payload = build_payload(&desired(), client.beta_mapping());
        api.insert(RemoteApplication::from_payload("existing-1", &payload));

        let record = import("existing-1", &client).expect("import");

        assert_eq!(record.id(), Some("existing-1"));
        assert_eq!(record.sp_entity_id, "urn:amazon:webservices");
        assert_eq!(record.constant_attributes, desired().constant_attributes);
        assert!(record.metadata_xml.is_some());
    }

    #[test]
    fn import_of_unknown_id_fails() {
        let (_api, client) = setup();

        let err = import("missing-1", &client).unwrap_err();

        assert!(err.api().is_some_and(ApiError::is_not_found));
    }
}
