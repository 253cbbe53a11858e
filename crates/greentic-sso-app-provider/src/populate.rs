use greentic_sso_app_core::{ApplicationRecord, RemoteApplication, apply_remote};
use tracing::info;

use crate::{api::ClientHandle, error::ApiError};

/// Refreshes `record` from `response`, then fetches the metadata document.
///
/// The lookup only happens when the response carries an identifier. A failed
/// lookup is returned as-is; attributes copied before it stay copied.
pub fn populate(
    record: &mut ApplicationRecord,
    response: &RemoteApplication,
    client: &ClientHandle,
) -> Result<(), ApiError> {
    apply_remote(record, response, client.beta_mapping());

    if response.id.is_empty() {
        info!("no ID in response, skipping metadata XML retrieval");
        return Ok(());
    }

    info!(application_id = %response.id, "fetching metadata XML");
    let credentials = client.credentials();
    let metadata = client.metadata().fetch_metadata_xml(
        &credentials.org_id,
        &response.id,
        &credentials.api_key,
    )?;
    record.metadata_xml = Some(metadata);
    Ok(())
}
