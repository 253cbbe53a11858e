//! JSON state files holding one application record each.

use std::{
    fs,
    path::{Path, PathBuf},
};

use greentic_sso_app_core::ApplicationRecord;
use tracing::warn;

use crate::error::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read state file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write state file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse state file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode state for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Operation(#[from] ProviderError),
}

pub fn load_record(path: &Path) -> Result<ApplicationRecord, StateError> {
    let contents = fs::read_to_string(path).map_err(|source| StateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| StateError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn store_record(path: &Path, record: &ApplicationRecord) -> Result<(), StateError> {
    let contents = serde_json::to_string_pretty(record).map_err(|source| StateError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, contents + "\n").map_err(|source| StateError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Runs `operation` on `record` and writes the result to `path`.
///
/// On success the record is always written. On failure it is written only if
/// it is bound to a remote object, so an identity acquired before the error
/// is not lost; the operation's error is returned either way.
pub fn apply_and_store<F>(
    path: &Path,
    record: &mut ApplicationRecord,
    operation: F,
) -> Result<(), StateError>
where
    F: FnOnce(&mut ApplicationRecord) -> Result<(), ProviderError>,
{
    match operation(record) {
        Ok(()) => store_record(path, record),
        Err(err) => {
            if record.state.is_present() {
                warn!(
                    application_id = record.id().unwrap_or_default(),
                    error = %err,
                    "operation failed after binding the application; saving state"
                );
                store_record(path, record)?;
            }
            Err(err.into())
        }
    }
}
