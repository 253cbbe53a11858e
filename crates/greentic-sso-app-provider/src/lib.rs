//! Reconciles declared SSO application records with the application
//! management API.

pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod live;
pub mod memory;
pub mod populate;
pub mod state;
pub mod telemetry;

pub use api::{ApplicationsApi, ClientHandle, Credentials, MetadataSource};
pub use config::{ConfigError, ConfigLayer, ProviderConfig};
pub use error::{ApiError, ProviderError};
pub use lifecycle::{create, delete, import, read, update};
pub use live::LiveApplicationsClient;
pub use memory::InMemoryApplications;
pub use populate::populate;
pub use state::{StateError, apply_and_store, load_record, store_record};
