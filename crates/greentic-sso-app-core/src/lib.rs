//! Greentic SSO application primitives: the declarative record, its schema, and
//! the wire shapes exchanged with the application management API.

pub mod convert;
pub mod presentation;
pub mod record;
pub mod schema;
pub mod wire;

pub use convert::{BetaMapping, ParseBetaMappingError, apply_remote, build_payload};
pub use presentation::{ConfigField, FieldPresentation, WidgetType, duplicate_positions};
pub use record::{ApplicationRecord, Constant, ResourceState};
pub use schema::{Attribute, AttributeMode, AttributeType, ResourceSchema, SchemaError, validate};
pub use wire::{
    ApplicationConfig, ApplicationPayload, ConstantAttributes, ConstantValue, DatabaseAttributes,
    FieldWrapper, RemoteApplication,
};
