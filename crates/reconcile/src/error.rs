//! Error types for schema building, instance validation, and sync passes.
//!
//! The taxonomy separates failures by phase: [`SchemaError`] at type
//! declaration time, [`ValidationError`] at instance build time (always
//! before any provider interaction), and [`SyncError`] for provider
//! failures during convergence.

use thiserror::Error;

/// Errors raised while declaring a resource type schema
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A property with this name is already registered
    #[error("duplicate property declaration: {name}")]
    DuplicateProperty {
        /// Name of the colliding property
        name: String,
    },

    /// The schema already has an identity property
    #[error("schema '{schema}' already declares a namevar")]
    MultipleNamevars {
        /// Name of the schema being built
        schema: String,
    },
}

/// Errors raised while building a resource instance from user attributes.
///
/// These always fire before the engine touches the managed system.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Identity does not match the schema's identity pattern
    #[error("invalid identity {identity:?}: must be non-empty with no whitespace")]
    InvalidIdentity {
        /// The rejected identity value
        identity: String,
    },

    /// Attribute name not declared by the schema
    #[error("unknown attribute: {name}")]
    UnknownAttribute {
        /// The unrecognized attribute name
        name: String,
    },

    /// A required attribute was not supplied
    #[error("missing required attribute: {name}")]
    MissingRequired {
        /// Name of the missing attribute
        name: String,
    },

    /// A supplied value failed the property's validation rule
    #[error("invalid value for {property}: {message}")]
    InvalidValue {
        /// Property whose validation rejected the value
        property: String,
        /// Description of the rejection
        message: String,
    },

    /// Unrecognized ensure state
    #[error("invalid ensure value {value:?}: expected \"present\" or \"absent\"")]
    InvalidEnsure {
        /// The rejected ensure spelling
        value: String,
    },
}

/// A provider failure during a sync pass.
///
/// Never retried by the core; aborts the remaining property checks for
/// the instance and propagates to the caller unmodified. Failures while
/// evaluating a live insync check (secret verification, state reads) use
/// the same shape, with the property named.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A lifecycle operation (exists/create/destroy) failed
    #[error("provider {operation} failed for '{identity}': {source}")]
    Lifecycle {
        /// The provider operation that failed
        operation: &'static str,
        /// Identity of the instance being synced
        identity: String,
        /// Underlying provider error
        #[source]
        source: anyhow::Error,
    },

    /// A per-property operation (read/update/check_secret) failed
    #[error("provider {operation} failed for property '{property}' of '{identity}': {source}")]
    Property {
        /// The provider operation that failed
        operation: &'static str,
        /// Identity of the instance being synced
        identity: String,
        /// Property being checked or updated
        property: String,
        /// Underlying provider error
        #[source]
        source: anyhow::Error,
    },
}

impl SyncError {
    /// The provider operation that failed
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Lifecycle { operation, .. } | Self::Property { operation, .. } => operation,
        }
    }

    /// The property involved, if the failure was property-scoped
    pub fn property(&self) -> Option<&str> {
        match self {
            Self::Lifecycle { .. } => None,
            Self::Property { property, .. } => Some(property.as_str()),
        }
    }
}
