//! # Reconcile
//!
//! A framework for declarative resource reconciliation.
//!
//! This crate provides the core abstractions for declaring typed resource
//! schemas, building validated desired-state instances, and converging a
//! managed system to match through a pluggable provider.
//!
//! ## Core Concepts
//!
//! - **ResourceTypeSchema**: an ordered table of property declarations with
//!   validation, munging, defaulting, equivalence, and redaction rules
//! - **ResourceInstance**: one validated, canonicalized desired state
//! - **Provider**: the external collaborator that queries and mutates the
//!   managed system
//! - **sync**: the engine pass computing the property-level diff and driving
//!   the ensure lifecycle
//!
//! ## Example
//!
//! ```ignore
//! use reconcile::{
//!     sync, InsyncRule, PropertyDeclaration, ResourceInstance,
//!     ResourceTypeSchema, Value,
//! };
//! use std::collections::BTreeMap;
//!
//! // Declare a resource type
//! let mut schema = ResourceTypeSchema::new("widget", "name");
//! schema.register(
//!     PropertyDeclaration::list("labels")
//!         .with_default(Value::List(Vec::new()))
//!         .with_insync(InsyncRule::UnorderedList),
//! )?;
//!
//! // Build a desired-state instance (validated and munged up front)
//! let mut attrs = BTreeMap::new();
//! attrs.insert("name".to_string(), Value::from("w1"));
//! attrs.insert("labels".to_string(), Value::from(vec!["a", "b"]));
//! let instance = ResourceInstance::build(&schema, attrs)?;
//!
//! // Converge against a provider implementation
//! let reports = sync(&instance, &provider)?;
//! for report in &reports {
//!     println!("{report}");
//! }
//! ```
//!
//! ## Provider Seam
//!
//! The engine never touches the managed system directly. Everything goes
//! through the [`Provider`] trait, so the same schema and engine serve any
//! backend that can report existence, read properties, and apply changes.
//! Secret-checked properties verify candidates against the live system via
//! [`Provider::check_secret`] rather than comparing stored values.

pub mod engine;
pub mod error;
pub mod instance;
pub mod property;
pub mod provider;
pub mod report;
pub mod schema;
pub mod value;

// Re-export main types at crate root
pub use engine::sync;
pub use error::{SchemaError, SyncError, ValidationError};
pub use instance::{Ensure, ResourceInstance, ENSURE_ATTR};
pub use property::{InsyncRule, PropertyDeclaration, PropertyKind};
pub use provider::Provider;
pub use report::{ChangeReport, SyncSummary, REDACTED_NEW, REDACTED_OLD};
pub use schema::{Requirement, ResourceTypeSchema};
pub use value::Value;
