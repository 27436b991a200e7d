//! Resource type schemas - ordered property tables plus lifecycle metadata
//!
//! A schema is pure metadata built once at startup: it declares the
//! identity key, the managed properties in order, the identity pattern,
//! and any implicit dependency facts for an external graph builder. It
//! performs no side effects of its own.

use crate::error::{SchemaError, ValidationError};
use crate::property::{PropertyDeclaration, PropertyKind};
use regex::Regex;

/// Identity values must be non-empty with no whitespace
const IDENTITY_PATTERN: &str = r"^\S+$";

/// A declarative dependency fact: this resource type implicitly requires
/// another named resource to be handled first.
///
/// The core only exposes the fact; ordering belongs to an external
/// dependency graph builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Type of the required resource (e.g., "service")
    pub resource_type: String,
    /// Name of the required resource (e.g., "rabbitmq-server")
    pub name: String,
}

/// Schema for one resource type
#[derive(Debug)]
pub struct ResourceTypeSchema {
    type_name: String,
    /// Declaration table in registration order; the namevar is first
    properties: Vec<PropertyDeclaration>,
    identity_pattern: Regex,
    requires: Vec<Requirement>,
}

impl ResourceTypeSchema {
    /// Create a schema with its identity property.
    ///
    /// Taking the namevar here keeps the exactly-one-namevar invariant
    /// structural; `register` rejects further namevar declarations.
    pub fn new(type_name: &str, namevar: &'static str) -> Self {
        Self {
            type_name: type_name.to_string(),
            properties: vec![PropertyDeclaration::namevar(namevar)],
            // Constant pattern, compiles by construction
            identity_pattern: Regex::new(IDENTITY_PATTERN).expect("identity pattern compiles"),
            requires: Vec::new(),
        }
    }

    /// Append a property declaration to the table
    pub fn register(&mut self, property: PropertyDeclaration) -> Result<(), SchemaError> {
        if property.kind == PropertyKind::Namevar {
            return Err(SchemaError::MultipleNamevars {
                schema: self.type_name.clone(),
            });
        }
        if self.properties.iter().any(|p| p.name == property.name) {
            return Err(SchemaError::DuplicateProperty {
                name: property.name.to_string(),
            });
        }
        self.properties.push(property);
        Ok(())
    }

    /// Declare an implicit dependency on another resource
    pub fn require(&mut self, resource_type: &str, name: &str) {
        let requirement = Requirement {
            resource_type: resource_type.to_string(),
            name: name.to_string(),
        };
        if !self.requires.contains(&requirement) {
            self.requires.push(requirement);
        }
    }

    /// Name of this resource type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// All declarations in registration order, namevar first
    pub fn properties(&self) -> &[PropertyDeclaration] {
        &self.properties
    }

    /// The identity declaration
    pub fn namevar(&self) -> &PropertyDeclaration {
        // Invariant: constructed with the namevar at index 0
        &self.properties[0]
    }

    /// Look up a declaration by name
    pub fn property(&self, name: &str) -> Option<&PropertyDeclaration> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Dependency facts for an external graph builder
    pub fn requirements(&self) -> &[Requirement] {
        &self.requires
    }

    /// Check an identity value against the schema's identity pattern
    pub fn validate_identity(&self, identity: &str) -> Result<(), ValidationError> {
        if self.identity_pattern.is_match(identity) {
            Ok(())
        } else {
            Err(ValidationError::InvalidIdentity {
                identity: identity.to_string(),
            })
        }
    }
}
