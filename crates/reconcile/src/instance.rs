//! Resource instances - validated, munged desired state
//!
//! An instance is built from raw user attributes in one fail-fast pass:
//! identity check, unknown-attribute check, then per-property validation,
//! munging, and defaulting. After `build` succeeds the desired map holds
//! only canonical values, so the engine never normalizes mid-sync.

use crate::error::ValidationError;
use crate::schema::{Requirement, ResourceTypeSchema};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Attribute name carrying the ensure lifecycle state
pub const ENSURE_ATTR: &str = "ensure";

/// Whether the resource should exist at all.
///
/// Evaluated before any other property; the engine maps `Present` to
/// `Provider::create` and `Absent` to `Provider::destroy` through its
/// lifecycle table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

impl FromStr for Ensure {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(ValidationError::InvalidEnsure {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Ensure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Absent => write!(f, "absent"),
        }
    }
}

/// One desired-state instance of a resource type
#[derive(Debug)]
pub struct ResourceInstance<'a> {
    schema: &'a ResourceTypeSchema,
    identity: String,
    ensure: Ensure,
    /// Post-munge, post-default desired values, keyed by property name.
    /// Properties with neither a user value nor a default are unmanaged
    /// and absent from this map.
    desired: BTreeMap<String, Value>,
}

impl<'a> ResourceInstance<'a> {
    /// Build an instance from user-declared attributes.
    ///
    /// The attribute map uses property names as keys; `ensure` is a
    /// reserved key parsed into the lifecycle state (default present).
    /// All validation happens here, before any provider interaction.
    pub fn build(
        schema: &'a ResourceTypeSchema,
        mut attrs: BTreeMap<String, Value>,
    ) -> Result<Self, ValidationError> {
        let ensure = match attrs.remove(ENSURE_ATTR) {
            Some(value) => Ensure::from_str(&value.canonical())?,
            None => Ensure::default(),
        };

        let namevar = schema.namevar().name;
        let identity = match attrs.remove(namevar) {
            Some(value) => value.canonical(),
            None => {
                return Err(ValidationError::MissingRequired {
                    name: namevar.to_string(),
                });
            }
        };
        schema.validate_identity(&identity)?;

        if let Some(unknown) = attrs.keys().find(|k| schema.property(k).is_none()) {
            return Err(ValidationError::UnknownAttribute {
                name: unknown.clone(),
            });
        }

        let mut desired = BTreeMap::new();
        for property in schema.properties() {
            if property.name == namevar {
                continue;
            }
            let value = match attrs.remove(property.name) {
                Some(value) => Some(property.accept(value)?),
                None => property.default.clone(),
            };
            match value {
                Some(value) => {
                    desired.insert(property.name.to_string(), value);
                }
                None if property.required && ensure == Ensure::Present => {
                    return Err(ValidationError::MissingRequired {
                        name: property.name.to_string(),
                    });
                }
                // No value and no default: property stays unmanaged
                None => {}
            }
        }

        Ok(Self {
            schema,
            identity,
            ensure,
            desired,
        })
    }

    /// The schema this instance was built against
    pub fn schema(&self) -> &ResourceTypeSchema {
        self.schema
    }

    /// The namevar value, immutable for the instance's lifetime
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Desired lifecycle state
    pub fn ensure(&self) -> Ensure {
        self.ensure
    }

    /// The full post-munge desired mapping (namevar and ensure excluded)
    pub fn desired(&self) -> &BTreeMap<String, Value> {
        &self.desired
    }

    /// Desired value for one property, if managed
    pub fn value(&self, property: &str) -> Option<&Value> {
        self.desired.get(property)
    }

    /// Dependency facts inherited from the schema
    pub fn requirements(&self) -> &[Requirement] {
        self.schema.requirements()
    }
}
