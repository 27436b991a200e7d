//! Property declarations - the typed rows of a resource schema
//!
//! Each property carries its own validation, normalization, defaulting,
//! and equivalence rules as plain function values, so a schema is a static
//! registry of records built once at startup rather than a runtime DSL.

use crate::error::ValidationError;
use crate::value::Value;

/// Validation rule: reject a malformed desired value with a message
pub type ValidateFn = fn(&Value) -> Result<(), String>;

/// Munge rule: normalize a desired value to canonical form
pub type MungeFn = fn(&Value) -> Value;

/// Custom equivalence rule over (actual, desired)
pub type InsyncFn = fn(&Value, &Value) -> bool;

/// Structural role of a property within its schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// The identity key; exactly one per schema, immutable once built
    Namevar,
    /// A single-valued property
    Scalar,
    /// A list-valued property
    OrderedList,
}

/// Equivalence rule deciding whether an actual value satisfies a desired one
#[derive(Debug, Clone, Copy)]
pub enum InsyncRule {
    /// Plain value equality (the default)
    Equality,
    /// Lists compare as sets; element order is irrelevant
    UnorderedList,
    /// Delegate to a live `Provider::check_secret` call instead of
    /// reading back a stored value. Secrets are never assumed readable
    /// in comparable form, so this rule is a query, not a comparison.
    SecretCheck,
    /// Caller-supplied predicate
    Custom(InsyncFn),
}

impl InsyncRule {
    /// Evaluate the rule for variants that compare values directly.
    ///
    /// `SecretCheck` has no pure comparison; the engine routes it through
    /// the provider and never calls this.
    pub fn compare(&self, actual: &Value, desired: &Value) -> bool {
        match self {
            Self::Equality | Self::SecretCheck => actual == desired,
            Self::UnorderedList => match (actual.as_list(), desired.as_list()) {
                (Some(a), Some(d)) => {
                    let mut a: Vec<&String> = a.iter().collect();
                    let mut d: Vec<&String> = d.iter().collect();
                    a.sort();
                    d.sort();
                    a == d
                }
                _ => actual == desired,
            },
            Self::Custom(f) => f(actual, desired),
        }
    }

    /// Whether this rule requires a live provider query
    pub fn needs_provider(&self) -> bool {
        matches!(self, Self::SecretCheck)
    }
}

/// Declaration of one managed property
#[derive(Debug, Clone)]
pub struct PropertyDeclaration {
    /// Property name, unique within its schema
    pub name: &'static str,
    /// Structural role
    pub kind: PropertyKind,
    /// Optional validation, applied to user values before munging
    pub validate: Option<ValidateFn>,
    /// Optional normalization, applied once at instance build time
    pub munge: Option<MungeFn>,
    /// Value supplied when the user specifies none
    pub default: Option<Value>,
    /// Equivalence rule for convergence checks
    pub insync: InsyncRule,
    /// Suppress literal values in change reports
    pub redact: bool,
    /// Must be supplied when the instance's ensure state is present
    pub required: bool,
}

impl PropertyDeclaration {
    fn new(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            validate: None,
            munge: None,
            default: None,
            insync: InsyncRule::Equality,
            redact: false,
            required: false,
        }
    }

    /// Declare the identity property
    pub fn namevar(name: &'static str) -> Self {
        Self::new(name, PropertyKind::Namevar)
    }

    /// Declare a single-valued property
    pub fn scalar(name: &'static str) -> Self {
        Self::new(name, PropertyKind::Scalar)
    }

    /// Declare a list-valued property
    pub fn list(name: &'static str) -> Self {
        Self::new(name, PropertyKind::OrderedList)
    }

    /// Attach a validation rule
    pub fn with_validate(mut self, f: ValidateFn) -> Self {
        self.validate = Some(f);
        self
    }

    /// Attach a munge rule
    pub fn with_munge(mut self, f: MungeFn) -> Self {
        self.munge = Some(f);
        self
    }

    /// Supply a default value
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Override the equivalence rule
    pub fn with_insync(mut self, rule: InsyncRule) -> Self {
        self.insync = rule;
        self
    }

    /// Mark the property's values as sensitive
    pub fn redacted(mut self) -> Self {
        self.redact = true;
        self
    }

    /// Require a value when ensure is present
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Validate then munge a user-supplied value.
    ///
    /// Runs exactly once per value at instance build time, so insync
    /// checks always see already-canonicalized desired values.
    pub(crate) fn accept(&self, value: Value) -> Result<Value, ValidationError> {
        if let Some(validate) = self.validate {
            validate(&value).map_err(|message| ValidationError::InvalidValue {
                property: self.name.to_string(),
                message,
            })?;
        }
        Ok(match self.munge {
            Some(munge) => munge(&value),
            None => value,
        })
    }
}
