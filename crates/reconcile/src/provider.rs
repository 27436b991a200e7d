//! Provider trait - the seam between the engine and the managed system
//!
//! Implementations perform the actual query/create/destroy/update against
//! whatever system hosts the resources (a broker, a package manager, a
//! filesystem). The core never talks to the managed system except through
//! this trait, and never retries a failed call; retry policy belongs to
//! the surrounding orchestrator.

use crate::value::Value;
use anyhow::Result;
use std::collections::BTreeMap;

/// Capability set required of a managed-system backend.
///
/// Calls may block on I/O. No two concurrent sync passes may target the
/// same identity; callers are expected to hold per-identity exclusion.
pub trait Provider: Send + Sync {
    /// Whether a resource with this identity currently exists
    fn exists(&self, identity: &str) -> Result<bool>;

    /// Read the actual value of one non-ensure property
    fn read(&self, identity: &str, property: &str) -> Result<Value>;

    /// Create the resource with its full desired mapping.
    ///
    /// Creation is atomic for a sync pass: the engine expects all
    /// properties to be applied here and issues no follow-up updates.
    fn create(&self, identity: &str, desired: &BTreeMap<String, Value>) -> Result<()>;

    /// Remove the resource
    fn destroy(&self, identity: &str) -> Result<()>;

    /// Set one property to its desired value
    fn update(&self, identity: &str, property: &str, value: &Value) -> Result<()>;

    /// Verify a candidate secret against the live system.
    ///
    /// Used by secret-checked properties instead of `read` plus equality,
    /// since stored secrets cannot be assumed readable in comparable form.
    fn check_secret(&self, identity: &str, candidate: &str) -> Result<bool>;
}
