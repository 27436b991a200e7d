//! Reconciliation engine - converges one instance against live state
//!
//! A sync pass is sequential and blocking: one existence query, then
//! either a terminal create/destroy or a per-property insync loop in
//! declaration order. The engine offers no retry and no rollback; a
//! provider failure aborts the pass and already-applied changes stand.

use crate::error::SyncError;
use crate::instance::{Ensure, ResourceInstance};
use crate::property::PropertyKind;
use crate::provider::Provider;
use crate::report::ChangeReport;
use log::{debug, trace};

/// Converge one instance, returning a report per applied change.
///
/// An empty list means the instance was already fully converged. Create
/// and destroy are terminal for the pass: creation applies the full
/// desired mapping at once, so no per-property sync follows it.
pub fn sync(
    instance: &ResourceInstance<'_>,
    provider: &dyn Provider,
) -> Result<Vec<ChangeReport>, SyncError> {
    let identity = instance.identity();
    let exists = provider
        .exists(identity)
        .map_err(|source| SyncError::Lifecycle {
            operation: "exists",
            identity: identity.to_string(),
            source,
        })?;
    debug!(
        "{} '{}': desired {}, currently {}",
        instance.schema().type_name(),
        identity,
        instance.ensure(),
        if exists { "present" } else { "absent" }
    );

    match (instance.ensure(), exists) {
        (Ensure::Absent, false) => Ok(Vec::new()),
        (Ensure::Absent, true) => {
            provider
                .destroy(identity)
                .map_err(|source| SyncError::Lifecycle {
                    operation: "destroy",
                    identity: identity.to_string(),
                    source,
                })?;
            debug!("destroyed '{identity}'");
            Ok(vec![ChangeReport::for_ensure(Ensure::Present, Ensure::Absent)])
        }
        (Ensure::Present, false) => {
            provider
                .create(identity, instance.desired())
                .map_err(|source| SyncError::Lifecycle {
                    operation: "create",
                    identity: identity.to_string(),
                    source,
                })?;
            debug!("created '{identity}' with full desired mapping");
            Ok(vec![ChangeReport::for_ensure(Ensure::Absent, Ensure::Present)])
        }
        (Ensure::Present, true) => sync_properties(instance, provider),
    }
}

/// Per-property convergence for an instance already in its desired
/// ensure state.
fn sync_properties(
    instance: &ResourceInstance<'_>,
    provider: &dyn Provider,
) -> Result<Vec<ChangeReport>, SyncError> {
    let identity = instance.identity();
    let mut reports = Vec::new();

    for property in instance.schema().properties() {
        if property.kind == PropertyKind::Namevar {
            continue;
        }
        let Some(desired) = instance.value(property.name) else {
            trace!("'{identity}': property {} unmanaged, skipping", property.name);
            continue;
        };

        // Secret-checked properties verify against the live system; the
        // stored value is never read back. Everything else reads the
        // actual value and compares per the property's rule.
        let (in_sync, actual) = if property.insync.needs_provider() {
            let candidate = desired.canonical();
            let ok = provider
                .check_secret(identity, &candidate)
                .map_err(|source| property_error("check_secret", identity, property.name, source))?;
            (ok, None)
        } else {
            let actual = provider
                .read(identity, property.name)
                .map_err(|source| property_error("read", identity, property.name, source))?;
            let ok = property.insync.compare(&actual, desired);
            (ok, Some(actual))
        };

        if in_sync {
            trace!("'{identity}': property {} in sync", property.name);
            continue;
        }

        provider
            .update(identity, property.name, desired)
            .map_err(|source| property_error("update", identity, property.name, source))?;
        let report = ChangeReport::for_property(property, actual.as_ref(), desired);
        debug!("'{identity}': {report}");
        reports.push(report);
    }

    Ok(reports)
}

fn property_error(
    operation: &'static str,
    identity: &str,
    property: &str,
    source: anyhow::Error,
) -> SyncError {
    SyncError::Property {
        operation,
        identity: identity.to_string(),
        property: property.to_string(),
        source,
    }
}
