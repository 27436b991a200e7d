//! Change reporting with redaction
//!
//! Every successfully converged out-of-sync property yields one
//! [`ChangeReport`]. Reports for redacted properties carry fixed markers
//! instead of literal values, so sensitive data never reaches logs or
//! human-facing output.

use crate::instance::Ensure;
use crate::property::PropertyDeclaration;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker shown in place of a redacted current value
pub const REDACTED_OLD: &str = "[old value redacted]";
/// Marker shown in place of a redacted desired value
pub const REDACTED_NEW: &str = "[new value redacted]";

/// Displayed when the managed system reports no current value
const ABSENT_DISPLAY: &str = "(absent)";

/// A single applied change, with display-safe value renderings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReport {
    /// Property that was out of sync ("ensure" for lifecycle changes)
    pub property: String,
    /// Rendering of the value before the change
    pub from_display: String,
    /// Rendering of the value after the change
    pub to_display: String,
}

impl ChangeReport {
    /// Report for a converged non-ensure property.
    ///
    /// `actual` is `None` for secret-checked properties, whose current
    /// value is never read back.
    pub(crate) fn for_property(
        property: &PropertyDeclaration,
        actual: Option<&Value>,
        desired: &Value,
    ) -> Self {
        if property.redact {
            Self {
                property: property.name.to_string(),
                from_display: REDACTED_OLD.to_string(),
                to_display: REDACTED_NEW.to_string(),
            }
        } else {
            Self {
                property: property.name.to_string(),
                from_display: actual.map_or_else(|| ABSENT_DISPLAY.to_string(), Value::to_string),
                to_display: desired.to_string(),
            }
        }
    }

    /// Report for an ensure lifecycle transition
    pub(crate) fn for_ensure(from: Ensure, to: Ensure) -> Self {
        Self {
            property: crate::instance::ENSURE_ATTR.to_string(),
            from_display: from.to_string(),
            to_display: to.to_string(),
        }
    }

    /// Whether this report describes an ensure transition
    pub fn is_ensure(&self) -> bool {
        self.property == crate::instance::ENSURE_ATTR
    }
}

impl fmt::Display for ChangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} changed from {} to {}",
            self.property, self.from_display, self.to_display
        )
    }
}

/// Aggregate counts over the reports of one or more sync passes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    /// Resources created
    pub created: usize,
    /// Resources destroyed
    pub removed: usize,
    /// Individual properties updated in place
    pub updated: usize,
}

impl SyncSummary {
    /// Tally the reports from one sync pass
    pub fn from_reports(reports: &[ChangeReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            summary.add_report(report);
        }
        summary
    }

    /// Add one report to the tally
    pub fn add_report(&mut self, report: &ChangeReport) {
        if report.is_ensure() {
            match report.to_display.as_str() {
                "absent" => self.removed += 1,
                _ => self.created += 1,
            }
        } else {
            self.updated += 1;
        }
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: &Self) {
        self.created += other.created;
        self.removed += other.removed;
        self.updated += other.updated;
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.created + self.removed + self.updated
    }

    /// Whether any change was applied
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}
