/*!
 * Catalog Types
 * Reference data the workflow looks up but never owns
 */

use crate::core::id::{GuardianId, ReasonId, StudentId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a withdrawal reason is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "leve")]
    Minor,
    #[serde(rename = "grave")]
    Serious,
    #[serde(rename = "muy_grave")]
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Minor => "leve",
            Severity::Serious => "grave",
            Severity::Critical => "muy_grave",
        };
        f.write_str(name)
    }
}

/// Catalog entry explaining why students leave early
///
/// Once a request references a reason only `active` may change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalReason {
    pub id: ReasonId,
    pub name: String,
    pub severity: Severity,
    pub active: bool,
}

impl WithdrawalReason {
    pub fn new(id: impl Into<ReasonId>, name: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            severity,
            active: true,
        }
    }
}

/// Minimal student record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub full_name: String,
}

/// Minimal guardian record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardian {
    pub id: GuardianId,
    pub full_name: String,
}
