/*!
 * Request Subjects
 * Who a request releases: one student with a guardian, or a list of students
 *
 * The lifecycle is generic over [`Subject`]; the subject only contributes its
 * creation-time invariants and its mapping into the store.
 */

use super::types::{StoredRequest, WithdrawalRequest};
use crate::catalog::Catalog;
use crate::core::errors::{ValidationIssue, WithdrawalResult};
use crate::core::id::{GuardianId, StudentId};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subject of a withdrawal request
pub trait Subject: Clone + fmt::Debug + Send + Sync + Sized + 'static {
    /// Entity name written to audit entries
    const ENTITY_TYPE: &'static str;

    /// Creation-time invariants beyond the shared ones
    fn validate(&self, catalog: &dyn Catalog) -> WithdrawalResult<()>;

    /// Students released by the request, in listing order
    fn students(&self) -> Vec<StudentId>;

    fn into_stored(request: WithdrawalRequest<Self>) -> StoredRequest;

    fn from_stored(stored: &StoredRequest) -> Option<&WithdrawalRequest<Self>>;
}

// ============================================================================
// Individual
// ============================================================================

/// Single student picked up by a guardian
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    pub student: StudentId,
    pub guardian: GuardianId,
}

impl Individual {
    pub fn new(student: impl Into<StudentId>, guardian: impl Into<GuardianId>) -> Self {
        Self {
            student: student.into(),
            guardian: guardian.into(),
        }
    }
}

impl Subject for Individual {
    const ENTITY_TYPE: &'static str = "withdrawal_request";

    fn validate(&self, catalog: &dyn Catalog) -> WithdrawalResult<()> {
        if !catalog.student_exists(self.student) {
            return Err(ValidationIssue::UnknownStudent {
                student: self.student,
            }
            .into());
        }
        if !catalog.guardian_exists(self.guardian) {
            return Err(ValidationIssue::UnknownGuardian {
                guardian: self.guardian,
            }
            .into());
        }
        Ok(())
    }

    fn students(&self) -> Vec<StudentId> {
        vec![self.student]
    }

    fn into_stored(request: WithdrawalRequest<Self>) -> StoredRequest {
        StoredRequest::Individual(request)
    }

    fn from_stored(stored: &StoredRequest) -> Option<&WithdrawalRequest<Self>> {
        match stored {
            StoredRequest::Individual(request) => Some(request),
            StoredRequest::Mass(_) => None,
        }
    }
}

// ============================================================================
// Mass
// ============================================================================

/// Reference to an externally stored evidence image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceRef(String);

impl EvidenceRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for EvidenceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One student line of a mass request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDetail {
    pub student: StudentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RequestDetail {
    pub fn new(student: impl Into<StudentId>) -> Self {
        Self {
            student: student.into(),
            note: None,
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Group of students leaving together (excursions, events)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mass {
    pub details: Vec<RequestDetail>,
    pub evidence: EvidenceRef,
}

impl Mass {
    pub fn new<I, T>(students: I, evidence: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<StudentId>,
    {
        Self {
            details: students.into_iter().map(RequestDetail::new).collect(),
            evidence: EvidenceRef::new(evidence),
        }
    }

    pub fn from_details(details: Vec<RequestDetail>, evidence: impl Into<String>) -> Self {
        Self {
            details,
            evidence: EvidenceRef::new(evidence),
        }
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }
}

impl Subject for Mass {
    const ENTITY_TYPE: &'static str = "mass_withdrawal_request";

    fn validate(&self, catalog: &dyn Catalog) -> WithdrawalResult<()> {
        if self.details.is_empty() {
            return Err(ValidationIssue::EmptyStudentList.into());
        }
        if self.evidence.is_blank() {
            return Err(ValidationIssue::MissingEvidence.into());
        }

        let mut seen = AHashSet::with_capacity(self.details.len());
        for detail in &self.details {
            if !seen.insert(detail.student) {
                return Err(ValidationIssue::DuplicateStudent {
                    student: detail.student,
                }
                .into());
            }
        }

        for detail in &self.details {
            if !catalog.student_exists(detail.student) {
                return Err(ValidationIssue::UnknownStudent {
                    student: detail.student,
                }
                .into());
            }
        }
        Ok(())
    }

    fn students(&self) -> Vec<StudentId> {
        self.details.iter().map(|d| d.student).collect()
    }

    fn into_stored(request: WithdrawalRequest<Self>) -> StoredRequest {
        StoredRequest::Mass(request)
    }

    fn from_stored(stored: &StoredRequest) -> Option<&WithdrawalRequest<Self>> {
        match stored {
            StoredRequest::Mass(request) => Some(request),
            StoredRequest::Individual(_) => None,
        }
    }
}
