/*!
 * ID Types
 * Type-safe identifiers for catalog references and workflow rows
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Catalog References
// ============================================================================

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            #[inline]
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

catalog_id!(
    /// Authenticated user supplied by the identity provider
    ActorId
);
catalog_id!(
    /// Student in the enrollment catalog
    StudentId
);
catalog_id!(
    /// Guardian (parent or legal tutor) in the catalog
    GuardianId
);
catalog_id!(
    /// Withdrawal reason catalog entry
    ReasonId
);

// ============================================================================
// Workflow Rows
// ============================================================================

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identifier
            #[inline]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(
    /// Withdrawal request (individual or mass)
    RequestId
);
row_id!(
    /// Authorization decision row
    DecisionId
);
row_id!(
    /// Departure log row
    DepartureId
);
