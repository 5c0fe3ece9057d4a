/*!
 * Departure Log
 * What actually happened after a request was approved
 */

use crate::core::id::{ActorId, DepartureId, RequestId, StudentId};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};
use time::OffsetDateTime;

/// Actual departure (and later return) of the students of an approved request
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartureLog {
    pub id: DepartureId,
    pub request: RequestId,
    pub students: Vec<StudentId>,
    pub recorded_by: ActorId,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub departed_at: OffsetDateTime,
    #[serde_as(as = "Option<TimestampSeconds<i64>>")]
    #[serde(default)]
    pub returned_at: Option<OffsetDateTime>,
}

impl DepartureLog {
    #[inline]
    pub fn has_returned(&self) -> bool {
        self.returned_at.is_some()
    }
}
