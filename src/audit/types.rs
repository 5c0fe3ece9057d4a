/*!
 * Audit Types
 */

use crate::core::errors::Operation;
use crate::core::id::ActorId;
use crate::withdrawal::state::RequestState;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};
use time::OffsetDateTime;

/// One committed workflow effect
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AuditEntry {
    pub actor: ActorId,
    pub action: Operation,
    pub entity_type: String,
    pub entity_id: String,
    /// `None` for the entry that creates the entity
    pub before: Option<RequestState>,
    pub after: RequestState,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub recorded_at: OffsetDateTime,
}

impl AuditEntry {
    pub fn new(
        actor: ActorId,
        action: Operation,
        entity_type: impl Into<String>,
        entity_id: impl ToString,
        before: Option<RequestState>,
        after: RequestState,
        recorded_at: OffsetDateTime,
    ) -> Self {
        Self {
            actor,
            action,
            entity_type: entity_type.into(),
            entity_id: entity_id.to_string(),
            before,
            after,
            recorded_at,
        }
    }

    /// True if the entry moved the entity to a different state
    pub fn is_state_change(&self) -> bool {
        self.before != Some(self.after)
    }
}
