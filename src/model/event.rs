//! Events and their lifecycle state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::staff::Staff;

/// Lifecycle state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventState {
    /// Created but not yet approved; staff can still be rostered.
    Working,
    /// Approved by an administrator; rostered staff have been notified.
    Approved,
    /// Cancelled; everyone involved gets a cancellation notice.
    Cancelled,
}

/// An event staff are rostered to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub state: EventState,
    pub organiser: Staff,
    pub approver: Option<Staff>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl Event {
    pub fn is_approved(&self) -> bool {
        self.state == EventState::Approved
    }
}
