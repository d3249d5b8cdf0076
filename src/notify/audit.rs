//! Contact logging — the audit trail of who was sent what.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::error::AuditError;
use crate::model::{Event, Staff};
use crate::notify::message::MessageType;

/// One log entry: a staff member was sent a message, optionally about an
/// event. Created only for staff, never raw addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub message_type: MessageType,
    pub subject: String,
    pub staff_id: Uuid,
    pub event_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Audit store collaborator.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn record_contact(&self, record: &ContactRecord) -> Result<(), AuditError>;
}

/// Write one record per contacted staff member per associated event (or one
/// with no event). Runs after formatting and delivery; write failures are
/// reported at error level but never block the send — the message already
/// left, and an incomplete audit trail is a compliance problem to surface,
/// not a reason to fail the dispatch.
pub async fn record_contacts(
    store: &dyn AuditStore,
    message_type: MessageType,
    subject: &str,
    contacted_staff: &[Staff],
    events: &[&Event],
) {
    for staff in contacted_staff {
        let event_ids: Vec<Option<Uuid>> = if events.is_empty() {
            vec![None]
        } else {
            events.iter().map(|e| Some(e.id)).collect()
        };

        for event_id in event_ids {
            let record = ContactRecord {
                message_type,
                subject: subject.to_string(),
                staff_id: staff.id,
                event_id,
                created_at: Utc::now(),
            };
            if let Err(e) = store.record_contact(&record).await {
                error!(
                    staff = %staff.username,
                    message_type = %message_type,
                    error = %e,
                    "Failed to write contact record"
                );
            }
        }
    }
}

/// In-memory audit store for tests and dry runs.
#[derive(Default)]
pub struct MemoryAuditStore {
    records: Mutex<Vec<ContactRecord>>,
    fail: std::sync::atomic::AtomicBool,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ContactRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Make every subsequent write fail, for error-path tests.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn record_contact(&self, record: &ContactRecord) -> Result<(), AuditError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(AuditError::Write("memory audit store set to fail".into()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
