//! Notification dispatch — classification, formatting, batching, auditing.

pub mod audit;
pub mod batch;
pub mod classify;
pub mod dispatch;
pub mod format;
pub mod message;

pub use audit::{AuditStore, ContactRecord, MemoryAuditStore};
pub use classify::{Classified, classify};
pub use dispatch::Notifier;
pub use format::{FormattedRecipients, format_recipients};
pub use message::{MessageType, Notification};
