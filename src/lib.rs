//! Roster Notify — notification dispatch core for event staffing.
//!
//! Administrators roster staff to events and notify them of changes. Staff
//! with an email address are emailed; staff without get a generated PDF,
//! bundled into attachment-limited batches and mailed to whoever handles
//! postage. Every staff contact is logged for audit.

pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod pdf;
pub mod transport;
