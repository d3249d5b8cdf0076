//! Domain model — staff, events and recipient shapes.

pub mod event;
pub mod staff;

pub use event::{Event, EventState};
pub use staff::{Recipient, RecipientSpec, Staff};
