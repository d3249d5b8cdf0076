//! Recipient classification — who gets email, who gets a printed PDF.

use crate::model::{Recipient, Staff};

/// Result of partitioning a recipient list.
#[derive(Debug, Clone, Default)]
pub struct Classified {
    /// Raw addresses and staff with a usable email address.
    pub with_email: Vec<Recipient>,
    /// Staff with no email; they get a generated PDF instead.
    pub without_email: Vec<Staff>,
}

/// Partition recipients by contactability. Raw addresses are always treated
/// as emailable; only staff can end up on the PDF path. Pure, no side
/// effects.
pub fn classify(recipients: impl IntoIterator<Item = Recipient>) -> Classified {
    let mut classified = Classified::default();
    for recipient in recipients {
        match recipient {
            Recipient::Staff(staff) if !staff.has_email() => {
                classified.without_email.push(staff);
            }
            other => classified.with_email.push(other),
        }
    }
    classified
}
