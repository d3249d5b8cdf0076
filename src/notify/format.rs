//! Recipient formatting and deduplication.
//!
//! Turns any `RecipientSpec` into concrete to/cc/bcc address lists, applies
//! the administrative CC policy, and drops duplicate addresses across fields
//! in the fixed order to → cc → bcc (first occurrence wins). Staff seen
//! along the way are captured for contact logging.

use tracing::debug;

use crate::config::NotifierConfig;
use crate::error::DispatchError;
use crate::model::{Recipient, RecipientSpec, Staff};
use crate::notify::message::MessageType;
use crate::transport::Envelope;

/// Formatting output: the envelope plus every staff member it reaches.
/// Explicit data instead of hidden mailer state, so callers decide when the
/// contact log gets written.
#[derive(Debug, Clone)]
pub struct FormattedRecipients {
    pub envelope: Envelope,
    /// Staff rendered into any field, each listed once, for audit logging.
    pub contacted_staff: Vec<Staff>,
}

/// Two addresses count as the same recipient when either contains the other,
/// case-insensitively. Deliberately loose so `"Jo <jo@x.com>"` and bare
/// `"jo@x.com"` collapse to one send; see the tests for the sharp edge this
/// tolerance carries.
fn addresses_match(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

/// Normalize a recipient spec into a deduplicated envelope.
///
/// Staff render as `"Full Name <email>"`; raw addresses pass through (blank
/// ones are skipped). Staff without an email cannot land anywhere and are
/// ignored — the classifier routes them to the PDF path before this runs.
/// Errors with `NoRecipients` when all three fields end up empty.
pub fn format_recipients(
    spec: RecipientSpec,
    kind: MessageType,
    subject: &str,
    config: &NotifierConfig,
) -> Result<FormattedRecipients, DispatchError> {
    let (to, mut cc, bcc) = spec.into_fields();

    // Administrators get copied on the special-email allow-list. The admin
    // list is deduplicated against itself before joining the global pass.
    if config.administrators_get_special_emails && kind.admins_copied() {
        let mut admins: Vec<&String> = Vec::new();
        for admin in &config.site_administrator_emails {
            if !admins.contains(&admin) {
                admins.push(admin);
            }
        }
        debug!(kind = %kind, admins = admins.len(), "Appending administrator CC");
        cc.extend(admins.into_iter().map(|a| Recipient::Address(a.clone())));
    }

    let mut accepted: Vec<String> = Vec::new();
    let mut contacted_staff: Vec<Staff> = Vec::new();
    let mut envelope = Envelope::default();

    for (recipients, field) in [
        (to, &mut envelope.to),
        (cc, &mut envelope.cc),
        (bcc, &mut envelope.bcc),
    ] {
        for recipient in recipients {
            let address = match recipient {
                Recipient::Staff(staff) => {
                    let Some(address) = staff.email_with_name() else {
                        continue;
                    };
                    // Recorded on encounter, even if the address is then
                    // dropped as a duplicate; one entry per staff member.
                    if !contacted_staff.iter().any(|s| s.id == staff.id) {
                        contacted_staff.push(staff);
                    }
                    address
                }
                Recipient::Address(raw) => {
                    let trimmed = raw.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    trimmed.to_string()
                }
            };

            if accepted.iter().any(|seen| addresses_match(seen, &address)) {
                continue;
            }
            accepted.push(address.clone());
            field.push(address);
        }
    }

    if envelope.is_empty() {
        return Err(DispatchError::NoRecipients {
            message_type: kind,
            subject: subject.to_string(),
        });
    }

    Ok(FormattedRecipients {
        envelope,
        contacted_staff,
    })
}
