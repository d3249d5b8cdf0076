//! Staff members and the recipient shapes the notifier accepts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A staff member. Email is optional — staff without one are contacted by
/// printed PDF instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
}

impl Staff {
    /// Whether this staff member can be reached by email at all.
    /// Whitespace-only addresses count as absent.
    pub fn has_email(&self) -> bool {
        self.email
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty())
    }

    /// Render as a display-name mailbox, e.g. `"Jo Bloggs <jo@example.com>"`.
    /// Returns `None` when there is no usable email.
    pub fn email_with_name(&self) -> Option<String> {
        let email = self.email.as_deref()?.trim();
        if email.is_empty() {
            return None;
        }
        Some(format!("{} <{}>", self.full_name, email))
    }
}

/// An addressee: a staff member, or a raw address that passes through
/// formatting untouched. Raw addresses are always considered emailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Recipient {
    Staff(Staff),
    Address(String),
}

impl From<Staff> for Recipient {
    fn from(staff: Staff) -> Self {
        Recipient::Staff(staff)
    }
}

impl From<&str> for Recipient {
    fn from(address: &str) -> Self {
        Recipient::Address(address.to_string())
    }
}

/// Who a message goes to. A bare list is interpreted as the `to` field;
/// the fielded form gives full to/cc/bcc control.
#[derive(Debug, Clone, PartialEq)]
pub enum RecipientSpec {
    To(Vec<Recipient>),
    Fielded {
        to: Vec<Recipient>,
        cc: Vec<Recipient>,
        bcc: Vec<Recipient>,
    },
}

impl RecipientSpec {
    /// Normalize into the fielded form.
    pub fn into_fields(self) -> (Vec<Recipient>, Vec<Recipient>, Vec<Recipient>) {
        match self {
            RecipientSpec::To(to) => (to, Vec::new(), Vec::new()),
            RecipientSpec::Fielded { to, cc, bcc } => (to, cc, bcc),
        }
    }
}

impl From<Recipient> for RecipientSpec {
    fn from(recipient: Recipient) -> Self {
        RecipientSpec::To(vec![recipient])
    }
}

impl From<Vec<Recipient>> for RecipientSpec {
    fn from(recipients: Vec<Recipient>) -> Self {
        RecipientSpec::To(recipients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff(email: Option<&str>) -> Staff {
        Staff {
            id: Uuid::new_v4(),
            username: "jbloggs".into(),
            full_name: "Jo Bloggs".into(),
            email: email.map(String::from),
        }
    }

    #[test]
    fn blank_email_counts_as_absent() {
        assert!(!staff(None).has_email());
        assert!(!staff(Some("")).has_email());
        assert!(!staff(Some("   ")).has_email());
        assert!(staff(Some("jo@example.com")).has_email());
    }

    #[test]
    fn email_with_name_renders_mailbox() {
        assert_eq!(
            staff(Some("jo@example.com")).email_with_name().as_deref(),
            Some("Jo Bloggs <jo@example.com>")
        );
        assert!(staff(None).email_with_name().is_none());
    }

    #[test]
    fn bare_list_normalizes_to_to_field() {
        let spec = RecipientSpec::from(vec![Recipient::from("a@x.com")]);
        let (to, cc, bcc) = spec.into_fields();
        assert_eq!(to.len(), 1);
        assert!(cc.is_empty() && bcc.is_empty());
    }
}
