//! Message types and their payloads.
//!
//! `Notification` is the payload-carrying registry: every message the system
//! can send is a variant here, and the compiler guarantees each one has a
//! kind, subject and body. `MessageType` is the bare tag used for filenames,
//! logging, audit records and the static/admin-CC rule sets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Event;

/// Enumerated tag for every notification the system sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    AvailabilityChanged,
    EmailToAllStaff,
    EventCancelled,
    EventNameChanged,
    EventRosteringsContact,
    EventTimeChanged,
    MultipleRosteringsCreated,
    PasswordReset,
    PostageDeliveryRequired,
    RosteringCancelled,
    RosteringConfirmed,
    RosteringCreated,
    StaffAccountCreated,
    StaffEmail,
}

impl MessageType {
    /// Snake-case tag used in PDF filenames and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::AvailabilityChanged => "availability_changed",
            MessageType::EmailToAllStaff => "email_to_all_staff",
            MessageType::EventCancelled => "event_cancelled",
            MessageType::EventNameChanged => "event_name_changed",
            MessageType::EventRosteringsContact => "event_rosterings_contact",
            MessageType::EventTimeChanged => "event_time_changed",
            MessageType::MultipleRosteringsCreated => "multiple_rosterings_created",
            MessageType::PasswordReset => "password_reset",
            MessageType::PostageDeliveryRequired => "postage_delivery_required",
            MessageType::RosteringCancelled => "rostering_cancelled",
            MessageType::RosteringConfirmed => "rostering_confirmed",
            MessageType::RosteringCreated => "rostering_created",
            MessageType::StaffAccountCreated => "staff_account_created",
            MessageType::StaffEmail => "staff_email",
        }
    }

    /// Static messages have recipient-independent bodies, so one BCC send
    /// covers every emailable recipient.
    pub fn is_static(self) -> bool {
        matches!(
            self,
            MessageType::EmailToAllStaff | MessageType::EventRosteringsContact
        )
    }

    /// Message types administrators get copied on when the
    /// `administrators_get_special_emails` policy is enabled.
    pub fn admins_copied(self) -> bool {
        matches!(
            self,
            MessageType::EmailToAllStaff
                | MessageType::EventRosteringsContact
                | MessageType::PostageDeliveryRequired
                | MessageType::StaffEmail
        )
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification together with its payload. One variant per message type.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    AvailabilityChanged,
    EmailToAllStaff {
        email_subject: String,
        email_body: String,
    },
    EventCancelled {
        event: Event,
        role: String,
    },
    EventNameChanged {
        event: Event,
        previous_name: String,
        role: String,
    },
    EventRosteringsContact {
        event: Event,
        email_subject: String,
        email_body: String,
    },
    EventTimeChanged {
        event: Event,
        role: String,
        is_available: bool,
    },
    MultipleRosteringsCreated {
        events_and_roles: Vec<(Event, String)>,
    },
    PasswordReset {
        reset_token: String,
    },
    PostageDeliveryRequired,
    RosteringCancelled {
        event: Event,
        role: String,
        reason: String,
    },
    RosteringConfirmed {
        event: Event,
        role: String,
    },
    RosteringCreated {
        event: Event,
        role: String,
    },
    StaffAccountCreated,
    StaffEmail {
        email_subject: String,
        email_body: String,
    },
}

impl Notification {
    pub fn kind(&self) -> MessageType {
        match self {
            Notification::AvailabilityChanged => MessageType::AvailabilityChanged,
            Notification::EmailToAllStaff { .. } => MessageType::EmailToAllStaff,
            Notification::EventCancelled { .. } => MessageType::EventCancelled,
            Notification::EventNameChanged { .. } => MessageType::EventNameChanged,
            Notification::EventRosteringsContact { .. } => MessageType::EventRosteringsContact,
            Notification::EventTimeChanged { .. } => MessageType::EventTimeChanged,
            Notification::MultipleRosteringsCreated { .. } => MessageType::MultipleRosteringsCreated,
            Notification::PasswordReset { .. } => MessageType::PasswordReset,
            Notification::PostageDeliveryRequired => MessageType::PostageDeliveryRequired,
            Notification::RosteringCancelled { .. } => MessageType::RosteringCancelled,
            Notification::RosteringConfirmed { .. } => MessageType::RosteringConfirmed,
            Notification::RosteringCreated { .. } => MessageType::RosteringCreated,
            Notification::StaffAccountCreated => MessageType::StaffAccountCreated,
            Notification::StaffEmail { .. } => MessageType::StaffEmail,
        }
    }

    /// Subject line, without the site-name prefix (config adds that).
    pub fn subject(&self) -> String {
        match self {
            Notification::AvailabilityChanged => {
                "Your availability has been changed by an administrator".to_string()
            }
            Notification::EmailToAllStaff { .. } => {
                "An administrator has sent all staff members an email".to_string()
            }
            Notification::EventCancelled { event, .. } => {
                format!("The event '{}' has been cancelled", event.name)
            }
            Notification::EventNameChanged {
                event,
                previous_name,
                ..
            } => format!(
                "The event '{}' has been renamed '{}'",
                previous_name, event.name
            ),
            Notification::EventRosteringsContact { event, .. } => format!(
                "An administrator has contacted you regarding the event '{}'",
                event.name
            ),
            Notification::EventTimeChanged { event, .. } => format!(
                "The event '{}' has had its start or end times changed",
                event.name
            ),
            Notification::MultipleRosteringsCreated { .. } => {
                "You have been scheduled to work at multiple new events".to_string()
            }
            Notification::PasswordReset { .. } => {
                "Instructions to reset your password".to_string()
            }
            Notification::PostageDeliveryRequired => {
                "Document printing and mail to staff required".to_string()
            }
            Notification::RosteringCancelled { event, .. } => format!(
                "An administrator has cancelled your involvement at the event '{}'",
                event.name
            ),
            Notification::RosteringConfirmed { event, .. } => format!(
                "Confirmation of details for your new rostering at the event '{}'",
                event.name
            ),
            Notification::RosteringCreated { .. } => {
                "You have been scheduled to work at a new event".to_string()
            }
            Notification::StaffAccountCreated => {
                "An account has been created for you".to_string()
            }
            Notification::StaffEmail { .. } => {
                "An administrator has sent you a personalized email".to_string()
            }
        }
    }

    /// Plain-text body.
    pub fn body(&self) -> String {
        match self {
            Notification::AvailabilityChanged => {
                "An administrator has changed your availability. \
                 Please review your availability on the site."
                    .to_string()
            }
            Notification::EmailToAllStaff {
                email_subject,
                email_body,
            }
            | Notification::StaffEmail {
                email_subject,
                email_body,
            } => format!("{email_subject}\n\n{email_body}"),
            Notification::EventCancelled { event, role } => format!(
                "The event '{}' has been cancelled. You are no longer required \
                 to attend as {}.",
                event.name, role
            ),
            Notification::EventNameChanged {
                event,
                previous_name,
                role,
            } => format!(
                "The event '{}' you are rostered to as {} has been renamed '{}'.",
                previous_name, role, event.name
            ),
            Notification::EventRosteringsContact {
                event,
                email_subject,
                email_body,
            } => format!(
                "Regarding the event '{}':\n\n{email_subject}\n\n{email_body}",
                event.name
            ),
            Notification::EventTimeChanged {
                event,
                role,
                is_available,
            } => {
                let availability = if *is_available {
                    "Your availability still covers the new times."
                } else {
                    "You are no longer available for the new times; an \
                     administrator may contact you."
                };
                format!(
                    "The event '{}' you are rostered to as {} now runs from {} \
                     to {}. {}",
                    event.name, role, event.starts_at, event.ends_at, availability
                )
            }
            Notification::MultipleRosteringsCreated { events_and_roles } => {
                let mut body = String::from(
                    "You have been scheduled to work at the following events:\n",
                );
                for (event, role) in events_and_roles {
                    body.push_str(&format!(
                        "\n  - {} as {} ({} to {})",
                        event.name, role, event.starts_at, event.ends_at
                    ));
                }
                body
            }
            Notification::PasswordReset { reset_token } => format!(
                "A password reset was requested for your account. Use the \
                 token below to choose a new password:\n\n{reset_token}"
            ),
            Notification::PostageDeliveryRequired => {
                "The attached documents are for staff members without email \
                 addresses. Please print and mail them."
                    .to_string()
            }
            Notification::RosteringCancelled {
                event,
                role,
                reason,
            } => {
                let mut body = format!(
                    "An administrator has cancelled your involvement as {} at \
                     the event '{}'.",
                    role, event.name
                );
                if !reason.is_empty() {
                    body.push_str(&format!("\n\nReason: {reason}"));
                }
                body
            }
            Notification::RosteringConfirmed { event, role } => format!(
                "Your rostering as {} at the event '{}' is confirmed. The \
                 event runs from {} to {}.",
                role, event.name, event.starts_at, event.ends_at
            ),
            Notification::RosteringCreated { event, role } => format!(
                "You have been scheduled to work as {} at the event '{}', \
                 running from {} to {}.",
                role, event.name, event.starts_at, event.ends_at
            ),
            Notification::StaffAccountCreated => {
                "An account has been created for you. Contact an administrator \
                 for your login details."
                    .to_string()
            }
        }
    }

    /// Events this notification is about, for audit association.
    pub fn events(&self) -> Vec<&Event> {
        match self {
            Notification::EventCancelled { event, .. }
            | Notification::EventNameChanged { event, .. }
            | Notification::EventRosteringsContact { event, .. }
            | Notification::EventTimeChanged { event, .. }
            | Notification::RosteringCancelled { event, .. }
            | Notification::RosteringConfirmed { event, .. }
            | Notification::RosteringCreated { event, .. } => vec![event],
            Notification::MultipleRosteringsCreated { events_and_roles } => {
                events_and_roles.iter().map(|(event, _)| event).collect()
            }
            Notification::AvailabilityChanged
            | Notification::EmailToAllStaff { .. }
            | Notification::PasswordReset { .. }
            | Notification::PostageDeliveryRequired
            | Notification::StaffAccountCreated
            | Notification::StaffEmail { .. } => Vec::new(),
        }
    }
}
