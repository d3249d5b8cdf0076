//! Outbound mail transport seam.

pub mod memory;
pub mod smtp;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::notify::message::MessageType;

pub use memory::MemoryTransport;
pub use smtp::SmtpMailer;

/// Formatted address lists for one outbound email.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
}

impl Envelope {
    /// True when nobody would receive the message.
    pub fn is_empty(&self) -> bool {
        self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty()
    }
}

/// One fully assembled outbound email, ready for a transport.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub kind: MessageType,
    pub subject: String,
    pub body: String,
    pub from: String,
    pub envelope: Envelope,
    /// PDF attachment paths. MIME assembly is the transport's concern.
    pub attachments: Vec<PathBuf>,
}

/// Email transport collaborator. Fire-and-forget: a failed send surfaces as
/// an error to the caller and is never retried here.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError>;
}
