//! SMTP transport via lettre.

use async_trait::async_trait;
use lettre::message::header::{ContentDisposition, ContentType};
use lettre::message::{Body, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::{MailTransport, OutboundEmail};
use crate::config::SmtpConfig;
use crate::error::TransportError;

/// Sends mail through an authenticated SMTP relay.
pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, TransportError> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| TransportError::Smtp(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self { mailer })
    }

    async fn build_message(&self, email: &OutboundEmail) -> Result<Message, TransportError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&email.from)?)
            .subject(email.subject.clone());
        for to in &email.envelope.to {
            builder = builder.to(parse_mailbox(to)?);
        }
        for cc in &email.envelope.cc {
            builder = builder.cc(parse_mailbox(cc)?);
        }
        for bcc in &email.envelope.bcc {
            builder = builder.bcc(parse_mailbox(bcc)?);
        }

        let text_part = SinglePart::builder()
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone());

        let message = if email.attachments.is_empty() {
            builder.singlepart(text_part)
        } else {
            let mut multipart = MultiPart::mixed().singlepart(text_part);
            for path in &email.attachments {
                let data =
                    tokio::fs::read(path)
                        .await
                        .map_err(|e| TransportError::Attachment {
                            path: path.display().to_string(),
                            reason: e.to_string(),
                        })?;
                let filename = path
                    .file_name()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "attachment.pdf".to_string());
                let part = SinglePart::builder()
                    .header(
                        ContentType::parse("application/pdf")
                            .map_err(|e| TransportError::Build(e.to_string()))?,
                    )
                    .header(ContentDisposition::attachment(&filename))
                    .body(Body::new(data));
                multipart = multipart.singlepart(part);
            }
            builder.multipart(multipart)
        }
        .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(message)
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        let message = self.build_message(email).await?;
        debug!(
            kind = %email.kind,
            to = email.envelope.to.len(),
            cc = email.envelope.cc.len(),
            bcc = email.envelope.bcc.len(),
            attachments = email.attachments.len(),
            "Sending email via SMTP"
        );
        self.mailer
            .send(message)
            .await
            .map_err(|e| TransportError::Smtp(e.to_string()))?;
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, TransportError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| TransportError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::message::MessageType;
    use crate::transport::Envelope;

    #[tokio::test]
    async fn builds_multipart_with_pdf_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("rostering_created_for_jbloggs.pdf");
        std::fs::write(&pdf_path, b"%PDF-1.4 test").unwrap();

        let mailer = SmtpMailer::new(&SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: "user".into(),
            password: "pass".into(),
        })
        .unwrap();

        let email = OutboundEmail {
            kind: MessageType::PostageDeliveryRequired,
            subject: "Roster - Postage".into(),
            body: "Print and mail the attached documents.".into(),
            from: "Roster <notifier@example.com>".into(),
            envelope: Envelope {
                to: vec!["Admin One <admin@example.com>".into()],
                ..Default::default()
            },
            attachments: vec![pdf_path],
        };

        let message = mailer.build_message(&email).await.unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("multipart/mixed"));
        assert!(rendered.contains("rostering_created_for_jbloggs.pdf"));
    }

    #[tokio::test]
    async fn rejects_unparseable_address() {
        let mailer = SmtpMailer::new(&SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: String::new(),
            password: String::new(),
        })
        .unwrap();

        let email = OutboundEmail {
            kind: MessageType::StaffEmail,
            subject: "s".into(),
            body: "b".into(),
            from: "not an address".into(),
            envelope: Envelope::default(),
            attachments: Vec::new(),
        };

        let err = mailer.build_message(&email).await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidAddress { .. }));
    }
}
