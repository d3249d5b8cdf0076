//! Dispatch coordination — email when possible, PDF when not.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::NotifierConfig;
use crate::error::DispatchError;
use crate::model::{Event, Recipient, RecipientSpec, Staff};
use crate::notify::audit::{AuditStore, record_contacts};
use crate::notify::batch::{chunk_paths, postage_recipient};
use crate::notify::classify::classify;
use crate::notify::format::format_recipients;
use crate::notify::message::Notification;
use crate::pdf::{PdfArtifact, PdfGenerator};
use crate::transport::{MailTransport, OutboundEmail};

/// Top-level notification dispatcher.
///
/// Owns the policy: recipients with email addresses get emailed (one BCC
/// send for static message types, one send each otherwise), staff without
/// get a generated PDF, and the PDFs are mailed to whoever handles postage
/// in attachment-limited batches.
pub struct Notifier {
    config: NotifierConfig,
    transport: Arc<dyn MailTransport>,
    pdf: Arc<dyn PdfGenerator>,
    audit: Arc<dyn AuditStore>,
}

impl Notifier {
    pub fn new(
        config: NotifierConfig,
        transport: Arc<dyn MailTransport>,
        pdf: Arc<dyn PdfGenerator>,
        audit: Arc<dyn AuditStore>,
    ) -> Self {
        Self {
            config,
            transport,
            pdf,
            audit,
        }
    }

    /// Send `notification` to every recipient, by email or PDF.
    ///
    /// A failed send aborts the remainder of this call and is not rolled
    /// back; recipients already contacted stay contacted. Callers decide
    /// whether to retry. Not safe to run concurrently for the same message
    /// type and recipient: the `<type>_for_<username>.pdf` naming scheme
    /// would collide.
    pub async fn dispatch(
        &self,
        notification: &Notification,
        recipients: Vec<Recipient>,
    ) -> Result<(), DispatchError> {
        let kind = notification.kind();
        let classified = classify(recipients);
        debug!(
            kind = %kind,
            with_email = classified.with_email.len(),
            without_email = classified.without_email.len(),
            "Dispatching notification"
        );

        if !classified.with_email.is_empty() {
            if kind.is_static() {
                // One send covers everyone: ourselves in `to`, the real
                // recipients hidden in `bcc`.
                let spec = RecipientSpec::Fielded {
                    to: vec![Recipient::Address(self.config.sender_with_name())],
                    cc: Vec::new(),
                    bcc: classified.with_email,
                };
                self.send_message(notification, spec, Vec::new()).await?;
            } else {
                for recipient in classified.with_email {
                    self.send_message(notification, RecipientSpec::from(recipient), Vec::new())
                        .await?;
                }
            }
        }

        if !classified.without_email.is_empty() {
            let mut artifacts = Vec::with_capacity(classified.without_email.len());
            for staff in &classified.without_email {
                artifacts.push(self.generate_pdf(notification, staff).await?);
            }
            self.deliver_pdf_batches(artifacts, notification.events().first().copied())
                .await?;
        }

        Ok(())
    }

    /// Digest path for mass approval: each staff member gets one message
    /// covering all their new rosterings instead of one email per event.
    /// Staff without email get one PDF each; the PDFs go out as a postage
    /// batch with no associated event.
    pub async fn dispatch_rostering_digest(
        &self,
        assignments: Vec<(Staff, Vec<(Event, String)>)>,
    ) -> Result<(), DispatchError> {
        let mut artifacts = Vec::new();
        for (staff, events_and_roles) in assignments {
            let notification = Notification::MultipleRosteringsCreated { events_and_roles };
            if staff.has_email() {
                self.send_message(
                    &notification,
                    RecipientSpec::from(Recipient::Staff(staff)),
                    Vec::new(),
                )
                .await?;
            } else {
                artifacts.push(self.generate_pdf(&notification, &staff).await?);
            }
        }

        if !artifacts.is_empty() {
            self.deliver_pdf_batches(artifacts, None).await?;
        }
        Ok(())
    }

    /// Mail the collected PDFs to whoever handles postage, in batches of at
    /// most the configured attachment limit. Every artifact is deleted
    /// afterwards whether or not delivery succeeded; a failed deletion is a
    /// warning only.
    pub async fn deliver_pdf_batches(
        &self,
        artifacts: Vec<PdfArtifact>,
        event: Option<&Event>,
    ) -> Result<(), DispatchError> {
        let paths: Vec<PathBuf> = artifacts.iter().map(|a| a.path().to_path_buf()).collect();
        let notification = Notification::PostageDeliveryRequired;

        let mut outcome = Ok(());
        for chunk in chunk_paths(&paths, self.config.attachment_limit) {
            let spec = postage_recipient(event, &self.config);
            if let Err(e) = self.send_message(&notification, spec, chunk).await {
                outcome = Err(e);
                break;
            }
        }

        for artifact in &artifacts {
            if let Err(e) = artifact.remove() {
                warn!(
                    path = %artifact.path().display(),
                    error = %e,
                    "Failed to delete PDF artifact after batching"
                );
            }
        }

        outcome
    }

    async fn generate_pdf(
        &self,
        notification: &Notification,
        staff: &Staff,
    ) -> Result<PdfArtifact, DispatchError> {
        let mut artifact = self.pdf.generate(notification, staff).await?;
        artifact.filename = format!(
            "{}_for_{}.pdf",
            notification.kind().as_str(),
            staff.username
        );
        artifact.persist()?;
        Ok(artifact)
    }

    /// Format, send, then log contacts. Formatting failures (including the
    /// empty-envelope check) abort before anything is sent.
    async fn send_message(
        &self,
        notification: &Notification,
        spec: RecipientSpec,
        attachments: Vec<PathBuf>,
    ) -> Result<(), DispatchError> {
        let kind = notification.kind();
        let subject = self.config.format_subject(&notification.subject());
        let formatted = format_recipients(spec, kind, &subject, &self.config)?;

        let email = OutboundEmail {
            kind,
            subject: subject.clone(),
            body: notification.body(),
            from: self.config.sender_with_name(),
            envelope: formatted.envelope,
            attachments,
        };
        self.transport.send(&email).await?;

        record_contacts(
            self.audit.as_ref(),
            kind,
            &subject,
            &formatted.contacted_staff,
            &notification.events(),
        )
        .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::error::PdfError;
    use crate::model::EventState;
    use crate::notify::audit::MemoryAuditStore;
    use crate::notify::message::MessageType;
    use crate::transport::MemoryTransport;

    /// Stub generator writing placeholder files into a temp directory.
    struct StubPdf {
        dir: PathBuf,
    }

    #[async_trait]
    impl PdfGenerator for StubPdf {
        async fn generate(
            &self,
            notification: &Notification,
            staff: &Staff,
        ) -> Result<PdfArtifact, PdfError> {
            let path = self
                .dir
                .join(format!("{}-{}.tmp", notification.kind().as_str(), staff.username));
            std::fs::write(&path, b"%PDF-1.4 stub").map_err(|e| PdfError::Generation {
                username: staff.username.clone(),
                reason: e.to_string(),
            })?;
            Ok(PdfArtifact::new(path))
        }
    }

    struct Harness {
        notifier: Notifier,
        transport: Arc<MemoryTransport>,
        audit: Arc<MemoryAuditStore>,
        _dir: tempfile::TempDir,
    }

    fn harness(config: NotifierConfig) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(MemoryTransport::new());
        let audit = Arc::new(MemoryAuditStore::new());
        let notifier = Notifier::new(
            config,
            Arc::clone(&transport) as Arc<dyn MailTransport>,
            Arc::new(StubPdf {
                dir: dir.path().to_path_buf(),
            }),
            Arc::clone(&audit) as Arc<dyn AuditStore>,
        );
        Harness {
            notifier,
            transport,
            audit,
            _dir: dir,
        }
    }

    fn config() -> NotifierConfig {
        NotifierConfig {
            site_name: "Roster".into(),
            sender_address: "notifier@example.com".into(),
            site_administrator_emails: vec!["admin@example.com".into()],
            ..Default::default()
        }
    }

    fn staff(username: &str, email: Option<&str>) -> Staff {
        Staff {
            id: Uuid::new_v4(),
            username: username.into(),
            full_name: format!("Name {username}"),
            email: email.map(String::from),
        }
    }

    fn working_event(organiser: Staff) -> Event {
        Event {
            id: Uuid::new_v4(),
            name: "Spring Fair".into(),
            state: EventState::Working,
            organiser,
            approver: None,
            starts_at: Utc::now(),
            ends_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn static_type_sends_once_with_bcc() {
        let h = harness(config());
        // Distinct addresses so dedup doesn't interfere with the count.
        let recipients: Vec<Recipient> = (0..3)
            .map(|i| {
                Recipient::Staff(staff(
                    &format!("user{i}"),
                    Some(&format!("user{i}@example.com")),
                ))
            })
            .collect();

        h.notifier
            .dispatch(
                &Notification::EmailToAllStaff {
                    email_subject: "Hello".into(),
                    email_body: "World".into(),
                },
                recipients,
            )
            .await
            .unwrap();

        let sent = h.transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].envelope.bcc.len(), 3);
        assert_eq!(sent[0].envelope.to, vec!["Roster <notifier@example.com>"]);
    }

    #[tokio::test]
    async fn personalized_type_sends_one_each() {
        let h = harness(config());
        let event = working_event(staff("organiser", Some("organiser@example.com")));
        let recipients: Vec<Recipient> = (0..3)
            .map(|i| {
                Recipient::Staff(staff(
                    &format!("user{i}"),
                    Some(&format!("user{i}@example.com")),
                ))
            })
            .collect();

        h.notifier
            .dispatch(
                &Notification::EventCancelled {
                    event,
                    role: "Marshal".into(),
                },
                recipients,
            )
            .await
            .unwrap();

        let sent = h.transport.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().all(|e| e.envelope.to.len() == 1));
        assert!(sent.iter().all(|e| e.kind == MessageType::EventCancelled));
    }

    #[tokio::test]
    async fn offline_staff_get_pdfs_mailed_for_postage() {
        let h = harness(config());
        let organiser = staff("organiser", Some("organiser@example.com"));
        let event = working_event(organiser.clone());

        h.notifier
            .dispatch(
                &Notification::EventCancelled {
                    event,
                    role: "Marshal".into(),
                },
                vec![
                    Recipient::Staff(staff("offline1", None)),
                    Recipient::Staff(staff("offline2", None)),
                ],
            )
            .await
            .unwrap();

        let sent = h.transport.sent();
        assert_eq!(sent.len(), 1);
        let postage = &sent[0];
        assert_eq!(postage.kind, MessageType::PostageDeliveryRequired);
        assert_eq!(postage.attachments.len(), 2);
        assert!(
            postage.attachments[0]
                .file_name()
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("event_cancelled_for_offline")
        );
        // Working event: postage goes to the organiser.
        assert_eq!(
            postage.envelope.to,
            vec!["Name organiser <organiser@example.com>"]
        );
        // Artifacts are deleted after batching.
        assert!(postage.attachments.iter().all(|p| !p.exists()));
    }

    #[tokio::test]
    async fn attachment_limit_splits_postage_batches() {
        let h = harness(NotifierConfig {
            attachment_limit: Some(2),
            ..config()
        });
        let event = working_event(staff("organiser", Some("organiser@example.com")));

        h.notifier
            .dispatch(
                &Notification::EventCancelled {
                    event,
                    role: "Marshal".into(),
                },
                (0..5)
                    .map(|i| Recipient::Staff(staff(&format!("offline{i}"), None)))
                    .collect(),
            )
            .await
            .unwrap();

        let sizes: Vec<usize> = h
            .transport
            .sent()
            .iter()
            .map(|e| e.attachments.len())
            .collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn artifacts_deleted_even_when_postage_send_fails() {
        let h = harness(config());
        h.transport.set_failing(true);
        let event = working_event(staff("organiser", Some("organiser@example.com")));

        let err = h
            .notifier
            .dispatch(
                &Notification::EventCancelled {
                    event,
                    role: "Marshal".into(),
                },
                vec![Recipient::Staff(staff("offline", None))],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Transport(_)));

        // The generated file is gone despite the failed send.
        let leftover: Vec<_> = std::fs::read_dir(h._dir.path())
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert!(leftover.is_empty());
    }

    #[tokio::test]
    async fn contacts_are_audited_per_event() {
        let h = harness(config());
        let event = working_event(staff("organiser", Some("organiser@example.com")));
        let rostered = staff("rostered", Some("rostered@example.com"));

        h.notifier
            .dispatch(
                &Notification::EventCancelled {
                    event: event.clone(),
                    role: "Marshal".into(),
                },
                vec![Recipient::Staff(rostered.clone())],
            )
            .await
            .unwrap();

        let records = h.audit.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].staff_id, rostered.id);
        assert_eq!(records[0].event_id, Some(event.id));
        assert_eq!(records[0].message_type, MessageType::EventCancelled);
    }

    #[tokio::test]
    async fn raw_addresses_are_never_audited() {
        let h = harness(config());
        h.notifier
            .dispatch(
                &Notification::StaffEmail {
                    email_subject: "Hi".into(),
                    email_body: "Body".into(),
                },
                vec![Recipient::from("raw@example.com")],
            )
            .await
            .unwrap();
        assert_eq!(h.transport.sent().len(), 1);
        assert!(h.audit.records().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let h = harness(config());
        h.transport.set_failing(true);
        let err = h
            .notifier
            .dispatch(
                &Notification::StaffEmail {
                    email_subject: "Hi".into(),
                    email_body: "Body".into(),
                },
                vec![Recipient::from("raw@example.com")],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Transport(_)));
    }

    #[tokio::test]
    async fn empty_recipient_list_is_a_noop() {
        // Nothing to classify, nothing to send; the no-recipients error is
        // about formatted envelopes, not empty dispatch calls.
        let h = harness(config());
        h.notifier
            .dispatch(
                &Notification::StaffEmail {
                    email_subject: "Hi".into(),
                    email_body: "Body".into(),
                },
                Vec::new(),
            )
            .await
            .unwrap();
        assert!(h.transport.sent().is_empty());
    }

    #[tokio::test]
    async fn digest_sends_one_email_per_staff_and_batches_the_rest() {
        let h = harness(config());
        let organiser = staff("organiser", Some("organiser@example.com"));
        let e1 = working_event(organiser.clone());
        let e2 = working_event(organiser);

        let online = staff("online", Some("online@example.com"));
        let offline = staff("offline", None);

        h.notifier
            .dispatch_rostering_digest(vec![
                (
                    online.clone(),
                    vec![(e1.clone(), "Marshal".into()), (e2.clone(), "First Aid".into())],
                ),
                (offline, vec![(e1.clone(), "Marshal".into())]),
            ])
            .await
            .unwrap();

        let sent = h.transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].kind, MessageType::MultipleRosteringsCreated);
        assert_eq!(sent[0].envelope.to.len(), 1);
        // Digest PDFs carry no event context: postage goes to the admins.
        assert_eq!(sent[1].kind, MessageType::PostageDeliveryRequired);
        assert_eq!(sent[1].envelope.to, vec!["admin@example.com"]);
        assert_eq!(sent[1].attachments.len(), 1);

        // The online staff member is audited once per event in the digest.
        let digest_records: Vec<_> = h
            .audit
            .records()
            .into_iter()
            .filter(|r| r.staff_id == online.id)
            .collect();
        assert_eq!(digest_records.len(), 2);
    }
}
