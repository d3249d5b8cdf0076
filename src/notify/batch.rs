//! PDF batching and postage recipient resolution.
//!
//! When staff without email addresses accumulate PDFs, someone has to print
//! and mail them. These helpers decide how the artifact paths are grouped
//! into attachment-limited emails and who those emails go to.

use std::path::PathBuf;

use crate::config::NotifierConfig;
use crate::model::{Event, Recipient, RecipientSpec};

/// Split artifact paths into consecutive groups of at most `limit`, in the
/// original order. A limit of `None` or zero means one batch of everything.
pub fn chunk_paths(paths: &[PathBuf], limit: Option<u32>) -> Vec<Vec<PathBuf>> {
    if paths.is_empty() {
        return Vec::new();
    }
    match limit {
        Some(limit) if limit > 0 => paths
            .chunks(limit as usize)
            .map(|chunk| chunk.to_vec())
            .collect(),
        _ => vec![paths.to_vec()],
    }
}

/// Resolve who receives a "postage delivery required" notice. Deterministic
/// for a given event state, no side effects:
/// no event → site administrators; approved event → its approver; otherwise
/// the organiser; a resolved staff member without email → site
/// administrators again.
pub fn postage_recipient(event: Option<&Event>, config: &NotifierConfig) -> RecipientSpec {
    let admins = || {
        RecipientSpec::To(
            config
                .site_administrator_emails
                .iter()
                .cloned()
                .map(Recipient::Address)
                .collect(),
        )
    };

    let Some(event) = event else {
        return admins();
    };

    let resolved = if event.is_approved() {
        event.approver.as_ref()
    } else {
        Some(&event.organiser)
    };

    match resolved {
        Some(staff) if staff.has_email() => {
            RecipientSpec::To(vec![Recipient::Staff(staff.clone())])
        }
        _ => admins(),
    }
}
