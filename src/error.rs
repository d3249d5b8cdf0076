//! Error types for the notification core.

use crate::notify::message::MessageType;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while coordinating a dispatch.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The formatted envelope had nobody in to, cc or bcc. A message to
    /// nobody is a configuration mistake, so the dispatch of that message
    /// aborts before any send.
    #[error("No recipients for {message_type} - {subject}")]
    NoRecipients {
        message_type: MessageType,
        subject: String,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Pdf(#[from] PdfError),
}

/// Errors surfaced by the mail transport. Never retried here; the caller
/// decides whether a failed dispatch is worth re-running.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP send failed: {0}")]
    Smtp(String),

    #[error("Failed to read attachment {path}: {reason}")]
    Attachment { path: String, reason: String },
}

/// PDF generation and artifact lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("Generation failed for {username}: {reason}")]
    Generation { username: String, reason: String },

    #[error("Failed to persist artifact {filename}: {source}")]
    Persist {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

/// Audit store write errors. Non-fatal to delivery, but reported loudly:
/// the contact log is a compliance record.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Failed to write contact record: {0}")]
    Write(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
