//! Report delivery via SMTP.
//!
//! [`ReportMailer`] wraps the `lettre` async SMTP transport and sends one
//! message per request, addressed to every recipient, with the generated PDF
//! attached. If `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns
//! `None` and no mailer is constructed.

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "reports@haulage.local";

const DEFAULT_SUBJECT: &str = "Inventory Report";

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    /// Defaults to 587.
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set.
    ///
    /// | Variable        | Required | Default                  |
    /// |-----------------|----------|--------------------------|
    /// | `SMTP_HOST`     | yes      | --                       |
    /// | `SMTP_PORT`     | no       | `587`                    |
    /// | `SMTP_FROM`     | no       | `reports@haulage.local`  |
    /// | `SMTP_USER`     | no       | --                       |
    /// | `SMTP_PASSWORD` | no       | --                       |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// ReportEmail
// ---------------------------------------------------------------------------

/// One outgoing report message. Recipients are already validated.
#[derive(Debug)]
pub struct ReportEmail<'a> {
    pub recipients: &'a [String],
    pub subject: Option<&'a str>,
    pub message: Option<&'a str>,
    pub filename: &'a str,
    pub pdf: Vec<u8>,
}

impl ReportEmail<'_> {
    /// Assemble the MIME message: plain-text body plus the PDF attachment.
    pub fn build(self, from: &str) -> Result<Message, EmailError> {
        let mut builder = Message::builder()
            .from(from.parse::<Mailbox>()?)
            .subject(
                self.subject
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(DEFAULT_SUBJECT),
            );
        for recipient in self.recipients {
            builder = builder.to(recipient.parse::<Mailbox>()?);
        }

        let body = self
            .message
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Please find the attached report: {}", self.filename));

        let pdf_type = ContentType::parse("application/pdf")
            .map_err(|e| EmailError::Build(e.to_string()))?;

        builder
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body))
                    .singlepart(Attachment::new(self.filename.to_string()).body(self.pdf, pdf_type)),
            )
            .map_err(|e| EmailError::Build(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ReportMailer
// ---------------------------------------------------------------------------

/// Sends generated reports via SMTP.
pub struct ReportMailer {
    config: EmailConfig,
}

impl ReportMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the report to every recipient in a single message.
    ///
    /// Returns the number of recipients addressed.
    pub async fn send(&self, email: ReportEmail<'_>) -> Result<usize, EmailError> {
        let recipients = email.recipients.len();
        let filename = email.filename.to_string();
        let message = email.build(&self.config.from_address)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        transport_builder.build().send(message).await?;

        tracing::info!(recipients, filename = %filename, "Report e-mail sent");
        Ok(recipients)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
