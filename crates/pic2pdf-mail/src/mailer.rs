// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mail transports: the `Mailer` trait, an SMTP implementation backed by
// lettre, and an in-memory implementation for dry runs.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MimeAttachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use pic2pdf_core::error::{Pic2PdfError, Result};
use tracing::{debug, info, warn};

use crate::message::OutgoingMail;

const DEFAULT_PORT: u16 = 587;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Something that can deliver an [`OutgoingMail`].
///
/// Failures are reported as [`Pic2PdfError::Dispatch`] carrying the
/// transport's own message.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Sender address used when building envelopes.
    fn sender(&self) -> &str;

    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// TLS from the first byte (usually port 465).
    Implicit,
    /// Plain connection upgraded with STARTTLS.
    #[default]
    StartTls,
    /// No encryption. Local test relays only.
    None,
}

impl TlsMode {
    /// Interpret `EMAIL_SERVER_SECURE`.
    pub fn from_flag(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("true") => Self::Implicit,
            Some("none") => Self::None,
            _ => Self::StartTls,
        }
    }
}

/// SMTP relay settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailerConfig {
    pub host: String,
    pub port: u16,
    pub tls: TlsMode,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub timeout_secs: u64,
}

impl MailerConfig {
    /// Read the configuration from the process environment, loading a `.env`
    /// file first if one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("EMAIL_SERVER_HOST")
            .ok_or_else(|| Pic2PdfError::MissingConfig("EMAIL_SERVER_HOST".into()))?;

        let port = match get("EMAIL_SERVER_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                Pic2PdfError::MissingConfig(format!("EMAIL_SERVER_PORT is not a port number: {raw}"))
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("EMAIL_SERVER_TIMEOUT") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                Pic2PdfError::MissingConfig(format!("EMAIL_SERVER_TIMEOUT is not a number: {raw}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let username = get("EMAIL_SERVER_USER");
        let from = get("EMAIL_FROM")
            .or_else(|| username.clone())
            .ok_or_else(|| Pic2PdfError::MissingConfig("EMAIL_FROM or EMAIL_SERVER_USER".into()))?;

        Ok(Self {
            host,
            port,
            tls: TlsMode::from_flag(get("EMAIL_SERVER_SECURE").as_deref()),
            username,
            password: get("EMAIL_SERVER_PASSWORD"),
            from,
            timeout_secs,
        })
    }
}

/// Delivers mail through an SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl SmtpMailer {
    pub fn from_env() -> Result<Self> {
        Self::from_config(MailerConfig::from_env()?)
    }

    pub fn from_config(config: MailerConfig) -> Result<Self> {
        config.from.parse::<Mailbox>().map_err(|_| {
            Pic2PdfError::MissingConfig(format!("EMAIL_FROM is not a valid address: {}", config.from))
        })?;

        let relay_error = |e: lettre::transport::smtp::Error| {
            Pic2PdfError::MissingConfig(format!("cannot use SMTP host {}: {e}", config.host))
        };
        let mut builder = match config.tls {
            TlsMode::None => {
                warn!(host = %config.host, "SMTP connection is not encrypted");
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            }
            TlsMode::Implicit => {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host).map_err(relay_error)?
            }
            TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(relay_error)?,
        };

        builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)));

        if let (Some(username), Some(password)) = (config.username.clone(), config.password.clone()) {
            builder = builder.credentials(Credentials::new(username, password));
        }

        info!(host = %config.host, port = config.port, tls = ?config.tls, "SMTP mailer configured");
        Ok(Self {
            transport: Arc::new(builder.build()),
            from: config.from,
        })
    }

    fn build_message(&self, mail: &OutgoingMail) -> Result<Message> {
        let parse = |addr: &str| {
            addr.parse::<Mailbox>()
                .map_err(|_| Pic2PdfError::Dispatch(format!("invalid address: {addr}")))
        };

        let content = BASE64
            .decode(mail.attachment.content.as_bytes())
            .map_err(|e| Pic2PdfError::Dispatch(format!("attachment is not valid base64: {e}")))?;
        let content_type = ContentType::parse(&mail.attachment.content_type).map_err(|e| {
            Pic2PdfError::Dispatch(format!(
                "bad attachment content type {}: {e}",
                mail.attachment.content_type
            ))
        })?;
        let attachment = MimeAttachment::new(mail.attachment.filename.clone()).body(content, content_type);

        Message::builder()
            .from(parse(&mail.from)?)
            .to(parse(&mail.to)?)
            .subject(mail.subject.clone())
            .multipart(
                MultiPart::mixed()
                    .multipart(MultiPart::alternative_plain_html(
                        mail.text.clone(),
                        mail.html.clone(),
                    ))
                    .singlepart(attachment),
            )
            .map_err(|e| Pic2PdfError::Dispatch(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn sender(&self) -> &str {
        &self.from
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let message = self.build_message(mail)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| Pic2PdfError::Dispatch(e.to_string()))?;
        debug!(code = %response.code(), "SMTP relay accepted message");
        Ok(())
    }
}

/// Keeps every message in memory instead of sending it.
///
/// Optionally fails every send with a fixed reason.
#[derive(Debug, Clone)]
pub struct MemoryMailer {
    from: String,
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
    failure: Option<String>,
}

impl MemoryMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            sent: Arc::new(Mutex::new(Vec::new())),
            failure: None,
        }
    }

    /// A mailer whose every send fails with `reason`.
    pub fn failing(from: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::new(from)
        }
    }

    /// Messages accepted so far, oldest first.
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    fn sender(&self) -> &str {
        &self.from
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        if let Some(reason) = &self.failure {
            return Err(Pic2PdfError::Dispatch(reason.clone()));
        }
        self.sent
            .lock()
            .map_err(|_| Pic2PdfError::Dispatch("memory mailer lock poisoned".into()))?
            .push(mail.clone());
        Ok(())
    }
}
