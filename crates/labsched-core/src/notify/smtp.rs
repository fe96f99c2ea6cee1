//! SMTP delivery.
//!
//! Relay settings come from `[notify.smtp]` in the config file. The login
//! and password may instead be supplied through `LABSCHED_SMTP_USER` and
//! `LABSCHED_SMTP_PASSWORD`, which take precedence over the file.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::Transport as _;

use super::message::Message;
use super::transport::Transport;
use crate::error::{NotifyError, ValidationError};
use crate::storage::{NotifyConfig, SmtpConfig};

/// Environment variable overriding `notify.smtp.username`.
pub const SMTP_USER_ENV: &str = "LABSCHED_SMTP_USER";
/// Environment variable overriding `notify.smtp.password`.
pub const SMTP_PASSWORD_ENV: &str = "LABSCHED_SMTP_PASSWORD";

fn env_or(key: &str, fallback: Option<&str>) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| fallback.map(str::to_string))
}

fn mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|_| ValidationError::InvalidEmail(address.to_string()).into())
}

/// Sends each message through an SMTP relay.
pub struct SmtpTransport {
    mailer: lettre::SmtpTransport,
    sender: Mailbox,
    relay: String,
}

impl std::fmt::Debug for SmtpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpTransport")
            .field("sender", &self.sender.to_string())
            .field("relay", &self.relay)
            .finish_non_exhaustive()
    }
}

impl SmtpTransport {
    /// Build from the notify section, reading credentials from the
    /// environment first.
    ///
    /// The sender is `notify.sender`, falling back to the SMTP login.
    pub fn from_config(notify: &NotifyConfig) -> Result<Self, NotifyError> {
        let smtp = &notify.smtp;
        let username = env_or(SMTP_USER_ENV, smtp.username.as_deref());
        let password = env_or(SMTP_PASSWORD_ENV, smtp.password.as_deref());

        let credentials = match (username.clone(), password) {
            (Some(user), Some(pass)) => Some(Credentials::new(user, pass)),
            (Some(_), None) => {
                return Err(NotifyError::Setup(format!(
                    "no SMTP password; set notify.smtp.password or {SMTP_PASSWORD_ENV}"
                )))
            }
            _ => None,
        };
        let sender = notify.sender.clone().or(username).ok_or_else(|| {
            NotifyError::Setup(format!(
                "no sender address; set notify.sender or {SMTP_USER_ENV}"
            ))
        })?;

        Self::connect(smtp, &sender, credentials)
    }

    /// Build against an explicit relay. Nothing is sent until the first
    /// delivery.
    pub fn connect(
        smtp: &SmtpConfig,
        sender: &str,
        credentials: Option<Credentials>,
    ) -> Result<Self, NotifyError> {
        let sender = mailbox(sender)?;
        let builder = if smtp.starttls {
            lettre::SmtpTransport::starttls_relay(&smtp.host)
                .map_err(|e| NotifyError::Setup(e.to_string()))?
        } else {
            lettre::SmtpTransport::builder_dangerous(smtp.host.as_str())
        };
        let mut builder = builder.port(smtp.port);
        if let Some(credentials) = credentials {
            builder = builder.credentials(credentials);
        }

        Ok(Self {
            mailer: builder.build(),
            sender,
            relay: format!("{}:{}", smtp.host, smtp.port),
        })
    }

    /// Plain-text email for `message`; falls back to the transport's sender.
    pub fn compose(&self, message: &Message) -> Result<lettre::Message, NotifyError> {
        let from = match &message.from {
            Some(from) => mailbox(from)?,
            None => self.sender.clone(),
        };
        lettre::Message::builder()
            .from(from)
            .to(mailbox(&message.to)?)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| NotifyError::DeliveryFailed {
                recipient: message.to.clone(),
                message: e.to_string(),
            })
    }
}

impl Transport for SmtpTransport {
    fn name(&self) -> &str {
        "smtp"
    }

    fn deliver(&mut self, message: &Message) -> Result<(), NotifyError> {
        let email = self.compose(message)?;
        self.mailer
            .send(&email)
            .map_err(|e| NotifyError::DeliveryFailed {
                recipient: message.to.clone(),
                message: format!("{}: {e}", self.relay),
            })?;
        tracing::debug!(to = %message.to, relay = %self.relay, "message sent");
        Ok(())
    }
}
