//! Email transport seam
//!
//! [`Mailer`] is the only surface the dispatcher sees; production wires
//! [`SmtpMailer`] (lettre, async SMTP over rustls), deployments without
//! SMTP credentials get [`NoopMailer`].

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

/// A rendered outbound email
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailerError {
    /// Provider pushed back on volume; worth one retry after a backoff
    #[error("mail provider rate limit: {0}")]
    RateLimited(String),

    #[error("mail transport error: {0}")]
    Transport(String),
}

impl MailerError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, MailerError::RateLimited(_))
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingEmail) -> Result<(), MailerError>;
}

/// SMTP mailer over lettre's async transport
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        port: u16,
        username: String,
        password: String,
        from: &str,
    ) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            .port(port)
            .credentials(Credentials::new(username, password))
            .build();
        let from = from
            .parse::<Mailbox>()
            .map_err(|e| anyhow::anyhow!("invalid SMTP_FROM address '{from}': {e}"))?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingEmail) -> Result<(), MailerError> {
        let to = mail
            .to
            .parse::<Mailbox>()
            .map_err(|e| MailerError::Transport(format!("invalid recipient '{}': {e}", mail.to)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        match self.transport.send(message).await {
            Ok(_) => Ok(()),
            Err(e) => {
                let text = e.to_string();
                if e.is_transient() || looks_rate_limited(&text) {
                    Err(MailerError::RateLimited(text))
                } else {
                    Err(MailerError::Transport(text))
                }
            }
        }
    }
}

fn looks_rate_limited(error_text: &str) -> bool {
    let lower = error_text.to_lowercase();
    lower.contains("too many") || lower.contains("rate limit")
}

/// Mailer used when SMTP is not configured; logs instead of sending
#[derive(Debug, Default)]
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, mail: &OutgoingEmail) -> Result<(), MailerError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, "SMTP disabled, dropping email");
        Ok(())
    }
}
