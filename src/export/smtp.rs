//! SMTP delivery through lettre

use crate::config::EmailConfig;
use crate::error::{RankerError, Result};
use crate::export::{EmailMessage, MailTransport};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::info;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// STARTTLS relay authenticated as the configured sender
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        config.validate()?;
        let password = config.password.clone().unwrap_or_default();

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| RankerError::Export(format!("Invalid SMTP relay {}: {}", config.smtp_host, e)))?
            .port(config.smtp_port)
            .credentials(Credentials::new(config.sender.clone(), password))
            .build();

        Ok(Self { transport })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|e| RankerError::Export(format!("Invalid email address '{}': {}", address, e)))
}

pub fn build_message(message: &EmailMessage) -> Result<Message> {
    Message::builder()
        .from(parse_mailbox(&message.from)?)
        .to(parse_mailbox(&message.to)?)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(message.html_body.clone())
        .map_err(|e| RankerError::Export(format!("Failed to build email: {}", e)))
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let email = build_message(message)?;
        self.transport
            .send(email)
            .await
            .map_err(|e| RankerError::Export(format!("SMTP delivery failed: {}", e)))?;
        info!("Results emailed to {}", message.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str) -> EmailMessage {
        EmailMessage {
            from: "hr@example.com".to_string(),
            to: to.to_string(),
            subject: "Resume Match Results".to_string(),
            html_body: "<table><tr><td>a.pdf</td></tr></table>".to_string(),
        }
    }

    #[test]
    fn test_build_html_message() {
        let email = build_message(&message("lead@example.com")).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("Subject: Resume Match Results"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("a.pdf"));
    }

    #[test]
    fn test_invalid_address() {
        let err = build_message(&message("not an address")).unwrap_err();
        assert!(matches!(err, RankerError::Export(_)));
    }

    #[test]
    fn test_mailer_requires_credentials() {
        let config = crate::config::Config::default().email;
        assert!(matches!(
            SmtpMailer::from_config(&config),
            Err(RankerError::Configuration(_))
        ));
    }
}
