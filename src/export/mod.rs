//! Delivery of ranked results by email

pub mod smtp;

use crate::error::Result;
use async_trait::async_trait;

pub use smtp::SmtpMailer;

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}
