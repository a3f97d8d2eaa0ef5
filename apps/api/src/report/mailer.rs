use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("could not build message: {0}")]
    Build(String),

    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// A report email ready for delivery.
#[derive(Debug, Clone)]
pub struct OutgoingReport {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
}

/// Delivers one message with one binary attachment.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, report: OutgoingReport) -> Result<(), DeliveryError>;
}

/// SMTP over implicit TLS (port 465) with username/password auth.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &Config) -> Result<Self, DeliveryError> {
        let from = parse_mailbox(&config.report_from)?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| DeliveryError::Transport(e.to_string()))?
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, report: OutgoingReport) -> Result<(), DeliveryError> {
        let message = build_message(self.from.clone(), report)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        debug!("SMTP accepted report: {:?}", response.code());
        Ok(())
    }
}

fn build_message(from: Mailbox, report: OutgoingReport) -> Result<Message, DeliveryError> {
    let to = parse_mailbox(&report.recipient)?;
    let content_type = ContentType::parse(XLSX_CONTENT_TYPE)
        .map_err(|e| DeliveryError::Build(e.to_string()))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(report.subject)
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::html(report.html_body))
                .singlepart(Attachment::new(report.attachment_name).body(report.attachment, content_type)),
        )
        .map_err(|e| DeliveryError::Build(e.to_string()))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address.parse::<Mailbox>().map_err(|e| DeliveryError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    fn outgoing(recipient: &str) -> OutgoingReport {
        OutgoingReport {
            recipient: recipient.to_string(),
            subject: "Candidate Ranking: Backend engineer".to_string(),
            html_body: "<h3>Candidate Ranking Report</h3>".to_string(),
            attachment_name: "Ranking.xlsx".to_string(),
            attachment: vec![0x50, 0x4b, 0x03, 0x04],
        }
    }

    fn sender() -> Mailbox {
        parse_mailbox("reports@example.com").unwrap()
    }

    #[test]
    fn test_message_carries_html_body_and_attachment() {
        let message = build_message(sender(), outgoing("hiring@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Candidate Ranking: Backend engineer"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("filename=\"Ranking.xlsx\""));
        assert!(raw.contains(XLSX_CONTENT_TYPE));
    }

    #[test]
    fn test_invalid_recipient_is_address_error() {
        let err = build_message(sender(), outgoing("not an address")).unwrap_err();
        assert!(matches!(err, DeliveryError::Address { .. }));
    }
}
