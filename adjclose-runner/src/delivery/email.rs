//! Email delivery over authenticated STARTTLS SMTP.

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::{Delivery, DeliveryArtifact, DeliveryError, DeliveryReceipt};
use crate::config::EmailSettings;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub fn subject(artifact: &DeliveryArtifact) -> String {
    format!(
        "Adjusted Close Prices - {}",
        artifact.content_date.format("%Y-%m-%d")
    )
}

pub fn body(artifact: &DeliveryArtifact) -> String {
    format!(
        "Attached are the adjusted closing prices for {}.\n",
        artifact.content_date.format("%Y-%m-%d")
    )
}

fn mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse()
        .map_err(|e| DeliveryError::Message(format!("invalid address '{address}': {e}")))
}

/// Build the message: plain-text body plus the spreadsheet as an attachment.
pub fn compose_message(
    settings: &EmailSettings,
    artifact: &DeliveryArtifact,
    bytes: Vec<u8>,
) -> Result<Message, DeliveryError> {
    let mut builder = Message::builder()
        .from(mailbox(&settings.from)?)
        .subject(subject(artifact));
    for to in &settings.to {
        builder = builder.to(mailbox(to)?);
    }

    let content_type = ContentType::parse(XLSX_MIME)
        .map_err(|e| DeliveryError::Message(format!("bad content type: {e}")))?;
    let attachment = Attachment::new(artifact.file_name()?.to_string()).body(bytes, content_type);

    builder
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(body(artifact)))
                .singlepart(attachment),
        )
        .map_err(|e| DeliveryError::Message(e.to_string()))
}

/// Sends the artifact as one email per run.
pub struct EmailDelivery {
    settings: EmailSettings,
}

impl EmailDelivery {
    pub fn new(settings: EmailSettings) -> Self {
        Self { settings }
    }
}

impl Delivery for EmailDelivery {
    fn name(&self) -> &str {
        "email"
    }

    fn deliver(&self, artifact: &DeliveryArtifact) -> Result<DeliveryReceipt, DeliveryError> {
        let message = compose_message(&self.settings, artifact, artifact.read_bytes()?)?;

        let mailer = SmtpTransport::starttls_relay(&self.settings.relay)?
            .port(self.settings.port)
            .credentials(Credentials::new(
                self.settings.from.clone(),
                self.settings.password.clone(),
            ))
            .build();

        log::info!(
            "sending {} to {} via {}:{}",
            artifact.file_name()?,
            self.settings.to.join(", "),
            self.settings.relay,
            self.settings.port
        );
        mailer.send(&message)?;

        Ok(DeliveryReceipt {
            location: format!("email to {}", self.settings.to.join(", ")),
        })
    }
}
