use chrono::NaiveDate;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use mw_core::config::EmailConfig;
use mw_core::{Error, Result};
use tracing::info;

use crate::digest::swedish_date;

pub fn subject_line(config: &EmailConfig, date: NaiveDate) -> String {
    format!("{} - {}", config.subject_prefix, swedish_date(date))
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Email(format!("missing {}", field)))
}

/// Builds the HTML digest message for the primary recipient.
pub fn build_message(config: &EmailConfig, html: &str, date: NaiveDate) -> Result<Message> {
    let smtp = &config.smtp;
    let from_email = required(&smtp.from_email, "email.smtp.from_email")?;
    let recipient = required(&config.primary_recipient, "email.primary_recipient")?;

    let from = Mailbox::new(
        Some(smtp.from_name.clone()),
        from_email
            .parse()
            .map_err(|e| Error::Email(format!("Invalid from address: {}", e)))?,
    );
    let to: Mailbox = recipient
        .parse()
        .map_err(|e| Error::Email(format!("Invalid to address: {}", e)))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject_line(config, date))
        .header(ContentType::TEXT_HTML)
        .body(html.to_string())
        .map_err(|e| Error::Email(format!("Failed to build email: {}", e)))
}

fn transport(config: &EmailConfig) -> Result<SmtpTransport> {
    let smtp = &config.smtp;
    let server = required(&smtp.server, "email.smtp.server")?;

    let builder = if smtp.use_tls {
        SmtpTransport::starttls_relay(server)
            .map_err(|e| Error::Email(format!("SMTP relay error: {}", e)))?
    } else {
        SmtpTransport::builder_dangerous(server)
    };
    let builder = builder.port(smtp.port);
    let builder = match (&smtp.username, &smtp.password) {
        (Some(user), Some(password)) => {
            builder.credentials(Credentials::new(user.clone(), password.clone()))
        }
        _ => builder,
    };
    Ok(builder.build())
}

/// Sends the digest over SMTP. Blocking; call it from `spawn_blocking`.
pub fn send_digest(config: &EmailConfig, html: &str, date: NaiveDate) -> Result<()> {
    if !config.enabled {
        return Err(Error::Email("email delivery is disabled".to_string()));
    }
    let message = build_message(config, html, date)?;
    let transport = transport(config)?;
    transport
        .send(&message)
        .map_err(|e| Error::Email(format!("SMTP send failed: {}", e)))?;
    info!(
        "Digest sent to {}",
        config.primary_recipient.as_deref().unwrap_or_default()
    );
    Ok(())
}
