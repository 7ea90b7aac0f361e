// --- File: crates/inkwell_notify/src/service.rs ---
use std::env;
use std::sync::Arc;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;
use uuid::Uuid;

use crate::error::NotifyError;
use crate::ics::{render_confirmed_event, IcsEvent};
use inkwell_common::services::{BookingNotice, BoxFuture, NotificationResult, Notifier};
use inkwell_config::AppConfig;

/// Environment variable holding the SMTP password. Never kept in config
/// files.
const SMTP_PASSWORD_ENV: &str = "SMTP_PASSWORD";

/// SMTP implementation of the booking notifier.
///
/// Sends the studio owner a confirmation email with an iCalendar invite
/// attached. A fresh transport is built per message; confirmation volume
/// is far too low for pooling to matter.
pub struct SmtpNotifier {
    config: Arc<AppConfig>,
}

impl SmtpNotifier {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    fn build_transport(
        &self,
        smtp_host: &str,
        smtp_port: u16,
        smtp_username: &str,
    ) -> Result<SmtpTransport, NotifyError> {
        let password = env::var(SMTP_PASSWORD_ENV)
            .map_err(|_| NotifyError::InternalError(format!("{} not set", SMTP_PASSWORD_ENV)))?;
        let transport = SmtpTransport::relay(smtp_host)
            .map_err(|e| NotifyError::SendError(format!("SMTP relay error: {e}")))?
            .port(smtp_port)
            .credentials(Credentials::new(smtp_username.to_string(), password))
            .build();
        Ok(transport)
    }
}

impl Notifier for SmtpNotifier {
    type Error = NotifyError;

    fn notify_confirmed(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move {
            let notify_config = self
                .config
                .notification
                .as_ref()
                .ok_or(NotifyError::ConfigError)?;

            let event = IcsEvent {
                uid: format!("{}@inkwell", notice.booking_id),
                start: notice.start,
                end: notice.end,
                summary: format!("Tattoo session: {}", notice.client_name),
                description: notice.description.clone(),
                organizer_email: notify_config.organizer_email.clone(),
                attendee_email: notice.client_email.clone(),
            };
            let ics = render_confirmed_event(&event, chrono::Utc::now());

            let text_body = format!(
                "A booking deposit has been paid.\n\n\
                 Client: {}\n\
                 Email: {}\n\
                 Phone: {}\n\
                 Start: {}\n\
                 End: {}\n\n\
                 Design notes:\n{}\n",
                notice.client_name,
                notice.client_email,
                notice.client_phone,
                notice.start.format("%Y-%m-%d %H:%M UTC"),
                notice.end.format("%Y-%m-%d %H:%M UTC"),
                notice.description,
            );

            let from_header = format!(
                "{} <{}>",
                notify_config.from_name, notify_config.from_email
            );
            let calendar_type = ContentType::parse("text/calendar; method=PUBLISH")
                .map_err(|e| NotifyError::BuildError(format!("content type: {e}")))?;

            let email = Message::builder()
                .from(
                    from_header
                        .parse()
                        .map_err(|e| NotifyError::AddressError(format!("from: {e}")))?,
                )
                .to(notify_config
                    .organizer_email
                    .parse()
                    .map_err(|e| NotifyError::AddressError(format!("to: {e}")))?)
                .subject(format!(
                    "Booking confirmed: {} on {}",
                    notice.client_name,
                    notice.start.format("%Y-%m-%d"),
                ))
                .multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(text_body))
                        .singlepart(
                            Attachment::new("appointment.ics".to_string())
                                .body(ics, calendar_type),
                        ),
                )
                .map_err(|e| NotifyError::BuildError(e.to_string()))?;

            let mailer = self.build_transport(
                &notify_config.smtp_host,
                notify_config.smtp_port,
                &notify_config.smtp_username,
            )?;

            // lettre's SmtpTransport is blocking; keep it off the async
            // executor threads.
            tokio::task::spawn_blocking(move || {
                mailer
                    .send(&email)
                    .map_err(|e| NotifyError::SendError(e.to_string()))
            })
            .await
            .map_err(|e| NotifyError::InternalError(format!("email task failed: {e}")))??;

            info!(booking_id = %notice.booking_id, "confirmation email sent");

            Ok(NotificationResult {
                id: Uuid::new_v4().to_string(),
                status: "sent".to_string(),
            })
        })
    }
}
