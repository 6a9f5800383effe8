//! Email notifications
//!
//! Services enqueue [`Notification`]s on an unbounded channel; a background
//! worker renders and sends them through a [`Mailer`]. Delivery is fire and
//! forget: failures are logged and the notification is dropped.

pub mod mailer;

pub use mailer::{LogMailer, Mailer, SmtpMailer};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::RegistrationStatus;

/// A rendered email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub enum Notification {
    /// Sent after a participant registers for an event
    RegistrationCreated {
        to: String,
        registration_id: String,
        status: RegistrationStatus,
        event_title: String,
        event_location: String,
        event_start_date: NaiveDate,
        event_start_time: NaiveTime,
        organizer_name: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
    /// Sent when staff create an organizer account
    OrganizerCredentials {
        to: String,
        first_name: String,
        password: String,
    },
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RegistrationCreated { .. } => "registration_created",
            Self::OrganizerCredentials { .. } => "organizer_credentials",
        }
    }

    pub fn render(&self) -> EmailMessage {
        match self {
            Self::RegistrationCreated {
                to,
                registration_id,
                status,
                event_title,
                event_location,
                event_start_date,
                event_start_time,
                organizer_name,
                created_at,
                updated_at,
            } => EmailMessage {
                to: to.clone(),
                subject: "Registration Details".to_string(),
                body: format!(
                    "Dear Participant,\n\n\
                     Thank you for registering for the event. Below are your registration details:\n\n\
                     Registration ID: {}\n\
                     Status: {}\n\n\
                     Event Information:\n\
                     - Title: {}\n\
                     - Location: {}\n\
                     - Start Date: {}\n\
                     - Start Time: {}\n\
                     - Organizer: {}\n\n\
                     Registration Timestamps:\n\
                     - Created At: {}\n\
                     - Updated At: {}\n\n\
                     We are looking forward to your participation!\n\n\
                     Best regards,\n\
                     Event Management Team",
                    registration_id,
                    status.as_str(),
                    event_title,
                    event_location,
                    event_start_date.format("%d.%m.%Y"),
                    event_start_time.format("%H:%M"),
                    organizer_name,
                    created_at.format("%d.%m.%Y %H:%M"),
                    updated_at.format("%d.%m.%Y %H:%M"),
                ),
            },
            Self::OrganizerCredentials {
                to,
                first_name,
                password,
            } => EmailMessage {
                to: to.clone(),
                subject: "Your Organizer Account Credentials".to_string(),
                body: format!(
                    "Dear {},\n\n\
                     Your organizer account has been created successfully. Below are your credentials:\n\n\
                     Email: {}\n\
                     Password: {}\n\n\
                     Please log in and change your password immediately for security purposes.\n\n\
                     Best regards,\n\
                     Event Management Team",
                    first_name, to, password,
                ),
            },
        }
    }
}

/// Producer side of the notification channel
#[derive(Clone)]
pub struct NotificationQueue {
    sender: mpsc::UnboundedSender<Notification>,
}

impl NotificationQueue {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Queue a notification. Never blocks and never fails the caller.
    pub fn enqueue(&self, notification: Notification) {
        let kind = notification.kind();
        if self.sender.send(notification).is_err() {
            warn!(kind, "Notification worker is gone; dropping notification");
        } else {
            debug!(kind, "Notification queued");
        }
    }
}

/// Consumes queued notifications until every sender is dropped
pub struct NotificationWorker {
    receiver: mpsc::UnboundedReceiver<Notification>,
    mailer: Arc<dyn Mailer>,
}

impl NotificationWorker {
    pub fn new(receiver: mpsc::UnboundedReceiver<Notification>, mailer: Arc<dyn Mailer>) -> Self {
        Self { receiver, mailer }
    }

    pub async fn run(mut self) {
        info!("Notification worker started");
        while let Some(notification) = self.receiver.recv().await {
            let message = notification.render();
            match self.mailer.send(&message).await {
                Ok(()) => info!(kind = notification.kind(), to = %message.to, "Email sent"),
                Err(e) => error!(
                    kind = notification.kind(),
                    to = %message.to,
                    error = %e,
                    "Failed to send email"
                ),
            }
        }
        info!("Notification worker stopped");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
