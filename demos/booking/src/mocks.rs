//! In-memory doubles for the booking collaborators.

use crate::notifications::EmailService;
use mediator_core::{BoxError, async_trait};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// An email captured by [`RecordingEmailService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    /// Recipient
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Message text
    pub body: String,
}

#[derive(Error, Debug)]
#[error("{0}")]
struct DeliveryFailure(String);

/// Keeps every email instead of sending it, or fails every send.
#[derive(Debug, Default)]
pub struct RecordingEmailService {
    sent: Mutex<Vec<SentEmail>>,
    failure: Option<String>,
}

impl RecordingEmailService {
    /// A service that accepts every email
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A service that rejects every email with `message`
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// Emails accepted so far, oldest first
    #[must_use]
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), BoxError> {
        if let Some(message) = &self.failure {
            return Err(DeliveryFailure(message.clone()).into());
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentEmail {
                to: to.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
        Ok(())
    }
}
