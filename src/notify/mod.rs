//! Distress notifications
//!
//! Fans a push notification out to everyone subscribed to the emergency
//! topic, or straight to a single device.
//!
//! ## Flex Point
//! Adding a new push backend requires:
//! 1. Create `src/notify/{backend_name}.rs` implementing `PushMessenger`
//! 2. Add a variant to `Messenger`, its `from_config` match and
//!    `available_messengers`

pub mod fcm;
pub mod log;

use crate::config::NotificationsConfig;
use crate::constants::notify::DEVICE_ALERT_TITLE;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{error, info};

/// Incoming distress request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
}

/// Reply sent back once the push service accepted the message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub success: bool,
}

/// Where a push message goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushTarget {
    /// Every device subscribed to a topic
    Topic(String),
    /// One device registration token
    Token(String),
}

/// A fully addressed push message
#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub target: PushTarget,
    pub title: String,
    pub body: String,
}

/// Trait for push messaging backends
pub trait PushMessenger: Send + Sync {
    /// Returns the backend name (e.g., "fcm", "log")
    fn name(&self) -> &'static str;

    /// Deliver a message, returning the service's message ID
    fn send(&self, message: &PushMessage) -> impl Future<Output = Result<String>> + Send;
}

/// Messenger selected by configuration
#[derive(Debug)]
pub enum Messenger {
    Fcm(fcm::FcmMessenger),
    Log(log::LogMessenger),
}

impl Messenger {
    /// Build the messenger named in the `[notifications]` config section
    ///
    /// FCM is built even without credentials; sends then fail instead of
    /// silently succeeding.
    pub fn from_config(config: &NotificationsConfig) -> Result<Self> {
        match config.backend.as_str() {
            "fcm" => Ok(Self::Fcm(fcm::FcmMessenger::new(
                &config.fcm_url,
                &config.project_id,
                &config.access_token,
            ))),
            "log" => Ok(Self::Log(log::LogMessenger::new())),
            other => Err(Error::Config(format!("Unknown notification backend: {}", other))),
        }
    }
}

/// Names accepted by `notifications.backend`
pub fn available_messengers() -> Vec<&'static str> {
    vec!["fcm", "log"]
}

impl PushMessenger for Messenger {
    fn name(&self) -> &'static str {
        match self {
            Self::Fcm(m) => m.name(),
            Self::Log(m) => m.name(),
        }
    }

    async fn send(&self, message: &PushMessage) -> Result<String> {
        match self {
            Self::Fcm(m) => m.send(message).await,
            Self::Log(m) => m.send(message).await,
        }
    }
}

/// Sends distress alerts through a messenger
#[derive(Debug)]
pub struct DistressDispatcher<M> {
    messenger: M,
    topic: String,
}

impl<M: PushMessenger> DistressDispatcher<M> {
    /// Create a dispatcher that broadcasts to `topic`
    pub fn new(messenger: M, topic: impl Into<String>) -> Self {
        Self {
            messenger,
            topic: topic.into(),
        }
    }

    /// The underlying messenger
    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    /// Topic alerts are broadcast to
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Broadcast a distress notification to the topic
    ///
    /// Failures are logged and returned as `Error::Notification`; nothing is
    /// retried.
    pub async fn dispatch(&self, request: NotificationRequest) -> Result<NotificationResponse> {
        let message = PushMessage {
            target: PushTarget::Topic(self.topic.clone()),
            title: request.title,
            body: request.body,
        };
        self.deliver(&message).await?;
        Ok(NotificationResponse { success: true })
    }

    /// Push an emergency alert straight to one device
    pub async fn dispatch_to_device(&self, token: &str, body: &str) -> Result<NotificationResponse> {
        if token.trim().is_empty() {
            return Err(Error::Notification("Device token must not be empty".to_string()));
        }

        let message = PushMessage {
            target: PushTarget::Token(token.to_string()),
            title: DEVICE_ALERT_TITLE.to_string(),
            body: body.to_string(),
        };
        self.deliver(&message).await?;
        Ok(NotificationResponse { success: true })
    }

    async fn deliver(&self, message: &PushMessage) -> Result<String> {
        match self.messenger.send(message).await {
            Ok(id) => {
                info!(message_id = %id, target = ?message.target, "Notification sent");
                Ok(id)
            }
            Err(e) => {
                error!("Error sending notification: {}", e);
                Err(match e {
                    Error::Notification(text) => Error::Notification(text),
                    other => Error::Notification(other.to_string()),
                })
            }
        }
    }
}
