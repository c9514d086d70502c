//! Dry-run backend
//!
//! Logs messages instead of delivering them. Only used when selected with
//! `notifications.backend = "log"`, so development setups never reach a real
//! device.

use crate::error::Result;
use crate::notify::{PushMessage, PushMessenger};
use tracing::warn;
use uuid::Uuid;

/// Messenger that only logs
#[derive(Debug, Default)]
pub struct LogMessenger;

impl LogMessenger {
    /// Create a new dry-run messenger
    pub fn new() -> Self {
        Self
    }
}

impl PushMessenger for LogMessenger {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, message: &PushMessage) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        warn!(
            message_id = %id,
            target = ?message.target,
            title = %message.title,
            "Dry-run messenger; notification logged only: {}",
            message.body
        );
        Ok(id)
    }
}
