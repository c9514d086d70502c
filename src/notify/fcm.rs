//! Firebase Cloud Messaging backend
//!
//! Uses the FCM HTTP v1 API.
//! API documentation: https://firebase.google.com/docs/reference/fcm/rest/v1/projects.messages/send
//!
//! Messages are POSTed to `{base}/projects/{project_id}/messages:send` and
//! addressed by `message.topic` or `message.token`. Authentication is an
//! OAuth2 access token for a service account with the
//! `firebase.messaging` scope, sent as `Authorization: Bearer <token>`.
//! Minting the token is left to the deployment (for example
//! `gcloud auth print-access-token`); it is read from config.

use crate::error::{Error, Result};
use crate::notify::{PushMessage, PushMessenger, PushTarget};
use serde::{Deserialize, Serialize};

/// FCM backend
#[derive(Debug, Clone)]
pub struct FcmMessenger {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    access_token: String,
}

/// v1 send request body
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
    notification: FcmNotification<'a>,
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

/// Successful send: `{"name": "projects/<id>/messages/<message id>"}`
#[derive(Debug, Deserialize)]
struct SendResponse {
    name: String,
}

/// Google API error envelope
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorStatus,
}

#[derive(Debug, Deserialize)]
struct ErrorStatus {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl FcmMessenger {
    /// Create a new FCM backend
    ///
    /// `base_url` is the API root, normally `https://fcm.googleapis.com/v1`.
    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            project_id: project_id.into(),
            access_token: access_token.into(),
        }
    }

    /// Send endpoint for the configured project
    pub fn endpoint(&self) -> String {
        format!(
            "{}/projects/{}/messages:send",
            self.base_url.trim_end_matches('/'),
            self.project_id
        )
    }

    fn check_credentials(&self) -> Result<()> {
        if self.project_id.trim().is_empty() || self.access_token.trim().is_empty() {
            return Err(Error::Notification(
                "FCM credentials not configured: set notifications.project_id and notifications.access_token"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Build the request body for a message
    fn build_request(message: &PushMessage) -> SendRequest<'_> {
        let (topic, token) = match &message.target {
            PushTarget::Topic(topic) => (Some(topic.as_str()), None),
            PushTarget::Token(token) => (None, Some(token.as_str())),
        };
        SendRequest {
            message: FcmMessage {
                topic,
                token,
                notification: FcmNotification {
                    title: &message.title,
                    body: &message.body,
                },
            },
        }
    }

    /// Error text for a failed send, preferring the service's own message
    fn error_text(status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(ErrorResponse { error }) if !error.message.is_empty() => {
                if error.status.is_empty() {
                    error.message
                } else {
                    format!("{}: {}", error.status, error.message)
                }
            }
            _ => format!("FCM returned status {}: {}", status, body.trim()),
        }
    }
}

impl PushMessenger for FcmMessenger {
    fn name(&self) -> &'static str {
        "fcm"
    }

    async fn send(&self, message: &PushMessage) -> Result<String> {
        self.check_credentials()?;
        let body = Self::build_request(message);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Notification(format!("FCM request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Notification(Self::error_text(status, &text)));
        }

        let data: SendResponse = response
            .json()
            .await
            .map_err(|e| Error::Notification(format!("Failed to parse FCM response: {}", e)))?;

        Ok(data.name)
    }
}
