//! Notify command handler
//!
//! Sends a distress notification to the configured topic, or to a single
//! device when a token is given.

use crate::cli::init_logging;
use crate::config::Config;
use crate::error::Result;
use crate::notify::{DistressDispatcher, Messenger, NotificationRequest, PushMessenger};
use clap::Args;

/// Notify command arguments
#[derive(Args)]
pub struct NotifyArgs {
    /// Notification title (ignored with --token)
    #[arg(long, short = 't', default_value = "Emergency Alert")]
    pub title: String,

    /// Notification body
    #[arg(long, short = 'b')]
    pub body: String,

    /// Send to one device registration token instead of the topic
    #[arg(long)]
    pub token: Option<String>,
}

/// Run the notify command
pub async fn run(args: NotifyArgs) -> Result<()> {
    init_logging("info");

    let config = Config::load()?;
    let messenger = Messenger::from_config(&config.notifications)?;
    let backend = messenger.name();
    let dispatcher = DistressDispatcher::new(messenger, config.notifications.topic.clone());

    match &args.token {
        Some(token) => {
            dispatcher.dispatch_to_device(token, &args.body).await?;
            println!("Sent to device via {}", backend);
        }
        None => {
            dispatcher
                .dispatch(NotificationRequest {
                    title: args.title,
                    body: args.body,
                })
                .await?;
            println!("Sent to topic '{}' via {}", dispatcher.topic(), backend);
        }
    }

    Ok(())
}
