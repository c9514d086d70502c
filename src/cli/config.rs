//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "geofence.radius_km")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (args.key.as_deref(), args.value.as_deref()) {
        (None, None) => show_all_config(&config),
        (Some(key), None) => match config.get(key) {
            Some(value) => println!("{}", value),
            None => {
                return Err(Error::Config(format!(
                    "Unknown config key: {} (available: {})",
                    key,
                    Config::available_keys().join(", ")
                )));
            }
        },
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            // Print the normalized value (e.g. "Nearest" is stored as "nearest")
            println!("{} = {}", key, config.get(key).unwrap_or_default());
        }
        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[geofence]");
    println!("radius_km = {}", config.geofence.radius_km);
    println!("match_policy = \"{}\"", config.geofence.match_policy);
    println!();

    println!("[store]");
    println!("backend = \"{}\"", config.store.backend);
    match &config.store.data_dir {
        Some(dir) => println!("data_dir = \"{}\"", dir.display()),
        None => println!("data_dir = \"\" # default data directory"),
    }
    println!();

    println!("[server]");
    println!("host = \"{}\"", config.server.host);
    println!("port = {}", config.server.port);
    println!();

    println!("[notifications]");
    println!("backend = \"{}\"", config.notifications.backend);
    println!("topic = \"{}\"", config.notifications.topic);
    println!("fcm_url = \"{}\"", config.notifications.fcm_url);
    println!("project_id = \"{}\"", config.notifications.project_id);
    if config.notifications.access_token.is_empty() {
        println!("access_token = \"\" # not configured, FCM sends will fail");
    } else {
        println!("access_token = \"***\" # configured");
    }
}
