use config::{Config, File};
use lazy_static::lazy_static;
use serde::Deserialize;
use std::sync::RwLock;

use crate::properties::DEFAULT_VOICE;

/// Settings for the reference host binary. Bound values normally come from
/// the hosting application; when running standalone they are seeded from a
/// config file or environment instead.
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub subscription_key: String,
    pub region: String,
    pub language: String,
    pub voice: String,
    pub auto_speak: bool,
    pub synthesis_timeout_secs: u64, // Bound on one synthesis request
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            subscription_key: String::new(),
            region: "eastus".to_string(),
            language: "en-US".to_string(),
            voice: DEFAULT_VOICE.to_string(),
            auto_speak: false,
            synthesis_timeout_secs: 30,
        }
    }
}

lazy_static! {
    pub static ref SETTINGS: RwLock<Settings> =
        RwLock::new(Settings::new().expect("Failed to load settings"));
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        let builder = Config::builder()
            // Connect to defaults
            .set_default("subscription_key", "")?
            .set_default("region", "eastus")?
            .set_default("language", "en-US")?
            .set_default("voice", DEFAULT_VOICE)?
            .set_default("auto_speak", false)?
            .set_default("synthesis_timeout_secs", 30)?
            // Merge with local config file (if exists)
            .add_source(File::with_name("SpeechTrigger").required(false))
            .add_source(
                File::with_name(&format!(
                    "{}/.config/speech-trigger/SpeechTrigger",
                    std::env::var("HOME").unwrap_or_default()
                ))
                .required(false),
            )
            // Merge with environment variables (e.g. SPEECH_TRIGGER_REGION)
            .add_source(config::Environment::with_prefix("SPEECH_TRIGGER"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.synthesis_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "synthesis_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.region.is_empty() {
            return Err(config::ConfigError::Message(
                "region must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
