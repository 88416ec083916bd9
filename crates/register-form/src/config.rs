//! Configuration loaded from environment variables.

use crate::form::RedirectSettings;
use crate::navigation::{LOGIN_ROUTE, REDIRECT_DELAY};
use anyhow::{Context, Result};
use camera_capture::{Camera, ImageFileCamera, TestPatternCamera};
use registration_client::DEFAULT_ENDPOINT;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Registration endpoint configuration
    #[serde(default)]
    pub registration: RegistrationConfig,

    /// Form behaviour configuration
    #[serde(default)]
    pub form: FormConfig,

    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    /// Registration endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout. Unset waits for the server indefinitely.
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    /// Route requested after a successful registration
    #[serde(default = "default_redirect_route")]
    pub redirect_route: String,

    /// Delay before the redirect
    #[serde(default = "default_redirect_delay", with = "humantime_serde")]
    pub redirect_delay: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    /// Still image replayed as the camera stream. Unset uses a test pattern.
    #[serde(default)]
    pub image_path: Option<PathBuf>,

    /// Test pattern width
    #[serde(default = "default_width")]
    pub width: u32,

    /// Test pattern height
    #[serde(default = "default_height")]
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout: None,
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            redirect_route: default_redirect_route(),
            redirect_delay: default_redirect_delay(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            image_path: None,
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

fn default_redirect_route() -> String {
    LOGIN_ROUTE.into()
}

fn default_redirect_delay() -> Duration {
    REDIRECT_DELAY
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

fn default_log_level() -> String {
    "info".into()
}

impl FormConfig {
    pub fn redirect_settings(&self) -> RedirectSettings {
        RedirectSettings {
            route: self.redirect_route.clone(),
            delay: self.redirect_delay,
        }
    }
}

impl CameraConfig {
    /// Build the configured camera source.
    pub fn build_camera(&self) -> Box<dyn Camera> {
        match &self.image_path {
            Some(path) => Box::new(ImageFileCamera::new(path)),
            None => Box::new(TestPatternCamera::new(self.width, self.height)),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
