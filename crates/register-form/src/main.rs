//! Registration form - terminal entry point.

use anyhow::{Context, Result};
use register_form::{
    prompt::Prompter, ChannelNavigator, Config, RegisterForm, SubmitOutcome,
};
use registration_client::RegistrationClient;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.log.level);

    info!("Starting registration form");
    info!("Registration endpoint: {}", config.registration.endpoint);

    let client = RegistrationClient::new(&config.registration.endpoint, config.registration.timeout)
        .context("Failed to create registration client")?;

    let (navigator, mut routes) = ChannelNavigator::new();
    let form = RegisterForm::new(
        client,
        Arc::new(navigator),
        config.form.redirect_settings(),
    );

    let mut prompter = Prompter::stdio();
    prompter.say("Register").await?;
    prompter.collect_fields(&form).await?;

    if prompter.confirm("Open camera?").await? {
        // A failed camera leaves the form usable without a photo.
        if form.open_camera(config.camera.build_camera()).is_ok() {
            while prompter.confirm("Take photo?").await? {
                match form.capture_photo() {
                    Ok(()) => prompter.say("Photo captured").await?,
                    Err(e) => warn!("Photo capture failed: {}", e),
                }
            }
            form.close_camera();
        }
    }

    loop {
        prompter.say("Processing, please wait...").await?;

        let outcome = tokio::select! {
            outcome = form.submit() => outcome?,
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        };

        prompter.say(&form.message()).await?;

        match outcome {
            SubmitOutcome::Registered(_) => {
                tokio::select! {
                    Some(route) = routes.recv() => {
                        prompter.say(&format!("Redirecting to {}", route)).await?;
                    }
                    _ = signal::ctrl_c() => {
                        info!("Shutdown signal received");
                    }
                }
                break;
            }
            SubmitOutcome::Rejected(_) | SubmitOutcome::Failed => {
                if !prompter.confirm("Try again?").await? {
                    break;
                }
            }
        }
    }

    form.close();
    info!("Shutting down...");
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
