//! Registration HTTP client.

use crate::error::RegistrationError;
use crate::types::*;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Default registration endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/register";

/// Client for the account registration endpoint.
#[derive(Clone)]
pub struct RegistrationClient {
    client: Client,
    endpoint: Url,
}

impl RegistrationClient {
    /// Create a new registration client posting to `endpoint`.
    ///
    /// With `timeout` unset a request waits for the server indefinitely.
    pub fn new(
        endpoint: impl AsRef<str>,
        timeout: Option<Duration>,
    ) -> Result<Self, RegistrationError> {
        let endpoint = Url::parse(endpoint.as_ref())
            .map_err(|e| RegistrationError::InvalidEndpoint(format!("{}: {}", endpoint.as_ref(), e)))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, endpoint })
    }

    /// Get the configured endpoint.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Build the multipart body for a draft.
    ///
    /// The four text parts are always present. The photo part is only
    /// added when a capture exists.
    pub fn build_form(draft: &RegistrationDraft) -> Result<Form, RegistrationError> {
        let mut form = Form::new();
        for field in DraftField::ALL {
            form = form.text(field.name(), draft.get(field).to_string());
        }

        if let Some(photo) = &draft.photo {
            let part = Part::bytes(photo.bytes().to_vec())
                .file_name(PHOTO_FILE_NAME)
                .mime_str(photo.mime_type())?;
            form = form.part("photo", part);
        }

        Ok(form)
    }

    /// Submit a draft.
    ///
    /// Issues exactly one POST. Any HTTP status is returned as a
    /// [`RegistrationResponse`]; only transport and body read failures
    /// are errors.
    #[instrument(skip(self, draft), fields(username = %draft.username, photo = draft.photo.is_some()))]
    pub async fn register(
        &self,
        draft: &RegistrationDraft,
    ) -> Result<RegistrationResponse, RegistrationError> {
        let form = Self::build_form(draft)?;

        debug!(endpoint = %self.endpoint, "Sending registration request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let message = response.text().await?;

        if status.is_success() {
            debug!(status = %status, "Registration accepted");
        } else {
            warn!(status = %status, body = %message, "Registration rejected");
        }

        Ok(RegistrationResponse {
            status: status.as_u16(),
            message,
        })
    }
}
