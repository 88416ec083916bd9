//! Registration client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}
