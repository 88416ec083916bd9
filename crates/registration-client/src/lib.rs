//! Client for the account registration endpoint.
//!
//! Serialises a [`RegistrationDraft`] into a multipart body and posts it
//! once to the registration endpoint.

mod client;
mod error;
mod types;

pub use client::{RegistrationClient, DEFAULT_ENDPOINT};
pub use error::RegistrationError;
pub use types::*;
