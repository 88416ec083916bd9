//! Account registration form.
//!
//! Holds the registration draft and UI flags, drives an optional camera
//! capture, submits the draft once, and redirects to the login view after a
//! successful registration.

pub mod config;
pub mod error;
pub mod form;
pub mod navigation;
pub mod prompt;
pub mod state;

pub use config::Config;
pub use error::{FormError, FormResult};
pub use form::{RedirectSettings, RegisterForm, SubmitOutcome};
pub use navigation::{ChannelNavigator, Navigator, ScheduledRedirect, LOGIN_ROUTE, REDIRECT_DELAY};
pub use state::{FormPhase, FormState, GENERIC_FAILURE_MESSAGE};
