//! Form state: the draft plus UI flags.

use registration_client::RegistrationDraft;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Message shown when the request never got a response.
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred";

/// Submission lifecycle of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Editable, no request in flight. A message from a failed attempt may be shown.
    Idle,
    /// A registration request is in flight.
    Submitting,
    /// Registration succeeded; the redirect timer is running.
    RedirectPending,
    /// The redirect fired.
    Navigated,
    /// The form was torn down.
    Closed,
}

/// Snapshot of everything the form renders.
#[derive(Debug, Clone)]
pub struct FormState {
    pub draft: RegistrationDraft,
    pub message: String,
    pub loading: bool,
    pub show_popup: bool,
    pub camera_active: bool,
    pub show_take_photo: bool,
    pub phase: FormPhase,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            draft: RegistrationDraft::new(),
            message: String::new(),
            loading: false,
            show_popup: false,
            camera_active: false,
            show_take_photo: false,
            phase: FormPhase::Idle,
        }
    }
}

/// Lock a mutex, recovering the data if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = FormState::default();
        assert_eq!(state.phase, FormPhase::Idle);
        assert!(!state.loading);
        assert!(!state.show_popup);
        assert!(!state.camera_active);
        assert!(state.message.is_empty());
        assert!(state.draft.photo.is_none());
    }

    #[test]
    fn test_lock_recovers_from_poison() {
        let mutex = std::sync::Arc::new(Mutex::new(1));
        let poisoner = mutex.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison");
        })
        .join();

        assert_eq!(*lock(&mutex), 1);
    }
}
