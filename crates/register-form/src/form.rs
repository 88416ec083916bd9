//! The registration form component.

use crate::error::{FormError, FormResult};
use crate::navigation::{Navigator, ScheduledRedirect, LOGIN_ROUTE, REDIRECT_DELAY};
use crate::state::{lock, FormPhase, FormState, GENERIC_FAILURE_MESSAGE};
use camera_capture::{Camera, CameraSession};
use registration_client::{
    DraftField, Photo, RegistrationClient, RegistrationDraft, RegistrationResponse,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Where to go after a successful registration, and when.
#[derive(Debug, Clone)]
pub struct RedirectSettings {
    pub route: String,
    pub delay: Duration,
}

impl Default for RedirectSettings {
    fn default() -> Self {
        Self {
            route: LOGIN_ROUTE.into(),
            delay: REDIRECT_DELAY,
        }
    }
}

/// Result of a completed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 2xx response; the redirect is scheduled.
    Registered(RegistrationResponse),
    /// Non-success response; the server text is shown.
    Rejected(RegistrationResponse),
    /// The request failed before a response was read.
    Failed,
}

/// Registration form: draft fields, UI flags, camera and submission.
///
/// All operations take `&self`; the form can be shared behind an `Arc`
/// between the input loop and the view.
pub struct RegisterForm {
    client: RegistrationClient,
    navigator: Arc<dyn Navigator>,
    redirect: RedirectSettings,
    state: Arc<Mutex<FormState>>,
    camera: Mutex<Option<CameraSession>>,
    pending_redirect: Mutex<Option<ScheduledRedirect>>,
}

impl RegisterForm {
    /// Create an empty form.
    pub fn new(
        client: RegistrationClient,
        navigator: Arc<dyn Navigator>,
        redirect: RedirectSettings,
    ) -> Self {
        Self {
            client,
            navigator,
            redirect,
            state: Arc::new(Mutex::new(FormState::default())),
            camera: Mutex::new(None),
            pending_redirect: Mutex::new(None),
        }
    }

    /// Record an edit to a text field.
    pub fn set_field(&self, field: DraftField, value: impl Into<String>) {
        lock(&self.state).draft.set(field, value);
    }

    /// Record an edit addressed by input name (`first_name`, ...).
    pub fn set_field_by_name(&self, name: &str, value: impl Into<String>) -> FormResult<()> {
        let field =
            DraftField::from_name(name).ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        self.set_field(field, value);
        Ok(())
    }

    /// Start a camera stream for the live preview.
    ///
    /// Reopening replaces and releases any previous stream. Failures are
    /// logged and leave the camera flags cleared.
    pub fn open_camera(&self, camera: Box<dyn Camera>) -> FormResult<()> {
        self.ensure_open()?;

        let mut slot = lock(&self.camera);
        slot.take();

        match CameraSession::open(camera) {
            Ok(session) => {
                *slot = Some(session);
                let mut state = lock(&self.state);
                state.camera_active = true;
                state.show_take_photo = true;
                Ok(())
            }
            Err(e) => {
                error!("Error accessing camera: {}", e);
                let mut state = lock(&self.state);
                state.camera_active = false;
                state.show_take_photo = false;
                Err(e.into())
            }
        }
    }

    /// Freeze the current preview frame into the draft photo.
    ///
    /// Overwrites any earlier capture.
    pub fn capture_photo(&self) -> FormResult<()> {
        let png = {
            let mut slot = lock(&self.camera);
            let session = slot.as_mut().ok_or(FormError::CameraInactive)?;
            session.capture_photo()?
        };

        info!("Photo captured ({}x{})", png.width, png.height);
        lock(&self.state)
            .draft
            .set_photo(Photo::new(png.bytes, png.width, png.height));
        Ok(())
    }

    /// Stop the preview and release the camera.
    pub fn close_camera(&self) {
        if lock(&self.camera).take().is_some() {
            debug!("Camera preview closed");
        }
        let mut state = lock(&self.state);
        state.camera_active = false;
        state.show_take_photo = false;
    }

    /// Submit the draft.
    ///
    /// Only one submission may be in flight. `loading` is set for the
    /// duration of the request and cleared on every exit path, including
    /// when this future is dropped early.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> FormResult<SubmitOutcome> {
        let draft = self.begin_submission()?;
        let _loading = LoadingGuard { state: &self.state };

        let result = self.client.register(&draft).await;

        let outcome = {
            let mut state = lock(&self.state);
            let closed = state.phase == FormPhase::Closed;

            let outcome = match result {
                Ok(response) => {
                    state.message = response.message.clone();
                    if response.is_success() {
                        state.show_popup = true;
                        SubmitOutcome::Registered(response)
                    } else {
                        SubmitOutcome::Rejected(response)
                    }
                }
                Err(e) => {
                    error!("Registration request failed: {}", e);
                    state.message = GENERIC_FAILURE_MESSAGE.into();
                    SubmitOutcome::Failed
                }
            };

            if closed {
                debug!("Form closed while submitting; skipping redirect");
                return Err(FormError::Closed);
            }

            state.phase = match outcome {
                SubmitOutcome::Registered(_) => FormPhase::RedirectPending,
                _ => FormPhase::Idle,
            };
            outcome
        };

        if matches!(outcome, SubmitOutcome::Registered(_)) {
            self.schedule_redirect();
        }

        Ok(outcome)
    }

    /// Hide the success popup.
    pub fn dismiss_popup(&self) {
        lock(&self.state).show_popup = false;
    }

    /// Tear the form down: cancel a pending redirect and release the camera.
    pub fn close(&self) {
        {
            let mut state = lock(&self.state);
            if state.phase == FormPhase::Closed {
                return;
            }
            state.phase = FormPhase::Closed;
            state.camera_active = false;
            state.show_take_photo = false;
        }

        if let Some(redirect) = lock(&self.pending_redirect).take() {
            redirect.cancel();
        }
        lock(&self.camera).take();
        debug!("Registration form closed");
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> FormState {
        lock(&self.state).clone()
    }

    pub fn draft(&self) -> RegistrationDraft {
        lock(&self.state).draft.clone()
    }

    pub fn message(&self) -> String {
        lock(&self.state).message.clone()
    }

    /// Required text fields still empty or blank.
    pub fn missing_fields(&self) -> Vec<DraftField> {
        lock(&self.state).draft.missing_fields()
    }

    pub fn phase(&self) -> FormPhase {
        lock(&self.state).phase
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    pub fn is_camera_active(&self) -> bool {
        lock(&self.state).camera_active
    }

    fn ensure_open(&self) -> FormResult<()> {
        if lock(&self.state).phase == FormPhase::Closed {
            return Err(FormError::Closed);
        }
        Ok(())
    }

    /// Move to `Submitting` and take a copy of the draft.
    fn begin_submission(&self) -> FormResult<RegistrationDraft> {
        let mut state = lock(&self.state);
        match state.phase {
            FormPhase::Idle => {}
            FormPhase::Submitting => {
                warn!("Ignoring submit: a registration is already in progress");
                return Err(FormError::SubmissionInFlight);
            }
            FormPhase::RedirectPending | FormPhase::Navigated => {
                return Err(FormError::AlreadyRegistered);
            }
            FormPhase::Closed => return Err(FormError::Closed),
        }

        state.phase = FormPhase::Submitting;
        state.loading = true;
        Ok(state.draft.clone())
    }

    fn schedule_redirect(&self) {
        let state = Arc::clone(&self.state);
        let navigator = Arc::clone(&self.navigator);

        let redirect = ScheduledRedirect::schedule(
            self.redirect.delay,
            self.redirect.route.clone(),
            move |route| {
                {
                    let mut state = lock(&state);
                    if state.phase != FormPhase::RedirectPending {
                        return;
                    }
                    state.phase = FormPhase::Navigated;
                }
                info!("Redirecting to {}", route);
                navigator.navigate(route);
            },
        );

        *lock(&self.pending_redirect) = Some(redirect);
    }
}

impl Drop for RegisterForm {
    fn drop(&mut self) {
        self.close();
    }
}

/// Clears `loading` when a submission ends, however it ends.
struct LoadingGuard<'a> {
    state: &'a Mutex<FormState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        state.loading = false;
        if state.phase == FormPhase::Submitting {
            state.phase = FormPhase::Idle;
        }
    }
}
