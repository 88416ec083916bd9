//! Navigation collaborator and the delayed post-registration redirect.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Route shown after a successful registration.
pub const LOGIN_ROUTE: &str = "/login";

/// Delay between the success popup and the redirect.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(2000);

/// Receives navigation requests from the form.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Navigator that forwards routes over a channel to whoever owns the view.
#[derive(Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: &str) {
        if self.tx.send(route.to_string()).is_err() {
            warn!("Navigation to {} dropped: no view listening", route);
        }
    }
}

/// A one-shot redirect that fires after a delay unless cancelled.
///
/// Dropping the handle cancels the redirect.
pub struct ScheduledRedirect {
    route: String,
    handle: JoinHandle<()>,
}

impl ScheduledRedirect {
    /// Spawn the timer. `on_fire` runs once with the route when it elapses.
    pub fn schedule<F>(delay: Duration, route: impl Into<String>, on_fire: F) -> Self
    where
        F: FnOnce(&str) + Send + 'static,
    {
        let route = route.into();
        let fire_route = route.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("Redirect timer elapsed, navigating to {}", fire_route);
            on_fire(&fire_route);
        });

        debug!("Redirect to {} scheduled in {:?}", route, delay);
        Self { route, handle }
    }

    /// Whether the redirect already ran or was cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the redirect if it has not fired yet.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ScheduledRedirect {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            self.handle.abort();
            debug!("Redirect to {} cancelled", self.route);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_default_redirect_constants() {
        assert_eq!(LOGIN_ROUTE, "/login");
        assert_eq!(REDIRECT_DELAY, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_channel_navigator_forwards_route() {
        let (navigator, mut routes) = ChannelNavigator::new();
        navigator.navigate("/login");
        assert_eq!(routes.recv().await.as_deref(), Some("/login"));
    }

    #[tokio::test]
    async fn test_channel_navigator_without_listener() {
        let (navigator, routes) = ChannelNavigator::new();
        drop(routes);
        navigator.navigate("/login");
    }

    #[tokio::test(start_paused = true)]
    async fn test_redirect_fires_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let redirect = ScheduledRedirect::schedule(REDIRECT_DELAY, LOGIN_ROUTE, move |route| {
            assert_eq!(route, "/login");
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(redirect.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_redirect_never_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let redirect = ScheduledRedirect::schedule(REDIRECT_DELAY, LOGIN_ROUTE, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(500)).await;
        redirect.cancel();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
