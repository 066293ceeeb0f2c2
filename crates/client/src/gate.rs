use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use cliplet_http::HttpClient;
use tokio::sync::oneshot;

use crate::client::ApiClient;
use crate::error::Error;

/// How abandoned login surfaces resolve: nobody waits forever.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// How the gate opens the external login/signup surface. The surface is
/// opaque; its only obligation is to eventually call
/// [`LoginGate::resolve`] with the outcome.
pub trait LoginSurface: Send + Sync {
    fn open(&self) -> Result<(), cliplet_http::Error>;
}

/// Opens the service's login page in the system browser.
pub struct BrowserSurface {
    url: String,
}

impl BrowserSurface {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl LoginSurface for BrowserSurface {
    fn open(&self) -> Result<(), cliplet_http::Error> {
        open::that(&self.url)?;
        Ok(())
    }
}

/// Async barrier that suspends a caller until a login/signup flow completes.
///
/// Single-slot: one pending gate at a time. A second caller is rejected
/// with [`Error::GateBusy`] instead of silently displacing the first, and
/// an abandoned surface resolves the waiter to `false` after the timeout
/// instead of suspending it forever.
pub struct LoginGate {
    pending: Mutex<Option<oneshot::Sender<bool>>>,
    timeout: Duration,
}

impl Default for LoginGate {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginGate {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            pending: Mutex::new(None),
            timeout,
        }
    }

    /// Returns `true` once a logged-in identity is resolvable: immediately
    /// when one already is, otherwise after the surface completes the flow.
    /// `false` means the user dismissed or abandoned the surface; the gated
    /// action should not run.
    pub async fn ensure_logged_in<C: HttpClient>(
        &self,
        api: &ApiClient<C>,
        surface: &dyn LoginSurface,
    ) -> Result<bool, Error> {
        if api.identity().await?.is_some() {
            return Ok(true);
        }

        let rx = {
            let mut slot = self.slot();
            if slot.is_some() {
                return Err(Error::GateBusy);
            }
            let (tx, rx) = oneshot::channel();
            *slot = Some(tx);
            rx
        };

        if let Err(e) = surface.open() {
            self.take();
            return Err(Error::Http(e));
        }

        tracing::debug!("waiting on login surface");
        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(success)) => Ok(success),
            // Sender dropped without a send: treat like a dismissal.
            Ok(Err(_)) => Ok(false),
            Err(_) => {
                tracing::debug!("login surface abandoned, releasing gate");
                self.take();
                Ok(false)
            }
        }
    }

    /// Completion signal from the surface. Returns whether a caller was
    /// actually waiting.
    pub fn resolve(&self, success: bool) -> bool {
        match self.take() {
            Some(tx) => tx.send(success).is_ok(),
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot().is_some()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<oneshot::Sender<bool>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take(&self) -> Option<oneshot::Sender<bool>> {
        self.slot().take()
    }
}
