//! Application state management

use std::sync::Arc;

use skillzone_core::{ClientConfig, Session, SessionManager};
use skillzone_net::{Error, Result, SkillzoneApi};
use tracing::{error, warn};

use crate::events::{EventBus, SyncEvent};

/// Shared handles every view model works through
pub struct AppState {
    api: Arc<dyn SkillzoneApi>,
    session: Arc<SessionManager>,
    events: EventBus,
    config: ClientConfig,
}

impl AppState {
    pub fn new(
        api: Arc<dyn SkillzoneApi>,
        session: Arc<SessionManager>,
        events: EventBus,
        config: ClientConfig,
    ) -> Self {
        Self {
            api,
            session,
            events,
            config,
        }
    }

    pub fn api(&self) -> &dyn SkillzoneApi {
        self.api.as_ref()
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Credential for an authenticated call
    pub fn require_session(&self) -> Result<Session> {
        self.session.get_session().ok_or_else(|| {
            self.events.emit(SyncEvent::SessionExpired);
            Error::NotAuthenticated
        })
    }

    /// Credential that carries the admin role
    pub fn require_admin(&self) -> Result<Session> {
        let session = self.require_session()?;
        if !session.is_admin() {
            return Err(Error::Forbidden("admin role required".to_string()));
        }
        Ok(session)
    }

    /// Expire the session when the server rejected the credential
    pub fn observe_failure(&self, err: &Error) {
        if matches!(err, Error::Remote { status: 401, .. }) {
            warn!("Credential rejected, clearing session");
            self.session.clear_session();
            self.events.emit(SyncEvent::SessionExpired);
        }
    }

    /// Reads fall back to `fallback` with a diagnostic instead of failing
    pub fn degrade_read<T>(&self, what: &str, result: Result<T>, fallback: T) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to fetch {}", what);
                self.observe_failure(&e);
                fallback
            }
        }
    }

    /// Mutations surface a notice and hand the error back to the caller
    pub fn report_mutation(&self, what: &str, err: Error) -> Error {
        error!(error = %err, "Failed to {}", what);
        self.observe_failure(&err);
        self.events
            .emit(SyncEvent::Notice(format!("Failed to {}: {}", what, err)));
        err
    }
}
