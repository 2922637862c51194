//! Authentication view model

use std::sync::Arc;

use skillzone_core::{Role, SignupForm};
use skillzone_net::{Error, Result};
use tracing::info;

use crate::events::SyncEvent;
use crate::mutation::MutationEngine;
use crate::state::AppState;

#[derive(Clone)]
pub struct AuthViewModel {
    state: Arc<AppState>,
    engine: MutationEngine,
}

impl AuthViewModel {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            engine: MutationEngine::new(state.clone()),
            state,
        }
    }

    /// Register a new account; the user signs in separately afterwards
    pub async fn signup(&self, form: &SignupForm) -> Result<()> {
        form.validate()
            .map_err(|e| self.state.report_mutation("sign up", e.into()))?;

        self.engine
            .perform("sign up", self.state.api().signup(form))
            .await?;
        info!(email = %form.email, "Account created");
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Role> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::Validation("email and password are required".to_string()));
        }

        match self.state.api().login(email.trim(), password).await {
            Ok(session) => Ok(self.start(session.credential())),
            Err(e) if e.is_unauthorized() => {
                self.state
                    .events()
                    .emit(SyncEvent::Notice("Invalid email or password".to_string()));
                Err(e)
            }
            Err(e) => Err(self.state.report_mutation("sign in", e)),
        }
    }

    /// Adopt a credential directly, e.g. the reserved admin one
    pub fn login_with_credential(&self, credential: &str) -> Result<Role> {
        if credential.trim().is_empty() {
            return Err(Error::Validation("credential is required".to_string()));
        }
        Ok(self.start(credential.trim()))
    }

    pub fn logout(&self) {
        self.state.session().clear_session();
        self.state.events().emit(SyncEvent::SessionEnded);
    }

    /// Role of the restored or current session
    pub fn role(&self) -> Option<Role> {
        self.state.session().role()
    }

    fn start(&self, credential: &str) -> Role {
        self.state.session().set_session(credential);
        let role = skillzone_core::derive_role(credential);
        self.state.events().emit(SyncEvent::SessionStarted(role));
        role
    }
}
