//! Session store: current user identity and authentication status.
//!
//! The persisted credential token is the only durable state; the client owns
//! its custody, this store owns the state machine around it.

use crate::client::StorefrontApi;
use crate::errors::ApiError;
use crate::models::{LoginRequest, SignupRequest, User};

/// Authentication lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated(User),
}

/// Client-side session state synchronized against the auth endpoints.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: SessionState,
    error: Option<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    /// Last auth failure message, surfaced inline near the form.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Sign up and establish a session. Concurrent attempts are not
    /// de-duplicated; the last to resolve wins.
    pub async fn signup<C: StorefrontApi>(
        &mut self,
        api: &C,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let request = SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.state = SessionState::Authenticating;
        self.error = None;
        match api.signup(&request).await {
            Ok(payload) => {
                if let Some(token) = &payload.token {
                    api.remember_token(token);
                }
                self.state = SessionState::Authenticated(payload.user);
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Anonymous;
                self.error = Some(err.message().to_string());
                Err(err)
            }
        }
    }

    /// Log in and establish a session.
    pub async fn login<C: StorefrontApi>(
        &mut self,
        api: &C,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.state = SessionState::Authenticating;
        self.error = None;
        match api.login(&request).await {
            Ok(payload) => {
                if let Some(token) = &payload.token {
                    api.remember_token(token);
                }
                self.state = SessionState::Authenticated(payload.user);
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Anonymous;
                self.error = Some(err.message().to_string());
                Err(err)
            }
        }
    }

    /// On process start: if a credential is cached, resolve the current
    /// identity. An expired or invalid token is discarded and the session
    /// stays anonymous.
    pub async fn resume<C: StorefrontApi>(&mut self, api: &C) {
        if !api.has_token() {
            self.state = SessionState::Anonymous;
            return;
        }
        self.state = SessionState::Authenticating;
        match api.current_user().await {
            Ok(user) => {
                tracing::info!("Resumed session for {}", user.email);
                self.state = SessionState::Authenticated(user);
            }
            Err(err) => {
                tracing::info!("Cached credential rejected: {}", err);
                api.forget_token();
                self.state = SessionState::Anonymous;
            }
        }
    }

    /// End the session. The credential is discarded and the state returns to
    /// anonymous even when the remote call fails.
    pub async fn logout<C: StorefrontApi>(&mut self, api: &C) {
        self.state = SessionState::Authenticating;
        if let Err(err) = api.logout().await {
            tracing::warn!("Logout call failed, clearing session anyway: {}", err);
        }
        api.forget_token();
        self.state = SessionState::Anonymous;
        self.error = None;
    }

    /// Transition applied when any authenticated call reports that the
    /// credential is dead (the client has already discarded it).
    pub fn invalidate(&mut self) {
        self.state = SessionState::Anonymous;
    }
}
