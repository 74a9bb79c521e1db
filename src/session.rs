//! The logged-in user, owned by the composition root.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::services::{AuthResult, AuthService, ServiceResult};

/// Outcome of the latest login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum LoginState {
    #[default]
    Idle,
    Loading,
    Success(AuthResult),
    Error(String),
}

/// Shared session handle. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct SessionContext {
    auth: AuthService,
    state: Arc<RwLock<LoginState>>,
}

impl SessionContext {
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth,
            state: Arc::new(RwLock::new(LoginState::Idle)),
        }
    }

    /// Attempts a login and records the outcome.
    ///
    /// Unknown credentials end in `Error("Invalid credentials")`. A store
    /// failure ends in `Error` with its message and is also returned.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> ServiceResult<LoginState> {
        self.set(LoginState::Loading).await;

        let next = match self.auth.login(username, password).await {
            Ok(Some(user)) => {
                info!(user_id = user.user_id, "Session opened");
                LoginState::Success(user)
            }
            Ok(None) => LoginState::Error("Invalid credentials".to_string()),
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.set(LoginState::Error(e.to_string())).await;
                return Err(e);
            }
        };

        self.set(next.clone()).await;
        Ok(next)
    }

    pub async fn logout(&self) {
        self.set(LoginState::Idle).await;
    }

    pub async fn state(&self) -> LoginState {
        self.state.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<AuthResult> {
        match &*self.state.read().await {
            LoginState::Success(user) => Some(user.clone()),
            _ => None,
        }
    }

    async fn set(&self, next: LoginState) {
        *self.state.write().await = next;
    }
}
