//! Authentication state machine
//!
//! `Unknown → Checking → {Authenticated, Anonymous}`. Login re-enters
//! `Checking`, logout goes straight to `Anonymous`.

use marquee_model::UserProfile;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    /// Nothing has been checked yet
    #[default]
    Unknown,

    /// A stored token is being validated against the service
    Checking,

    /// The stored token resolved to a user
    Authenticated { user: UserProfile },

    /// No usable session
    Anonymous,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }

    /// Whether bootstrap has reached a resting state.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            AuthState::Authenticated { .. } | AuthState::Anonymous
        )
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            AuthState::Authenticated { user } => Some(user),
            _ => None,
        }
    }
}

/// Shared authentication state backed by a watch channel
#[derive(Clone, Debug)]
pub struct AuthStateStore {
    sender: Arc<watch::Sender<AuthState>>,
    receiver: watch::Receiver<AuthState>,
}

impl AuthStateStore {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(AuthState::Unknown);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    pub fn current(&self) -> AuthState {
        self.receiver.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.receiver.borrow().is_authenticated()
    }

    /// Access state without cloning
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AuthState) -> R,
    {
        f(&self.receiver.borrow())
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.receiver.borrow().user().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.receiver.clone()
    }

    pub fn set(&self, state: AuthState) {
        log::debug!("[AuthState] -> {}", state_name(&state));
        self.sender.send_replace(state);
    }

    pub fn begin_check(&self) {
        self.set(AuthState::Checking);
    }

    pub fn authenticate(&self, user: UserProfile) {
        self.set(AuthState::Authenticated { user });
    }

    /// Drops the profile and moves to `Anonymous`.
    pub fn logout(&self) {
        self.set(AuthState::Anonymous);
    }
}

impl Default for AuthStateStore {
    fn default() -> Self {
        Self::new()
    }
}

fn state_name(state: &AuthState) -> &'static str {
    match state {
        AuthState::Unknown => "unknown",
        AuthState::Checking => "checking",
        AuthState::Authenticated { .. } => "authenticated",
        AuthState::Anonymous => "anonymous",
    }
}
