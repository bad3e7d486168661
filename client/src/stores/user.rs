//! Login state of the current user.
//!
//! Logging in opens the application's login page in a separate window. When
//! the login completes, that window posts `{token, orcid, expiresIn}` back to
//! us; the message is delivered to [`UserStore::log_in`] through a channel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::session::{end_session, probe_session};
use crate::error::AuthError;
use crate::http_utils::transport::Transport;

pub const AUTH_COOKIE: &str = "Authorization";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub orcid: String,
    /// Lifetime of the token in seconds.
    pub expires_in: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    LoggedOut,
    LoggingIn,
    LoggedIn(Session),
}

/// A message posted to us by another window.
#[derive(Debug, Clone, PartialEq)]
pub struct PostMessage {
    pub origin: String,
    pub data: Value,
}

/// Opens the login page in a window the user completes the login in.
pub trait LoginWindow: Send + Sync {
    fn open(&self, url: &str);
}

struct PendingLogin {
    id: u64,
    token: CancellationToken,
}

#[derive(Default)]
struct LoginFlows {
    next_id: u64,
    pending: Option<PendingLogin>,
}

pub struct UserStore {
    transport: Arc<dyn Transport>,
    login_window: Arc<dyn LoginWindow>,
    app_url: String,
    state: watch::Sender<AuthState>,
    cookies: Mutex<CookieJar>,
    flows: Mutex<LoginFlows>,
}

impl UserStore {
    pub fn new(transport: Arc<dyn Transport>, login_window: Arc<dyn LoginWindow>, app_url: impl Into<String>) -> Self {
        let (state, _) = watch::channel(AuthState::LoggedOut);
        Self {
            transport,
            login_window,
            app_url: app_url.into().trim_end_matches('/').to_string(),
            state,
            cookies: Mutex::new(CookieJar::new()),
            flows: Mutex::new(LoginFlows::default()),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(*self.state.borrow(), AuthState::LoggedIn(_))
    }

    pub fn session(&self) -> Option<Session> {
        match &*self.state.borrow() {
            AuthState::LoggedIn(session) => Some(session.clone()),
            _ => None,
        }
    }

    pub fn login_url(&self) -> String {
        format!("{}/login?window_close=True", self.app_url)
    }

    /// `Cookie` header value carrying the auth cookie, if set.
    pub fn cookie_header(&self) -> Option<String> {
        self.lock_cookies().get(AUTH_COOKIE).map(|c| c.encoded().stripped().to_string())
    }

    /// Restore a persisted session without contacting the server.
    pub fn restore(&self, session: Session) {
        self.set_logged_in(session);
    }

    /// Open the login window and wait for it to report back.
    ///
    /// Starting another login ends this one with [`AuthError::Superseded`].
    /// Messages from other origins, or without a token, are ignored.
    pub async fn log_in(&self, mut messages: mpsc::Receiver<PostMessage>) -> Result<Session, AuthError> {
        let (flow_id, token) = self.start_flow();
        self.state.send_replace(AuthState::LoggingIn);
        self.login_window.open(&self.login_url());
        info!(flow_id, "login window opened");

        loop {
            let message = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(AuthError::Superseded),
                message = messages.recv() => message,
            };
            let Some(message) = message else {
                self.finish_flow(flow_id);
                self.state.send_replace(AuthState::LoggedOut);
                return Err(AuthError::PopupClosed);
            };
            let Some(session) = self.accept_message(&message) else {
                debug!(origin = %message.origin, "ignoring message");
                continue;
            };
            self.finish_flow(flow_id);
            self.set_logged_in(session.clone());
            info!(orcid = %session.orcid, "logged in");
            return Ok(session);
        }
    }

    /// Ask the server whether the session is still valid. Anything but a 200
    /// answer, including no answer, logs the user out locally.
    pub async fn check_authorization(&self) -> bool {
        let authorized = match probe_session(self.transport.as_ref(), &self.app_url, self.cookie_header()).await {
            Ok(authorized) => authorized,
            Err(err) => {
                warn!(error = %err, "authorization check failed");
                false
            }
        };
        if !authorized {
            self.set_logged_out();
        }
        authorized
    }

    /// Tell the server to end the session; local state is logged out whatever
    /// the server says.
    pub async fn log_out(&self) {
        match end_session(self.transport.as_ref(), &self.app_url, self.cookie_header()).await {
            Ok(200) => info!("logged out"),
            Ok(status) => warn!(status, "logout returned non-200"),
            Err(err) => warn!(error = %err, "logout request failed"),
        }
        self.set_logged_out();
    }

    fn accept_message(&self, message: &PostMessage) -> Option<Session> {
        if message.origin.trim_end_matches('/') != self.app_url {
            return None;
        }
        let token = message.data.get("token").and_then(Value::as_str).filter(|t| !t.is_empty())?;
        Some(Session {
            token: token.to_string(),
            orcid: message.data.get("orcid").and_then(Value::as_str).unwrap_or_default().to_string(),
            expires_in: message.data.get("expiresIn").and_then(Value::as_i64).unwrap_or_default(),
        })
    }

    fn start_flow(&self) -> (u64, CancellationToken) {
        let mut flows = self.lock_flows();
        if let Some(previous) = flows.pending.take() {
            debug!(flow_id = previous.id, "replacing pending login");
            previous.token.cancel();
        }
        flows.next_id += 1;
        let token = CancellationToken::new();
        flows.pending = Some(PendingLogin { id: flows.next_id, token: token.clone() });
        (flows.next_id, token)
    }

    fn finish_flow(&self, flow_id: u64) {
        let mut flows = self.lock_flows();
        if flows.pending.as_ref().is_some_and(|p| p.id == flow_id) {
            flows.pending = None;
        }
    }

    fn set_logged_in(&self, session: Session) {
        let auth_cookie = Cookie::build((AUTH_COOKIE, format!("Bearer {}", session.token)))
            .path("/")
            .max_age(cookie::time::Duration::seconds(session.expires_in));
        self.lock_cookies().add(auth_cookie);
        self.state.send_replace(AuthState::LoggedIn(session));
    }

    fn set_logged_out(&self) {
        self.lock_cookies().remove(Cookie::from(AUTH_COOKIE));
        self.state.send_replace(AuthState::LoggedOut);
    }

    fn lock_cookies(&self) -> MutexGuard<'_, CookieJar> {
        self.cookies.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_flows(&self) -> MutexGuard<'_, LoginFlows> {
        self.flows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
