//! Session manager.

use crate::auth::listeners::{AuthChangeEvent, ListenerRegistry, Subscription};
use crate::auth::mfa::Mfa;
use crate::auth::session::{AuthResponse, Credentials, Session, SignUpRequest, User};
use crate::config::ClientConfig;
use crate::envelope::Envelope;
use crate::error::{ClientError, ClientResult};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use shopdesk_store::{AccessScope, RecordStore, Row, Selection};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Profile columns copied into `user_metadata` on sign-in.
const PROFILE_METADATA: &[&str] = &["full_name", "name", "role", "business_id", "avatar_url"];

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Owns the process-wide session slot and its listeners.
///
/// # Lifecycle
///
/// - [`SessionManager::init`] emits `InitialSession` to current listeners
/// - sign-in and sign-up replace the session and emit `SignedIn`
/// - sign-out and expiry clear it and emit `SignedOut`
/// - [`SessionManager::teardown`] clears the session and drops every listener
///
/// Concurrent writers are not coordinated: the last one wins.
pub struct SessionManager {
    store: Arc<dyn RecordStore>,
    config: ClientConfig,
    session: RwLock<Option<Session>>,
    listeners: Arc<ListenerRegistry>,
    live: AtomicBool,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &*self.session.read())
            .field("listeners", &self.listeners.len())
            .field("live", &self.is_live())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a manager that looks profiles up in `store`.
    pub fn new(store: Arc<dyn RecordStore>, config: ClientConfig) -> Self {
        Self {
            store,
            config,
            session: RwLock::new(None),
            listeners: Arc::new(ListenerRegistry::default()),
            live: AtomicBool::new(false),
        }
    }

    /// Marks the manager live and emits `InitialSession`.
    pub fn init(&self) {
        self.live.store(true, Ordering::SeqCst);
        let session = self.current_session();
        debug!(signed_in = session.is_some(), "auth initialized");
        self.listeners
            .emit(AuthChangeEvent::InitialSession, session.as_ref());
    }

    /// Clears the session and drops every listener without emitting.
    pub fn teardown(&self) {
        *self.session.write() = None;
        self.listeners.clear();
        self.live.store(false, Ordering::SeqCst);
        debug!("auth torn down");
    }

    /// Returns true between `init` and `teardown`.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Signs in as the profile whose email matches, ignoring the password.
    ///
    /// This is not authentication in any security sense.
    pub async fn sign_in_with_password(&self, credentials: &Credentials) -> Envelope<AuthResponse> {
        let result = self.find_profile(&credentials.email).and_then(|profile| {
            let profile = profile.ok_or(ClientError::InvalidCredentials)?;
            Ok(user_from_profile(&profile, &credentials.email))
        });

        match result {
            Ok(user) => {
                info!(user_id = %user.id, "signed in");
                Envelope::ok(self.start_session(user))
            }
            Err(err) => {
                warn!(email = %credentials.email, error = %err, "sign-in failed");
                Envelope::err(err.into())
            }
        }
    }

    /// Creates an identity and session from the request metadata.
    ///
    /// No profile row is written; callers persist one if they need it.
    pub async fn sign_up(&self, request: SignUpRequest) -> Envelope<AuthResponse> {
        let email = request.email.trim();
        if email.is_empty() {
            return Envelope::err(ClientError::validation("email is required").into());
        }
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            user_metadata: request.data,
        };
        info!(user_id = %user.id, "signed up");
        Envelope::ok(self.start_session(user))
    }

    /// Clears the session. Always succeeds.
    pub async fn sign_out(&self) -> Envelope<()> {
        let previous = self.session.write().take();
        if previous.is_some() {
            info!("signed out");
            self.listeners.emit(AuthChangeEvent::SignedOut, None);
        }
        Envelope::empty()
    }

    /// Returns the current session, or an empty envelope when signed out.
    pub async fn get_session(&self) -> Envelope<Session> {
        match self.current_session() {
            Some(session) => Envelope::ok(session),
            None => Envelope::empty(),
        }
    }

    /// Returns the current user, or an empty envelope when signed out.
    pub async fn get_user(&self) -> Envelope<User> {
        match self.current_session() {
            Some(session) => Envelope::ok(session.user),
            None => Envelope::empty(),
        }
    }

    /// Registers a state-change listener.
    pub fn on_auth_state_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(AuthChangeEvent, Option<&Session>) + Send + Sync + 'static,
    {
        self.listeners.add(callback)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// MFA operations.
    pub fn mfa(&self) -> Mfa {
        Mfa
    }

    /// Returns the live session, dropping it first if it has expired.
    pub fn current_session(&self) -> Option<Session> {
        let session = self.session.read().clone()?;
        if !session.is_expired_at(now_secs()) {
            return Some(session);
        }

        let expired = {
            let mut slot = self.session.write();
            match slot.as_ref() {
                Some(current) if current.access_token == session.access_token => slot.take(),
                _ => None,
            }
        };
        if expired.is_some() {
            info!(user_id = %session.user.id, "session expired");
            self.listeners.emit(AuthChangeEvent::SignedOut, None);
        }
        None
    }

    /// Access scope for store calls made on behalf of the current session.
    pub fn scope(&self) -> AccessScope {
        match self.current_session() {
            Some(session) => AccessScope::authenticated(session.user.id),
            None => AccessScope::anonymous(),
        }
    }

    fn start_session(&self, user: User) -> AuthResponse {
        let session = Session {
            user: user.clone(),
            access_token: format!("local-{}", uuid::Uuid::new_v4()),
            expires_at: Some(
                now_secs().saturating_add(self.config.session_lifetime.as_secs()),
            ),
        };
        *self.session.write() = Some(session.clone());
        self.listeners.emit(AuthChangeEvent::SignedIn, Some(&session));
        AuthResponse { user, session }
    }

    fn find_profile(&self, email: &str) -> ClientResult<Option<Row>> {
        let email = email.trim();
        if email.is_empty() {
            return Ok(None);
        }
        let rows = self.store.select(
            &AccessScope::anonymous(),
            &Selection::new(self.config.profiles_table.clone()),
        )?;
        Ok(rows.into_iter().find(|row| {
            row.get("email")
                .and_then(Value::as_str)
                .is_some_and(|candidate| candidate.trim().eq_ignore_ascii_case(email))
        }))
    }
}

fn user_from_profile(profile: &Row, email: &str) -> User {
    let id = match profile.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => String::new(),
    };
    let email = profile
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or(email)
        .to_string();
    let user_metadata: Map<String, Value> = PROFILE_METADATA
        .iter()
        .filter_map(|key| profile.get(*key).map(|v| (key.to_string(), v.clone())))
        .collect();
    User {
        id,
        email,
        user_metadata,
    }
}
