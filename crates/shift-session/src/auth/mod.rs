//! Client session management.
//!
//! Owns the registered-user directory and the active session: checks
//! credentials, registers new users, persists the session across
//! restarts, and answers the role questions route guards ask.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::directory::Directory;
use crate::error::Result;
use crate::guard::{self, RouteDecision};
use crate::models::{RegisterRequest, RoleData, SessionUser, UserRecord, UserRole};
use crate::store::SessionPersistence;

/// Result of a login attempt.
///
/// A miss is uniform: unknown email and wrong secret fall through the
/// same lookup, so the caller cannot tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Granted(SessionUser),
    InvalidCredentials,
}

impl LoginOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, LoginOutcome::Granted(_))
    }
}

/// Result of a registration attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    Registered(SessionUser),
    EmailTaken,
}

impl RegisterOutcome {
    pub fn is_registered(&self) -> bool {
        matches!(self, RegisterOutcome::Registered(_))
    }
}

struct StoreState {
    directory: Directory,
    session: Option<SessionUser>,
}

/// The client session store.
///
/// One instance serves one running client, owned by the application's
/// root composition and shared by reference with consumers.
pub struct SessionStore {
    state: RwLock<StoreState>,
    persistence: Arc<dyn SessionPersistence>,
}

impl SessionStore {
    /// Open a store with the fixed demo directory, restoring any
    /// persisted session.
    pub async fn open(persistence: Arc<dyn SessionPersistence>) -> Self {
        Self::with_directory(Directory::seeded(), persistence).await
    }

    /// Open a store over a caller-provided directory.
    ///
    /// A present, well-formed persisted session is restored; a missing or
    /// unparseable one means logged-out, never an error.
    pub async fn with_directory(
        directory: Directory,
        persistence: Arc<dyn SessionPersistence>,
    ) -> Self {
        let session = restore_session(persistence.as_ref()).await;
        Self {
            state: RwLock::new(StoreState { directory, session }),
            persistence,
        }
    }

    /// Check credentials and establish a session on a match.
    ///
    /// Errors only on a persistence write failure; a credential miss is
    /// an outcome, not an error.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let mut state = self.state.write().await;

        let Some(record) = state.directory.find_credentials(email, password) else {
            warn!("[Session] Failed login attempt for {}", email);
            return Ok(LoginOutcome::InvalidCredentials);
        };
        let user = SessionUser::from(record);

        self.persist(&user).await?;
        state.directory.record_login(email);
        state.session = Some(user.clone());

        info!("[Session] Logged in {} ({})", user.name, user.email);

        Ok(LoginOutcome::Granted(user))
    }

    /// Register a new user and log them in.
    ///
    /// The record joins the directory before the session is established,
    /// so a later login with the same credentials succeeds even if this
    /// session is dropped.
    pub async fn register(&self, request: RegisterRequest) -> Result<RegisterOutcome> {
        let mut state = self.state.write().await;

        if state.directory.email_exists(&request.email) {
            warn!("[Session] Registration rejected, email taken: {}", request.email);
            return Ok(RegisterOutcome::EmailTaken);
        }

        let role = request.role;
        let record = UserRecord {
            id: new_user_id(role),
            name: request.name,
            email: request.email,
            password: request.password,
            role_data: RoleData::new(role, request.finder_preferences),
            phone: request.phone,
            photo_url: Some(role.default_photo_url().to_string()),
            is_new_user: Some(true),
            created_at: Utc::now(),
            last_login: None,
        };
        let user = SessionUser::from(&record);

        state.directory.insert(record);
        self.persist(&user).await?;
        state.session = Some(user.clone());

        info!("[Session] Registered {} as {}", user.email, user.role());

        Ok(RegisterOutcome::Registered(user))
    }

    /// Clear the session and its persisted copy. Idempotent.
    pub async fn logout(&self) -> Result<()> {
        let mut state = self.state.write().await;

        if state.session.take().is_some() {
            info!("[Session] Logged out");
        }
        self.persistence.clear().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.session.is_some()
    }

    /// The active session, if any (secret never included)
    pub async fn session(&self) -> Option<SessionUser> {
        self.state.read().await.session.clone()
    }

    /// The active session.
    ///
    /// # Panics
    ///
    /// Panics when no session is active. Calling this while logged out
    /// is a wiring bug in the consumer, not a runtime data error.
    pub async fn current_user(&self) -> SessionUser {
        self.session()
            .await
            .expect("SessionStore::current_user called with no active session")
    }

    /// Role-gating decision for protected content, derived purely from
    /// the session and the required role.
    pub async fn authorize_role(&self, required: UserRole) -> RouteDecision {
        let state = self.state.read().await;
        guard::authorize_role(state.session.as_ref(), required)
    }

    /// Number of directory records. Registration appends; nothing removes.
    pub async fn user_count(&self) -> usize {
        self.state.read().await.directory.len()
    }

    async fn persist(&self, user: &SessionUser) -> Result<()> {
        let bytes = serde_json::to_vec(user)?;
        self.persistence.save(&bytes).await
    }
}

/// Opaque unique id: role prefix plus a short random token
fn new_user_id(role: UserRole) -> String {
    format!(
        "{}-{}",
        role.as_str(),
        &Uuid::new_v4().to_string()[..8]
    )
}

async fn restore_session(persistence: &dyn SessionPersistence) -> Option<SessionUser> {
    let bytes = match persistence.load().await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return None,
        Err(e) => {
            warn!("[Session] Failed to read persisted session: {}", e);
            return None;
        }
    };

    match serde_json::from_slice::<SessionUser>(&bytes) {
        Ok(user) => {
            info!("[Session] Restored session for {}", user.email);
            Some(user)
        }
        Err(e) => {
            warn!("[Session] Discarding unparseable persisted session: {}", e);
            // Drop the bad value so the next startup begins clean
            if let Err(e) = persistence.clear().await {
                warn!("[Session] Failed to clear persisted session: {}", e);
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FinderPreferences;
    use crate::store::MemorySessionStore;

    fn buddy_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "N".to_string(),
            email: email.to_string(),
            password: "abc".to_string(),
            phone: None,
            role: UserRole::Buddy,
            finder_preferences: None,
        }
    }

    #[tokio::test]
    async fn test_login_persists_session_without_secret() {
        let persistence = Arc::new(MemorySessionStore::new());
        let store = SessionStore::open(persistence.clone()).await;

        let outcome = store.login("finder@test.com", "password123").await.unwrap();
        assert!(outcome.is_granted());
        assert!(store.is_authenticated().await);

        let bytes = persistence.load().await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["id"], "finder-1");
        assert_eq!(value["email"], "finder@test.com");
        assert_eq!(value["role"], "finder");
        assert!(value.get("password").is_none());
    }

    #[tokio::test]
    async fn test_failed_login_leaves_state_untouched() {
        let persistence = Arc::new(MemorySessionStore::new());
        let store = SessionStore::open(persistence.clone()).await;

        let outcome = store.login("finder@test.com", "wrongpass").await.unwrap();
        assert_eq!(outcome, LoginOutcome::InvalidCredentials);
        assert!(!store.is_authenticated().await);
        assert!(persistence.load().await.unwrap().is_none());

        // unknown email is the same uniform outcome
        let outcome = store.login("nobody@test.com", "password123").await.unwrap();
        assert_eq!(outcome, LoginOutcome::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_mutates_nothing() {
        let store = SessionStore::open(Arc::new(MemorySessionStore::new())).await;
        let before = store.user_count().await;

        let outcome = store
            .register(buddy_request("finder@test.com"))
            .await
            .unwrap();
        assert_eq!(outcome, RegisterOutcome::EmailTaken);
        assert_eq!(store.user_count().await, before);
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_register_assigns_role_prefixed_id_and_defaults() {
        let store = SessionStore::open(Arc::new(MemorySessionStore::new())).await;

        let outcome = store.register(buddy_request("new@x.com")).await.unwrap();
        let RegisterOutcome::Registered(user) = outcome else {
            panic!("registration should succeed");
        };

        assert!(user.id.starts_with("buddy-"));
        assert_eq!(user.photo_url.as_deref(), Some(UserRole::Buddy.default_photo_url()));
        assert_eq!(user.is_new_user, Some(true));
        assert!(store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_register_drops_finder_preferences_for_buddies() {
        let store = SessionStore::open(Arc::new(MemorySessionStore::new())).await;

        let mut request = buddy_request("new@x.com");
        request.finder_preferences = Some(FinderPreferences {
            destination_city: "Delhi".to_string(),
            current_city: None,
            budget_range: "15k-25k".to_string(),
            preferred_language: "Hindi".to_string(),
            move_date: "2026-09-01".to_string(),
        });

        let RegisterOutcome::Registered(user) = store.register(request).await.unwrap() else {
            panic!("registration should succeed");
        };
        assert!(user.role_data.finder_preferences().is_none());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let persistence = Arc::new(MemorySessionStore::new());
        let store = SessionStore::open(persistence.clone()).await;

        store.login("buddy@test.com", "password123").await.unwrap();
        store.logout().await.unwrap();
        store.logout().await.unwrap();

        assert!(!store.is_authenticated().await);
        assert!(persistence.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_persisted_session_recovers_logged_out() {
        let persistence = Arc::new(MemorySessionStore::new());
        persistence.save(b"not json {{{").await.unwrap();

        let store = SessionStore::open(persistence.clone()).await;
        assert!(!store.is_authenticated().await);
        // the bad value is discarded, not kept around
        assert!(persistence.load().await.unwrap().is_none());
    }

    #[tokio::test]
    #[should_panic(expected = "no active session")]
    async fn test_current_user_panics_when_logged_out() {
        let store = SessionStore::open(Arc::new(MemorySessionStore::new())).await;
        store.current_user().await;
    }
}
