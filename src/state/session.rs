//! Shared user-session state with reactive fan-out to subscribed views.
//!
//! A single `SessionStore` is created by the application root and handed
//! to every view that reads or writes the session. Views never look the
//! store up implicitly; they receive it through their builders.

use std::sync::Arc;

use {
    async_channel::{Receiver, Sender, unbounded},
    parking_lot::RwLock,
    serde::{Deserialize, Serialize},
    tracing::{debug, info},
};

/// Identity of the (mock) authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Numeric user identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Contact email address.
    pub email: String,
}

impl UserRecord {
    /// Creates a new user record.
    ///
    /// # Arguments
    ///
    /// * `id` - User identifier
    /// * `name` - Display name
    /// * `email` - Contact email address
    ///
    /// # Returns
    ///
    /// A new `UserRecord` instance.
    pub fn new(id: u32, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Default for UserRecord {
    fn default() -> Self {
        Self::new(1, "Иван Иванов", "ivan@example.com")
    }
}

/// Session change events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A user record was installed (replacing any previous one).
    LoggedIn(UserRecord),
    /// The session was cleared.
    LoggedOut,
}

/// Single-user session container.
///
/// The record is either fully present or absent; `login` replaces it as a
/// whole and `logout` clears it.
#[derive(Debug, Default)]
pub struct SessionStore {
    /// Currently authenticated user, if any.
    current_user: RwLock<Option<UserRecord>>,
    /// Active subscribers for manual broadcast fan-out.
    subscribers: RwLock<Vec<Sender<SessionEvent>>>,
}

impl SessionStore {
    /// Creates an empty (unauthenticated) session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session store wrapped for sharing between views.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Returns a copy of the current user record.
    #[must_use]
    pub fn current_user(&self) -> Option<UserRecord> {
        self.current_user.read().clone()
    }

    /// Whether a user is currently logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_user.read().is_some()
    }

    /// Installs `record` as the current user, overwriting any existing one.
    ///
    /// # Arguments
    ///
    /// * `record` - The user record to install
    pub fn login(&self, record: UserRecord) {
        info!(user_id = record.id, name = %record.name, "User logged in");
        *self.current_user.write() = Some(record.clone());
        self.broadcast_event(&SessionEvent::LoggedIn(record));
    }

    /// Clears the current user.
    pub fn logout(&self) {
        let previous = self.current_user.write().take();
        if let Some(user) = previous {
            info!(user_id = user.id, "User logged out");
            self.broadcast_event(&SessionEvent::LoggedOut);
        } else {
            debug!("SessionStore: logout with no active session");
        }
    }

    /// Subscribes to session changes.
    ///
    /// # Returns
    ///
    /// A receiver for session events.
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.write().push(tx);
        debug!(
            subscribers = self.subscribers.read().len(),
            "SessionStore: New subscription created"
        );
        rx
    }

    /// Sends `event` to every live subscriber and drops closed channels.
    ///
    /// # Returns
    ///
    /// The number of subscribers that received the event.
    fn broadcast_event(&self, event: &SessionEvent) -> usize {
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|tx| tx.try_send(event.clone()).is_ok());
        subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::state::session::{SessionEvent, SessionStore, UserRecord};

    #[test]
    fn test_new_session_is_unauthenticated() {
        let session = SessionStore::new();
        assert!(session.current_user().is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_login_then_read_yields_record() {
        let session = SessionStore::new();
        let user = UserRecord::new(7, "Test User", "test@example.com");

        session.login(user.clone());

        assert_eq!(session.current_user(), Some(user));
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_login_overwrites_existing_user() {
        let session = SessionStore::new();
        session.login(UserRecord::new(1, "First", "first@example.com"));
        session.login(UserRecord::new(2, "Second", "second@example.com"));

        let user = session.current_user().unwrap();
        assert_eq!(user.id, 2);
        assert_eq!(user.name, "Second");
    }

    #[test]
    fn test_logout_then_read_yields_absent() {
        let session = SessionStore::new();
        session.login(UserRecord::default());

        session.logout();

        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_subscribers_receive_events() {
        let session = SessionStore::new();
        let first = session.subscribe();
        let second = session.subscribe();
        let user = UserRecord::default();

        session.login(user.clone());
        session.logout();

        for rx in [first, second] {
            assert_eq!(rx.try_recv().unwrap(), SessionEvent::LoggedIn(user.clone()));
            assert_eq!(rx.try_recv().unwrap(), SessionEvent::LoggedOut);
            assert!(rx.try_recv().is_err());
        }
    }

    #[test]
    fn test_logout_without_session_is_silent() {
        let session = SessionStore::new();
        let rx = session.subscribe();

        session.logout();

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_subscribers_are_pruned() {
        let session = SessionStore::new();
        let kept = session.subscribe();
        drop(session.subscribe());

        assert_eq!(session.broadcast_event(&SessionEvent::LoggedOut), 1);
        assert_eq!(kept.try_recv().unwrap(), SessionEvent::LoggedOut);
    }

    #[test]
    fn test_default_mock_user() {
        let user = UserRecord::default();
        assert_eq!(user.id, 1);
        assert_eq!(user.name, "Иван Иванов");
        assert_eq!(user.email, "ivan@example.com");
    }
}
