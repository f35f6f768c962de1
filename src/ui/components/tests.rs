//! Unit tests for UI components.
//!
//! These tests exercise component rendering against the shared session.

#[cfg(test)]
mod component_tests {
    use std::sync::Arc;

    use libadwaita::{init, prelude::*};

    use crate::{
        state::{SessionStore, UserRecord},
        ui::components::session_status::SessionStatus,
    };

    #[test]
    fn test_session_status_renders_both_states() {
        if init().is_err() {
            return;
        }

        let session = Arc::new(SessionStore::new());
        let status = SessionStatus::builder()
            .session(session.clone())
            .build()
            .unwrap();
        assert_eq!(status.visible_page().as_deref(), Some("anonymous"));
        assert_eq!(status.anonymous_label.label(), "Не авторизован");

        session.login(UserRecord::new(5, "Мария", "maria@example.com"));
        status.refresh();
        assert_eq!(status.visible_page().as_deref(), Some("user"));
        assert_eq!(status.greeting_label.label(), "Привет, Мария!");
    }

    #[test]
    #[ignore = "Requires GTK display for UI testing"]
    fn test_logout_button_clears_session() {
        if init().is_err() {
            return;
        }

        let session = Arc::new(SessionStore::new());
        session.login(UserRecord::default());
        let status = SessionStatus::new(session.clone());
        assert_eq!(status.logout_button.label().as_deref(), Some("Выйти"));

        status.logout_button.emit_clicked();
        status.refresh();

        assert!(session.current_user().is_none());
        assert_eq!(status.visible_page().as_deref(), Some("anonymous"));
    }
}
