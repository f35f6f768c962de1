//! Root application state: the shared session and the active tab.
//!
//! This module provides the central `AppState` container created once by
//! the application and passed explicitly to the views that need it.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
    sync::Arc,
};

use {
    async_channel::{Receiver, Sender, unbounded},
    parking_lot::RwLock,
    serde::{Deserialize, Serialize},
    tracing::debug,
};

use crate::{error::domain::UiError, state::session::SessionStore};

/// Tab selection of the main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveTab {
    /// Contact form tab is selected (default).
    #[default]
    Form,
    /// Profile tab is selected.
    Profile,
}

impl ActiveTab {
    /// All tabs in display order.
    pub const ALL: [ActiveTab; 2] = [ActiveTab::Form, ActiveTab::Profile];

    /// Stable key used for widget names, settings and parsing.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            ActiveTab::Form => "form",
            ActiveTab::Profile => "profile",
        }
    }

    /// Caption of the tab button.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            ActiveTab::Form => "Форма",
            ActiveTab::Profile => "Профиль",
        }
    }
}

impl Display for ActiveTab {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.key())
    }
}

impl FromStr for ActiveTab {
    type Err = UiError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        ActiveTab::ALL
            .into_iter()
            .find(|tab| tab.key() == key)
            .ok_or_else(|| UiError::StateError(format!("Unknown tab: {key}")))
    }
}

/// Application state change events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppStateEvent {
    /// The active tab changed.
    TabChanged(ActiveTab),
}

/// Central state container.
#[derive(Debug)]
pub struct AppState {
    /// The one session shared by every view.
    pub session: Arc<SessionStore>,
    /// Currently selected tab.
    active_tab: RwLock<ActiveTab>,
    /// Active subscribers for manual broadcast fan-out.
    subscribers: RwLock<Vec<Sender<AppStateEvent>>>,
}

impl AppState {
    /// Creates a new application state instance.
    ///
    /// # Arguments
    ///
    /// * `session` - Shared session store
    /// * `initial_tab` - Tab selected at startup
    ///
    /// # Returns
    ///
    /// A new `AppState` instance.
    pub fn new(session: Arc<SessionStore>, initial_tab: ActiveTab) -> Self {
        Self {
            session,
            active_tab: RwLock::new(initial_tab),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Gets the currently selected tab.
    #[must_use]
    pub fn active_tab(&self) -> ActiveTab {
        *self.active_tab.read()
    }

    /// Selects `tab` and notifies subscribers if it changed.
    ///
    /// # Arguments
    ///
    /// * `tab` - Tab to select
    ///
    /// # Returns
    ///
    /// `true` if the selection changed.
    pub fn select_tab(&self, tab: ActiveTab) -> bool {
        {
            let mut active_tab = self.active_tab.write();
            if *active_tab == tab {
                return false;
            }
            *active_tab = tab;
        }

        debug!(tab = %tab, "AppState: Tab selected");
        self.broadcast_event(&AppStateEvent::TabChanged(tab));
        true
    }

    /// Subscribes to application state changes.
    ///
    /// # Returns
    ///
    /// A receiver for state change events.
    pub fn subscribe(&self) -> Receiver<AppStateEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.write().push(tx);
        rx
    }

    fn broadcast_event(&self, event: &AppStateEvent) {
        self.subscribers
            .write()
            .retain(|tx| tx.try_send(event.clone()).is_ok());
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SessionStore::shared(), ActiveTab::default())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{from_str, to_string};

    use crate::state::{
        app_state::{ActiveTab, AppState, AppStateEvent},
        session::UserRecord,
    };

    #[test]
    fn test_app_state_creation() {
        let app_state = AppState::default();
        assert_eq!(app_state.active_tab(), ActiveTab::Form);
        assert!(app_state.session.current_user().is_none());
    }

    #[test]
    fn test_select_tab_transitions() {
        let app_state = AppState::default();
        let rx = app_state.subscribe();

        assert!(app_state.select_tab(ActiveTab::Profile));
        assert_eq!(app_state.active_tab(), ActiveTab::Profile);
        assert!(!app_state.select_tab(ActiveTab::Profile));
        assert!(app_state.select_tab(ActiveTab::Form));
        assert_eq!(app_state.active_tab(), ActiveTab::Form);

        assert_eq!(
            rx.try_recv().unwrap(),
            AppStateEvent::TabChanged(ActiveTab::Profile)
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            AppStateEvent::TabChanged(ActiveTab::Form)
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_session_survives_tab_switches() {
        let app_state = AppState::default();
        app_state.select_tab(ActiveTab::Profile);
        app_state.session.login(UserRecord::default());

        app_state.select_tab(ActiveTab::Form);
        app_state.select_tab(ActiveTab::Profile);

        assert_eq!(app_state.session.current_user(), Some(UserRecord::default()));
    }

    #[test]
    fn test_active_tab_keys() {
        assert_eq!("form".parse::<ActiveTab>().unwrap(), ActiveTab::Form);
        assert_eq!("profile".parse::<ActiveTab>().unwrap(), ActiveTab::Profile);
        assert!("settings".parse::<ActiveTab>().is_err());
        assert_eq!(ActiveTab::Profile.title(), "Профиль");
    }

    #[test]
    fn test_active_tab_serialization() {
        assert_eq!(to_string(&ActiveTab::Profile).unwrap(), "\"profile\"");
        assert_eq!(from_str::<ActiveTab>("\"form\"").unwrap(), ActiveTab::Form);
    }
}
