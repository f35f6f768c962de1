//! Application header bar with title and session status.
//!
//! The header is always visible, independent of the selected tab.

use std::sync::Arc;

use libadwaita::{HeaderBar as LibadwaitaHeaderBar, WindowTitle};

use crate::{state::SessionStore, ui::components::SessionStatus};

/// Window title shown in the header.
pub const APP_TITLE: &str = "Приложение с формами и авторизацией";

/// Header bar holding the window title and the session indicator.
pub struct HeaderBar {
    /// The underlying Libadwaita header bar widget.
    pub widget: LibadwaitaHeaderBar,
    /// Title widget.
    pub title: WindowTitle,
    /// Session indicator packed at the end.
    pub session_status: SessionStatus,
}

impl HeaderBar {
    /// Creates a new header bar bound to `session`.
    ///
    /// # Arguments
    ///
    /// * `session` - Shared session store
    ///
    /// # Returns
    ///
    /// A new `HeaderBar` instance.
    pub fn new(session: Arc<SessionStore>) -> Self {
        let widget = LibadwaitaHeaderBar::builder().build();

        let title = WindowTitle::new(APP_TITLE, "");
        widget.set_title_widget(Some(&title));

        let session_status = SessionStatus::new(session);
        widget.pack_end(&session_status.widget);

        Self {
            widget,
            title,
            session_status,
        }
    }
}
