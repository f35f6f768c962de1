//! Main application window and root composition.
//!
//! This module implements the `FormdeskApplication`, which owns the single
//! session store and wires it into the header bar and the tab container.

use std::{cell::RefCell, sync::Arc};

use {
    anyhow::{Context, bail},
    libadwaita::{
        Application, ApplicationWindow,
        glib::{ExitCode, Propagation},
        gtk::{Box as GtkBox, Orientation::Vertical},
        prelude::{AdwApplicationWindowExt, ApplicationExt, ApplicationExtManual, BoxExt, GtkWindowExt},
    },
    tokio::runtime::Handle,
    tracing::{debug, error, info, warn},
};

use crate::{
    config::SettingsManager,
    error::Result,
    state::{AppState, SessionStore},
    ui::{header_bar::HeaderBar, views::TabContainer},
};

/// Application identifier registered with GTK.
pub const APPLICATION_ID: &str = "io.github.formdesk.Formdesk";

/// Main application class with window management.
pub struct FormdeskApplication {
    /// The main application instance.
    pub app: Application,
    /// Root state shared by all views.
    pub app_state: Arc<AppState>,
    /// User settings manager.
    pub settings: Arc<SettingsManager>,
    /// Runtime used for deferred UI work.
    runtime: Handle,
}

impl FormdeskApplication {
    /// Creates a new Formdesk application instance.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be loaded.
    pub async fn new() -> Result<Self> {
        let settings = SettingsManager::new().context("Failed to initialize settings")?;
        Ok(Self::with_settings(settings, Handle::current()))
    }

    /// Creates an application from already loaded settings.
    ///
    /// # Arguments
    ///
    /// * `settings` - Loaded settings manager
    /// * `runtime` - Tokio runtime handle for deferred work
    ///
    /// # Returns
    ///
    /// A new `FormdeskApplication` instance.
    pub fn with_settings(settings: SettingsManager, runtime: Handle) -> Self {
        let initial_tab = settings.get_settings().default_tab;
        let app_state = Arc::new(AppState::new(SessionStore::shared(), initial_tab));

        let app = Application::builder()
            .application_id(APPLICATION_ID)
            .build();

        info!(config = ?settings.get_config_path(), tab = %initial_tab, "Application created");

        Self {
            app,
            app_state,
            settings: Arc::new(settings),
            runtime,
        }
    }

    /// Runs the application.
    ///
    /// This method starts the GTK main loop and displays the main window.
    pub fn run(&self) -> ExitCode {
        self.app.connect_activate({
            let app_state = self.app_state.clone();
            let settings = self.settings.clone();
            let runtime = self.runtime.clone();

            move |app| {
                build_ui(app, &app_state, &settings, &runtime);
            }
        });

        self.app.run()
    }
}

/// Turns the main loop's exit status into a `Result`.
///
/// # Errors
///
/// Returns an error carrying the status if it is not `ExitCode::SUCCESS`.
pub fn check_exit_code(exit_code: ExitCode) -> Result<()> {
    if exit_code != ExitCode::SUCCESS {
        bail!("Application exited with status {exit_code:?}");
    }
    Ok(())
}

/// Builds the main window: header bar above the tab container.
fn build_ui(
    app: &Application,
    app_state: &Arc<AppState>,
    settings_manager: &Arc<SettingsManager>,
    runtime: &Handle,
) {
    let settings = settings_manager.get_settings().clone();
    let window = ApplicationWindow::builder()
        .application(app)
        .title("Formdesk")
        .default_width(settings.window_width)
        .default_height(settings.window_height)
        .build();

    let header_bar = HeaderBar::new(app_state.session.clone());

    let tab_container = match TabContainer::new(
        app_state.clone(),
        runtime.clone(),
        settings.notice_duration(),
        settings.mock_user.clone(),
    ) {
        Ok(tab_container) => tab_container,
        Err(e) => {
            error!("Failed to build main content: {e}");
            return;
        }
    };

    let main_box = GtkBox::builder().orientation(Vertical).build();
    main_box.append(&header_bar.widget);
    main_box.append(&tab_container.widget);
    window.set_content(Some(&main_box));

    // Components own subscriptions and timers; keep them alive for the
    // window's lifetime and tear them down when it closes.
    let components = RefCell::new(Some((header_bar, tab_container)));
    let settings_manager = settings_manager.clone();
    window.connect_close_request(move |window| {
        debug!("Main window closing, releasing components");
        components.borrow_mut().take();

        let (width, height) = window.default_size();
        if let Err(e) = settings_manager.remember_window_size(width, height) {
            warn!("Failed to save window size: {e}");
        }
        Propagation::Proceed
    });

    window.present();
}

#[cfg(test)]
mod tests {
    use libadwaita::glib::ExitCode;

    use crate::ui::application::check_exit_code;

    #[test]
    fn test_check_exit_code() {
        assert!(check_exit_code(ExitCode::SUCCESS).is_ok());

        let error = check_exit_code(ExitCode::FAILURE).unwrap_err();
        assert!(error.to_string().starts_with("Application exited with status"));
    }
}
