//! Tab switcher hosting either the form or the profile view.
//!
//! Only the selected view is mounted. Switching tabs drops the previous
//! view (cancelling its timer and subscriptions) and builds a fresh one,
//! so form input does not survive a tab switch while the shared session
//! does. Tab changes made through `AppState` directly are picked up from
//! its event stream.

use std::{cell::RefCell, rc::Rc, sync::Arc, time::Duration};

use {
    libadwaita::{
        Bin,
        glib::{JoinHandle, MainContext},
        gtk::{
            Align::Center,
            Box as GtkBox,
            Orientation::{Horizontal, Vertical},
            ToggleButton, Widget,
        },
        prelude::{BinExt, BoxExt, Cast, ToggleButtonExt},
    },
    tokio::runtime::Handle,
    tracing::{debug, error},
};

use crate::{
    error::domain::UiError,
    state::{ActiveTab, AppState, AppStateEvent, UserRecord},
    ui::views::{FormView, ProfileView},
};

/// The view currently mounted in the content area.
pub enum MountedView {
    /// Contact form.
    Form(FormView),
    /// Profile panel.
    Profile(ProfileView),
}

impl MountedView {
    /// Tab this view belongs to.
    #[must_use]
    pub fn tab(&self) -> ActiveTab {
        match self {
            MountedView::Form(_) => ActiveTab::Form,
            MountedView::Profile(_) => ActiveTab::Profile,
        }
    }

    fn widget(&self) -> &Widget {
        match self {
            MountedView::Form(view) => &view.widget,
            MountedView::Profile(view) => &view.widget,
        }
    }
}

/// Everything needed to (re)build a tab's view.
struct TabContent {
    app_state: Arc<AppState>,
    runtime: Handle,
    notice_duration: Duration,
    mock_user: UserRecord,
    content: Bin,
    mounted: RefCell<Option<MountedView>>,
}

impl TabContent {
    fn mount(&self, tab: ActiveTab) -> Result<(), UiError> {
        // Tear down first so the old view's timer never outlives it.
        let previous = self.mounted.borrow_mut().take();
        if let Some(previous) = previous {
            debug!(tab = %previous.tab(), "TabContainer: Unmounting view");
            self.content.set_child(None::<&Widget>);
            drop(previous);
        }

        let view = match tab {
            ActiveTab::Form => MountedView::Form(
                FormView::builder()
                    .runtime(self.runtime.clone())
                    .notice_duration(self.notice_duration)
                    .build()?,
            ),
            ActiveTab::Profile => MountedView::Profile(
                ProfileView::builder()
                    .session(self.app_state.session.clone())
                    .mock_user(self.mock_user.clone())
                    .build()?,
            ),
        };

        self.content.set_child(Some(view.widget()));
        *self.mounted.borrow_mut() = Some(view);
        debug!(tab = %tab, "TabContainer: Mounted view");
        Ok(())
    }

    fn select(&self, tab: ActiveTab) -> Result<(), UiError> {
        let changed = self.app_state.select_tab(tab);
        let mounted_tab = self.mounted.borrow().as_ref().map(MountedView::tab);
        if changed || mounted_tab != Some(tab) {
            self.mount(tab)?;
        }
        Ok(())
    }
}

/// Tab buttons plus the content area.
pub struct TabContainer {
    /// The underlying GTK widget.
    pub widget: Widget,
    /// One toggle button per tab, in display order.
    pub tab_buttons: Vec<(ActiveTab, ToggleButton)>,
    inner: Rc<TabContent>,
    /// Listener for `AppState` tab changes.
    subscription_handle: Option<JoinHandle<()>>,
}

impl TabContainer {
    /// Creates the tab container and mounts the app state's active tab.
    ///
    /// # Arguments
    ///
    /// * `app_state` - Root state (session and active tab)
    /// * `runtime` - Tokio runtime handle for form timers
    /// * `notice_duration` - Success notice duration for the form
    /// * `mock_user` - Record installed by the profile's login button
    ///
    /// # Errors
    ///
    /// Returns `UiError` if the initial view cannot be built.
    pub fn new(
        app_state: Arc<AppState>,
        runtime: Handle,
        notice_duration: Duration,
        mock_user: UserRecord,
    ) -> Result<Self, UiError> {
        let content = Bin::builder().vexpand(true).build();

        let tab_bar = GtkBox::builder()
            .orientation(Horizontal)
            .halign(Center)
            .css_classes(["linked", "tabs"])
            .margin_top(12)
            .build();

        let mut tab_buttons: Vec<(ActiveTab, ToggleButton)> = Vec::new();
        for tab in ActiveTab::ALL {
            let button = ToggleButton::builder().label(tab.title()).build();
            if let Some((_, first)) = tab_buttons.first() {
                button.set_group(Some(first));
            }
            tab_bar.append(&button);
            tab_buttons.push((tab, button));
        }

        let container = GtkBox::builder().orientation(Vertical).spacing(6).build();
        container.append(&tab_bar);
        container.append(&content);

        let initial_tab = app_state.active_tab();
        let inner = Rc::new(TabContent {
            app_state,
            runtime,
            notice_duration,
            mock_user,
            content,
            mounted: RefCell::new(None),
        });
        inner.mount(initial_tab)?;

        let mut tab_container = Self {
            widget: container.upcast::<Widget>(),
            tab_buttons,
            inner,
            subscription_handle: None,
        };
        sync_buttons(&tab_container.tab_buttons, initial_tab);
        tab_container.connect_buttons();
        tab_container.subscription_handle = Some(tab_container.listen_for_tab_changes());
        Ok(tab_container)
    }

    /// Selects `tab`, remounting the content if needed.
    ///
    /// # Errors
    ///
    /// Returns `UiError` if the tab's view cannot be built.
    pub fn select_tab(&self, tab: ActiveTab) -> Result<(), UiError> {
        self.inner.select(tab)?;
        sync_buttons(&self.tab_buttons, tab);
        Ok(())
    }

    /// Tab of the currently mounted view.
    #[must_use]
    pub fn mounted_tab(&self) -> Option<ActiveTab> {
        self.inner.mounted.borrow().as_ref().map(MountedView::tab)
    }

    /// Runs `f` against the mounted profile view, if the profile tab is active.
    pub fn with_profile<R>(&self, f: impl FnOnce(&ProfileView) -> R) -> Option<R> {
        match self.inner.mounted.borrow().as_ref() {
            Some(MountedView::Profile(view)) => Some(f(view)),
            _ => None,
        }
    }

    /// Runs `f` against the mounted form view, if the form tab is active.
    pub fn with_form<R>(&self, f: impl FnOnce(&FormView) -> R) -> Option<R> {
        match self.inner.mounted.borrow().as_ref() {
            Some(MountedView::Form(view)) => Some(f(view)),
            _ => None,
        }
    }

    fn connect_buttons(&self) {
        for (tab, button) in &self.tab_buttons {
            let tab = *tab;
            let inner = self.inner.clone();
            button.connect_toggled(move |button| {
                // Grouped buttons also fire when deactivated.
                if !button.is_active() {
                    return;
                }
                if let Err(e) = inner.select(tab) {
                    error!("Failed to switch to {tab} tab: {e}");
                }
            });
        }
    }

    fn listen_for_tab_changes(&self) -> JoinHandle<()> {
        let receiver = self.inner.app_state.subscribe();
        let inner = self.inner.clone();
        let tab_buttons = self.tab_buttons.clone();

        MainContext::default().spawn_local(async move {
            while let Ok(AppStateEvent::TabChanged(tab)) = receiver.recv().await {
                // Events queued behind a newer selection are stale.
                if inner.app_state.active_tab() != tab {
                    continue;
                }
                if let Err(e) = inner.select(tab) {
                    error!("Failed to switch to {tab} tab: {e}");
                    continue;
                }
                sync_buttons(&tab_buttons, tab);
            }
        })
    }

    /// Stops listening for tab changes and unmounts the current view.
    pub fn cleanup(&mut self) {
        if let Some(handle) = self.subscription_handle.take() {
            handle.abort();
        }
        let mounted = self.inner.mounted.borrow_mut().take();
        if let Some(view) = mounted {
            self.inner.content.set_child(None::<&Widget>);
            drop(view);
        }
    }
}

impl Drop for TabContainer {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Activates the button of `tab`; the group deactivates the others.
fn sync_buttons(tab_buttons: &[(ActiveTab, ToggleButton)], tab: ActiveTab) {
    for (button_tab, button) in tab_buttons {
        if *button_tab == tab && !button.is_active() {
            button.set_active(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use {
        libadwaita::{
            glib::MainContext,
            init,
            prelude::{ButtonExt, EditableExt, ToggleButtonExt},
        },
        tokio::runtime::Runtime,
    };

    use crate::{
        state::{ActiveTab, AppState, AppStateEvent, UserRecord},
        ui::views::tab_container::TabContainer,
    };

    #[test]
    #[ignore = "Requires GTK display for UI testing"]
    fn test_profile_login_persists_across_tab_switches() {
        if init().is_err() {
            return;
        }
        let runtime = Runtime::new().unwrap();
        let app_state = Arc::new(AppState::default());

        let tabs = TabContainer::new(
            app_state.clone(),
            runtime.handle().clone(),
            Duration::from_millis(3000),
            UserRecord::default(),
        )
        .unwrap();
        assert_eq!(tabs.mounted_tab(), Some(ActiveTab::Form));

        tabs.select_tab(ActiveTab::Profile).unwrap();
        assert_eq!(app_state.active_tab(), ActiveTab::Profile);
        assert_eq!(
            tabs.with_profile(|view| view.visible_page()).flatten().as_deref(),
            Some("anonymous")
        );

        tabs.with_profile(|view| view.login_button.emit_clicked());
        assert_eq!(app_state.session.current_user(), Some(UserRecord::default()));

        tabs.select_tab(ActiveTab::Form).unwrap();
        assert_eq!(tabs.mounted_tab(), Some(ActiveTab::Form));
        tabs.select_tab(ActiveTab::Profile).unwrap();

        assert_eq!(
            tabs.with_profile(|view| view.visible_page()).flatten().as_deref(),
            Some("profile")
        );
        assert_eq!(
            tabs.with_profile(|view| view.name_label.label().to_string()),
            Some("Имя: Иван Иванов".to_string())
        );
    }

    #[test]
    #[ignore = "Requires GTK display for UI testing"]
    fn test_form_input_is_lost_on_tab_switch() {
        if init().is_err() {
            return;
        }
        let runtime = Runtime::new().unwrap();
        let app_state = Arc::new(AppState::default());
        let tabs = TabContainer::new(
            app_state,
            runtime.handle().clone(),
            Duration::from_millis(3000),
            UserRecord::default(),
        )
        .unwrap();

        tabs.with_form(|view| view.name_entry.set_text("draft"));
        tabs.select_tab(ActiveTab::Profile).unwrap();
        tabs.select_tab(ActiveTab::Form).unwrap();

        assert_eq!(tabs.with_form(|view| view.fields().is_blank()), Some(true));
    }

    #[test]
    #[ignore = "Requires GTK display for UI testing"]
    fn test_external_tab_change_remounts_and_syncs_buttons() {
        if init().is_err() {
            return;
        }
        let runtime = Runtime::new().unwrap();
        let app_state = Arc::new(AppState::default());
        let tabs = TabContainer::new(
            app_state.clone(),
            runtime.handle().clone(),
            Duration::from_millis(3000),
            UserRecord::default(),
        )
        .unwrap();

        assert!(app_state.select_tab(ActiveTab::Profile));
        let context = MainContext::default();
        while context.iteration(false) {}

        assert_eq!(tabs.mounted_tab(), Some(ActiveTab::Profile));
        for (tab, button) in &tabs.tab_buttons {
            assert_eq!(button.is_active(), *tab == ActiveTab::Profile);
        }
        assert_eq!(app_state.active_tab(), ActiveTab::Profile);
    }
}
