//! Profile view with mock login.
//!
//! When no user is logged in the view offers a login button that installs
//! the configured mock record; otherwise it lists the user's fields.

use std::sync::Arc;

use {
    libadwaita::{
        glib::{JoinHandle, MainContext},
        gtk::{
            Align::{self, Center, Start},
            Box as GtkBox, Button, Label,
            Orientation::Vertical,
            Stack,
            StackTransitionType::Crossfade,
            Widget,
        },
        prelude::{BoxExt, ButtonExt, Cast},
    },
    tracing::debug,
};

use crate::{
    error::domain::UiError,
    state::{SessionEvent, SessionStore, UserRecord},
};

const ANONYMOUS_PAGE: &str = "anonymous";
const PROFILE_PAGE: &str = "profile";

/// Builder pattern for configuring `ProfileView` components.
#[derive(Debug, Default)]
pub struct ProfileViewBuilder {
    /// Shared session; required.
    session: Option<Arc<SessionStore>>,
    /// Record installed on login.
    mock_user: Option<UserRecord>,
}

impl ProfileViewBuilder {
    /// Sets the shared session.
    #[must_use]
    pub fn session(mut self, session: Arc<SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Sets the record installed by the login button.
    #[must_use]
    pub fn mock_user(mut self, mock_user: UserRecord) -> Self {
        self.mock_user = Some(mock_user);
        self
    }

    /// Builds the `ProfileView` component.
    ///
    /// # Errors
    ///
    /// Returns `UiError::MissingSession` if no session was provided.
    pub fn build(self) -> Result<ProfileView, UiError> {
        let session = self.session.ok_or(UiError::MissingSession {
            component: "ProfileView",
        })?;
        Ok(ProfileView::new(session, self.mock_user.unwrap_or_default()))
    }
}

#[derive(Clone)]
struct ProfileWidgets {
    stack: Stack,
    name_label: Label,
    email_label: Label,
    id_label: Label,
}

impl ProfileWidgets {
    fn render(&self, user: Option<&UserRecord>) {
        let Some(user) = user else {
            self.stack.set_visible_child_name(ANONYMOUS_PAGE);
            return;
        };

        self.name_label.set_label(&format!("Имя: {}", user.name));
        self.email_label.set_label(&format!("Email: {}", user.email));
        self.id_label.set_label(&format!("ID: {}", user.id));
        self.stack.set_visible_child_name(PROFILE_PAGE);
    }
}

/// Profile panel.
pub struct ProfileView {
    /// The underlying GTK widget.
    pub widget: Widget,
    /// Stack switching between the login prompt and the profile.
    pub stack: Stack,
    /// Mock login trigger.
    pub login_button: Button,
    /// "Name" row.
    pub name_label: Label,
    /// "Email" row.
    pub email_label: Label,
    /// "ID" row.
    pub id_label: Label,
    session: Arc<SessionStore>,
    mock_user: UserRecord,
    subscription_handle: Option<JoinHandle<()>>,
}

impl ProfileView {
    /// Creates a profile view bound to `session`.
    ///
    /// # Arguments
    ///
    /// * `session` - Shared session store
    /// * `mock_user` - Record installed by the login button
    ///
    /// # Returns
    ///
    /// A new `ProfileView` instance.
    pub fn new(session: Arc<SessionStore>, mock_user: UserRecord) -> Self {
        // Login prompt
        let prompt_title = Label::builder()
            .label("Вы не авторизованы")
            .css_classes(["title-2"])
            .build();
        let login_button = Button::builder()
            .label("Войти")
            .halign(Center)
            .css_classes(["suggested-action", "pill"])
            .build();
        let prompt = page_box(Center);
        prompt.append(&prompt_title);
        prompt.append(&login_button);

        // Profile details
        let profile_title = Label::builder()
            .label("Профиль")
            .halign(Start)
            .css_classes(["title-2"])
            .build();
        let name_label = detail_label();
        let email_label = detail_label();
        let id_label = detail_label();
        let details = page_box(Start);
        details.append(&profile_title);
        details.append(&name_label);
        details.append(&email_label);
        details.append(&id_label);

        let stack = Stack::builder()
            .transition_type(Crossfade)
            .css_classes(["profile"])
            .build();
        stack.add_named(&prompt, Some(ANONYMOUS_PAGE));
        stack.add_named(&details, Some(PROFILE_PAGE));

        let widgets = ProfileWidgets {
            stack: stack.clone(),
            name_label: name_label.clone(),
            email_label: email_label.clone(),
            id_label: id_label.clone(),
        };
        widgets.render(session.current_user().as_ref());

        let mut view = Self {
            widget: stack.clone().upcast::<Widget>(),
            stack,
            login_button,
            name_label,
            email_label,
            id_label,
            session,
            mock_user,
            subscription_handle: None,
        };

        view.connect_login();
        view.subscription_handle = Some(view.subscribe_to_session(widgets));

        debug!("ProfileView: Created");
        view
    }

    /// Creates a builder for `ProfileView`.
    #[must_use]
    pub fn builder() -> ProfileViewBuilder {
        ProfileViewBuilder::default()
    }

    /// Name of the page currently displayed.
    #[must_use]
    pub fn visible_page(&self) -> Option<String> {
        self.stack.visible_child_name().map(|name| name.to_string())
    }

    /// Re-renders from the session's current value.
    pub fn refresh(&self) {
        ProfileWidgets {
            stack: self.stack.clone(),
            name_label: self.name_label.clone(),
            email_label: self.email_label.clone(),
            id_label: self.id_label.clone(),
        }
        .render(self.session.current_user().as_ref());
    }

    fn connect_login(&self) {
        let session = self.session.clone();
        let mock_user = self.mock_user.clone();
        self.login_button.connect_clicked(move |_| {
            session.login(mock_user.clone());
        });
    }

    fn subscribe_to_session(&self, widgets: ProfileWidgets) -> JoinHandle<()> {
        let receiver = self.session.subscribe();
        MainContext::default().spawn_local(async move {
            while let Ok(event) = receiver.recv().await {
                match event {
                    SessionEvent::LoggedIn(user) => widgets.render(Some(&user)),
                    SessionEvent::LoggedOut => widgets.render(None),
                }
            }
            debug!("ProfileView: session subscription closed");
        })
    }

    /// Stops the session subscription.
    pub fn cleanup(&mut self) {
        if let Some(handle) = self.subscription_handle.take() {
            handle.abort();
        }
    }
}

impl Drop for ProfileView {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn page_box(halign: Align) -> GtkBox {
    GtkBox::builder()
        .orientation(Vertical)
        .halign(halign)
        .valign(Start)
        .spacing(12)
        .margin_top(24)
        .margin_bottom(24)
        .margin_start(24)
        .margin_end(24)
        .build()
}

fn detail_label() -> Label {
    Label::builder()
        .halign(Start)
        .xalign(0.0)
        .selectable(true)
        .build()
}
