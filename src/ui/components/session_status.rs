//! Session status indicator shown in the header bar.
//!
//! Displays "not authorized" when no user is logged in, otherwise a
//! greeting and a logout button. The component follows session changes
//! through a subscription on the shared `SessionStore`.

use std::sync::Arc;

use {
    libadwaita::{
        glib::{JoinHandle, MainContext},
        gtk::{
            Align::Center, Box as GtkBox, Button, Label, Orientation::Horizontal, Stack,
            StackTransitionType::Crossfade,
        },
        prelude::{BoxExt, ButtonExt},
    },
    tracing::debug,
};

use crate::{
    error::domain::UiError,
    state::{SessionEvent, SessionStore, UserRecord},
};

/// Stack page shown while unauthenticated.
const ANONYMOUS_PAGE: &str = "anonymous";
/// Stack page shown while authenticated.
const USER_PAGE: &str = "user";

/// Builder pattern for configuring `SessionStatus` components.
#[derive(Debug, Default)]
pub struct SessionStatusBuilder {
    session: Option<Arc<SessionStore>>,
}

impl SessionStatusBuilder {
    /// Sets the shared session the indicator reflects.
    #[must_use]
    pub fn session(mut self, session: Arc<SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Builds the `SessionStatus` component.
    ///
    /// # Errors
    ///
    /// Returns `UiError::MissingSession` if no session was provided.
    pub fn build(self) -> Result<SessionStatus, UiError> {
        let session = self.session.ok_or(UiError::MissingSession {
            component: "SessionStatus",
        })?;
        Ok(SessionStatus::new(session))
    }
}

/// Widgets that change with the session; cheap to clone into closures.
#[derive(Clone)]
struct StatusWidgets {
    stack: Stack,
    greeting_label: Label,
}

impl StatusWidgets {
    fn render(&self, user: Option<&UserRecord>) {
        match user {
            Some(user) => {
                self.greeting_label
                    .set_label(&format!("Привет, {}!", user.name));
                self.stack.set_visible_child_name(USER_PAGE);
            }
            None => self.stack.set_visible_child_name(ANONYMOUS_PAGE),
        }
    }
}

/// Header indicator for the current session.
pub struct SessionStatus {
    /// The underlying widget (a `Stack` with one page per session state).
    pub widget: Stack,
    /// Label shown while unauthenticated.
    pub anonymous_label: Label,
    /// Greeting shown while authenticated.
    pub greeting_label: Label,
    /// Button that ends the session.
    pub logout_button: Button,
    /// Shared session reference.
    session: Arc<SessionStore>,
    /// Session subscription handle for cleanup.
    subscription_handle: Option<JoinHandle<()>>,
}

impl SessionStatus {
    /// Creates a session indicator bound to `session`.
    ///
    /// # Arguments
    ///
    /// * `session` - Shared session store
    ///
    /// # Returns
    ///
    /// A new `SessionStatus` instance.
    pub fn new(session: Arc<SessionStore>) -> Self {
        let anonymous_label = Label::builder()
            .label("Не авторизован")
            .valign(Center)
            .css_classes(["dim-label"])
            .build();

        let greeting_label = Label::builder().valign(Center).build();

        let logout_button = Button::builder()
            .label("Выйти")
            .valign(Center)
            .tooltip_text("End the current session")
            .build();

        let user_box = GtkBox::builder().orientation(Horizontal).spacing(6).build();
        user_box.append(&greeting_label);
        user_box.append(&logout_button);

        let stack = Stack::builder()
            .transition_type(Crossfade)
            .hhomogeneous(false)
            .css_classes(["session-status"])
            .build();
        stack.add_named(&anonymous_label, Some(ANONYMOUS_PAGE));
        stack.add_named(&user_box, Some(USER_PAGE));

        let widgets = StatusWidgets {
            stack: stack.clone(),
            greeting_label: greeting_label.clone(),
        };
        widgets.render(session.current_user().as_ref());

        let mut status = Self {
            widget: stack,
            anonymous_label,
            greeting_label,
            logout_button,
            session,
            subscription_handle: None,
        };

        status.connect_logout();
        status.subscription_handle = Some(status.subscribe_to_session(widgets));
        status
    }

    /// Creates a builder for `SessionStatus`.
    #[must_use]
    pub fn builder() -> SessionStatusBuilder {
        SessionStatusBuilder::default()
    }

    /// Name of the page currently displayed.
    #[must_use]
    pub fn visible_page(&self) -> Option<String> {
        self.widget.visible_child_name().map(|name| name.to_string())
    }

    /// Re-renders from the session's current value.
    pub fn refresh(&self) {
        StatusWidgets {
            stack: self.widget.clone(),
            greeting_label: self.greeting_label.clone(),
        }
        .render(self.session.current_user().as_ref());
    }

    fn connect_logout(&self) {
        let session = self.session.clone();
        self.logout_button.connect_clicked(move |_| {
            session.logout();
        });
    }

    fn subscribe_to_session(&self, widgets: StatusWidgets) -> JoinHandle<()> {
        let receiver = self.session.subscribe();
        MainContext::default().spawn_local(async move {
            while let Ok(event) = receiver.recv().await {
                match event {
                    SessionEvent::LoggedIn(user) => widgets.render(Some(&user)),
                    SessionEvent::LoggedOut => widgets.render(None),
                }
            }
            debug!("SessionStatus: session subscription closed");
        })
    }

    /// Stops the session subscription.
    pub fn cleanup(&mut self) {
        if let Some(handle) = self.subscription_handle.take() {
            handle.abort();
        }
    }
}

impl Drop for SessionStatus {
    fn drop(&mut self) {
        self.cleanup();
    }
}
