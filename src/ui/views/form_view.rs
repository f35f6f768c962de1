//! Contact form view.
//!
//! Labelled inputs bound to a local `FormState`, a submit button that is
//! only sensitive once every required field is filled in, and a success
//! notice that hides itself after the configured delay.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
    time::Duration,
};

use {
    async_channel::{Receiver, unbounded},
    libadwaita::{
        glib::{JoinHandle, MainContext, WeakRef},
        gtk::{
            Align::{End, Start},
            Box as GtkBox, Button, Entry, InputPurpose, Label,
            Orientation::Vertical,
            Revealer,
            RevealerTransitionType::SlideDown,
            ScrolledWindow, TextView, Widget,
            WrapMode::WordChar,
        },
        prelude::{
            BoxExt, ButtonExt, Cast, EditableExt, EntryExt, IsA, ObjectExt, TextBufferExt,
            TextViewExt, WidgetExt,
        },
    },
    tokio::runtime::Handle,
    tracing::{debug, trace},
};

use crate::{
    error::domain::UiError::{self, BuilderError},
    state::{FormField, FormFields, FormState, NoticeTimer},
};

/// Height of the message input, roughly four text rows.
const MESSAGE_HEIGHT: i32 = 96;

/// Builder pattern for configuring `FormView` components.
#[derive(Debug)]
pub struct FormViewBuilder {
    /// Runtime used for the notice timer; falls back to the current one.
    runtime: Option<Handle>,
    /// How long the success notice stays visible.
    notice_duration: Duration,
}

impl Default for FormViewBuilder {
    fn default() -> Self {
        Self {
            runtime: None,
            notice_duration: Duration::from_millis(3000),
        }
    }
}

impl FormViewBuilder {
    /// Sets the tokio runtime that drives the notice timer.
    #[must_use]
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Sets how long the success notice stays visible.
    #[must_use]
    pub fn notice_duration(mut self, notice_duration: Duration) -> Self {
        self.notice_duration = notice_duration;
        self
    }

    /// Builds the `FormView` component.
    ///
    /// # Errors
    ///
    /// Returns `UiError::BuilderError` if no runtime was set and none is
    /// current.
    pub fn build(self) -> Result<FormView, UiError> {
        let runtime = self
            .runtime
            .or_else(|| Handle::try_current().ok())
            .ok_or_else(|| BuilderError("Tokio runtime handle must be set".to_string()))?;
        Ok(FormView::new(runtime, self.notice_duration))
    }
}

/// Weak handles to the inputs, the notice and the form state.
///
/// Signal handlers are owned by the widgets they reference, so they only
/// hold weak handles.
#[derive(Clone)]
struct FormWidgets {
    name_entry: WeakRef<Entry>,
    email_entry: WeakRef<Entry>,
    message_view: WeakRef<TextView>,
    submit_button: WeakRef<Button>,
    notice_revealer: WeakRef<Revealer>,
    state: Weak<RefCell<FormState>>,
}

impl FormWidgets {
    fn update_field(&self, field: FormField, value: impl Into<String>) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let mut state = state.borrow_mut();
        state.update_field(field, value);
        self.sync_submit_sensitivity(&state);
    }

    fn sync_submit_sensitivity(&self, state: &FormState) {
        if let Some(submit_button) = self.submit_button.upgrade() {
            submit_button.set_sensitive(state.fields().is_complete());
        }
    }

    fn submit(&self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let snapshot = {
            let mut state = state.borrow_mut();
            if !state.fields().is_complete() {
                debug!(
                    missing = ?state.fields().missing_required(),
                    "FormView: Ignoring submit with missing required fields"
                );
                return;
            }
            state.submit()
        };
        trace!(?snapshot, "FormView: Submitted");

        // Clearing the inputs re-enters the change handlers, so the state
        // borrow above must be released first.
        if let Some(entry) = self.name_entry.upgrade() {
            entry.set_text("");
        }
        if let Some(entry) = self.email_entry.upgrade() {
            entry.set_text("");
        }
        if let Some(view) = self.message_view.upgrade() {
            view.buffer().set_text("");
        }
        self.set_notice_visible(true);
    }

    fn set_notice_visible(&self, visible: bool) {
        if let Some(revealer) = self.notice_revealer.upgrade() {
            revealer.set_reveal_child(visible);
        }
    }
}

/// Contact form panel.
pub struct FormView {
    /// The underlying GTK widget.
    pub widget: Widget,
    /// Success notice container.
    pub notice_revealer: Revealer,
    /// "Name" input.
    pub name_entry: Entry,
    /// "Email" input.
    pub email_entry: Entry,
    /// "Message" input.
    pub message_view: TextView,
    /// Submit button.
    pub submit_button: Button,
    /// Local form state.
    state: Rc<RefCell<FormState>>,
    /// Listener for notice timer expiries.
    expiry_handle: Option<JoinHandle<()>>,
}

impl FormView {
    /// Creates a new form view.
    ///
    /// # Arguments
    ///
    /// * `runtime` - Tokio runtime handle for the notice timer
    /// * `notice_duration` - How long the success notice stays visible
    ///
    /// # Returns
    ///
    /// A new `FormView` instance.
    pub fn new(runtime: Handle, notice_duration: Duration) -> Self {
        let (expired_tx, expired_rx) = unbounded();
        let state = Rc::new(RefCell::new(FormState::new(NoticeTimer::new(
            runtime,
            notice_duration,
            expired_tx,
        ))));

        let title = Label::builder()
            .label("Форма обратной связи")
            .halign(Start)
            .css_classes(["title-2"])
            .build();

        let notice_label = Label::builder()
            .label("Форма отправлена успешно!")
            .halign(Start)
            .css_classes(["success"])
            .build();
        let notice_revealer = Revealer::builder()
            .transition_type(SlideDown)
            .reveal_child(false)
            .child(&notice_label)
            .build();

        let name_entry = Entry::builder().hexpand(true).build();
        let email_entry = Entry::builder()
            .hexpand(true)
            .input_purpose(InputPurpose::Email)
            .build();
        let message_view = TextView::builder()
            .wrap_mode(WordChar)
            .accepts_tab(false)
            .top_margin(6)
            .bottom_margin(6)
            .left_margin(6)
            .right_margin(6)
            .build();
        let message_scroller = ScrolledWindow::builder()
            .min_content_height(MESSAGE_HEIGHT)
            .child(&message_view)
            .css_classes(["card"])
            .build();

        let submit_button = Button::builder()
            .label("Отправить")
            .halign(End)
            .sensitive(false)
            .css_classes(["suggested-action"])
            .build();

        let container = GtkBox::builder()
            .orientation(Vertical)
            .spacing(12)
            .margin_top(24)
            .margin_bottom(24)
            .margin_start(24)
            .margin_end(24)
            .css_classes(["simple-form"])
            .build();
        container.append(&title);
        container.append(&notice_revealer);
        container.append(&form_group(FormField::Name, &name_entry));
        container.append(&form_group(FormField::Email, &email_entry));
        container.append(&form_group(FormField::Message, &message_scroller));
        container.append(&submit_button);

        let widgets = FormWidgets {
            name_entry: name_entry.downgrade(),
            email_entry: email_entry.downgrade(),
            message_view: message_view.downgrade(),
            submit_button: submit_button.downgrade(),
            notice_revealer: notice_revealer.downgrade(),
            state: Rc::downgrade(&state),
        };

        let mut view = Self {
            widget: container.upcast::<Widget>(),
            notice_revealer,
            name_entry,
            email_entry,
            message_view,
            submit_button,
            state,
            expiry_handle: None,
        };

        view.connect_inputs(&widgets);
        view.connect_submit(&widgets);
        view.expiry_handle = Some(Self::listen_for_expiry(expired_rx, widgets));

        debug!(?notice_duration, "FormView: Created");
        view
    }

    /// Creates a builder for `FormView`.
    #[must_use]
    pub fn builder() -> FormViewBuilder {
        FormViewBuilder::default()
    }

    /// Current input values.
    #[must_use]
    pub fn fields(&self) -> FormFields {
        self.state.borrow().fields().clone()
    }

    /// Whether the success notice is showing.
    #[must_use]
    pub fn is_notice_visible(&self) -> bool {
        self.state.borrow().is_submitted()
    }

    fn connect_inputs(&self, widgets: &FormWidgets) {
        for (field, entry) in [
            (FormField::Name, &self.name_entry),
            (FormField::Email, &self.email_entry),
        ] {
            let widgets = widgets.clone();
            entry.connect_changed(move |entry| {
                widgets.update_field(field, entry.text());
            });
        }

        let widgets = widgets.clone();
        self.message_view.buffer().connect_changed(move |buffer| {
            let (start, end) = buffer.bounds();
            widgets.update_field(FormField::Message, buffer.text(&start, &end, false));
        });
    }

    fn connect_submit(&self, widgets: &FormWidgets) {
        let click_widgets = widgets.clone();
        self.submit_button.connect_clicked(move |_| {
            click_widgets.submit();
        });

        // Enter in any single-line input submits, like a native form.
        for entry in [&self.name_entry, &self.email_entry] {
            let activate_widgets = widgets.clone();
            entry.connect_activate(move |_| {
                activate_widgets.submit();
            });
        }
    }

    fn listen_for_expiry(expired_rx: Receiver<u64>, widgets: FormWidgets) -> JoinHandle<()> {
        MainContext::default().spawn_local(async move {
            while let Ok(generation) = expired_rx.recv().await {
                let Some(state) = widgets.state.upgrade() else {
                    break;
                };
                if state.borrow_mut().expire(generation) {
                    widgets.set_notice_visible(false);
                    trace!(generation, "FormView: Notice hidden");
                }
            }
        })
    }

    /// Cancels the notice timer and stops the expiry listener.
    pub fn cleanup(&mut self) {
        if let Some(handle) = self.expiry_handle.take() {
            handle.abort();
        }
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.dismiss_notice();
        }
    }
}

impl Drop for FormView {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Label + input pair.
fn form_group(field: FormField, input: &impl IsA<Widget>) -> GtkBox {
    let group = GtkBox::builder()
        .orientation(Vertical)
        .spacing(6)
        .css_classes(["form-group"])
        .build();
    let label = Label::builder()
        .label(field.label())
        .halign(Start)
        .build();
    group.append(&label);
    group.append(input);
    group
}

#[cfg(test)]
mod tests {
    use std::{rc::Rc, time::Duration};

    use {
        libadwaita::{
            init,
            prelude::{
                ButtonExt, EditableExt, EntryExt, ObjectExt, TextBufferExt, TextViewExt,
                WidgetExt,
            },
        },
        tokio::runtime::Runtime,
    };

    use crate::{error::domain::UiError, ui::views::form_view::FormView};

    #[test]
    fn test_builder_requires_runtime() {
        let result = FormView::builder().build();
        assert!(matches!(result, Err(UiError::BuilderError(_))));
    }

    #[test]
    #[ignore = "Requires GTK display for UI testing"]
    fn test_submit_clears_inputs_and_shows_notice() {
        if init().is_err() {
            return;
        }
        let runtime = Runtime::new().unwrap();

        let view = FormView::builder()
            .runtime(runtime.handle().clone())
            .notice_duration(Duration::from_millis(3000))
            .build()
            .unwrap();
        assert!(!view.submit_button.is_sensitive());

        view.name_entry.set_text("A");
        view.email_entry.set_text("b@c.d");
        view.message_view.buffer().set_text("hi");
        assert_eq!(view.fields().name, "A");
        assert_eq!(view.fields().message, "hi");
        assert!(view.submit_button.is_sensitive());

        view.submit_button.emit_clicked();

        assert!(view.fields().is_blank());
        assert_eq!(view.name_entry.text(), "");
        assert!(view.is_notice_visible());
        assert!(view.notice_revealer.reveals_child());
        assert!(!view.submit_button.is_sensitive());
    }

    #[test]
    #[ignore = "Requires GTK display for UI testing"]
    fn test_enter_in_name_entry_submits() {
        if init().is_err() {
            return;
        }
        let runtime = Runtime::new().unwrap();
        let view = FormView::builder()
            .runtime(runtime.handle().clone())
            .build()
            .unwrap();

        view.name_entry.set_text("A");
        view.name_entry.emit_activate();
        assert!(!view.is_notice_visible());
        assert_eq!(view.fields().name, "A");

        view.email_entry.set_text("b@c.d");
        view.message_view.buffer().set_text("hi");
        view.name_entry.emit_activate();

        assert!(view.is_notice_visible());
        assert!(view.fields().is_blank());
    }

    #[test]
    #[ignore = "Requires GTK display for UI testing"]
    fn test_dropped_view_releases_widgets_and_state() {
        if init().is_err() {
            return;
        }
        let runtime = Runtime::new().unwrap();
        let view = FormView::builder()
            .runtime(runtime.handle().clone())
            .build()
            .unwrap();
        assert_eq!(Rc::strong_count(&view.state), 1);

        let name_entry = view.name_entry.downgrade();
        let submit_button = view.submit_button.downgrade();
        let state = Rc::downgrade(&view.state);
        drop(view);

        assert!(name_entry.upgrade().is_none());
        assert!(submit_button.upgrade().is_none());
        assert!(state.upgrade().is_none());
    }
}
