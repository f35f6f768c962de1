//! Centralized state management with reactive updates to UI components.
//!
//! This module holds the shared session, the tab selection and the local
//! state of the contact form.

pub mod app_state;
pub mod form;
pub mod notice_timer;
pub mod session;

pub use {
    app_state::{ActiveTab, AppState, AppStateEvent},
    form::{FormField, FormFields, FormState},
    notice_timer::NoticeTimer,
    session::{SessionEvent, SessionStore, UserRecord},
};
