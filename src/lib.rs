//! Formdesk - contact form and mock profile demo
//!
//! A small Libadwaita application with a feedback form and a mock
//! login/profile panel sharing a single in-memory session.

pub mod config;
pub mod error;
pub mod state;
pub mod ui;

// Re-export key types for convenience
pub use {
    config::{SettingsManager, UserSettings},
    error::{FormError, UiError},
    state::{ActiveTab, AppState, FormFields, FormState, SessionEvent, SessionStore, UserRecord},
    ui::FormdeskApplication,
};
