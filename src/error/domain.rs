//! Domain-specific error types using `thiserror`.
//!
//! This module defines the error enums for the UI layer and the form
//! model of the Formdesk application.

use std::result::Result as StdResult;

use {anyhow::Error, thiserror::Error};

/// UI-related errors.
#[derive(Error, Debug)]
pub enum UiError {
    /// GTK/Libadwaita initialization error.
    #[error("UI initialization error: {0}")]
    InitializationError(String),
    /// State update error.
    #[error("State update error: {0}")]
    StateError(String),
    /// Component builder was missing a required value.
    #[error("Builder error: {0}")]
    BuilderError(String),
    /// A session-consuming component was built without a session handle.
    #[error("{component} must be used within a session provider")]
    MissingSession { component: &'static str },
}

/// Contact form errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    /// Field key does not name a form input.
    #[error("Unknown form field: {0}")]
    UnknownField(String),
}

/// Operational error context propagation with `anyhow`.
///
/// This type is used for operational errors that need rich context
/// but don't require specific handling logic.
pub type Result<T> = StdResult<T, Error>;
