//! Error handling built on `thiserror` and `anyhow`.
//!
//! Domain-specific error types cover precise failure cases, while the
//! `anyhow`-based `Result` alias carries context at the application boundary.

pub mod domain;

pub use domain::{FormError, Result, UiError};
