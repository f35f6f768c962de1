//! GNOME HIG-compliant user interface built with Libadwaita.
//!
//! This module provides the main application window, the header bar with
//! the session indicator, and the tabbed form/profile content.

#[cfg(test)]
mod tests;

pub mod application;
pub mod components;
pub mod header_bar;
pub mod views;

pub use {
    application::FormdeskApplication,
    components::SessionStatus,
    header_bar::HeaderBar,
    views::{FormView, ProfileView, TabContainer},
};
