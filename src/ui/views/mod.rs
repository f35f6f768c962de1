//! Main window content views.
//!
//! This module provides the contact form, the profile panel and the tab
//! container that mounts one of them at a time.

pub mod form_view;
pub mod profile_view;
pub mod tab_container;

pub use {
    form_view::FormView,
    profile_view::ProfileView,
    tab_container::{MountedView, TabContainer},
};
