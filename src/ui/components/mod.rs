//! Reusable UI components following GNOME HIG guidelines.

#[cfg(test)]
mod tests;

pub mod session_status;

pub use session_status::SessionStatus;
