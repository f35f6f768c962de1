//! Formdesk - contact form and mock profile demo
//!
//! This is the main entry point for the Formdesk application.
//! It initializes logging and GTK/Libadwaita, runs the main loop and
//! reports a failing exit status as an error.

use {
    formdesk::{
        error::UiError,
        ui::{FormdeskApplication, application::check_exit_code},
    },
    tracing::info,
    tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt},
};

/// Main entry point for the Formdesk application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Formdesk v{}", env!("CARGO_PKG_VERSION"));

    // Initialize GTK and Libadwaita
    libadwaita::gtk::init().map_err(|e| UiError::InitializationError(e.to_string()))?;
    libadwaita::init().map_err(|e| UiError::InitializationError(e.to_string()))?;

    let app = FormdeskApplication::new().await?;
    let exit_code = app.run();
    info!(?exit_code, "Main loop finished");

    check_exit_code(exit_code)
}
