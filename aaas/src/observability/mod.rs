//! Logging setup
//!
//! Installs a `tracing` subscriber for the builder. `RUST_LOG` takes
//! precedence over the default filter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter};

/// Default filter directive
///
/// # Examples
///
/// ```
/// use aaas::observability::default_directive;
///
/// assert_eq!(default_directive(false), "info");
/// assert_eq!(default_directive(true), "info,aaas=debug,aaas_cli_lib=debug");
/// ```
#[must_use]
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "info,aaas=debug,aaas_cli_lib=debug"
    } else {
        "info"
    }
}

/// Initialize logging
///
/// Sets up:
/// - Pretty formatting in debug builds, JSON formatting in release builds
/// - Filtering from `RUST_LOG`, falling back to [`default_directive`]
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
///
/// # Example
///
/// ```rust,no_run
/// use aaas::observability;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// observability::init(false)?;
/// tracing::info!("Builder started");
/// # Ok(())
/// # }
/// ```
pub fn init(verbose: bool) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let registry = tracing_subscriber::registry().with(env_filter);

    if cfg!(debug_assertions) {
        // Pretty formatting for development
        registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()
    } else {
        // JSON formatting for production
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    }
}
