use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install color-eyre with a project-standard configuration.
///
/// Call this early in main() before any fallible operations. Safe to call
/// multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Default filter directive when `RUST_LOG` is not set.
fn default_directive(environment: &Environment) -> &'static str {
    if environment.is_production() {
        "warn,productos_api=info,domain_productos=info"
    } else {
        "info,tower_http=debug,mongodb=warn"
    }
}

/// Initialize tracing with environment-aware configuration and error span capture.
///
/// - **Production** (`APP_ENV=production`): JSON lines, flattened events, no targets.
/// - **Development** (default): pretty, human-readable output.
///
/// Both install `tracing_error::ErrorLayer` so eyre reports carry span traces.
/// `RUST_LOG` overrides the default filter.
///
/// Safe to call more than once; later calls are no-ops (common in tests).
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(environment)));

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => {
            info!(
                "Tracing initialized with ErrorLayer. Environment: {:?}",
                environment
            );
        }
        Err(_) => {
            debug!("Tracing already initialized, skipping re-initialization");
        }
    }
}
