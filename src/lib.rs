pub mod config;
pub mod entities;
pub mod errors;
pub mod store;

pub mod auth;
pub mod gateway;
pub mod generation;
pub mod sync;

pub mod app_context;
pub use app_context::AppContext;
pub use config::Config;

/// Install a tracing subscriber driven by `RUST_LOG` for embedders that
/// do not bring their own.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
