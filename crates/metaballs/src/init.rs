//! Logging setup and the top-level run entry point.

use metaball_core::SceneConfig;

use crate::app::run_app;
use crate::Result;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the `env_logger` backend. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER),
    )
    .try_init();
}

/// Opens the viewer for `config` and blocks until the window closes.
///
/// # Example
///
/// ```no_run
/// use metaballs::{init_logging, run, SceneConfig};
///
/// fn main() -> metaballs::Result<()> {
///     init_logging();
///     run(SceneConfig::default())
/// }
/// ```
pub fn run(config: SceneConfig) -> Result<()> {
    log::info!(
        "starting metaballs: {} spheres, {}^3 grid, iso level {}",
        config.spheres.len(),
        config.grid_resolution,
        config.iso_level
    );
    run_app(config)?;
    log::info!("metaballs closed");
    Ok(())
}
