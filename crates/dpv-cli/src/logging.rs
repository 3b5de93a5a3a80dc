//! Logging setup for the terminal host.
//!
//! Routed through `tracing` with an `EnvFilter`: explicit `-v`/`-q` flags
//! win, otherwise `RUST_LOG` applies, otherwise warnings only.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub fn init_logging(level_filter: LevelFilter, explicit: bool) -> anyhow::Result<()> {
    let filter = if explicit {
        EnvFilter::default().add_directive(level_filter.into())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::WARN.into()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize logging: {error}"))?;
    Ok(())
}
