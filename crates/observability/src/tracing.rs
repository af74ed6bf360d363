//! Tracing/logging initialization.

use shepherd_core::{LogFormat, ShepherdConfig};
use tracing_subscriber::EnvFilter;

/// Initialize tracing from the process environment (`RUST_LOG`,
/// `SHEPHERD_LOG_FORMAT`).
///
/// Safe to call multiple times; returns whether this call installed the
/// subscriber.
pub fn init() -> bool {
    let (format, config_err) = match ShepherdConfig::from_env() {
        Ok(config) => (config.log_format, None),
        Err(err) => (LogFormat::Json, Some(err)),
    };

    let installed = init_with(format);
    if let Some(err) = config_err {
        ::tracing::warn!(error = %err, "invalid configuration; using json logs");
    }
    installed
}

/// Initialize tracing with an explicit format. Subsequent calls are no-ops.
pub fn init_with(format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match format {
        LogFormat::Json => builder.json().try_init().is_ok(),
        LogFormat::Pretty => builder.pretty().try_init().is_ok(),
    };

    if installed {
        ::tracing::debug!(?format, "tracing initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_a_no_op() {
        init_with(LogFormat::Pretty);
        assert!(!init_with(LogFormat::Json));
        assert!(!init());
    }
}
