use std::sync::Once;

/// Engine-specific filter variable, consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "VISTA_LOG";

/// Logger configuration.
///
/// Filters use `env_logger` syntax, e.g. `"vista_engine=debug,wgpu_core=warn"`.
/// Resolution order: `env_filter`, then `VISTA_LOG`, then `RUST_LOG`, then
/// `default_level`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: log::LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    fn resolve_filter(&self) -> Option<String> {
        [
            self.env_filter.clone(),
            std::env::var(LOG_ENV).ok(),
            std::env::var("RUST_LOG").ok(),
        ]
        .into_iter()
        .flatten()
        .find(|f| !f.trim().is_empty())
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.resolve_filter() {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                // wgpu is chatty at info.
                builder
                    .filter_level(config.default_level)
                    .filter_module("wgpu_core", log::LevelFilter::Warn)
                    .filter_module("wgpu_hal", log::LevelFilter::Warn)
                    .filter_module("naga", log::LevelFilter::Warn);
            }
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_err() {
            log::debug!("logger already installed; keeping it");
            return;
        }

        log::debug!("logging initialized");
    });
}
