use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "tessera_engine=debug"). Without it, `RUST_LOG` is used, then
/// `default_level`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: log::LevelFilter,

    /// Caps `wgpu_*` and `naga` at `warn` unless the filter names them.
    pub quiet_wgpu: bool,

    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            quiet_wgpu: true,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

const WGPU_MODULES: [&str; 4] = ["wgpu_core", "wgpu_hal", "wgpu", "naga"];

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        let filter = config.env_filter.or_else(|| std::env::var("RUST_LOG").ok());
        builder.filter_level(config.default_level);
        if config.quiet_wgpu {
            for module in WGPU_MODULES {
                builder.filter_module(module, log::LevelFilter::Warn);
            }
        }
        // Explicit directives override the defaults above.
        if let Some(filter) = &filter {
            builder.parse_filters(filter);
        }

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized (filter: {filter:?})");
    });
}
