use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "info,docbot=debug,tower_http=debug";

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,
    /// Optional plain-text log file written alongside the console output.
    pub log_file: Option<PathBuf>,
}

impl TracingConfig {
    /// `LOG_FORMAT=json` forces JSON output regardless of `json_format`.
    pub fn with_env_overrides(mut self) -> Self {
        if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
            self.json_format = true;
        }
        self
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: "local".to_string(),
            json_format: false,
            filter: DEFAULT_LOG_FILTER.to_string(),
            log_file: None,
        }
        .with_env_overrides()
    }
}
