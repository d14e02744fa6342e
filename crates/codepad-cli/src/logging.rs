//! Tracing subscriber setup.

use codepad_core::config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directives for a verbosity count and configured level.
pub fn directives(verbose: u8, settings: &LoggingConfig) -> String {
    let level = match verbose {
        0 => settings.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    format!("codepad={level},tower_http={level}")
}

/// Install the global subscriber. `RUST_LOG` wins over everything else.
///
/// Logs go to stderr so `codepad run` output stays clean on stdout.
pub fn init(verbose: u8, settings: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| directives(verbose, settings).into());

    let json = settings.json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text = (!settings.json).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use codepad_core::config::LogLevel;

    #[test]
    fn test_directives_follow_config() {
        let settings = LoggingConfig {
            level: LogLevel::Warn,
            json: false,
        };
        assert_eq!(directives(0, &settings), "codepad=warn,tower_http=warn");
    }

    #[test]
    fn test_verbose_overrides_config() {
        let settings = LoggingConfig::default();
        assert_eq!(directives(1, &settings), "codepad=debug,tower_http=debug");
        assert_eq!(directives(3, &settings), "codepad=trace,tower_http=trace");
    }
}
