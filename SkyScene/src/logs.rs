// logs.rs

use skyconfig::Config;
use tracing_subscriber::{Registry, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LEVEL: LevelFilter = LevelFilter::INFO;

/// Installe le subscriber global d'après `host.logger`
///
/// Un niveau invalide retombe sur `INFO`.
pub fn init_logging(config: &Config) {
    let level = config
        .get_log_min_level()
        .ok()
        .and_then(|l| string_to_levelfilter(&l))
        .unwrap_or(DEFAULT_LEVEL);

    let subscriber = Registry::default().with(level);

    let enable_console = config.get_log_enable_console().unwrap_or(true);

    if enable_console {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .init();
    } else {
        subscriber.init();
    }
}

fn string_to_levelfilter(s: &str) -> Option<LevelFilter> {
    match s.trim().to_uppercase().as_str() {
        "ERROR" => Some(LevelFilter::ERROR),
        "WARN" => Some(LevelFilter::WARN),
        "INFO" => Some(LevelFilter::INFO),
        "DEBUG" => Some(LevelFilter::DEBUG),
        "TRACE" => Some(LevelFilter::TRACE),
        "OFF" => Some(LevelFilter::OFF),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_levelfilter() {
        assert_eq!(string_to_levelfilter("debug"), Some(LevelFilter::DEBUG));
        assert_eq!(string_to_levelfilter(" WARN "), Some(LevelFilter::WARN));
        assert_eq!(string_to_levelfilter("verbose"), None);
    }
}
