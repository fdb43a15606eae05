use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FORMAT_ENV: &str = "FIELDGATE_LOG_FORMAT";

/// Log output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text format with timestamp, level, target, and message
    Text,
    /// JSON format with structured fields: timestamp, level, target, message
    Json,
}

impl LogFormat {
    /// Parses a format name; anything unrecognised yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "text" => Some(LogFormat::Text),
            _ => None,
        }
    }

    /// Reads `FIELDGATE_LOG_FORMAT`, falling back to `Text`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fieldgate::utils::logging::LogFormat;
    ///
    /// assert_eq!(LogFormat::from_env_or_default(), LogFormat::Text); // default
    /// std::env::set_var("FIELDGATE_LOG_FORMAT", "json");
    /// assert_eq!(LogFormat::from_env_or_default(), LogFormat::Json);
    /// ```
    pub fn from_env_or_default() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|s| LogFormat::parse(&s))
            .unwrap_or(LogFormat::Text)
    }
}

/// Initializes the tracing subscriber with console output and env filter.
///
/// Sets up:
/// - `EnvFilter` from `RUST_LOG`, defaulting to `info`
/// - `fmt::layer()` in text or JSON, chosen by `FIELDGATE_LOG_FORMAT`
/// - Log-to-tracing bridge so the engine's `log` macros reach the subscriber
///
/// Safe to call multiple times: if a global subscriber is already set this
/// returns `Ok(())`.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_log::LogTracer;
    use tracing_subscriber::fmt;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Initialize LogTracer bridge first (idempotent - errors are ignored)
    let _ = LogTracer::init();

    let result = match LogFormat::from_env_or_default() {
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_target(true))
            .try_init(),
    };

    if let Err(e) = result {
        // Already initialized (tests, embedding hosts): keep the existing one
        eprintln!(
            "Tracing subscriber already initialized or failed to initialize: {:?}",
            e
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" text "), Some(LogFormat::Text));
        assert_eq!(LogFormat::parse("yaml"), None);
    }
}
