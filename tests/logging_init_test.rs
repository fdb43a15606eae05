/// Verifies that logging initialization can be repeated without panicking,
/// which hosts and test harnesses rely on.

#[cfg(test)]
mod tests {
    use fieldgate::utils::logging::{init_logging, LogFormat};

    #[test]
    fn test_init_logging_is_idempotent() {
        assert!(init_logging().is_ok());
        assert!(init_logging().is_ok());
        log::debug!("log records reach the subscriber after init");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("Text"), Some(LogFormat::Text));
        assert_eq!(LogFormat::parse(""), None);
    }
}
