// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to collect per-kind token metrics
    pub collect_detailed_metrics: bool,

    /// Whether to include line/column in lexical error messages
    pub include_position_in_errors: bool,

    /// Whether capture modes that find nothing produce warnings
    pub report_capture_warnings: bool,

    /// Whether dotted quads lex as IPv4 addresses and prefixes
    pub recognize_ipv4: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_flag(env_vars::LEXICAL_DETAILED_METRICS, true),
            include_position_in_errors: env_flag(env_vars::LEXICAL_INCLUDE_POSITIONS, true),
            report_capture_warnings: env_flag(env_vars::LEXICAL_CAPTURE_WARNINGS, true),
            recognize_ipv4: env_flag(env_vars::LEXICAL_RECOGNIZE_IPV4, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxPreferences {
    /// Whether unmodelled `set` paths produce an informational diagnostic
    pub report_unknown_paths: bool,

    /// Whether lines with an unrecognized leading token become null statements
    /// instead of recoverable errors
    pub absorb_unknown_top_level: bool,

    /// Whether each recovery logs the skipped token count
    pub log_recovery_details: bool,
}

impl Default for SyntaxPreferences {
    fn default() -> Self {
        Self {
            report_unknown_paths: env_flag(env_vars::SYNTAX_REPORT_UNKNOWN_PATHS, true),
            absorb_unknown_top_level: env_flag(env_vars::SYNTAX_ABSORB_UNKNOWN_TOP_LEVEL, false),
            log_recovery_details: env_flag(env_vars::SYNTAX_LOG_RECOVERY_DETAILS, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Preferred minimum log level (within compile-time constraints)
    pub min_log_level: LogLevel,

    /// Whether to include timing metrics in logs
    pub log_performance_events: bool,

    /// Whether to tag events with the current document name
    pub include_document_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_performance_events: env_flag(env_vars::LOGGING_LOG_PERFORMANCE, true),
            include_document_context: env_flag(env_vars::LOGGING_INCLUDE_DOCUMENT_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Failure to read or decode a preferences file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read preferences file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid preferences TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn error_code(&self) -> crate::logging::Code {
        crate::logging::codes::system::CONFIGURATION_ERROR
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub lexical: LexicalPreferences,
    pub syntax: SyntaxPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Overlay TOML preferences on the environment-derived defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read a preferences file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "FLATVYOS_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_INCLUDE_POSITIONS: &str = "FLATVYOS_LEXICAL_INCLUDE_POSITIONS";
    pub const LEXICAL_CAPTURE_WARNINGS: &str = "FLATVYOS_LEXICAL_CAPTURE_WARNINGS";
    pub const LEXICAL_RECOGNIZE_IPV4: &str = "FLATVYOS_LEXICAL_RECOGNIZE_IPV4";

    // Syntax
    pub const SYNTAX_REPORT_UNKNOWN_PATHS: &str = "FLATVYOS_SYNTAX_REPORT_UNKNOWN_PATHS";
    pub const SYNTAX_ABSORB_UNKNOWN_TOP_LEVEL: &str = "FLATVYOS_SYNTAX_ABSORB_UNKNOWN_TOP_LEVEL";
    pub const SYNTAX_LOG_RECOVERY_DETAILS: &str = "FLATVYOS_SYNTAX_LOG_RECOVERY_DETAILS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "FLATVYOS_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "FLATVYOS_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "FLATVYOS_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_PERFORMANCE: &str = "FLATVYOS_LOGGING_LOG_PERFORMANCE";
    pub const LOGGING_INCLUDE_DOCUMENT_CONTEXT: &str = "FLATVYOS_LOGGING_INCLUDE_DOCUMENT_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_partial_toml_overlay() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [syntax]
            absorb_unknown_top_level = true

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.syntax.absorb_unknown_top_level);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let result = RuntimeConfig::from_toml_str("[syntax]\nreport_unknown_paths = \"maybe\"");
        assert_matches!(result, Err(ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[lexical]\nreport_capture_warnings = false\nrecognize_ipv4 = false"
        )
        .unwrap();

        let config = RuntimeConfig::load(file.path()).unwrap();
        assert!(!config.lexical.report_capture_warnings);
        assert!(!config.lexical.recognize_ipv4);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = RuntimeConfig::load(dir.path().join("absent.toml"));
        assert_matches!(result, Err(ConfigError::Io { .. }));
    }
}
