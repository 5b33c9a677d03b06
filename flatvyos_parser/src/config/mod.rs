//! Configuration module for the flat-configuration parser
//! Compile-time limits come from the TOML build profile; runtime preferences from the environment

// Generated by build.rs from config/<profile>.toml
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{
    ConfigError, LexicalPreferences, LogLevel, LoggingPreferences, RuntimeConfig,
    SyntaxPreferences,
};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("FLATVYOS_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("FLATVYOS_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time::{batch_processing, lexical, logging, syntax};
    use super::*;

    #[test]
    fn test_generated_limits_are_consistent() {
        assert!(lexical::MAX_DESCRIPTION_LENGTH <= lexical::MAX_TOKEN_LENGTH);
        assert!(syntax::MAX_EXPRESSION_DEPTH <= syntax::MAX_PARSE_DEPTH);
        assert!(batch_processing::MAX_WORKER_THREADS >= 1);
        assert!(logging::MAX_LOG_EVENTS_PER_DOCUMENT <= logging::LOG_BUFFER_SIZE);
    }

    #[test]
    fn test_build_info() {
        assert!(build_info::source_info().ends_with(".toml"));
        assert!(!build_info::profile().is_empty());
    }
}
