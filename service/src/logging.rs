use crate::config::{Config, RustEnv};
use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Dependency modules that are silenced below Trace level.
const FILTERED_MODULES: &[&str] = &["sqlx", "sea_orm", "tower", "tower_http", "hyper", "h2", "axum"];

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger.
    ///
    /// At Trace level every module logs, including the database and HTTP
    /// stacks; below it those dependencies are filtered so relay and handler
    /// output stays readable. Production output goes to stderr uncolored.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        let level = config.log_level_filter;
        let log_config = Self::build_log_config(Self::should_filter_dependencies(level));
        let (mode, color) = Self::terminal_for(&config.runtime_env());

        TermLogger::init(level, log_config, mode, color)
    }

    fn should_filter_dependencies(level: LevelFilter) -> bool {
        level != LevelFilter::Trace
    }

    fn terminal_for(runtime_env: &RustEnv) -> (TerminalMode, ColorChoice) {
        match runtime_env {
            RustEnv::Production => (TerminalMode::Stderr, ColorChoice::Never),
            RustEnv::Development | RustEnv::Staging => (TerminalMode::Mixed, ColorChoice::Auto),
        }
    }

    fn build_log_config(apply_filters: bool) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if apply_filters {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_and_http_stacks_are_filtered() {
        for module in ["sqlx", "sea_orm", "hyper", "axum", "tower_http"] {
            assert!(
                FILTERED_MODULES.contains(&module),
                "{module} should be filtered"
            );
        }
    }

    #[test]
    fn relay_crates_are_never_filtered() {
        for module in ["events", "sse", "domain", "web"] {
            assert!(!FILTERED_MODULES.contains(&module));
        }
    }

    #[test]
    fn only_trace_level_shows_dependency_logs() {
        assert!(!Logger::should_filter_dependencies(LevelFilter::Trace));
        for level in [
            LevelFilter::Off,
            LevelFilter::Error,
            LevelFilter::Warn,
            LevelFilter::Info,
            LevelFilter::Debug,
        ] {
            assert!(Logger::should_filter_dependencies(level));
        }
    }

    #[test]
    fn production_logs_to_stderr_without_color() {
        let (mode, color) = Logger::terminal_for(&RustEnv::Production);

        assert!(matches!(mode, TerminalMode::Stderr));
        assert!(matches!(color, ColorChoice::Never));
    }
}
