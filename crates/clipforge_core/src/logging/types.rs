//! Logging types shared by the job logger.

use crate::config::LoggingSettings;

/// Log severity levels, ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Callback type for mirroring log lines to an embedding host (CLI
/// progress display, tests).
pub type LogCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Configuration for a job logger.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum level written.
    pub level: LogLevel,
    /// Filter progress lines to step intervals.
    pub compact: bool,
    /// Progress step percentage for compact mode.
    pub progress_step: u32,
    /// Engine output lines kept for error diagnosis.
    pub error_tail: usize,
    /// Prefix lines with a timestamp.
    pub show_timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            compact: true,
            progress_step: 20,
            error_tail: 20,
            show_timestamps: true,
        }
    }
}

impl From<&LoggingSettings> for LogConfig {
    fn from(settings: &LoggingSettings) -> Self {
        Self {
            level: LogLevel::Info,
            compact: settings.compact,
            progress_step: settings.progress_step.max(1),
            error_tail: settings.error_tail as usize,
            show_timestamps: settings.show_timestamps,
        }
    }
}

/// Message prefixes for marking line categories in job logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePrefix {
    Stage,
    Success,
    Warning,
    Error,
    Engine,
}

impl MessagePrefix {
    /// Format a message with this prefix.
    pub fn format(&self, message: &str) -> String {
        let tag = match self {
            Self::Stage => "[stage]",
            Self::Success => "[ok]",
            Self::Warning => "[warn]",
            Self::Error => "[error]",
            Self::Engine => "[engine]",
        };
        format!("{} {}", tag, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn prefix_formats() {
        assert_eq!(MessagePrefix::Stage.format("Fuse"), "[stage] Fuse");
    }

    #[test]
    fn config_from_settings() {
        let settings = LoggingSettings::default();
        let config = LogConfig::from(&settings);
        assert!(config.compact);
        assert_eq!(config.progress_step, 20);
    }
}
