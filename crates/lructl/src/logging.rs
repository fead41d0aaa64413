//! Logging setup: console plus optional file sink, each with its own level

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing::{warn, Level};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::error::{Error, Result};

/// Logging configuration, loadable from a JSON file
///
/// ```json
/// { "console_level": "info", "file_level": "debug", "file": "log/lructl.log",
///   "rotation": "daily", "max_files": 10, "json": false }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Threshold for the console (stderr) sink
    pub console_level: String,
    /// Threshold for the file sink
    pub file_level: String,
    /// Log file path; no file sink when unset
    pub file: Option<PathBuf>,
    /// File rotation period: `never`, `minutely`, `hourly` or `daily`
    ///
    /// Rotated files get a date suffix appended to the file name.
    pub rotation: String,
    /// Number of rotated files to keep; unlimited when unset
    pub max_files: Option<usize>,
    /// Format console output as JSON lines
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_level: "info".to_string(),
            file_level: "debug".to_string(),
            file: None,
            rotation: "never".to_string(),
            max_files: None,
            json: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Apply command-line overrides on top of file values
    pub fn with_overrides(
        mut self,
        console_level: Option<&str>,
        file_level: Option<&str>,
        file: Option<PathBuf>,
        json: bool,
    ) -> Self {
        if let Some(level) = console_level {
            self.console_level = level.to_string();
        }
        if let Some(level) = file_level {
            self.file_level = level.to_string();
        }
        if file.is_some() {
            self.file = file;
        }
        self.json |= json;
        self
    }
}

/// Map a level name to a tracing level
///
/// `fatal` is accepted as an alias for `error`.
pub fn parse_level(name: &str) -> Option<Level> {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" | "fatal" => Some(Level::ERROR),
        _ => None,
    }
}

/// Map a rotation name to a rolling-file period
pub fn parse_rotation(name: &str) -> Option<Rotation> {
    match name.trim().to_ascii_lowercase().as_str() {
        "never" => Some(Rotation::NEVER),
        "minutely" => Some(Rotation::MINUTELY),
        "hourly" => Some(Rotation::HOURLY),
        "daily" => Some(Rotation::DAILY),
        _ => None,
    }
}

fn file_appender(
    path: &Path,
    rotation: Rotation,
    max_files: Option<usize>,
) -> Result<RollingFileAppender> {
    let prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::Config(format!("invalid log file path {}", path.display())))?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut builder = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(prefix);
    if let Some(max) = max_files {
        builder = builder.max_log_files(max);
    }

    builder
        .build(dir)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Install the global subscriber
///
/// The console layer honours `RUST_LOG` on top of the configured level. The
/// file layer is filtered independently, so a quiet console can sit next to
/// a verbose file.
pub fn init(config: &LogConfig) -> Result<()> {
    let mut unknown = Vec::new();
    let mut level_of = |name: &str| {
        parse_level(name).unwrap_or_else(|| {
            unknown.push(name.to_string());
            Level::INFO
        })
    };
    let console_level = level_of(&config.console_level);
    let file_level = level_of(&config.file_level);

    let console_filter = EnvFilter::from_default_env().add_directive(console_level.into());
    let console: Box<dyn Layer<Registry> + Send + Sync> = if config.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    };

    let rotation = parse_rotation(&config.rotation).ok_or_else(|| {
        Error::Config(format!("unknown log rotation '{}'", config.rotation))
    })?;

    let file = match &config.file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_appender(path, rotation, config.max_files)?)
                .with_filter(LevelFilter::from_level(file_level)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| Error::Config(e.to_string()))?;

    for name in unknown {
        warn!("Unknown log level '{}', falling back to info", name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(Level::DEBUG));
        assert_eq!(parse_level("WARN"), Some(Level::WARN));
        assert_eq!(parse_level(" fatal "), Some(Level::ERROR));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_parse_rotation() {
        assert_eq!(parse_rotation("Daily"), Some(Rotation::DAILY));
        assert_eq!(parse_rotation("never"), Some(Rotation::NEVER));
        assert_eq!(parse_rotation("weekly"), None);
    }

    #[test]
    fn test_file_appender_creates_file_in_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lructl.log");

        let mut appender = file_appender(&path, Rotation::NEVER, Some(3)).unwrap();
        writeln!(appender, "hello").unwrap();
        appender.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "file_level": "trace", "file": "out.log" }}"#).unwrap();

        let config = LogConfig::load(file.path()).unwrap();

        assert_eq!(config.console_level, "info");
        assert_eq!(config.file_level, "trace");
        assert_eq!(config.file, Some(PathBuf::from("out.log")));
        assert_eq!(config.rotation, "never");
        assert_eq!(config.max_files, None);
        assert!(!config.json);
    }

    #[test]
    fn test_load_invalid_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = LogConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = LogConfig::load("/nonexistent/lructl.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_overrides() {
        let config = LogConfig::default().with_overrides(
            Some("warn"),
            None,
            Some(PathBuf::from("x.log")),
            true,
        );

        assert_eq!(config.console_level, "warn");
        assert_eq!(config.file_level, "debug");
        assert_eq!(config.file, Some(PathBuf::from("x.log")));
        assert!(config.json);

        let untouched = LogConfig::default().with_overrides(None, None, None, false);
        assert_eq!(untouched, LogConfig::default());
    }
}
