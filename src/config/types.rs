//! Configuration types and CLI options.
//!
//! This module defines the identity tuple used to address remote and
//! relational lookups, plus the enums and structs used for command-line
//! argument parsing.

use clap::{Parser, ValueEnum};

use crate::config::environment::env_name;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Type a resolved value is coerced to by the CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ValueType {
    String,
    Bool,
    Int,
    Timestamp,
}

/// Identity tuple addressing remote and relational lookups.
///
/// Together with the `(scope, name)` pair of a key this forms the full
/// address of a configuration item: the same key can resolve to different
/// values for different projects, applications, environments or services.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Tenant the service belongs to
    pub project: String,
    /// Application within the project
    pub app: String,
    /// Deployment environment (`development`, `production`, ...)
    pub env: String,
    /// Service name
    pub svc: String,
}

impl Identity {
    pub fn new(
        project: impl Into<String>,
        app: impl Into<String>,
        env: impl Into<String>,
        svc: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            app: app.into(),
            env: env.into(),
            svc: svc.into(),
        }
    }

    /// Field names paired with their values, in addressing order.
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("project", self.project.as_str()),
            ("app", self.app.as_str()),
            ("env", self.env.as_str()),
            ("svc", self.svc.as_str()),
        ]
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Resolve from a local document
/// layered_config mail --config-url file://./config.yaml
///
/// # Remote service as origin, local file as mask, required integer
/// layered_config app.max_sessions --as int --required \
///     --config-url galaxy://config.internal:8080,file://./override.yaml \
///     --project huable --app portal --svc api
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "layered_config",
    about = "Resolves a configuration value from one or two layered stores."
)]
pub struct Opt {
    /// Key to resolve: `name` or `scope.name`
    #[arg(value_parser)]
    pub key: String,

    /// Connection descriptor: `origin[,mask]`, each entry a file:, galaxy:// or database URL
    #[arg(long, env = "CONFIG_URL", default_value = "file://./config.yaml")]
    pub config_url: String,

    /// Project (tenant) of the calling service
    #[arg(long, env = "CONFIG_PROJECT", default_value = "")]
    pub project: String,

    /// Application of the calling service
    #[arg(long, env = "CONFIG_APP", default_value = "")]
    pub app: String,

    /// Environment; defaults to `development` in debug mode, else `production`
    #[arg(long, env = "CONFIG_ENV")]
    pub env: Option<String>,

    /// Service name
    #[arg(long, env = "CONFIG_SVC", default_value = "")]
    pub svc: String,

    /// Type to coerce the value to
    #[arg(long = "as", value_enum, default_value_t = ValueType::String)]
    pub value_type: ValueType,

    /// Terminate with a non-zero exit code when the key cannot be resolved
    #[arg(long)]
    pub required: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Opt {
    /// Builds the identity tuple from the parsed options.
    pub fn identity(&self) -> Identity {
        Identity {
            project: self.project.clone(),
            app: self.app.clone(),
            env: self.env.clone().unwrap_or_else(|| env_name().to_string()),
            svc: self.svc.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_identity_fields_order() {
        let identity = Identity::new("huable", "portal", "production", "api");
        let names: Vec<&str> = identity.fields().iter().map(|(k, _)| *k).collect();
        assert_eq!(names, vec!["project", "app", "env", "svc"]);
        assert_eq!(identity.fields()[3].1, "api");
    }

    #[test]
    fn test_opt_parses_key_and_flags() {
        let opt = Opt::try_parse_from([
            "layered_config",
            "app.max_sessions",
            "--config-url",
            "galaxy://cfg:8080,file://./local.yaml",
            "--project",
            "huable",
            "--env",
            "staging",
            "--as",
            "int",
            "--required",
        ])
        .expect("options should parse");

        assert_eq!(opt.key, "app.max_sessions");
        assert_eq!(opt.value_type, ValueType::Int);
        assert!(opt.required);
        let identity = opt.identity();
        assert_eq!(identity.project, "huable");
        assert_eq!(identity.env, "staging");
    }

    #[test]
    fn test_opt_rejects_unknown_value_type() {
        let result = Opt::try_parse_from(["layered_config", "mail", "--as", "float"]);
        assert!(result.is_err());
    }
}
