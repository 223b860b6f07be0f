//! Error types for coaweb-config
//!
//! A missing file is the only failure `main` recovers from (it falls back
//! to defaults). Everything else stops startup with the details printed.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigErrorCode {
    FileNotFound,
    Unreadable,
    InvalidYaml,
    InvalidValue,
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            ConfigErrorCode::FileNotFound => "FILE_NOT_FOUND",
            ConfigErrorCode::Unreadable => "UNREADABLE",
            ConfigErrorCode::InvalidYaml => "INVALID_YAML",
            ConfigErrorCode::InvalidValue => "INVALID_VALUE",
        };
        f.write_str(code)
    }
}

/// What went wrong and how to fix it, printed when startup aborts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigErrorDetails {
    pub code: ConfigErrorCode,
    pub message: String,
    /// Dotted key such as `server.port`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// 1-based line in the YAML file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl std::fmt::Display for ConfigErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        match (&self.field, self.line) {
            (Some(field), _) => write!(f, " (at {})", field)?,
            (None, Some(line)) => write!(f, " (line {})", line)?,
            (None, None) => {}
        }
        for suggestion in &self.suggestions {
            write!(f, "\n  hint: {}", suggestion)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Cannot read config file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Config file is not valid YAML: {message}")]
    InvalidYaml { message: String, line: Option<usize> },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(error: serde_yaml::Error) -> Self {
        ConfigError::InvalidYaml {
            line: error.location().map(|l| l.line()),
            message: error.to_string(),
        }
    }
}

impl ConfigError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ConfigErrorCode {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorCode::FileNotFound,
            ConfigError::Unreadable { .. } => ConfigErrorCode::Unreadable,
            ConfigError::InvalidYaml { .. } => ConfigErrorCode::InvalidYaml,
            ConfigError::InvalidValue { .. } => ConfigErrorCode::InvalidValue,
        }
    }

    pub fn to_details(&self) -> ConfigErrorDetails {
        let (field, line) = match self {
            ConfigError::InvalidValue { field, .. } => (Some(field.clone()), None),
            ConfigError::InvalidYaml { line, .. } => (None, *line),
            _ => (None, None),
        };
        ConfigErrorDetails {
            code: self.code(),
            message: self.to_string(),
            field,
            line,
            suggestions: self.suggestions(),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        let hints: &[&str] = match self {
            ConfigError::FileNotFound { .. } => &[
                "Pass --config with the path of your coaweb config file.",
                "Run coaweb --print-default-config > config.yaml for a starting file.",
            ],
            ConfigError::Unreadable { .. } => &["Check that the file is readable by the coaweb process."],
            ConfigError::InvalidYaml { .. } => &["Compare the file with coaweb --print-default-config."],
            ConfigError::InvalidValue { field, .. } => field_hint(field),
        };
        hints.iter().map(|h| h.to_string()).collect()
    }
}

fn field_hint(field: &str) -> &'static [&'static str] {
    match field {
        "server.port" => &["Use a free TCP port; the default is 8081."],
        "data.accounts_file" => &["Name the chart file inside data.path, for example accounts.json."],
        "currency.decimal_places" => &["Most currencies use 2 decimal places."],
        "logging.level" => &["RUST_LOG still overrides this level when set."],
        _ => &[],
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_details_name_the_field() {
        let details = ConfigError::invalid("server.port", "Port must be greater than 0").to_details();
        assert_eq!(details.code, ConfigErrorCode::InvalidValue);
        assert_eq!(details.field.as_deref(), Some("server.port"));
        assert_eq!(details.suggestions.len(), 1);
        assert!(details.to_string().starts_with("[INVALID_VALUE] Invalid value for server.port"));
    }

    #[test]
    fn test_yaml_error_points_at_template() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("a: b\nc: [unclosed").unwrap_err();
        let details = ConfigError::from(yaml_error).to_details();
        assert_eq!(details.code, ConfigErrorCode::InvalidYaml);
        assert!(details.field.is_none());
        assert_eq!(details.suggestions.len(), 1);
    }

    #[test]
    fn test_unreadable_keeps_source() {
        let err = ConfigError::Unreadable {
            path: "config.yaml".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.code().to_string(), "UNREADABLE");
        assert!(std::error::Error::source(&err).is_some());
    }
}
