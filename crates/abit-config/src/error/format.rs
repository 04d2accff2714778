//! Error formatting with colors for terminal output

use crate::error::ConfigError;
use std::fmt;
use yansi::Paint;

/// Renders a [`ConfigError`] for humans, colored when stderr is a terminal
pub struct ErrorFormatter {
    error: ConfigError,
    use_colors: bool,
}

impl ErrorFormatter {
    pub fn new(error: ConfigError) -> Self {
        Self {
            error,
            use_colors: supports_color(),
        }
    }

    pub fn format(&self) -> String {
        if self.use_colors {
            self.format_colored()
        } else {
            self.error.to_string()
        }
    }

    fn format_colored(&self) -> String {
        match &self.error {
            ConfigError::InvalidEnum {
                field,
                value,
                options,
                hint,
            } => {
                let value_str = format!("'{}'", value);
                format!(
                    "{} Invalid value {} for {}\n  {}: {}\n  {}: {}",
                    "✗".red().bold(),
                    value_str.yellow(),
                    field.cyan(),
                    "Valid options".bold(),
                    options,
                    "Hint".bold(),
                    hint.green()
                )
            }
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => format!(
                "{} {} must be between {} and {}, got {}",
                "✗".red().bold(),
                field.cyan(),
                min.green(),
                max.green(),
                value.red()
            ),
            ConfigError::ValidationError { field, message } => {
                format!("{} {}: {}", "✗".red().bold(), field.cyan(), message)
            }
            ConfigError::FileNotFound { path } => {
                let path_str = path.display().to_string();
                format!(
                    "{} Configuration file not found: {}",
                    "✗".red().bold(),
                    path_str.yellow()
                )
            }
            other => other.to_string(),
        }
    }
}

fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stderr)
}

impl fmt::Display for ErrorFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_format_matches_display() {
        let error = ConfigError::validation("retrieval.top_k", "must be > 0");
        let expected = error.to_string();
        let formatter = ErrorFormatter {
            error,
            use_colors: false,
        };
        assert_eq!(formatter.format(), expected);
    }

    #[test]
    fn test_format_invalid_enum() {
        let error = ConfigError::invalid_enum("embedding.backend", "foo", &["local", "openai", "ollama"]);
        let formatter = ErrorFormatter {
            error,
            use_colors: false,
        };
        let output = formatter.format();
        assert!(output.contains("Invalid value"));
        assert!(output.contains("'foo'"));
    }
}
