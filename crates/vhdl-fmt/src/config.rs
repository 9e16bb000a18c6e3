//! Formatter configuration.
//!
//! A [`FormatConfig`] is plain data. It can be built in code or read from a
//! TOML file where every key is optional:
//!
//! ```toml
//! line_width = 100
//! indent_size = 4
//! keyword_case = "upper"
//! align = false
//! ```
//!
//! Loading validates the numeric bounds, so the printer can assume them.

use std::borrow::Cow;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LINE_WIDTH_RANGE: RangeInclusive<usize> = 10..=200;
pub const INDENT_SIZE_RANGE: RangeInclusive<usize> = 1..=16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    /// Maximum line width before unions break. Default: 120.
    pub line_width: usize,
    /// Columns per indentation level. Default: 2.
    pub indent_size: usize,
    pub indent_style: IndentStyle,
    pub end_of_line: EndOfLine,
    /// Casing applied by the printer to `Keyword` leaves.
    pub keyword_case: Casing,
    /// Casing for constants and literals, applied by the document builder.
    pub constant_case: Casing,
    /// Casing for identifiers, applied by the document builder.
    pub identifier_case: Casing,
    /// Whether `Align` scopes pad their columns.
    pub align: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            line_width: 120,
            indent_size: 2,
            indent_style: IndentStyle::Spaces,
            end_of_line: EndOfLine::Lf,
            keyword_case: Casing::Lower,
            constant_case: Casing::Preserve,
            identifier_case: Casing::Preserve,
            align: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    Spaces,
    /// One tab per full indent unit, spaces for the remainder.
    Tabs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndOfLine {
    Lf,
    Crlf,
}

impl EndOfLine {
    pub fn as_str(self) -> &'static str {
        match self {
            EndOfLine::Lf => "\n",
            EndOfLine::Crlf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Casing {
    Lower,
    Upper,
    Preserve,
}

impl Casing {
    /// Fold `s` to this casing. Only ASCII letters change, so the display
    /// width is preserved and alignment measured on the raw text stays valid.
    pub fn apply(self, s: &str) -> Cow<'_, str> {
        match self {
            Casing::Lower if s.bytes().any(|b| b.is_ascii_uppercase()) => {
                Cow::Owned(s.to_ascii_lowercase())
            }
            Casing::Upper if s.bytes().any(|b| b.is_ascii_lowercase()) => {
                Cow::Owned(s.to_ascii_uppercase())
            }
            _ => Cow::Borrowed(s),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("{key} must be between {min} and {max}, got {value}")]
    OutOfRange {
        key: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
}

impl FormatConfig {
    /// Read, parse and validate a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML configuration. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: FormatConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("line_width", self.line_width, LINE_WIDTH_RANGE)?;
        check_range("indent_size", self.indent_size, INDENT_SIZE_RANGE)?;
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}

fn check_range(
    key: &'static str,
    value: usize,
    range: RangeInclusive<usize>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            key,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = FormatConfig::from_toml_str("").unwrap();
        assert_eq!(config, FormatConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
line_width = 80
indent_size = 4
indent_style = "tabs"
end_of_line = "crlf"
keyword_case = "upper"
constant_case = "upper"
identifier_case = "lower"
align = false
"#;
        let config = FormatConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.line_width, 80);
        assert_eq!(config.indent_size, 4);
        assert_eq!(config.indent_style, IndentStyle::Tabs);
        assert_eq!(config.end_of_line, EndOfLine::Crlf);
        assert_eq!(config.keyword_case, Casing::Upper);
        assert_eq!(config.constant_case, Casing::Upper);
        assert_eq!(config.identifier_case, Casing::Lower);
        assert!(!config.align);
    }

    #[test]
    fn reject_out_of_range_line_width() {
        let err = FormatConfig::from_toml_str("line_width = 5").unwrap_err();
        assert_eq!(err.to_string(), "line_width must be between 10 and 200, got 5");
    }

    #[test]
    fn reject_out_of_range_indent_size() {
        let err = FormatConfig::from_toml_str("indent_size = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange { key: "indent_size", value: 0, .. }
        ));
    }

    #[test]
    fn reject_unknown_keys_and_bad_values() {
        let err = FormatConfig::from_toml_str("linewidth = 80").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let err = FormatConfig::from_toml_str("keyword_case = \"title\"").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse configuration"));
    }

    #[test]
    fn toml_round_trip_of_defaults() {
        let text = FormatConfig::default().to_toml_string().unwrap();
        assert!(text.contains("line_width = 120"));
        assert!(text.contains("keyword_case = \"lower\""));
        assert_eq!(FormatConfig::from_toml_str(&text).unwrap(), FormatConfig::default());
    }

    #[test]
    fn from_file_reports_missing_path() {
        let err = FormatConfig::from_file(Path::new("/nonexistent/vhdlfmt.toml")).unwrap_err();
        assert!(err.to_string().starts_with("failed to read /nonexistent/vhdlfmt.toml"));
    }

    #[test]
    fn casing_apply() {
        assert_eq!(Casing::Lower.apply("ENTITY"), "entity");
        assert_eq!(Casing::Upper.apply("Downto"), "DOWNTO");
        assert_eq!(Casing::Preserve.apply("MiXeD"), "MiXeD");
        assert!(matches!(Casing::Lower.apply("already"), Cow::Borrowed(_)));
    }
}
