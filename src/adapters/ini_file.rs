// SPDX-License-Identifier: MIT OR Apache-2.0

//! INI file configuration source adapter.
//!
//! The dialect follows the common `configparser` conventions:
//!
//! - `[section]` headers; keys are addressable as `section.key`
//! - `key = value` or `key: value`, values trimmed and always strings
//! - `#` and `;` start comment lines
//! - indented lines continue the previous value
//! - keys in `[DEFAULT]`, or before the first section, are inherited by every
//!   section and are also addressable at the root
//! - duplicate sections and duplicate keys within a section are errors

use crate::adapters::file::FileAdapter;
use crate::domain::{ConfigError, RawValue, Result};
use crate::ports::ConfigParser;
use std::collections::BTreeMap;

/// Name of the section whose keys every other section inherits.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// INI parser implementation.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::IniParser;
/// use layercfg::domain::RawValue;
/// use layercfg::ports::ConfigParser;
///
/// let tree = IniParser::new()
///     .parse("[DEFAULT]\ntimeout = 30\n\n[server]\nhost = example.org\n")
///     .unwrap();
/// let server = tree.get("server").unwrap();
/// assert_eq!(server.get("host"), Some(&RawValue::from("example.org")));
/// assert_eq!(server.get("timeout"), Some(&RawValue::from("30")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IniParser;

impl IniParser {
    /// Creates a new INI parser.
    pub fn new() -> Self {
        IniParser
    }
}

type Section = BTreeMap<String, String>;

fn parse_error(line_no: usize, message: impl std::fmt::Display) -> ConfigError {
    ConfigError::ParseError {
        message: format!("Failed to parse INI at line {}: {}", line_no, message),
        source: None,
    }
}

impl ConfigParser for IniParser {
    fn parse(&self, content: &str) -> Result<RawValue> {
        let mut defaults = Section::new();
        let mut sections: Vec<(String, Section)> = Vec::new();
        // None while in the default section
        let mut current: Option<usize> = None;
        let mut last_key: Option<String> = None;

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            // Continuation of the previous value
            if line.starts_with(char::is_whitespace) {
                if let Some(key) = &last_key {
                    let section = match current {
                        Some(i) => &mut sections[i].1,
                        None => &mut defaults,
                    };
                    if let Some(value) = section.get_mut(key) {
                        value.push('\n');
                        value.push_str(trimmed);
                        continue;
                    }
                }
                return Err(parse_error(line_no, "unexpected indented line"));
            }

            if let Some(rest) = trimmed.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| parse_error(line_no, format!("bad section header '{}'", trimmed)))?;

                last_key = None;
                if name == DEFAULT_SECTION {
                    current = None;
                    continue;
                }
                if sections.iter().any(|(existing, _)| existing == name) {
                    return Err(parse_error(line_no, format!("duplicate section '{}'", name)));
                }
                sections.push((name.to_string(), Section::new()));
                current = Some(sections.len() - 1);
                continue;
            }

            let split_at = trimmed
                .find(|c: char| c == '=' || c == ':')
                .ok_or_else(|| parse_error(line_no, format!("expected 'key = value', found '{}'", trimmed)))?;
            let key = trimmed[..split_at].trim();
            let value = trimmed[split_at + 1..].trim();
            if key.is_empty() {
                return Err(parse_error(line_no, "empty key"));
            }

            let section = match current {
                Some(i) => &mut sections[i].1,
                None => &mut defaults,
            };
            if section.insert(key.to_string(), value.to_string()).is_some() {
                return Err(parse_error(line_no, format!("duplicate key '{}'", key)));
            }
            last_key = Some(key.to_string());
        }

        let mut root: BTreeMap<String, RawValue> = defaults
            .iter()
            .map(|(k, v)| (k.clone(), RawValue::from(v.as_str())))
            .collect();

        for (name, entries) in sections {
            let mut merged: BTreeMap<String, RawValue> = defaults
                .iter()
                .map(|(k, v)| (k.clone(), RawValue::from(v.as_str())))
                .collect();
            merged.extend(entries.into_iter().map(|(k, v)| (k, RawValue::from(v))));

            if root.insert(name.clone(), RawValue::Map(merged)).is_some() {
                tracing::debug!("INI section '{}' shadows a default key of the same name", name);
            }
        }

        Ok(RawValue::Map(root))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["ini", "cfg"]
    }

    fn format_name(&self) -> &str {
        "ini"
    }
}

/// Configuration source adapter for INI files.
pub type IniFileAdapter = FileAdapter<IniParser>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ConfigSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
; global settings
timeout = 30

[bitbucket.org]
User = hg

[topsecret.server.com]
Port: 50022
ForwardX11 = no
timeout = 5
description = first line
    second line
"#;

    fn section<'a>(tree: &'a RawValue, name: &str) -> &'a RawValue {
        tree.get(name).unwrap()
    }

    #[test]
    fn test_ini_parser_sections() {
        let tree = IniParser::new().parse(SAMPLE).unwrap();
        let top = section(&tree, "topsecret.server.com");

        assert_eq!(top.get("Port"), Some(&RawValue::from("50022")));
        assert_eq!(top.get("ForwardX11"), Some(&RawValue::from("no")));
        assert_eq!(
            section(&tree, "bitbucket.org").get("User"),
            Some(&RawValue::from("hg"))
        );
    }

    #[test]
    fn test_ini_parser_defaults_inherited() {
        let tree = IniParser::new().parse(SAMPLE).unwrap();

        assert_eq!(tree.get("timeout"), Some(&RawValue::from("30")));
        assert_eq!(
            section(&tree, "bitbucket.org").get("timeout"),
            Some(&RawValue::from("30"))
        );
        // A section's own key wins over the default.
        assert_eq!(
            section(&tree, "topsecret.server.com").get("timeout"),
            Some(&RawValue::from("5"))
        );
    }

    #[test]
    fn test_ini_parser_default_section_header() {
        let tree = IniParser::new()
            .parse("[server]\nhost = a\n[DEFAULT]\nretries = 3\n")
            .unwrap();
        assert_eq!(tree.get("retries"), Some(&RawValue::from("3")));
        assert_eq!(
            section(&tree, "server").get("retries"),
            Some(&RawValue::from("3"))
        );
    }

    #[test]
    fn test_ini_parser_continuation_lines() {
        let tree = IniParser::new().parse(SAMPLE).unwrap();
        assert_eq!(
            section(&tree, "topsecret.server.com").get("description"),
            Some(&RawValue::from("first line\nsecond line"))
        );
    }

    #[test]
    fn test_ini_parser_errors() {
        let parser = IniParser::new();
        assert!(parser.parse("[a]\nx = 1\n[a]\ny = 2\n").is_err());
        assert!(parser.parse("[a]\nx = 1\nx = 2\n").is_err());
        assert!(parser.parse("[a]\njust a key\n").is_err());
        assert!(parser.parse("[unterminated\n").is_err());
        assert!(parser.parse("  indented first\n").is_err());
    }

    #[test]
    fn test_ini_adapter_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[database]\nhost = localhost\n").unwrap();

        let adapter = IniFileAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.name(), "ini-file");
        assert_eq!(
            adapter.get_str("database.host").unwrap(),
            Some(RawValue::from("localhost"))
        );
    }
}
