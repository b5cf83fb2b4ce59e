/// Flat two-level key/value tables read from RON or INI files.

use indexmap::IndexMap;
use std::path::Path;
use thiserror::Error;

/// `section -> { key: value }`, in file order.
pub type ConfigTable = IndexMap<String, IndexMap<String, String>>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("INI syntax error on line {line}: {message}")]
    Ini { line: usize, message: String },
}

/// Load a table from disk. `.ini` files use the INI reader, anything
/// else is parsed as RON.
pub fn load(path: &Path) -> Result<ConfigTable, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let is_ini = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ini"));
    if is_ini {
        parse_ini(&contents)
    } else {
        parse_ron(&contents)
    }
}

/// Parse a RON map of maps: `{ "SECTION": { "key": "value" } }`.
pub fn parse_ron(input: &str) -> Result<ConfigTable, ConfigError> {
    Ok(ron::from_str(input)?)
}

/// Parse INI text.
///
/// Syntax:
/// - `[SECTION]` opens a section
/// - `key = value` or `key: value` adds an entry (split at the first separator)
/// - lines starting with `;` or `#` are comments
///
/// Key case is preserved. Duplicate sections or keys are rejected.
pub fn parse_ini(input: &str) -> Result<ConfigTable, ConfigError> {
    let mut table = ConfigTable::new();
    let mut current: Option<String> = None;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let name = rest
                .strip_suffix(']')
                .ok_or_else(|| ini_error(line_no, "unclosed section header"))?
                .trim();
            if name.is_empty() {
                return Err(ini_error(line_no, "empty section name"));
            }
            if table.contains_key(name) {
                return Err(ini_error(line_no, format!("duplicate section '{}'", name)));
            }
            table.insert(name.to_string(), IndexMap::new());
            current = Some(name.to_string());
            continue;
        }

        let section = current
            .as_ref()
            .and_then(|name| table.get_mut(name))
            .ok_or_else(|| ini_error(line_no, "entry outside of any section"))?;

        let split_at = line
            .find(|c: char| c == '=' || c == ':')
            .ok_or_else(|| ini_error(line_no, "expected 'key = value'"))?;
        let key = line[..split_at].trim();
        let value = line[split_at + 1..].trim();
        if key.is_empty() {
            return Err(ini_error(line_no, "empty key"));
        }
        if section.contains_key(key) {
            return Err(ini_error(line_no, format!("duplicate key '{}'", key)));
        }
        section.insert(key.to_string(), value.to_string());
    }

    Ok(table)
}

fn ini_error(line: usize, message: impl Into<String>) -> ConfigError {
    ConfigError::Ini {
        line,
        message: message.into(),
    }
}
