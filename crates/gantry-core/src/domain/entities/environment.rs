//! The environment map: `KEY=VALUE` pairs parsed from an env file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::error::ConfigError;

/// Ordered, read-only mapping of environment keys to values.
///
/// Invariant: keys are unique. Inserting an existing key replaces its value
/// and keeps the key at its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
    origin: Option<PathBuf>,
}

impl EnvironmentMap {
    /// An empty map with no origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse env-file text.
    ///
    /// Blank lines and `#` comments are skipped, as are lines without `=`
    /// and lines with an empty key. Only the first `=` splits, so values may
    /// contain `=`. A value wrapped in one matching pair of `"` or `'` loses
    /// exactly that pair.
    pub fn parse(text: &str) -> Self {
        let mut map = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            map.insert(key, strip_quotes(value.trim()));
        }
        map
    }

    /// Record the file this map was read from.
    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Insert or overwrite one entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    /// Value for a key that must be present.
    pub fn require(&self, key: &'static str) -> Result<&str, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingKey { key })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Entries in first-seen key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The file this map was loaded from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

impl<K, V> FromIterator<(K, V)> for EnvironmentMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_pairs() {
        let env = EnvironmentMap::parse("APP_ID=basic\nAPP_NAME=My App\n");
        assert_eq!(env.get("APP_ID"), Some("basic"));
        assert_eq!(env.get("APP_NAME"), Some("My App"));
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn last_assignment_wins_and_keeps_position() {
        let env = EnvironmentMap::parse("A=1\nB=2\nA=3\n");
        assert_eq!(env.get("A"), Some("3"));
        let keys: Vec<_> = env.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["A", "B"]);
    }

    #[test]
    fn blank_and_comment_lines_produce_nothing() {
        let env = EnvironmentMap::parse("\n   \n# A=1\n   # B=2\n\t\n");
        assert!(env.is_empty());
    }

    #[test]
    fn splits_on_first_equals_only() {
        let env = EnvironmentMap::parse("DSN=mysql:host=localhost;dbname=app");
        assert_eq!(env.get("DSN"), Some("mysql:host=localhost;dbname=app"));
    }

    #[test]
    fn lines_without_equals_are_skipped() {
        let env = EnvironmentMap::parse("JUSTAKEY\nA=1\nexport\n");
        assert_eq!(env.len(), 1);
        assert!(!env.contains_key("JUSTAKEY"));
    }

    #[test]
    fn key_and_value_are_trimmed() {
        let env = EnvironmentMap::parse("  KEY  =   some value   ");
        assert_eq!(env.get("KEY"), Some("some value"));
    }

    #[test]
    fn empty_key_is_skipped() {
        let env = EnvironmentMap::parse("=value\n");
        assert!(env.is_empty());
    }

    #[test]
    fn strips_exactly_one_layer_of_matching_quotes() {
        let env = EnvironmentMap::parse(
            "D=\"double\"\nS='single'\nN=\"\"nested\"\"\nE=\"\"\nQ=\"\n",
        );
        assert_eq!(env.get("D"), Some("double"));
        assert_eq!(env.get("S"), Some("single"));
        assert_eq!(env.get("N"), Some("\"nested\""));
        assert_eq!(env.get("E"), Some(""));
        // a lone quote is not a matching pair
        assert_eq!(env.get("Q"), Some("\""));
    }

    #[test]
    fn mismatched_or_partial_quotes_are_verbatim() {
        let env = EnvironmentMap::parse("A=\"mixed'\nB=\"open\nC=close'\nD=in\"side\"x");
        assert_eq!(env.get("A"), Some("\"mixed'"));
        assert_eq!(env.get("B"), Some("\"open"));
        assert_eq!(env.get("C"), Some("close'"));
        assert_eq!(env.get("D"), Some("in\"side\"x"));
    }

    #[test]
    fn empty_value_is_kept() {
        let env = EnvironmentMap::parse("DB_PASSWORD=\n");
        assert_eq!(env.get("DB_PASSWORD"), Some(""));
    }

    #[test]
    fn require_reports_the_missing_key() {
        let env = EnvironmentMap::parse("A=1");
        assert_eq!(
            env.require("DB_HOST"),
            Err(ConfigError::MissingKey { key: "DB_HOST" })
        );
    }

    #[test]
    fn handles_crlf_line_endings() {
        let env = EnvironmentMap::parse("A=1\r\nB='two'\r\n");
        assert_eq!(env.get("A"), Some("1"));
        assert_eq!(env.get("B"), Some("two"));
    }
}
