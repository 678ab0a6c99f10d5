//! Parsed argument types.
//!
//! A parse produces a [`ParsedOptions`]: an insertion-ordered map from flag
//! name to [`OptionValue`], plus the positional bucket. Serialized, the
//! positional bucket appears under the `"_"` key.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Key under which positional arguments are exposed when serialized.
pub const POSITIONAL_KEY: &str = "_";

/// Value recorded for one flag.
///
/// # Examples
///
/// ```
/// use optdecl_core::OptionValue;
///
/// let value = OptionValue::from("8");
/// assert_eq!(value.as_str(), Some("8"));
/// assert_eq!(OptionValue::Present.as_str(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// The flag consumed the following token as its value.
    Text(String),
    /// The flag was immediately followed by another flag.
    Present,
    /// The flag was the last token, with nothing after it.
    Null,
}

impl OptionValue {
    /// Returns the text value, if the flag carried one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Present | Self::Null => None,
        }
    }

    /// Text a validation pattern is matched against. Flags without a value
    /// are matched as the empty string.
    pub(crate) fn match_text(&self) -> &str {
        self.as_str().unwrap_or("")
    }
}

impl From<&str> for OptionValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Present => serializer.serialize_bool(true),
            Self::Null => serializer.serialize_none(),
        }
    }
}

/// Result of tokenizing an argument vector.
///
/// Rebuilt from scratch on every parse. A flag given twice keeps its first
/// position but takes the later value.
///
/// # Examples
///
/// ```
/// use optdecl_core::{Getopt, OptionValue};
///
/// let mut getopt = Getopt::new(["prog", "-v", "--out", "a.txt", "input"]);
/// let parsed = getopt.parse().parsed_options();
///
/// assert_eq!(parsed.get("v"), Some(&OptionValue::Present));
/// assert_eq!(parsed.get("out"), Some(&OptionValue::from("a.txt")));
/// assert_eq!(parsed.positional(), ["input"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOptions {
    flags: IndexMap<String, OptionValue>,
    positional: Vec<String>,
}

impl ParsedOptions {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a flag by its literal name (no alias resolution).
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.flags.get(name)
    }

    /// Whether a flag with this literal name was recorded.
    pub fn contains_key(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    /// Positional arguments in the order they were given.
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Recorded flags in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.flags.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of recorded flags, not counting positional arguments.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns `true` if no flag was recorded.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: OptionValue) {
        self.flags.insert(name.into(), value);
    }

    pub(crate) fn push_positional(&mut self, token: impl Into<String>) {
        self.positional.push(token.into());
    }
}

impl Serialize for ParsedOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.flags.len() + 1))?;
        map.serialize_entry(POSITIONAL_KEY, &self.positional)?;
        for (name, value) in &self.flags {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_flag_keeps_position_takes_last_value() {
        let mut parsed = ParsedOptions::new();
        parsed.insert("a", OptionValue::from("1"));
        parsed.insert("b", OptionValue::Present);
        parsed.insert("a", OptionValue::from("2"));

        let names: Vec<_> = parsed.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(parsed.get("a"), Some(&OptionValue::from("2")));
    }

    #[test]
    fn test_serializes_positional_bucket_first() {
        let mut parsed = ParsedOptions::new();
        parsed.push_positional("two");
        parsed.insert("g", OptionValue::Present);
        parsed.insert("x", OptionValue::Null);
        parsed.insert("i", OptionValue::from("8"));

        let json = serde_json::to_string(&parsed).unwrap();
        assert_eq!(json, r#"{"_":["two"],"g":true,"x":null,"i":"8"}"#);
    }

    #[test]
    fn test_valueless_flags_match_as_empty_text() {
        assert_eq!(OptionValue::Present.match_text(), "");
        assert_eq!(OptionValue::Null.match_text(), "");
        assert_eq!(OptionValue::from("21").match_text(), "21");
    }
}
