//! Single-lookahead argument tokenizer.
//!
//! A flag is `-X` (exactly one non-space character) or `--XX...` (two or
//! more). A flag takes the next token as its value unless that token is
//! itself a flag, in which case it is recorded as [`OptionValue::Present`].
//! A flag with nothing after it is recorded as [`OptionValue::Null`].
//! Everything else (including `-ab` and `--c`) is positional. Note that
//! `--` alone is a flag named `-`, while `-_` is positional.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::types::{OptionValue, POSITIONAL_KEY, ParsedOptions};

static FLAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:-(\S)|--(\S{2,}))$").expect("static regex must compile"));

/// Returns the flag name if `token` is a flag. `-_` would shadow the
/// positional bucket, so it stays positional.
fn flag_name(token: &str) -> Option<&str> {
    let caps = FLAG_RE.captures(token)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .filter(|name| *name != POSITIONAL_KEY)
}

/// Tokenizes `args`, skipping element 0 (the program name).
///
/// # Examples
///
/// ```
/// use optdecl_core::{OptionValue, tokenize};
///
/// let parsed = tokenize(&["prog", "-a", "1", "-g", "-i", "8", "two"]);
/// assert_eq!(parsed.get("a"), Some(&OptionValue::from("1")));
/// assert_eq!(parsed.get("g"), Some(&OptionValue::Present));
/// assert_eq!(parsed.get("i"), Some(&OptionValue::from("8")));
/// assert_eq!(parsed.positional(), ["two"]);
/// ```
pub fn tokenize<S: AsRef<str>>(args: &[S]) -> ParsedOptions {
    let mut parsed = ParsedOptions::new();
    let mut pending: Option<&str> = None;

    for token in args.iter().skip(1).map(AsRef::as_ref) {
        match (pending, flag_name(token)) {
            (None, Some(name)) => pending = Some(name),
            (Some(flag), Some(name)) => {
                parsed.insert(flag, OptionValue::Present);
                pending = Some(name);
            }
            (Some(flag), None) => {
                parsed.insert(flag, OptionValue::from(token));
                pending = None;
            }
            (None, None) => parsed.push_positional(token),
        }
    }

    if let Some(flag) = pending {
        parsed.insert(flag, OptionValue::Null);
    }

    debug!(
        flags = parsed.len(),
        positional = parsed.positional().len(),
        "Tokenized arguments"
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_grammar() {
        assert_eq!(flag_name("-a"), Some("a"));
        assert_eq!(flag_name("--ee"), Some("ee"));
        assert_eq!(flag_name("--size"), Some("size"));
        assert_eq!(flag_name("--c"), None);
        assert_eq!(flag_name("-ff"), None);
        assert_eq!(flag_name("-"), None);
        assert_eq!(flag_name("--"), Some("-"));
        assert_eq!(flag_name("---"), None);
        assert_eq!(flag_name("-1"), Some("1"));
        assert_eq!(flag_name("- "), None);
        assert_eq!(flag_name("plain"), None);
    }

    #[test]
    fn test_mixed_arguments() {
        let args = [
            "script_name", "-a", "1", "-b", "2", "--c", "3", "--d", "4", "--ee", "6", "-ff", "7",
            "-g", "-i", "8", "two", "three",
        ];
        let parsed = tokenize(&args);

        assert_eq!(
            parsed.positional(),
            ["--c", "3", "--d", "4", "-ff", "7", "two", "three"]
        );
        let flags: Vec<_> = parsed.iter().collect();
        assert_eq!(
            flags,
            vec![
                ("a", &OptionValue::from("1")),
                ("b", &OptionValue::from("2")),
                ("ee", &OptionValue::from("6")),
                ("g", &OptionValue::Present),
                ("i", &OptionValue::from("8")),
            ]
        );
    }

    #[test]
    fn test_trailing_flag_is_null() {
        let parsed = tokenize(&["prog", "file", "--verbose"]);
        assert_eq!(parsed.get("verbose"), Some(&OptionValue::Null));
        assert_eq!(parsed.positional(), ["file"]);
    }

    #[test]
    fn test_consecutive_flags_then_trailing() {
        let parsed = tokenize(&["prog", "-a", "-b"]);
        assert_eq!(parsed.get("a"), Some(&OptionValue::Present));
        assert_eq!(parsed.get("b"), Some(&OptionValue::Null));
    }

    #[test]
    fn test_later_occurrence_wins() {
        let parsed = tokenize(&["prog", "-n", "1", "x", "-n", "2", "y"]);
        assert_eq!(parsed.get("n"), Some(&OptionValue::from("2")));
        assert_eq!(parsed.positional(), ["x", "y"]);
    }

    #[test]
    fn test_underscore_flag_stays_positional() {
        assert_eq!(flag_name("-_"), None);
        assert_eq!(flag_name("--__"), Some("__"));

        let parsed = tokenize(&["p", "one", "-_", "x"]);
        assert!(parsed.is_empty());
        assert_eq!(parsed.positional(), ["one", "-_", "x"]);

        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json, serde_json::json!({"_": ["one", "-_", "x"]}));
    }

    #[test]
    fn test_program_name_only() {
        let parsed = tokenize(&["prog"]);
        assert!(parsed.is_empty());
        assert!(parsed.positional().is_empty());

        let parsed = tokenize::<&str>(&[]);
        assert!(parsed.is_empty());
    }
}
