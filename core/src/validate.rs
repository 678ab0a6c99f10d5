//! Checking parsed arguments against one option definition.
//!
//! [`check_definition`] returns an [`OptionFailure`] for the two conditions
//! the engine knows how to report and repair: a missing option and a value
//! that does not match the definition's pattern.

use thiserror::Error;

use crate::definition::OptionDefinition;
use crate::types::{OptionValue, ParsedOptions};

/// What went wrong with an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A required or prompt-enabled option was not supplied.
    Missing,
    /// A supplied value does not match the pattern.
    PatternMismatch,
}

/// Validation failure for one definition, carrying the rendered message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct OptionFailure<'a> {
    pub definition: &'a OptionDefinition,
    pub kind: FailureKind,
    pub message: String,
}

impl<'a> OptionFailure<'a> {
    fn missing(definition: &'a OptionDefinition) -> Self {
        Self {
            definition,
            kind: FailureKind::Missing,
            message: definition.required_message(),
        }
    }

    fn pattern_mismatch(definition: &'a OptionDefinition) -> Self {
        Self {
            definition,
            kind: FailureKind::PatternMismatch,
            message: definition.pattern_message(),
        }
    }
}

/// Parsed entries recorded under the definition's key or alias, in parse
/// order.
pub(crate) fn supplied_values<'p>(
    definition: &OptionDefinition,
    parsed: &'p ParsedOptions,
) -> impl Iterator<Item = &'p OptionValue> {
    parsed
        .iter()
        .filter(move |(name, _)| definition.matches(name))
        .map(|(_, value)| value)
}

/// Validates one definition against the parsed arguments.
///
/// Every supplied value must match the pattern. An option that is required
/// or prompt-enabled must be supplied under its key or alias.
///
/// # Examples
///
/// ```
/// use optdecl_core::*;
///
/// let def = OptionDefinition::new(OptionConfig::new("size").required()).unwrap();
/// let failure = check_definition(&def, &ParsedOptions::new()).unwrap_err();
/// assert_eq!(failure.kind, FailureKind::Missing);
/// assert_eq!(failure.to_string(), "Option -size is required.");
/// ```
pub fn check_definition<'a>(
    definition: &'a OptionDefinition,
    parsed: &ParsedOptions,
) -> Result<(), OptionFailure<'a>> {
    let mut exists = false;
    for value in supplied_values(definition, parsed) {
        exists = true;
        if !definition.accepts(value.match_text()) {
            return Err(OptionFailure::pattern_mismatch(definition));
        }
    }

    if (definition.is_required() || definition.is_prompt()) && !exists {
        return Err(OptionFailure::missing(definition));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::definition::OptionConfig;

    use super::*;

    fn parsed_with(entries: &[(&str, OptionValue)]) -> ParsedOptions {
        let mut parsed = ParsedOptions::new();
        for (name, value) in entries {
            parsed.insert(*name, value.clone());
        }
        parsed
    }

    #[test]
    fn test_optional_absent_option_passes() {
        let def = OptionDefinition::new(OptionConfig::new("test1").with_default("x")).unwrap();
        assert!(check_definition(&def, &ParsedOptions::new()).is_ok());
    }

    #[test]
    fn test_prompt_option_counts_as_required() {
        let def = OptionDefinition::new(OptionConfig::new("name").prompt()).unwrap();
        let failure = check_definition(&def, &ParsedOptions::new()).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Missing);
        assert_eq!(failure.definition.key(), "name");
    }

    #[test]
    fn test_alias_satisfies_required() {
        let def =
            OptionDefinition::new(OptionConfig::new("t").with_alias("type").required()).unwrap();
        let parsed = parsed_with(&[("type", OptionValue::from("int"))]);
        assert!(check_definition(&def, &parsed).is_ok());
    }

    #[test]
    fn test_pattern_mismatch_reports_pattern_message() {
        let def = OptionDefinition::new(
            OptionConfig::new("test3")
                .with_pattern(r"/\d{2}/")
                .with_pattern_message("Has to be two digit"),
        )
        .unwrap();

        let failure =
            check_definition(&def, &parsed_with(&[("test3", OptionValue::from("ok"))])).unwrap_err();
        assert_eq!(failure.kind, FailureKind::PatternMismatch);
        assert_eq!(failure.message, "Has to be two digit");

        assert!(check_definition(&def, &parsed_with(&[("test3", OptionValue::from("21"))])).is_ok());
    }

    #[test]
    fn test_valueless_flag_fails_pattern() {
        let def = OptionDefinition::new(OptionConfig::new("n").with_pattern(r"\d")).unwrap();
        let parsed = parsed_with(&[("n", OptionValue::Present)]);
        assert!(check_definition(&def, &parsed).is_err());
    }

    #[test]
    fn test_every_supplied_name_is_checked() {
        let def = OptionDefinition::new(
            OptionConfig::new("s").with_alias("size").with_pattern(r"^\d+$"),
        )
        .unwrap();
        let parsed = parsed_with(&[
            ("s", OptionValue::from("3")),
            ("size", OptionValue::from("lots")),
        ]);
        let failure = check_definition(&def, &parsed).unwrap_err();
        assert_eq!(failure.kind, FailureKind::PatternMismatch);
    }
}
