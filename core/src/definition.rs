//! Option definitions.
//!
//! An [`OptionConfig`] is the loose, deserializable description of one
//! option, as written in a definition file or assembled with builder
//! methods. Converting it into an [`OptionDefinition`] checks the key and
//! compiles the validation pattern; the resulting definition is immutable.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer};

use crate::error::{ConfigurationError, Result};
use crate::types::OptionValue;

/// Configuration for one option, before validation.
///
/// Field names follow the definition file format. The canonical key also
/// accepts the legacy name `arg`, and the message overrides accept the
/// camel-case spellings `promptMsg`, `patternMsg` and `requiredMsg`.
///
/// # Examples
///
/// ```
/// use optdecl_core::{OptionConfig, OptionDefinition};
///
/// let config = OptionConfig::new("s")
///     .with_alias("size")
///     .with_help("Number of items")
///     .with_pattern(r"\d+")
///     .required();
///
/// let definition = OptionDefinition::new(config).unwrap();
/// assert_eq!(definition.key(), "s");
/// assert!(definition.is_required());
/// assert!(definition.accepts("42"));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionConfig {
    /// Canonical flag name (e.g. `"s"` for `-s`, `"size"` for `--size`).
    #[serde(default, alias = "arg")]
    pub key: Option<String>,
    /// Secondary name treated as equivalent to the key.
    #[serde(default)]
    pub alias: Option<String>,
    /// Whether the option must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Value returned when the option was not supplied. Any scalar is
    /// accepted and kept as text.
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub default: Option<String>,
    /// Description used in help output and the default prompt.
    #[serde(default)]
    pub help: Option<String>,
    /// Ask for a value interactively when the option is missing.
    #[serde(default)]
    pub prompt: bool,
    /// Regular expression every supplied value must match.
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default, alias = "promptMsg")]
    pub prompt_message: Option<String>,
    #[serde(default, alias = "patternMsg")]
    pub pattern_message: Option<String>,
    #[serde(default, alias = "requiredMsg")]
    pub required_message: Option<String>,
}

impl OptionConfig {
    /// Creates a configuration with the given canonical key.
    pub fn new(key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            ..Default::default()
        }
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the fallback value.
    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    /// Adds help text.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Enables interactive prompting when the option is missing.
    pub fn prompt(mut self) -> Self {
        self.prompt = true;
        self
    }

    /// Sets the validation pattern.
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    /// Overrides the prompt message.
    pub fn with_prompt_message(mut self, message: &str) -> Self {
        self.prompt_message = Some(message.to_string());
        self
    }

    /// Overrides the pattern mismatch message.
    pub fn with_pattern_message(mut self, message: &str) -> Self {
        self.pattern_message = Some(message.to_string());
        self
    }

    /// Overrides the missing option message.
    pub fn with_required_message(mut self, message: &str) -> Self {
        self.required_message = Some(message.to_string());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_scalar<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let scalar = Option::<Scalar>::deserialize(deserializer)?;
    Ok(scalar.map(|scalar| match scalar {
        Scalar::Bool(value) => value.to_string(),
        Scalar::Int(value) => value.to_string(),
        Scalar::Float(value) => value.to_string(),
        Scalar::Text(value) => value,
    }))
}

#[derive(Debug, Clone)]
struct Pattern {
    source: String,
    regex: Regex,
}

/// Validated, immutable description of one recognized option.
#[derive(Debug, Clone)]
pub struct OptionDefinition {
    key: String,
    alias: Option<String>,
    required: bool,
    default: Option<OptionValue>,
    help: Option<String>,
    prompt: bool,
    pattern: Option<Pattern>,
    prompt_message: Option<String>,
    pattern_message: Option<String>,
    required_message: Option<String>,
}

impl OptionDefinition {
    /// Builds a definition from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MissingKey`](ConfigurationError::MissingKey) if the key is
    /// absent or blank, and
    /// [`InvalidPattern`](ConfigurationError::InvalidPattern) if the pattern
    /// does not compile.
    pub fn new(config: OptionConfig) -> Result<Self> {
        let key = match config.key {
            Some(key) if !key.trim().is_empty() => key,
            _ => return Err(ConfigurationError::MissingKey),
        };

        let pattern = match config.pattern {
            Some(source) => {
                let regex = compile_pattern(&source).map_err(|source| {
                    ConfigurationError::InvalidPattern {
                        key: key.clone(),
                        source,
                    }
                })?;
                Some(Pattern { source, regex })
            }
            None => None,
        };

        Ok(Self {
            key,
            alias: config.alias.filter(|alias| !alias.is_empty()),
            required: config.required,
            default: config.default.map(OptionValue::Text),
            help: config.help,
            prompt: config.prompt,
            pattern,
            prompt_message: config.prompt_message,
            pattern_message: config.pattern_message,
            required_message: config.required_message,
        })
    }

    /// Canonical flag name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Secondary name, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Whether the option must be supplied.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Value used when the option is not supplied.
    pub fn default_value(&self) -> Option<&OptionValue> {
        self.default.as_ref()
    }

    /// Help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Whether a missing option is asked for interactively.
    pub fn is_prompt(&self) -> bool {
        self.prompt
    }

    /// The pattern as it was written, delimiters included.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(|pattern| pattern.source.as_str())
    }

    /// Whether `name` is this option's key or alias.
    pub fn matches(&self, name: &str) -> bool {
        self.key == name || self.alias.as_deref() == Some(name)
    }

    /// Whether `value` satisfies the pattern. Always `true` without one.
    pub fn accepts(&self, value: &str) -> bool {
        self.pattern
            .as_ref()
            .is_none_or(|pattern| pattern.regex.is_match(value))
    }

    /// Message reported when the option is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use optdecl_core::{OptionConfig, OptionDefinition};
    ///
    /// let def = OptionDefinition::new(OptionConfig::new("test")).unwrap();
    /// assert_eq!(def.required_message(), "Option -test is required.");
    /// ```
    pub fn required_message(&self) -> String {
        match &self.required_message {
            Some(message) => message.clone(),
            None => format!("Option -{} is required.", self.key),
        }
    }

    /// Message reported when a value does not match the pattern.
    pub fn pattern_message(&self) -> String {
        match &self.pattern_message {
            Some(message) => message.clone(),
            None => format!(
                "Option -{} must match pattern: {}",
                self.key,
                self.pattern().unwrap_or_default()
            ),
        }
    }

    /// Message shown before reading interactive input.
    pub fn prompt_message(&self) -> String {
        match &self.prompt_message {
            Some(message) => message.clone(),
            None => format!("Please enter ({}):", self.help.as_deref().unwrap_or_default()),
        }
    }

    /// One line of the options table: flag forms, required marker, help.
    pub(crate) fn help_line(&self) -> String {
        let mut names = flag_form(&self.key);
        if let Some(alias) = &self.alias {
            names.push_str(", ");
            names.push_str(&flag_form(alias));
        }
        let marker = if self.required { "[Required] " } else { "" };
        format!("\t{names}\t{marker}{}", self.help.as_deref().unwrap_or_default())
    }
}

impl TryFrom<OptionConfig> for OptionDefinition {
    type Error = ConfigurationError;

    fn try_from(config: OptionConfig) -> Result<Self> {
        Self::new(config)
    }
}

/// Renders `-x` for single-character names and `--name` otherwise.
fn flag_form(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}

/// Compiles a bare expression, or a `/body/flags` delimited one.
fn compile_pattern(source: &str) -> std::result::Result<Regex, regex::Error> {
    let (body, flags) = split_delimited(source).unwrap_or((source, ""));
    RegexBuilder::new(body)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .ignore_whitespace(flags.contains('x'))
        .build()
}

fn split_delimited(source: &str) -> Option<(&str, &str)> {
    let rest = source.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    let flags = &rest[end + 1..];
    if flags.chars().all(|c| matches!(c, 'i' | 'm' | 's' | 'x' | 'u')) {
        Some((&rest[..end], flags))
    } else {
        None
    }
}
