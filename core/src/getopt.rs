//! The option parsing engine.
//!
//! [`Getopt`] owns the argument vector, the registered definitions and the
//! three I/O capabilities. [`Getopt::parse`] tokenizes the arguments, shows
//! help when asked to, and otherwise validates every definition in
//! registration order, prompting for corrected input where the definition
//! allows it.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::definition::{OptionConfig, OptionDefinition};
use crate::error::Result;
use crate::io::{
    ConsoleReporter, InputSource, ProcessExit, Reporter, StdinInput, Termination, Terminator,
};
use crate::tokenize::tokenize;
use crate::types::{OptionValue, ParsedOptions};
use crate::validate::{check_definition, supplied_values};

/// Placeholder substituted with the program name in usage templates.
const PROGRAM_PLACEHOLDER: &str = "$0";

const USAGE_PREFIX: &str = "Usage:";

struct Channels {
    reporter: Box<dyn Reporter>,
    terminator: Box<dyn Terminator>,
    input: Box<dyn InputSource>,
}

/// Declarative command-line option parser.
///
/// # Examples
///
/// ```
/// use optdecl_core::{Getopt, OptionConfig, OptionValue, Termination};
///
/// let mut getopt = Getopt::new(["prog", "--size", "12", "input.txt"])
///     .with_reporter(|_usage: &str, message: &str| eprintln!("{message}"))
///     .with_terminator(|_reason: Termination| {});
///
/// getopt
///     .register_option(OptionConfig::new("s").with_alias("size").with_pattern(r"^\d+$"))
///     .unwrap()
///     .register_option(OptionConfig::new("type").with_default("int"))
///     .unwrap();
///
/// getopt.parse();
/// assert_eq!(getopt.get("s"), Some(&OptionValue::from("12")));
/// assert_eq!(getopt.get("type"), Some(&OptionValue::from("int")));
/// assert_eq!(getopt.parsed_options().positional(), ["input.txt"]);
/// ```
pub struct Getopt {
    args: Vec<String>,
    usage: Option<String>,
    definitions: IndexMap<String, OptionDefinition>,
    parsed: ParsedOptions,
    channels: Channels,
}

impl Getopt {
    /// Creates an engine over `args`, whose first element is the program
    /// name. Messages go to stdout, input comes from stdin and termination
    /// exits the process; replace any of these with the `with_*` methods.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            usage: None,
            definitions: IndexMap::new(),
            parsed: ParsedOptions::new(),
            channels: Channels {
                reporter: Box::new(ConsoleReporter::default()),
                terminator: Box::new(ProcessExit),
                input: Box::new(StdinInput),
            },
        }
    }

    /// Creates an engine over the current process arguments.
    pub fn from_env() -> Self {
        Self::new(std::env::args())
    }

    /// Replaces the report channel.
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.channels.reporter = Box::new(reporter);
        self
    }

    /// Replaces the terminate channel.
    pub fn with_terminator(mut self, terminator: impl Terminator + 'static) -> Self {
        self.channels.terminator = Box::new(terminator);
        self
    }

    /// Replaces the input channel.
    pub fn with_input(mut self, input: impl InputSource + 'static) -> Self {
        self.channels.input = Box::new(input);
        self
    }

    /// Replaces the argument vector used by the next [`parse`](Self::parse).
    pub fn set_args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Element 0 of the argument vector, or `""` when it is empty.
    pub fn program_name(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }

    /// Builds a definition from `config` and registers it under its key,
    /// replacing any earlier definition with the same key.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigurationError`](crate::ConfigurationError) from
    /// [`OptionDefinition::new`].
    pub fn register_option(&mut self, config: OptionConfig) -> Result<&mut Self> {
        let definition = OptionDefinition::new(config)?;
        Ok(self.register(definition))
    }

    /// Registers an already-built definition.
    pub fn register(&mut self, definition: OptionDefinition) -> &mut Self {
        self.definitions
            .insert(definition.key().to_string(), definition);
        self
    }

    /// Removes every definition. Parsed results are left untouched.
    pub fn clear_options(&mut self) -> &mut Self {
        self.definitions.clear();
        self
    }

    /// Registered definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &OptionDefinition> {
        self.definitions.values()
    }

    /// Stores a usage template, substituting `$0` with the program name now.
    /// A leading `Usage:` in the template is dropped.
    pub fn set_usage(&mut self, template: &str) -> &mut Self {
        let template = template
            .strip_prefix(USAGE_PREFIX)
            .map(str::trim_start)
            .unwrap_or(template);
        self.usage = Some(template.replace(PROGRAM_PLACEHOLDER, self.program_name()));
        self
    }

    /// The stored usage text, or `Usage: <program>` if none was set.
    ///
    /// # Examples
    ///
    /// ```
    /// use optdecl_core::Getopt;
    ///
    /// let mut getopt = Getopt::new(["script_name"]);
    /// assert_eq!(getopt.usage(), "Usage: script_name");
    ///
    /// getopt.set_usage("please use it like this $0 -x [num]");
    /// assert_eq!(getopt.usage(), "please use it like this script_name -x [num]");
    /// ```
    pub fn usage(&self) -> String {
        match &self.usage {
            Some(usage) => usage.clone(),
            None => format!("{USAGE_PREFIX} {}", self.program_name()),
        }
    }

    /// Usage line followed by one line per definition.
    pub fn help_message(&self) -> String {
        let mut message = self.usage();
        message.push_str("\nOptions:\n");
        for definition in self.definitions.values() {
            message.push_str(&definition.help_line());
            message.push('\n');
        }
        message
    }

    /// Parses the argument vector from scratch and validates it.
    ///
    /// Problems are reported through the report channel; unrecoverable ones
    /// also go through the terminate channel. Neither escapes as an error.
    pub fn parse(&mut self) -> &mut Self {
        self.parsed = tokenize(&self.args);

        if self.parsed.contains_key("h") || self.parsed.contains_key("help") {
            debug!("Help requested");
            let usage = self.usage();
            let help = self.help_message();
            self.channels.reporter.report(&usage, &help);
            self.channels.terminator.terminate(Termination::HelpRequested);
            return self;
        }

        let usage = self.usage();
        for definition in self.definitions.values() {
            if let Err(failure) = check_definition(definition, &self.parsed) {
                debug!(key = %definition.key(), kind = ?failure.kind, "Option failed validation");
                self.channels.reporter.report(&usage, &failure.message);
                repair(definition, &usage, &mut self.parsed, &mut self.channels);
            }
        }

        self
    }

    /// Result of the last [`parse`](Self::parse).
    pub fn parsed_options(&self) -> &ParsedOptions {
        &self.parsed
    }

    /// Looks up a value by literal parsed name, then by definition key or
    /// alias, falling back to the definition's default.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        if let Some(value) = self.parsed.get(name) {
            return Some(value);
        }

        let definition = self.definitions.values().find(|def| def.matches(name))?;
        self.parsed
            .get(definition.key())
            .or_else(|| definition.alias().and_then(|alias| self.parsed.get(alias)))
            .or(definition.default_value())
    }
}

/// Tries to recover from a failed definition, prompting when allowed.
fn repair(
    definition: &OptionDefinition,
    usage: &str,
    parsed: &mut ParsedOptions,
    channels: &mut Channels,
) {
    let pass_in = supplied_values(definition, parsed).next().is_some();
    if pass_in || !definition.is_prompt() {
        warn!(key = %definition.key(), supplied = pass_in, "Option cannot be repaired");
        channels.terminator.terminate(Termination::InvalidOption);
        return;
    }

    channels
        .reporter
        .report(usage, &definition.prompt_message());
    loop {
        let Some(line) = channels.input.read_line() else {
            warn!(key = %definition.key(), "Input closed while prompting");
            channels.terminator.terminate(Termination::InvalidOption);
            return;
        };

        if line.is_empty() {
            if !definition.is_required() {
                debug!(key = %definition.key(), "Optional prompt left blank");
                return;
            }
            channels
                .reporter
                .report(usage, &definition.prompt_message());
            continue;
        }

        if !definition.accepts(&line) {
            channels
                .reporter
                .report(usage, &definition.pattern_message());
            continue;
        }

        info!(key = %definition.key(), "Accepted prompted value");
        parsed.insert(definition.key(), OptionValue::Text(line));
        return;
    }
}
