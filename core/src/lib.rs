//! Declarative command-line option definitions.
//!
//! This crate parses a raw argument vector against a set of declared
//! options and exposes the results by key or alias:
//!
//! - [`OptionConfig`] / [`OptionDefinition`] — one recognized option: key,
//!   alias, required flag, default, validation pattern, help text, message
//!   overrides and interactive prompting.
//! - [`Getopt`] — the engine: tokenizes arguments, shows help on `-h` /
//!   `--help`, validates every definition and prompts for corrected input
//!   where a definition allows it.
//! - [`Reporter`], [`InputSource`], [`Terminator`] — the only effectful
//!   boundaries, injectable so the engine can run without a console.
//! - [`DefinitionFile`] — YAML/JSON files declaring options and a usage
//!   template.
//!
//! # Example
//!
//! ```
//! use optdecl_core::*;
//!
//! let messages = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
//! let sink = messages.clone();
//!
//! let mut getopt = Getopt::new(["gen", "-s", "10"])
//!     .with_reporter(move |_usage: &str, message: &str| sink.borrow_mut().push(message.to_string()))
//!     .with_terminator(|_reason: Termination| {})
//!     .with_input(|| Some("int".to_string()));
//!
//! getopt
//!     .register_option(OptionConfig::new("s").with_alias("size").required())
//!     .unwrap()
//!     .register_option(
//!         OptionConfig::new("t")
//!             .with_alias("type")
//!             .prompt()
//!             .with_pattern("^(int|string)$")
//!             .with_help("Type of items"),
//!     )
//!     .unwrap();
//!
//! getopt.parse();
//! assert_eq!(getopt.get("size").and_then(OptionValue::as_str), Some("10"));
//! assert_eq!(getopt.get("type").and_then(OptionValue::as_str), Some("int"));
//! assert_eq!(
//!     *messages.borrow(),
//!     vec!["Option -t is required.", "Please enter (Type of items):"]
//! );
//! ```

mod config;
mod definition;
mod error;
mod getopt;
mod io;
mod tokenize;
mod types;
mod validate;

pub use config::DefinitionFile;
pub use definition::{OptionConfig, OptionDefinition};
pub use error::{ConfigurationError, Result};
pub use getopt::Getopt;
pub use io::{
    ConsoleReporter, InputSource, NoInput, ProcessExit, Reporter, StdinInput, Termination,
    Terminator,
};
pub use tokenize::tokenize;
pub use types::{OptionValue, POSITIONAL_KEY, ParsedOptions};
pub use validate::{FailureKind, OptionFailure, check_definition};
