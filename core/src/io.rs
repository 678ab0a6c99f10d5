//! Effectful boundaries of the engine.
//!
//! The engine never prints, reads stdin or exits on its own. It talks to a
//! [`Reporter`], an [`InputSource`] and a [`Terminator`], each of which has a
//! console default and a blanket implementation for closures so tests can
//! substitute in-memory fakes.

use std::io::{BufRead, Write};

use tracing::debug;

/// Why the engine asked to terminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// `-h` or `--help` was given and help was shown.
    HelpRequested,
    /// An option was missing or invalid and could not be repaired.
    InvalidOption,
}

impl Termination {
    /// Process exit code for this reason.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::HelpRequested => 0,
            Self::InvalidOption => 1,
        }
    }
}

/// Surfaces a message to the user.
pub trait Reporter {
    /// `usage` is the current usage line, for reporters that show it
    /// alongside each message.
    fn report(&mut self, usage: &str, message: &str);
}

/// Asks the surrounding program to stop.
pub trait Terminator {
    /// Called once per unrecoverable failure or help request. The default
    /// implementation does not return.
    fn terminate(&mut self, reason: Termination);
}

/// Supplies one line of interactive input. `None` means input is closed.
pub trait InputSource {
    /// Blocks for one trimmed line of input.
    fn read_line(&mut self) -> Option<String>;
}

impl<F: FnMut(&str, &str)> Reporter for F {
    fn report(&mut self, usage: &str, message: &str) {
        self(usage, message)
    }
}

impl<F: FnMut(Termination)> Terminator for F {
    fn terminate(&mut self, reason: Termination) {
        self(reason)
    }
}

impl<F: FnMut() -> Option<String>> InputSource for F {
    fn read_line(&mut self) -> Option<String> {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Prints the usage line and the message to a standard stream.
///
/// The usage line is skipped when the message already starts with it, which
/// is the case for the rendered help text.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    stream: Stream,
}

impl ConsoleReporter {
    /// Reports to standard output.
    pub fn stdout() -> Self {
        Self {
            stream: Stream::Stdout,
        }
    }

    /// Reports to standard error.
    pub fn stderr() -> Self {
        Self {
            stream: Stream::Stderr,
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, usage: &str, message: &str) {
        let text = render_report(usage, message);
        let result = match self.stream {
            Stream::Stdout => std::io::stdout().lock().write_all(text.as_bytes()),
            Stream::Stderr => std::io::stderr().lock().write_all(text.as_bytes()),
        };
        if let Err(e) = result {
            debug!(error = %e, "Failed to write report");
        }
    }
}

fn render_report(usage: &str, message: &str) -> String {
    if usage.is_empty() || message.starts_with(usage) {
        format!("{message}\n")
    } else {
        format!("{usage}\n{message}\n")
    }
}

/// Exits the process with [`Termination::exit_code`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl Terminator for ProcessExit {
    fn terminate(&mut self, reason: Termination) {
        std::process::exit(reason.exit_code());
    }
}

/// Reads trimmed lines from standard input.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinInput;

impl InputSource for StdinInput {
    fn read_line(&mut self) -> Option<String> {
        if let Err(e) = std::io::stdout().flush() {
            debug!(error = %e, "Failed to flush prompt");
        }
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                debug!(error = %e, "Failed to read input line");
                None
            }
        }
    }
}

/// Input that is always closed, for non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn read_line(&mut self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_report_prefixes_usage() {
        assert_eq!(
            render_report("Usage: prog", "Option -s is required."),
            "Usage: prog\nOption -s is required.\n"
        );
    }

    #[test]
    fn test_render_report_skips_usage_already_in_message() {
        assert_eq!(
            render_report("Usage: prog", "Usage: prog\nOptions:\n"),
            "Usage: prog\nOptions:\n\n"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Termination::HelpRequested.exit_code(), 0);
        assert_eq!(Termination::InvalidOption.exit_code(), 1);
    }

    #[test]
    fn test_closures_implement_capabilities() {
        let mut lines = vec!["b".to_string(), "a".to_string()];
        let mut input = move || lines.pop();
        assert_eq!(InputSource::read_line(&mut input), Some("a".to_string()));
        assert_eq!(InputSource::read_line(&mut input), Some("b".to_string()));
        assert_eq!(InputSource::read_line(&mut input), None);

        let mut seen = Vec::new();
        let mut terminator = |reason: Termination| seen.push(reason);
        Terminator::terminate(&mut terminator, Termination::InvalidOption);
        assert_eq!(seen, vec![Termination::InvalidOption]);
    }
}
