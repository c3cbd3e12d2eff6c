//! Option parsing
//!
//! Options start with `/` or `-` and may be grouped (`/wrs`). The first token
//! that is not an option starts the command, which runs to the end of the
//! line unchanged.

use super::args::ArgumentCursor;
use crate::core::types::{ElevationError, LaunchOptions, LaunchStrategy};

/// What the invocation asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print help and exit successfully
    Help,
    /// Launch `command`, or the default command when `None`
    Run { command: Option<String> },
}

/// Result of parsing a command line.
///
/// `options` holds every flag seen before parsing stopped, even on error,
/// because `/r` also governs the exit code of a failed parse.
#[derive(Debug)]
pub struct ParsedArgs {
    pub options: LaunchOptions,
    pub action: Result<Action, ElevationError>,
}

/// Parses the tool's command line
pub struct OptionParser;

impl OptionParser {
    /// Parses a full raw command line, program name included
    pub fn parse(line: &str) -> ParsedArgs {
        let mut options = LaunchOptions::default();
        let action = Self::parse_into(line, &mut options);
        ParsedArgs { options, action }
    }

    fn parse_into(line: &str, options: &mut LaunchOptions) -> Result<Action, ElevationError> {
        let mut command = None;

        for arg in ArgumentCursor::new(line) {
            let flags = match arg.text.strip_prefix(&['/', '-'][..]) {
                Some(flags) if !flags.is_empty() => flags,
                _ => {
                    command = Some(arg.rest.to_string());
                    break;
                }
            };

            for flag in flags.chars() {
                match flag {
                    'h' => return Ok(Action::Help),
                    'r' => options.return_code = true,
                    's' => options.strategy = LaunchStrategy::Seamless,
                    'v' => options.verbose = true,
                    'w' => options.wait = true,
                    other => {
                        return Err(ElevationError::InvalidOption(format!(
                            "'{}' in \"{}\"",
                            other, arg.text
                        )))
                    }
                }
            }
        }

        let seamless = options.strategy == LaunchStrategy::Seamless;
        if (options.return_code || seamless) && !options.wait {
            return Err(ElevationError::InconsistentOptions(
                "/r or /s option requires /w".to_string(),
            ));
        }

        Ok(Action::Run { command })
    }
}
