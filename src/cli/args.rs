//! Lazy tokenizer over the raw process command line

use crate::core::types::LaunchRequest;

/// One whitespace-delimited token of the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argument<'a> {
    /// The token itself
    pub text: &'a str,
    /// The command line from the start of this token to its end, verbatim
    pub rest: &'a str,
}

/// Cursor over a raw command line, yielding one [`Argument`] per call.
///
/// The program name is skipped on construction. It may be quoted, and
/// whitespace inside quotes does not end it. The remaining tokens are split
/// on spaces and tabs only, so quoting there is left to the launched command.
#[derive(Debug, Clone)]
pub struct ArgumentCursor<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> ArgumentCursor<'a> {
    pub fn new(line: &'a str) -> Self {
        let mut quoted = false;
        let mut end = line.len();
        for (i, c) in line.char_indices() {
            match c {
                '"' => quoted = !quoted,
                ' ' | '\t' if !quoted => {
                    end = i;
                    break;
                }
                _ => {}
            }
        }
        ArgumentCursor { line, pos: end }
    }

    /// Unconsumed part of the line
    pub fn remainder(&self) -> &'a str {
        &self.line[self.pos..]
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

impl<'a> Iterator for ArgumentCursor<'a> {
    type Item = Argument<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.remainder().trim_start_matches(is_blank);
        if rest.is_empty() {
            self.pos = self.line.len();
            return None;
        }
        let len = rest.find(is_blank).unwrap_or(rest.len());
        self.pos = self.line.len() - rest.len() + len;
        Some(Argument {
            text: &rest[..len],
            rest,
        })
    }
}

/// A raw command line as UTF-16 units, with a decoded copy for parsing.
///
/// Each unpaired surrogate decodes to a single U+FFFD, so a suffix of the
/// text spans as many units as it did in the original line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    units: Vec<u16>,
    text: String,
}

impl CommandLine {
    pub fn from_wide(units: Vec<u16>) -> Self {
        let text = String::from_utf16_lossy(&units);
        CommandLine { units, text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Request for `command`, a trailing part of [`text`](Self::text), that
    /// carries the original units of that part
    pub fn request_for(&self, command: &str) -> LaunchRequest {
        let len = command.encode_utf16().count();
        match self.units.len().checked_sub(len) {
            Some(start) if self.text.ends_with(command) => {
                LaunchRequest::from_wide(self.units[start..].to_vec())
            }
            _ => LaunchRequest::new(command),
        }
    }
}

impl From<&str> for CommandLine {
    fn from(line: &str) -> Self {
        CommandLine {
            units: line.encode_utf16().collect(),
            text: line.to_string(),
        }
    }
}

/// The command line of the current process, as the OS passed it
#[cfg(windows)]
pub fn raw_command_line() -> CommandLine {
    use winapi::um::processenv::GetCommandLineW;
    // The returned buffer is owned by the process and stays valid
    CommandLine::from_wide(unsafe { crate::windows::utils::wide_ptr_to_units(GetCommandLineW()) })
}

/// The command line of the current process, rebuilt from its arguments
#[cfg(not(windows))]
pub fn raw_command_line() -> CommandLine {
    let line = std::env::args()
        .map(|arg| {
            if arg.contains(is_blank) {
                format!("\"{}\"", arg)
            } else {
                arg
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    CommandLine::from(line.as_str())
}
