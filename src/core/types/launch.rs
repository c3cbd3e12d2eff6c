//! Launch request and strategy types

use std::fmt;

/// How the elevated child process is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchStrategy {
    /// Child shares the caller's console and is created directly with a
    /// maximized copy of the service token. Needs the system context.
    Seamless,
    /// Child is created suspended in a new console with the service process
    /// as its parent, then its own token is maximized before it resumes.
    #[default]
    ParentReassigned,
}

impl fmt::Display for LaunchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchStrategy::Seamless => write!(f, "seamless"),
            LaunchStrategy::ParentReassigned => write!(f, "parent-reassigned"),
        }
    }
}

/// Options resolved from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LaunchOptions {
    pub strategy: LaunchStrategy,
    /// Emit diagnostic lines
    pub verbose: bool,
    /// Wait for the child to exit
    pub wait: bool,
    /// Propagate the child's exit code
    pub return_code: bool,
}

/// The command line to execute (image followed by its arguments).
///
/// The UTF-16 units are what the child receives. The text is only for
/// display and may hold U+FFFD where the units are not valid UTF-16.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    command_line: String,
    units: Vec<u16>,
}

impl LaunchRequest {
    pub fn new(command_line: impl Into<String>) -> Self {
        let command_line = command_line.into();
        let units = command_line.encode_utf16().collect();
        LaunchRequest {
            command_line,
            units,
        }
    }

    /// Request passing `units` to the child unchanged
    pub fn from_wide(units: Vec<u16>) -> Self {
        LaunchRequest {
            command_line: String::from_utf16_lossy(&units),
            units,
        }
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Null-terminated UTF-16 copy of the command line.
    ///
    /// Process creation may write into the command-line buffer, so every
    /// launch gets its own mutable copy.
    pub fn to_wide_buffer(&self) -> Vec<u16> {
        self.units.iter().copied().chain(Some(0)).collect()
    }
}

impl fmt::Display for LaunchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line)
    }
}

/// Result of a successful launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchReport {
    pub pid: u32,
    /// Set when the launcher waited for the child
    pub exit_code: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strategy() {
        let options = LaunchOptions::default();
        assert_eq!(options.strategy, LaunchStrategy::ParentReassigned);
        assert!(!options.verbose);
        assert!(!options.wait);
        assert!(!options.return_code);
    }

    #[test]
    fn test_wide_buffer_is_terminated() {
        let request = LaunchRequest::new("cmd.exe /c dir");
        let buffer = request.to_wide_buffer();
        assert_eq!(buffer.last(), Some(&0));
        assert_eq!(buffer.len(), "cmd.exe /c dir".len() + 1);
        assert_eq!(String::from_utf16_lossy(&buffer[..buffer.len() - 1]), "cmd.exe /c dir");
    }

    #[test]
    fn test_wide_buffer_is_a_copy() {
        let request = LaunchRequest::new("notepad.exe");
        let mut first = request.to_wide_buffer();
        first[0] = b'X' as u16;
        let second = request.to_wide_buffer();
        assert_eq!(second[0], b'n' as u16);
        assert_eq!(request.command_line(), "notepad.exe");
    }

    #[test]
    fn test_unpaired_surrogate_reaches_buffer() {
        let units = vec![b'a' as u16, 0xD800, b'b' as u16];
        let request = LaunchRequest::from_wide(units);
        assert_eq!(request.command_line(), "a\u{FFFD}b");
        assert_eq!(request.to_wide_buffer(), vec![b'a' as u16, 0xD800, b'b' as u16, 0]);
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(LaunchStrategy::Seamless.to_string(), "seamless");
        assert_eq!(LaunchStrategy::ParentReassigned.to_string(), "parent-reassigned");
    }
}
