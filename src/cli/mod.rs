//! Command-line layer: tokenizer, option parser and usage text

pub mod args;
pub mod help;
pub mod parser;

pub use args::{raw_command_line, Argument, ArgumentCursor, CommandLine};
pub use help::{print_help, USAGE};
pub use parser::{Action, OptionParser, ParsedArgs};
