//! Usage text

pub const USAGE: &str = "
superuser [options] [command_to_run]

Options (you can use either \"-\" or \"/\"):
  /h  Display this help message.
  /r  Return the exit code of the child process. Requires /w.
  /s  The child process shares the parent's console. Requires /w.
  /v  Display verbose messages.
  /w  Wait for the child process to finish before exiting.
";

pub fn print_help() {
    println!("{}", USAGE);
}
