//! Integration tests for option parsing and its exit codes

use proptest::prelude::*;
use superuser::cli::{Action, ArgumentCursor, OptionParser};
use superuser::core::types::{ErrorKind, ExitCoordinator, LaunchStrategy, Outcome};

fn option_letters() -> impl Strategy<Value = Vec<char>> {
    prop::collection::vec(prop::sample::select(vec!['r', 's', 'v', 'w']), 1..8)
}

fn command() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "",
        "cmd.exe",
        "notepad.exe C:\\Windows\\win.ini",
        "powershell -NoProfile -Command Get-Process",
        "cmd.exe /c whoami /priv",
    ])
    .prop_map(str::to_string)
}

fn prefix() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['/', '-'])
}

fn line(tokens: &[String], command: &str) -> String {
    let mut line = String::from("superuser.exe");
    for token in tokens {
        line.push(' ');
        line.push_str(token);
    }
    if !command.is_empty() {
        line.push(' ');
        line.push_str(command);
    }
    line
}

proptest! {
    #[test]
    fn grouped_options_equal_separate_ones(
        letters in option_letters(),
        p in prefix(),
        command in command(),
    ) {
        let grouped = vec![format!("{}{}", p, letters.iter().collect::<String>())];
        let separate: Vec<String> = letters.iter().rev().map(|c| format!("{}{}", p, c)).collect();

        let a = OptionParser::parse(&line(&grouped, &command));
        let b = OptionParser::parse(&line(&separate, &command));

        prop_assert_eq!(a.options, b.options);
        prop_assert_eq!(
            a.action.map_err(|e| e.kind()),
            b.action.map_err(|e| e.kind())
        );
    }

    #[test]
    fn return_or_seamless_without_wait_is_inconsistent(
        letters in prop::collection::vec(prop::sample::select(vec!['r', 's', 'v']), 1..6),
        command in command(),
    ) {
        prop_assume!(letters.iter().any(|&c| c == 'r' || c == 's'));
        let tokens: Vec<String> = letters.iter().map(|c| format!("/{}", c)).collect();
        let parsed = OptionParser::parse(&line(&tokens, &command));
        prop_assert_eq!(parsed.action.unwrap_err().kind(), ErrorKind::InconsistentOptions);
    }

    #[test]
    fn help_short_circuits_whatever_follows(
        before in prop::collection::vec(prop::sample::select(vec!["/v", "/w", "-v"]), 0..3),
        after in "[ a-zA-Z/\\-]{0,24}",
    ) {
        let mut text = String::from("superuser.exe");
        for token in &before {
            text.push(' ');
            text.push_str(token);
        }
        text.push_str(" /h ");
        text.push_str(&after);

        let parsed = OptionParser::parse(&text);
        prop_assert_eq!(parsed.action.unwrap(), Action::Help);
    }

    #[test]
    fn command_is_verbatim_remainder(command in "[a-z]{1,8}\\.exe( [a-zA-Z0-9 /:.\\-]{0,20})?") {
        let text = format!("superuser.exe /w {}", command);
        match OptionParser::parse(&text).action.unwrap() {
            Action::Run { command: Some(parsed) } => prop_assert_eq!(parsed, command),
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }
}

#[test]
fn test_documented_grouping() {
    let expected = OptionParser::parse("su /wrs").options;
    assert_eq!(OptionParser::parse("su /w /r /s").options, expected);
    assert_eq!(OptionParser::parse("su /s /r /w").options, expected);
    assert_eq!(expected.strategy, LaunchStrategy::Seamless);
}

#[test]
fn test_omitted_command_uses_default() {
    let parsed = OptionParser::parse("superuser.exe /w");
    assert_eq!(parsed.action.unwrap(), Action::Run { command: None });
}

#[test]
fn test_quoted_program_name_is_skipped() {
    let mut cursor = ArgumentCursor::new("\"C:\\Program Files\\su\\superuser.exe\" /w cmd.exe");
    assert_eq!(cursor.next().map(|a| a.text), Some("/w"));
    assert_eq!(cursor.next().map(|a| a.rest), Some("cmd.exe"));
    assert!(cursor.next().is_none());
}

#[test]
fn test_parse_failures_map_to_exit_codes() {
    let cases = [
        ("su /x", false, 1),
        ("su /s", false, 1),
        ("su /r", true, -1_000_001),
        ("su /rx", true, -1_000_001),
        ("su /h /r", false, 0),
    ];
    for (text, propagate, expected) in cases {
        let parsed = OptionParser::parse(text);
        assert_eq!(parsed.options.return_code, propagate, "{}", text);
        let outcome = match parsed.action {
            Ok(Action::Help) => Outcome::Help,
            Ok(action) => panic!("unexpected {:?} for {}", action, text),
            Err(e) => Outcome::Failed(e.kind()),
        };
        let coordinator = ExitCoordinator::new(parsed.options.return_code);
        assert_eq!(coordinator.exit_code(&outcome), expected, "{}", text);
    }
}
