//! Process configuration.
//!
//! `process` is underspecified in both versions but is treated as required.
//! Executable resolution for `args[0]` is contradictory upstream, so `args`
//! is only checked to be a non-empty array of strings.
//!
//! Reference: <https://github.com/opencontainers/runtime-spec/blob/v1.0.0-rc1/config.md#process-configuration>

use serde_json::{Map, Value};

use super::{Rule, Section, display, required, required_str};
use crate::context::CheckContext;
use crate::gate::Gate;
use crate::outcome::{Outcome, Violation};

pub(super) const RULES: &[Rule] = &[
    Rule {
        id: "process",
        section: Section::Process,
        summary: "process (object, required)",
        gates: &[Gate::RecognizedVersion],
        check: process,
    },
    Rule {
        id: "process.terminal",
        section: Section::Process,
        summary: "terminal (bool, optional)",
        gates: &[Gate::RecognizedVersion, Gate::ProcessObject("terminal")],
        check: terminal,
    },
    Rule {
        id: "process.cwd",
        section: Section::Process,
        summary: "cwd (string, required) MUST be an absolute path",
        gates: &[
            Gate::RecognizedVersion,
            Gate::ProcessObject("cwd"),
            Gate::PathSeparatorMatches,
        ],
        check: cwd,
    },
    Rule {
        id: "process.env",
        section: Section::Process,
        summary: "env (array of KEY=value strings, optional)",
        gates: &[Gate::RecognizedVersion, Gate::ProcessObject("env")],
        check: env,
    },
    Rule {
        id: "process.args",
        section: Section::Process,
        summary: "args (array of strings, required)",
        gates: &[Gate::RecognizedVersion, Gate::ProcessObject("args")],
        check: args,
    },
];

/// First character of an environment key outside `[A-Za-z0-9_]`.
#[must_use]
pub fn invalid_env_key_char(key: &str) -> Option<char> {
    key.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
}

/// The process object. Gated rules can rely on it being present.
fn process_object(ctx: &CheckContext) -> Option<&Map<String, Value>> {
    ctx.field("process").and_then(Value::as_object)
}

fn process(ctx: &CheckContext) -> Outcome {
    match ctx.field("process") {
        None => Outcome::fail("process is not set", "process"),
        Some(value) if !value.is_object() => Outcome::fail("process is not an object", "process"),
        Some(_) => Outcome::Pass,
    }
}

fn terminal(ctx: &CheckContext) -> Outcome {
    match process_object(ctx).and_then(|process| process.get("terminal")) {
        Some(value) if !value.is_boolean() => {
            Outcome::fail("process.terminal is not a boolean", "process.terminal")
        }
        _ => Outcome::Pass,
    }
}

fn cwd(ctx: &CheckContext) -> Outcome {
    check_cwd(ctx).into()
}

fn check_cwd(ctx: &CheckContext) -> Result<(), Violation> {
    let Some(process) = process_object(ctx) else {
        return Ok(());
    };
    let cwd = required_str(process, "cwd", "process.cwd")?;
    if !ctx.convention().is_absolute(cwd) {
        return Err(Violation::new(
            "process.cwd MUST be an absolute path",
            "process.cwd",
        ));
    }
    Ok(())
}

fn env(ctx: &CheckContext) -> Outcome {
    let Some(env) = process_object(ctx).and_then(|process| process.get("env")) else {
        return Outcome::Pass;
    };
    let Some(env) = env.as_array() else {
        return Outcome::fail("process.env is not an array", "process.env");
    };

    let mut violations = Vec::new();
    for (i, entry) in env.iter().enumerate() {
        if let Err(violation) = check_env_entry(i, entry) {
            violations.push(violation);
        }
    }
    Outcome::from_violations(violations)
}

fn check_env_entry(i: usize, entry: &Value) -> Result<(), Violation> {
    let location = format!("process.env[{i}]");
    let Some(entry) = entry.as_str() else {
        return Err(Violation::new(
            format!("process.env[{i}] ({}) is not a string", display(entry)),
            location,
        ));
    };

    // The only POSIX requirement is an equals sign.
    let Some((key, _)) = entry.split_once('=') else {
        return Err(Violation::new(
            format!("process.env[{i}] ({entry}) does not contain an equals sign"),
            location,
        ));
    };

    if let Some(c) = invalid_env_key_char(key) {
        return Err(Violation::new(
            format!("process.env[{i}]'s key ({key}) contains an invalid character: '{c}'"),
            location,
        ));
    }
    Ok(())
}

fn args(ctx: &CheckContext) -> Outcome {
    let Some(process) = process_object(ctx) else {
        return Outcome::Pass;
    };
    let args = match required(process, "args", "process.args") {
        Ok(args) => args,
        Err(violation) => return Outcome::from_violations(vec![violation]),
    };
    let Some(args) = args.as_array() else {
        return Outcome::fail("process.args is not an array", "process.args");
    };
    if args.is_empty() {
        return Outcome::fail(
            "process.args must have at least one element",
            "process.args",
        );
    }

    let violations = args
        .iter()
        .enumerate()
        .filter(|(_, arg)| !arg.is_string())
        .map(|(i, arg)| {
            Violation::new(
                format!("process.args[{i}] ({}) is not a string", display(arg)),
                format!("process.args[{i}]"),
            )
        })
        .collect();
    Outcome::from_violations(violations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{Bundle, LoadResult};
    use crate::context::HostContext;
    use crate::path::PathConvention;

    fn context(process: &str) -> CheckContext {
        let json = format!(
            r#"{{"ociVersion": "1.0.0-rc1", "platform": {{"os": "linux"}}, "process": {process}}}"#
        );
        CheckContext::new(
            Bundle::new("/bundle"),
            LoadResult::from_bytes("/bundle/config.json", json),
            HostContext::with_convention(PathConvention::Posix),
        )
    }

    fn evaluate(id: &str, process: &str) -> Outcome {
        let rule = RULES.iter().find(|rule| rule.id == id).unwrap();
        rule.evaluate(&context(process))
    }

    #[test]
    fn test_invalid_env_key_char() {
        assert_eq!(invalid_env_key_char("PATH"), None);
        assert_eq!(invalid_env_key_char("MY_VAR_2"), None);
        assert_eq!(invalid_env_key_char("BAD KEY"), Some(' '));
        assert_eq!(invalid_env_key_char("a-b"), Some('-'));
        assert_eq!(invalid_env_key_char("É"), Some('É'));
    }

    #[test]
    fn test_process_required() {
        let ctx = CheckContext::new(
            Bundle::new("/bundle"),
            LoadResult::from_bytes("/bundle/config.json", r#"{"ociVersion": "0.5.0"}"#),
            HostContext::current(),
        );
        assert_eq!(
            RULES[0].evaluate(&ctx),
            Outcome::fail("process is not set", "process")
        );
        for rule in &RULES[1..] {
            assert!(rule.evaluate(&ctx).is_skip(), "{} did not skip", rule.id);
        }

        assert_eq!(
            evaluate("process", "[]"),
            Outcome::fail("process is not an object", "process")
        );
    }

    #[test]
    fn test_terminal() {
        assert!(evaluate("process.terminal", r#"{"terminal": true}"#).is_pass());
        assert!(evaluate("process.terminal", r"{}").is_pass());
        assert_eq!(
            evaluate("process.terminal", r#"{"terminal": 0}"#),
            Outcome::fail("process.terminal is not a boolean", "process.terminal")
        );
    }

    #[test]
    fn test_cwd() {
        assert!(evaluate("process.cwd", r#"{"cwd": "/"}"#).is_pass());
        assert_eq!(
            evaluate("process.cwd", r"{}"),
            Outcome::fail("process.cwd is not set", "process.cwd")
        );
        assert_eq!(
            evaluate("process.cwd", r#"{"cwd": ["/"]}"#),
            Outcome::fail("process.cwd is not a string", "process.cwd")
        );
        assert_eq!(
            evaluate("process.cwd", r#"{"cwd": "var/www"}"#),
            Outcome::fail("process.cwd MUST be an absolute path", "process.cwd")
        );
    }

    #[test]
    fn test_env() {
        assert!(evaluate("process.env", r#"{"env": ["PATH=/usr/bin", "EMPTY="]}"#).is_pass());
        assert!(evaluate("process.env", r"{}").is_pass());
        assert_eq!(
            evaluate("process.env", r#"{"env": "PATH=/usr/bin"}"#),
            Outcome::fail("process.env is not an array", "process.env")
        );
    }

    #[test]
    fn test_env_entries() {
        let outcome = evaluate(
            "process.env",
            r#"{"env": ["PATH=/usr/bin", "NOEQUALS", "BAD KEY=1", 42, "A=b=c"]}"#,
        );
        assert_eq!(
            outcome.violations(),
            &[
                Violation::new(
                    "process.env[1] (NOEQUALS) does not contain an equals sign",
                    "process.env[1]"
                ),
                Violation::new(
                    "process.env[2]'s key (BAD KEY) contains an invalid character: ' '",
                    "process.env[2]"
                ),
                Violation::new("process.env[3] (42) is not a string", "process.env[3]"),
            ]
        );
    }

    #[test]
    fn test_args() {
        assert!(evaluate("process.args", r#"{"args": ["sh"]}"#).is_pass());
        assert_eq!(
            evaluate("process.args", r#"{"args": []}"#),
            Outcome::fail(
                "process.args must have at least one element",
                "process.args"
            )
        );
        assert_eq!(
            evaluate("process.args", r"{}"),
            Outcome::fail("process.args is not set", "process.args")
        );
        assert_eq!(
            evaluate("process.args", r#"{"args": "sh"}"#),
            Outcome::fail("process.args is not an array", "process.args")
        );
        assert_eq!(
            evaluate("process.args", r#"{"args": ["sh", null]}"#),
            Outcome::fail("process.args[1] (null) is not a string", "process.args[1]")
        );
    }
}
