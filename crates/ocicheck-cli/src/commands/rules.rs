//! Rules command implementation.

use anyhow::Result;
use ocicheck::{Gate, OutputFormat, Rule, RuleSet};
use serde_json::json;

/// Executes the rules command.
pub fn execute(format: OutputFormat) -> Result<()> {
    let rules = RuleSet::standard();

    match format {
        OutputFormat::Text => {
            println!("{:<28} {:<8} {}", "RULE", "SECTION", "REQUIREMENT");
            for rule in rules.rules() {
                println!("{:<28} {:<8} {}", rule.id, rule.section, rule.summary);
                if !rule.gates.is_empty() {
                    println!("{:<37} runs when: {}", "", describe_gates(rule));
                }
            }
        }
        OutputFormat::Json => {
            let listing: Vec<_> = rules
                .rules()
                .iter()
                .map(|rule| {
                    json!({
                        "id": rule.id,
                        "section": rule.section,
                        "summary": rule.summary,
                        "gates": rule.gates.iter().map(gate_name).collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }

    Ok(())
}

fn describe_gates(rule: &Rule) -> String {
    rule.gates
        .iter()
        .map(gate_name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn gate_name(gate: &Gate) -> String {
    match gate {
        Gate::ConfigPresent => "config.json exists".to_string(),
        Gate::DocumentPresent => "config.json is JSON".to_string(),
        Gate::VersionPresent => "ociVersion is a string".to_string(),
        Gate::RecognizedVersion => "ociVersion is recognized".to_string(),
        Gate::PathSeparatorMatches => "platform.os path convention matches host".to_string(),
        Gate::ProcessObject(_) => "process is an object".to_string(),
        Gate::Target { os, version } => format!("platform.os is {os} and ociVersion is {version}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_nesting_gates() {
        let rules = RuleSet::standard();
        let rule = rules.get("mounts.destination_nesting").unwrap();
        assert_eq!(
            describe_gates(rule),
            "ociVersion is recognized, platform.os is windows and ociVersion is 1.0.0-rc1, \
             platform.os path convention matches host"
        );
    }

    #[test]
    fn test_ungated_rule() {
        let rules = RuleSet::standard();
        let rule = rules.get("bundle.configuration").unwrap();
        assert!(describe_gates(rule).is_empty());
    }
}
