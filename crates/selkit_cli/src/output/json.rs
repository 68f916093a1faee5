//! JSON output formatter

use miette::{IntoDiagnostic, Result};
use selkit_action::{ActionOutcome, ActionSource, ResolvedAction};
use selkit_core::Extension;
use serde_json::json;

fn print(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}

pub fn output_extensions(extensions: &[Extension]) -> Result<()> {
    let output: Vec<_> = extensions
        .iter()
        .map(|ext| {
            let set = ext.action_set();
            json!({
                "identifier": ext.identifier(),
                "name": ext.name(),
                "root": ext.root().display().to_string(),
                "populated": matches!(set.source, ActionSource::Populate(_)),
                "actions": set.declarations(),
                "options": ext.options(),
            })
        })
        .collect();
    print(&json!(output))
}

pub fn output_actions(actions: &[ResolvedAction]) -> Result<()> {
    let output: Vec<_> = actions
        .iter()
        .map(|action| {
            json!({
                "extension": action.extension,
                "identifier": action.identifier(),
                "title": action.title(),
                "enabled": action.is_enabled(),
                "matched": action.matched_text(),
                "captures": action.matched.record().map(|r| &r.captures),
            })
        })
        .collect();
    print(&json!(output))
}

pub fn output_outcome(outcome: &ActionOutcome) -> Result<()> {
    print(&serde_json::to_value(outcome).into_diagnostic()?)
}
