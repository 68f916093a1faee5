//! Text output formatter

use selkit_action::{ActionOutcome, ActionSource, ResolvedAction};
use selkit_core::Extension;

pub fn output_extensions(extensions: &[Extension]) {
    for ext in extensions {
        println!("{} ({})", ext.name(), ext.identifier());
        let set = ext.action_set();
        if let ActionSource::Populate(_) = set.source {
            println!("  (actions computed per selection)");
        }
        for declaration in set.declarations() {
            let state = if declaration.is_enabled() {
                ""
            } else {
                " [disabled]"
            };
            println!(
                "  {}: {}{}",
                declaration.identifier, declaration.title, state
            );
        }
    }

    println!();
    println!("Loaded {} extensions", extensions.len());
}

pub fn output_actions(actions: &[ResolvedAction]) {
    for action in actions {
        let state = if action.is_enabled() {
            ""
        } else {
            " [disabled]"
        };
        println!(
            "{}/{}: {} [{}]{}",
            action.extension,
            action.identifier(),
            action.title(),
            action.matched_text(),
            state
        );
    }

    println!();
    println!("Found {} actions", actions.len());
}

pub fn output_outcome(outcome: &ActionOutcome) {
    match outcome {
        ActionOutcome::Nothing => println!("nothing"),
        ActionOutcome::Paste(text) => println!("paste: {}", text),
        ActionOutcome::Copy(text) => println!("copy: {}", text),
        ActionOutcome::OpenUrl(url) => println!("open: {}", url),
    }
}
