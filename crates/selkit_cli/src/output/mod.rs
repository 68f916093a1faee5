//! Output formatting module

mod json;
mod text;

use miette::Result;
use selkit_action::{ActionOutcome, ResolvedAction};
use selkit_core::Extension;

use crate::cli::OutputFormat;

pub fn output_extensions(extensions: &[Extension], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => json::output_extensions(extensions)?,
        OutputFormat::Text => text::output_extensions(extensions),
    }
    Ok(())
}

pub fn output_actions(actions: &[ResolvedAction], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => json::output_actions(actions)?,
        OutputFormat::Text => text::output_actions(actions),
    }
    Ok(())
}

pub fn output_outcome(outcome: &ActionOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => json::output_outcome(outcome)?,
        OutputFormat::Text => text::output_outcome(outcome),
    }
    Ok(())
}
