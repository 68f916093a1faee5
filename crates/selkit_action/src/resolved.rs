//! Actions produced by one resolution pass.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::debug;

use crate::{
    ActionDeclaration, ActionError, ActionInvocation, ActionOutcome, ClassifiedInput, Context,
    MatchRecord, OptionValues,
};

/// What an action matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchData {
    /// The action's pattern matched.
    Pattern(MatchRecord),
    /// No pattern was involved; the whole selection applies.
    Selection(String),
}

impl MatchData {
    pub fn matched_text(&self) -> &str {
        match self {
            Self::Pattern(record) => &record.full,
            Self::Selection(text) => text,
        }
    }

    pub fn record(&self) -> Option<&MatchRecord> {
        match self {
            Self::Pattern(record) => Some(record),
            Self::Selection(_) => None,
        }
    }
}

/// An action offered for the current selection.
#[derive(Debug, Clone)]
pub struct ResolvedAction {
    pub extension: String,
    pub declaration: ActionDeclaration,
    pub matched: MatchData,
    input: Arc<ClassifiedInput>,
}

impl ResolvedAction {
    pub(crate) fn new(
        extension: &str,
        declaration: ActionDeclaration,
        matched: MatchData,
        input: Arc<ClassifiedInput>,
    ) -> Self {
        Self {
            extension: extension.to_string(),
            declaration,
            matched,
            input,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.declaration.identifier
    }

    pub fn title(&self) -> &str {
        &self.declaration.title
    }

    pub fn matched_text(&self) -> &str {
        self.matched.matched_text()
    }

    /// The input this action was resolved against.
    pub fn input(&self) -> &ClassifiedInput {
        &self.input
    }

    /// Whether invoking this action would run any code.
    pub fn is_enabled(&self) -> bool {
        self.declaration.is_enabled()
    }

    /// Runs the action's code against a fresh context.
    ///
    /// Pattern-matched actions receive the input with its match record set.
    pub fn invoke(
        &self,
        context: &Context,
        options: &OptionValues,
    ) -> Result<ActionOutcome, ActionError> {
        let code = self
            .declaration
            .effective_code()
            .ok_or_else(|| ActionError::disabled(&self.extension, self.identifier()))?;

        let input = match &self.matched {
            MatchData::Pattern(record) => self.input.with_match(record.clone()),
            MatchData::Selection(_) => (*self.input).clone(),
        };
        let invocation = ActionInvocation {
            input: &input,
            options,
            context,
        };

        debug!("Invoking '{}' of '{}'", self.identifier(), self.extension);
        match panic::catch_unwind(AssertUnwindSafe(|| code.call(&invocation))) {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(e)) => Err(ActionError::fault(&self.extension, self.identifier(), e)),
            Err(_) => Err(ActionError::fault(
                &self.extension,
                self.identifier(),
                "action code panicked",
            )),
        }
    }
}
