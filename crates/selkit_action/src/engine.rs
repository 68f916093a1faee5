//! Resolution of action sets against one selection.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    ActionDeclaration, ActionError, ActionSet, ActionSource, ClassifiedInput, Context, MatchData,
    OptionValues, Populated, ResolvedAction, DEFAULT_REQUIREMENTS,
};

/// Turns action sets into the actions offered for a selection.
pub struct ActionResolver;

impl ActionResolver {
    /// Resolves one extension's actions.
    ///
    /// Static declarations are filtered by app lists, requirements and
    /// pattern, keeping declaration order. Populated sets are returned as
    /// produced by their callback, without further filtering; the callback
    /// sees the context with every modifier released.
    pub fn resolve(
        set: &ActionSet,
        input: &ClassifiedInput,
        context: &Context,
        options: &OptionValues,
    ) -> Result<Vec<ResolvedAction>, ActionError> {
        let shared = Arc::new(input.clone());

        match &set.source {
            ActionSource::Populate(populate) => {
                let quiet = context.without_modifiers();
                let populated = panic::catch_unwind(AssertUnwindSafe(|| {
                    populate.call(input, options, &quiet)
                }))
                .map_err(|_| ActionError::population(&set.identifier, "callback panicked"))?
                .map_err(|e| ActionError::population(&set.identifier, e))?;

                Ok(Self::populated(set, populated, &shared))
            }
            ActionSource::Static(declarations) => Ok(declarations
                .iter()
                .filter_map(|declaration| {
                    let matched = Self::evaluate(set, declaration, input, context, options)?;
                    Some(ResolvedAction::new(
                        &set.identifier,
                        declaration.clone(),
                        matched,
                        Arc::clone(&shared),
                    ))
                })
                .collect()),
        }
    }

    /// Resolves several extensions, each with its own option values.
    ///
    /// A failing extension contributes nothing; the others are unaffected.
    pub fn resolve_all<'a, I>(
        sets: I,
        input: &ClassifiedInput,
        context: &Context,
    ) -> Vec<ResolvedAction>
    where
        I: IntoIterator<Item = (&'a ActionSet, &'a OptionValues)>,
    {
        sets.into_iter()
            .flat_map(|(set, options)| match Self::resolve(set, input, context, options) {
                Ok(actions) => actions,
                Err(e) => {
                    warn!("Skipping extension '{}': {}", set.identifier, e);
                    Vec::new()
                }
            })
            .collect()
    }

    fn populated(
        set: &ActionSet,
        populated: Populated,
        input: &Arc<ClassifiedInput>,
    ) -> Vec<ResolvedAction> {
        populated
            .into_declarations(&set.identifier)
            .into_iter()
            .map(|declaration| {
                ResolvedAction::new(
                    &set.identifier,
                    declaration,
                    MatchData::Selection(input.text.clone()),
                    Arc::clone(input),
                )
            })
            .collect()
    }

    /// Applies every filter of a static declaration, returning what it
    /// matched when it is offered.
    fn evaluate(
        set: &ActionSet,
        declaration: &ActionDeclaration,
        input: &ClassifiedInput,
        context: &Context,
        options: &OptionValues,
    ) -> Option<MatchData> {
        let apps = declaration.apps.as_deref().or(set.apps.as_deref());
        let excluded = declaration
            .excluded_apps
            .as_deref()
            .or(set.excluded_apps.as_deref());
        if !app_allowed(apps, excluded, context.bundle_identifier()) {
            debug!("'{}' not offered in this app", declaration.identifier);
            return None;
        }

        let requirements = declaration
            .requirements
            .as_deref()
            .or(set.requirements.as_deref())
            .unwrap_or(DEFAULT_REQUIREMENTS);
        if let Some(unmet) = requirements
            .iter()
            .find(|token| !token.holds(input, context, options))
        {
            debug!(
                "'{}' not offered: requirement '{}' unmet",
                declaration.identifier, unmet
            );
            return None;
        }

        let Some(pattern) = declaration.pattern.as_ref().or(set.pattern.as_ref()) else {
            return Some(MatchData::Selection(input.text.clone()));
        };
        match pattern.check(&input.text) {
            Ok(found) => found.map(MatchData::Pattern),
            Err(e) => {
                warn!(
                    "Action '{}' of '{}' never matches: {}",
                    declaration.identifier, set.identifier, e
                );
                None
            }
        }
    }
}

fn app_allowed(apps: Option<&[String]>, excluded: Option<&[String]>, bundle: Option<&str>) -> bool {
    let listed = |list: &[String]| bundle.is_some_and(|b| list.iter().any(|app| app == b));

    if excluded.is_some_and(listed) {
        return false;
    }
    apps.is_none_or(listed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn owned(apps: &[&str]) -> Vec<String> {
        apps.iter().map(|a| a.to_string()).collect()
    }

    #[rstest]
    #[case::no_lists(None, None, Some("a"), true)]
    #[case::unknown_app_without_lists(None, None, None, true)]
    #[case::allowed(Some(vec!["a"]), None, Some("a"), true)]
    #[case::not_in_allow_list(Some(vec!["a"]), None, Some("b"), false)]
    #[case::unknown_app_with_allow_list(Some(vec!["a"]), None, None, false)]
    #[case::excluded(None, Some(vec!["a"]), Some("a"), false)]
    #[case::not_excluded(None, Some(vec!["a"]), Some("b"), true)]
    #[case::exclusion_wins(Some(vec!["a"]), Some(vec!["a"]), Some("a"), false)]
    fn app_filters(
        #[case] apps: Option<Vec<&str>>,
        #[case] excluded: Option<Vec<&str>>,
        #[case] bundle: Option<&str>,
        #[case] expected: bool,
    ) {
        let apps = apps.map(|a| owned(&a));
        let excluded = excluded.map(|e| owned(&e));

        assert_eq!(
            app_allowed(apps.as_deref(), excluded.as_deref(), bundle),
            expected
        );
    }
}
