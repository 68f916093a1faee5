//! Dynamic population of action lists.

use std::fmt;
use std::sync::Arc;

use crate::{ActionCode, ActionDeclaration, ClassifiedInput, CodeResult, Context, OptionValues};

type PopulateCallback =
    dyn Fn(&ClassifiedInput, &OptionValues, &Context) -> CodeResult<Populated> + Send + Sync;

/// Callback computing an extension's actions for one invocation.
#[derive(Clone)]
pub struct PopulateFn(Arc<PopulateCallback>);

impl PopulateFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ClassifiedInput, &OptionValues, &Context) -> CodeResult<Populated>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(
        &self,
        input: &ClassifiedInput,
        options: &OptionValues,
        context: &Context,
    ) -> CodeResult<Populated> {
        (self.0)(input, options, context)
    }
}

impl fmt::Debug for PopulateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PopulateFn(..)")
    }
}

/// One entry of a populated list.
#[derive(Debug, Clone)]
pub enum PopulatedItem {
    Action(ActionDeclaration),
    /// Bare code; becomes an action named after its position.
    Callable(ActionCode),
}

impl From<ActionDeclaration> for PopulatedItem {
    fn from(declaration: ActionDeclaration) -> Self {
        Self::Action(declaration)
    }
}

impl From<ActionCode> for PopulatedItem {
    fn from(code: ActionCode) -> Self {
        Self::Callable(code)
    }
}

/// What a population callback returned.
#[derive(Debug, Clone, Default)]
pub enum Populated {
    #[default]
    Nothing,
    One(ActionDeclaration),
    Many(Vec<PopulatedItem>),
}

impl Populated {
    /// Normalizes the result into declarations, in order.
    ///
    /// A callable at index `i` becomes an enabled action identified as
    /// `<extension>#<i>`.
    pub fn into_declarations(self, extension: &str) -> Vec<ActionDeclaration> {
        match self {
            Self::Nothing => Vec::new(),
            Self::One(declaration) => vec![declaration],
            Self::Many(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    PopulatedItem::Action(declaration) => declaration,
                    PopulatedItem::Callable(code) => {
                        let identifier = format!("{}#{}", extension, index);
                        ActionDeclaration::new(identifier.clone(), identifier).with_code(code)
                    }
                })
                .collect(),
        }
    }
}

impl From<ActionDeclaration> for Populated {
    fn from(declaration: ActionDeclaration) -> Self {
        Self::One(declaration)
    }
}

impl From<Option<ActionDeclaration>> for Populated {
    fn from(declaration: Option<ActionDeclaration>) -> Self {
        declaration.map_or(Self::Nothing, Self::One)
    }
}

impl<T: Into<PopulatedItem>> From<Vec<T>> for Populated {
    fn from(items: Vec<T>) -> Self {
        Self::Many(items.into_iter().map(Into::into).collect())
    }
}
