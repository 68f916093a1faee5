//! # selkit_action
//!
//! Action resolution engine for selkit.
//!
//! This crate provides:
//! - The per-invocation data model (classified input, context)
//! - Action declarations with requirements, patterns and app filters
//! - The resolution engine that turns declarations into the ordered list of
//!   actions offered for one selection
//!
//! ## Example
//!
//! ```rust,ignore
//! use selkit_action::{ActionDeclaration, ActionResolver, ActionSet, ClassifiedInput, Context};
//!
//! let set = ActionSet::from_actions("com.example.search", vec![
//!     ActionDeclaration::new("search", "Search").with_url_template("https://example.com/?q=***"),
//! ]);
//!
//! let input = ClassifiedInput::new("rust ownership");
//! let actions = ActionResolver::resolve(&set, &input, &Context::default(), &Default::default())?;
//! ```

mod context;
mod declaration;
mod engine;
mod error;
mod input;
mod pattern;
mod populate;
mod requirement;
mod resolved;

pub use context::{AppInfo, BrowserPage, Capabilities, Context, Modifiers};
pub use declaration::{
    ActionCode, ActionDeclaration, ActionInvocation, ActionOutcome, ActionSet, ActionSource,
    CodeResult, OptionValues,
};
pub use engine::ActionResolver;
pub use error::{ActionError, PatternError};
pub use input::{ClassifiedInput, DetectedEntity, EntityKind, InputClassifier, MatchRecord};
pub use pattern::{CompiledPattern, Pattern, PatternMatcher, SourcePattern};
pub use populate::{PopulateFn, Populated, PopulatedItem};
pub use requirement::{DEFAULT_REQUIREMENTS, Requirement, RequirementToken};
pub use resolved::{MatchData, ResolvedAction};
