//! # selkit_module
//!
//! Module resolution and loading for selkit extensions.
//!
//! This crate provides:
//! - Reference resolution against an extension package and a shared module repository
//! - A process-wide module cache keyed by canonical file identity
//! - Module loading through an injected script engine and transpiler
//! - Export-convention detection for evaluated modules
//!
//! ## Architecture
//!
//! The loader never evaluates code itself. The host injects a [`ScriptEngine`]
//! that runs module source against a [`ModuleScope`], plus an optional
//! [`Transpiler`] for typed (`.ts`) sources. JSON modules bypass evaluation.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use selkit_module::{FsSource, ModuleLoader, ModuleResolver};
//!
//! let resolver = ModuleResolver::new("/path/to/extension", Arc::new(FsSource));
//! let loader = ModuleLoader::new(resolver, engine);
//!
//! let exports = loader.require("./helper", None)?;
//! ```

mod cache;
mod engine;
mod error;
mod exports;
mod id;
mod loader;
mod resolver;
mod scope;
mod source;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cache::{Claim, LoadGuard, ModuleCache, ModuleRecord, ModuleState};
pub use engine::{ScriptEngine, ScriptError, Transpiler};
pub use error::ModuleError;
pub use exports::{ExportConvention, Exports, PRIMARY_EXPORT};
pub use id::{CANDIDATE_EXTENSIONS, ModuleId, ModuleKind};
pub use loader::ModuleLoader;
pub use resolver::{ModuleResolver, candidates};
pub use scope::{Definition, ModuleScope};
pub use source::{FsSource, MemorySource, SourceProvider};
