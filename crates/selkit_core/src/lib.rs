//! # selkit_core
//!
//! Extension host for selkit.
//!
//! This crate provides:
//! - Host configuration loading
//! - Extension discovery from manifests on disk
//! - Option defaults and user overrides
//! - A basic input classifier
//! - Wiring of module loading and action resolution across extensions
//!
//! ## Example
//!
//! ```rust,ignore
//! use selkit_core::{BasicClassifier, ExtensionHost, HostConfig};
//! use selkit_action::{Context, InputClassifier};
//!
//! let config = HostConfig::from_file("selkit.jsonc")?;
//! let mut host = ExtensionHost::new(config);
//! host.scan()?;
//!
//! let context = Context::default();
//! let input = BasicClassifier::new().classify("see https://example.com", &context);
//! for action in host.resolve_actions(&input, &context) {
//!     println!("{}: {}", action.extension, action.title());
//! }
//! ```

mod classifier;
mod config;
mod error;
mod extension;
mod host;
pub mod manifest;

pub use classifier::BasicClassifier;
pub use config::{CONFIG_FILES, HostConfig};
pub use error::HostError;
pub use extension::Extension;
pub use host::{ExtensionHost, JsonOnlyEngine};
pub use manifest::{ExtensionManifest, MANIFEST_FILE, OptionDefinition, OptionKind};
