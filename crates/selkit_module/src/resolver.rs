//! Module reference resolution.

use std::ffi::OsString;
use std::iter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::id::{has_candidate_extension, normalize};
use crate::{CANDIDATE_EXTENSIONS, ModuleError, ModuleId, SourceProvider};

/// Maps module references to canonical file identities.
///
/// Search order:
/// 1. `./` and `../` references: the directory of the issuing module
/// 2. Everything else: the extension package root, then the shared module
///    repository
///
/// Resolution is a pure function of the file tree; nothing is cached here.
#[derive(Clone)]
pub struct ModuleResolver {
    package_root: PathBuf,
    repository_root: Option<PathBuf>,
    source: Arc<dyn SourceProvider>,
}

impl ModuleResolver {
    /// Creates a resolver for the package rooted at `package_root`.
    pub fn new(package_root: impl AsRef<Path>, source: Arc<dyn SourceProvider>) -> Self {
        Self {
            package_root: normalize(package_root.as_ref()),
            repository_root: None,
            source,
        }
    }

    /// Adds the host's shared module repository as a fallback root.
    pub fn with_repository(mut self, repository_root: impl AsRef<Path>) -> Self {
        self.repository_root = Some(normalize(repository_root.as_ref()));
        self
    }

    /// The extension package root.
    pub fn package_root(&self) -> &Path {
        &self.package_root
    }

    /// The shared module repository, if configured.
    pub fn repository_root(&self) -> Option<&Path> {
        self.repository_root.as_deref()
    }

    /// The file tree consulted by this resolver.
    pub fn source(&self) -> &Arc<dyn SourceProvider> {
        &self.source
    }

    /// Resolves `reference` as issued by `issuer`.
    ///
    /// A resolved path never leaves the root it was resolved against.
    pub fn resolve(
        &self,
        reference: &str,
        issuer: Option<&ModuleId>,
    ) -> Result<ModuleId, ModuleError> {
        if reference.is_empty() {
            return Err(ModuleError::resolution(reference, issuer));
        }

        let resolved = if is_relative(reference) {
            let base = issuer.map_or(self.package_root.as_path(), ModuleId::dir);
            let target = normalize(&base.join(reference));
            match self.containing_root(base) {
                Some(root) if !target.starts_with(root) => None,
                _ => self.first_existing(&target),
            }
        } else {
            let trimmed = reference.trim_start_matches('/');
            self.search_roots().find_map(|root| {
                let target = normalize(&root.join(trimmed));
                if target.starts_with(root) {
                    self.first_existing(&target)
                } else {
                    None
                }
            })
        };

        match resolved {
            Some(id) => {
                debug!("Resolved module '{}' to {}", reference, id);
                Ok(id)
            }
            None => Err(ModuleError::resolution(reference, issuer)),
        }
    }

    fn search_roots(&self) -> impl Iterator<Item = &Path> {
        iter::once(self.package_root.as_path()).chain(self.repository_root.as_deref())
    }

    fn containing_root(&self, path: &Path) -> Option<&Path> {
        self.search_roots().find(|root| path.starts_with(root))
    }

    fn first_existing(&self, target: &Path) -> Option<ModuleId> {
        candidates(target)
            .into_iter()
            .find(|candidate| self.source.is_file(candidate))
            .map(ModuleId::new)
    }
}

impl std::fmt::Debug for ModuleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleResolver")
            .field("package_root", &self.package_root)
            .field("repository_root", &self.repository_root)
            .finish_non_exhaustive()
    }
}

/// Returns the paths tried for `target`, in order.
///
/// A target already ending in `.js`, `.ts` or `.json` is tried as given only.
/// Otherwise it is tried as given, then with each candidate extension
/// appended.
pub fn candidates(target: &Path) -> Vec<PathBuf> {
    let mut paths = vec![target.to_path_buf()];
    if !has_candidate_extension(target) {
        paths.extend(CANDIDATE_EXTENSIONS.iter().map(|ext| {
            let mut name = OsString::from(target.as_os_str());
            name.push(".");
            name.push(ext);
            PathBuf::from(name)
        }));
    }
    paths
}

fn is_relative(reference: &str) -> bool {
    reference.starts_with("./") || reference.starts_with("../")
}
