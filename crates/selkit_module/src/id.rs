//! Canonical module identities.

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Extensions appended, in order, to a reference that carries none of them.
pub const CANDIDATE_EXTENSIONS: [&str; 3] = ["js", "ts", "json"];

/// How a module's source is turned into an exported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// Base scripting dialect, evaluated directly.
    Script,
    /// Typed dialect, transpiled before evaluation.
    TypedScript,
    /// Structured data, parsed and exported as-is.
    Json,
}

impl ModuleKind {
    /// Determines the module kind from a file path's extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ts") => Self::TypedScript,
            Some("json") => Self::Json,
            _ => Self::Script,
        }
    }
}

/// The canonical identity of a module file.
///
/// Identities are lexically normalized paths, so `a/./b/../c.js` and `a/c.js`
/// name the same module and share one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(PathBuf);

impl ModuleId {
    /// Creates an identity from a file path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(normalize(path.as_ref()))
    }

    /// Returns the file path of this module.
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Returns the directory containing this module.
    pub fn dir(&self) -> &Path {
        self.0.parent().unwrap_or(&self.0)
    }

    /// Returns how this module is evaluated.
    pub fn kind(&self) -> ModuleKind {
        ModuleKind::from_path(&self.0)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for ModuleId {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Folds `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Returns true when the final component ends in one of the candidate extensions.
pub(crate) fn has_candidate_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CANDIDATE_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/ext/a/./b/../c.js", "/ext/a/c.js")]
    #[case("/ext/lib/../../shared/x.ts", "/shared/x.ts")]
    #[case("/../../x.js", "/x.js")]
    #[case("/ext/./helper", "/ext/helper")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(Path::new(input)), PathBuf::from(expected));
    }

    #[test]
    fn test_same_file_two_spellings_share_identity() {
        let a = ModuleId::new("/ext/lib/../helper.js");
        let b = ModuleId::new("/ext/./helper.js");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "/ext/helper.js");
    }

    #[rstest]
    #[case("/ext/a.js", ModuleKind::Script)]
    #[case("/ext/a.ts", ModuleKind::TypedScript)]
    #[case("/ext/a.json", ModuleKind::Json)]
    #[case("/ext/a", ModuleKind::Script)]
    fn test_module_kind(#[case] path: &str, #[case] expected: ModuleKind) {
        assert_eq!(ModuleId::new(path).kind(), expected);
    }

    #[test]
    fn test_dir() {
        let id = ModuleId::new("/ext/lib/util.js");
        assert_eq!(id.dir(), Path::new("/ext/lib"));
    }

    #[rstest]
    #[case("helper.js", true)]
    #[case("helper.json", true)]
    #[case("helper", false)]
    #[case("helper.v2", false)]
    fn test_has_candidate_extension(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(has_candidate_extension(Path::new(path)), expected);
    }
}
