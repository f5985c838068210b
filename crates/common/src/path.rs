use std::fmt;

use serde::{Deserialize, Serialize};

/// An absolute, slash separated path inside the filer namespace.
///
/// Not a [`std::path::Path`]: filer paths look the same on every host and
/// never pick up platform separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FullPath(String);

impl FullPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Join a single name onto this path.
    ///
    /// No normalization happens beyond avoiding a doubled separator, so a
    /// name containing `/` lands more than one level deep.
    pub fn child(&self, name: &str) -> FullPath {
        if self.0.ends_with('/') {
            FullPath(format!("{}{}", self.0, name))
        } else {
            FullPath(format!("{}/{}", self.0, name))
        }
    }

    /// The containing directory, or `None` for the root.
    pub fn parent(&self) -> Option<FullPath> {
        let trimmed = self.0.trim_end_matches('/');
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.rfind('/') {
            Some(0) => Some(FullPath::root()),
            Some(idx) => Some(FullPath(trimmed[..idx].to_string())),
            None => None,
        }
    }

    /// The last component of the path; empty for the root.
    pub fn name(&self) -> &str {
        let trimmed = self.0.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) => &trimmed[idx + 1..],
            None => trimmed,
        }
    }

    /// Every ancestor of this path, closest first, ending at the root.
    pub fn ancestors(&self) -> Vec<FullPath> {
        let mut out = Vec::new();
        let mut current = self.parent();
        while let Some(dir) = current {
            current = dir.parent();
            out.push(dir);
        }
        out
    }
}

impl fmt::Display for FullPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FullPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FullPath {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for FullPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
