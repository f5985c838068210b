use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::FullPath;

/// A prefix inside a bucket at a named remote storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteStorageLocation {
    /// Remote storage configuration name
    pub name: String,
    pub bucket: String,
    /// Always starts with `/`; `/` alone is the whole bucket
    pub path: String,
}

impl RemoteStorageLocation {
    /// The location covering a whole bucket.
    pub fn bucket_root(name: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bucket: bucket.into(),
            path: "/".to_string(),
        }
    }

    /// The object key prefix this location covers, without a leading `/`.
    pub fn key_prefix(&self) -> &str {
        self.path.trim_start_matches('/')
    }
}

impl fmt::Display for RemoteStorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}{}", self.name, self.bucket, self.path)
    }
}

/// A filer directory mounted onto a remote location.
///
/// `dir` is the unique key: writing a mapping for a directory replaces any
/// mapping it already had.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountMapping {
    pub dir: FullPath,
    pub location: RemoteStorageLocation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_root_location() {
        let location = RemoteStorageLocation::bucket_root("cloud1", "media");
        assert_eq!(location.path, "/");
        assert_eq!(location.key_prefix(), "");
        assert_eq!(location.to_string(), "cloud1/media/");
    }

    #[test]
    fn test_nested_location_prefix() {
        let location = RemoteStorageLocation {
            name: "cloud1".to_string(),
            bucket: "media".to_string(),
            path: "/photos/2024".to_string(),
        };
        assert_eq!(location.key_prefix(), "photos/2024");
        assert_eq!(location.to_string(), "cloud1/media/photos/2024");
    }
}
