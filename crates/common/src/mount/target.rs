use crate::path::FullPath;

/// The filer directory a bucket is mounted at: a direct child of the
/// buckets root named after the bucket.
///
/// Bucket names are used as is.
pub fn mount_target(buckets_root: &FullPath, bucket_name: &str) -> FullPath {
    buckets_root.child(bucket_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_is_child_of_root() {
        let root = FullPath::from("/buckets");
        assert_eq!(mount_target(&root, "media").as_str(), "/buckets/media");
        assert_eq!(mount_target(&root, "media").parent(), Some(root));
    }

    #[test]
    fn test_target_is_deterministic() {
        let root = FullPath::from("/buckets");
        assert_eq!(mount_target(&root, "logs-2023"), mount_target(&root, "logs-2023"));
    }

    #[test]
    fn test_distinct_names_give_distinct_targets() {
        let root = FullPath::from("/buckets/");
        let names = ["logs-2023", "logs-2024", "media", "Media", "media-"];
        let targets: std::collections::HashSet<_> =
            names.iter().map(|name| mount_target(&root, name)).collect();
        assert_eq!(targets.len(), names.len());
    }
}
