use globset::{GlobBuilder, GlobMatcher};

use crate::remote::RemoteBucket;

/// A parsed `--bucket-pattern`.
///
/// Shell wildcards over the whole bucket name: `*`, `?`, `[..]` classes
/// (negated with `!` or `^`) and `\` escapes. `*` and `?` never match a `/`.
#[derive(Debug)]
pub enum BucketPattern {
    /// No pattern given: every bucket matches
    Any,
    Glob(GlobMatcher),
    /// The pattern did not parse: no bucket matches
    Malformed {
        pattern: String,
        error: globset::Error,
    },
}

impl BucketPattern {
    pub fn parse(pattern: &str) -> Self {
        if pattern.is_empty() {
            return BucketPattern::Any;
        }
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .backslash_escape(true)
            .build();
        match glob {
            Ok(glob) => BucketPattern::Glob(glob.compile_matcher()),
            Err(error) => BucketPattern::Malformed {
                pattern: pattern.to_string(),
                error,
            },
        }
    }

    /// Whole-name match of `name` against the pattern.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            BucketPattern::Any => true,
            BucketPattern::Glob(glob) => glob.is_match(name),
            BucketPattern::Malformed { pattern, error } => {
                tracing::warn!(
                    bucket = %name,
                    pattern = %pattern,
                    error = %error,
                    "skipping bucket, malformed bucket pattern"
                );
                false
            }
        }
    }
}

/// Keep the buckets whose name matches `pattern`, in their original order.
///
/// An empty pattern keeps everything.
pub fn filter_buckets(buckets: Vec<RemoteBucket>, pattern: &str) -> Vec<RemoteBucket> {
    let pattern = BucketPattern::parse(pattern);
    buckets
        .into_iter()
        .filter(|bucket| pattern.matches(&bucket.name))
        .collect()
}
