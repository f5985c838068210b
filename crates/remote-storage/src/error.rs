//! Mapping provider errors onto [`RemoteStorageError`].

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use common::remote::RemoteStorageError;

/// S3 error codes that mean the credentials were rejected.
const S3_AUTH_CODES: &[&str] = &[
    "AccessDenied",
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
    "InvalidToken",
];

pub(crate) fn from_object_store(err: object_store::Error, bucket: &str) -> RemoteStorageError {
    match err {
        object_store::Error::NotFound { .. } => {
            RemoteStorageError::BucketNotFound(bucket.to_string())
        }
        object_store::Error::Unauthenticated { .. }
        | object_store::Error::PermissionDenied { .. } => RemoteStorageError::Auth(err.to_string()),
        object_store::Error::UnknownConfigurationKey { .. } => {
            RemoteStorageError::InvalidConfig(err.to_string())
        }
        other => {
            // S3 reports a missing bucket as a generic error carrying the code
            let msg = other.to_string();
            if msg.contains("NoSuchBucket") {
                RemoteStorageError::BucketNotFound(bucket.to_string())
            } else if S3_AUTH_CODES.iter().any(|code| msg.contains(code)) {
                RemoteStorageError::Auth(msg)
            } else {
                RemoteStorageError::Transport(msg)
            }
        }
    }
}

/// Classify a failed AWS SDK call by error code and HTTP status.
pub(crate) fn from_sdk<E>(err: SdkError<E>) -> RemoteStorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let status = err.raw_response().map(|response| response.status().as_u16());
    let code = err.code().map(str::to_string);
    let msg = DisplayErrorContext(&err).to_string();

    match err {
        SdkError::ServiceError(_) | SdkError::ResponseError(_)
            if matches!(status, Some(401) | Some(403))
                || code.as_deref().is_some_and(|c| S3_AUTH_CODES.contains(&c)) =>
        {
            RemoteStorageError::Auth(msg)
        }
        SdkError::ConstructionFailure(_) => RemoteStorageError::InvalidConfig(msg),
        _ => RemoteStorageError::Transport(msg),
    }
}

pub(crate) fn from_io(err: std::io::Error, context: &str) -> RemoteStorageError {
    match err.kind() {
        std::io::ErrorKind::PermissionDenied => {
            RemoteStorageError::Auth(format!("{}: {}", context, err))
        }
        _ => RemoteStorageError::Transport(format!("{}: {}", context, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_store_not_found_is_missing_bucket() {
        let err = object_store::Error::NotFound {
            path: "media".to_string(),
            source: "no such key".into(),
        };
        assert!(matches!(
            from_object_store(err, "media"),
            RemoteStorageError::BucketNotFound(ref b) if b == "media"
        ));
    }

    #[test]
    fn test_generic_no_such_bucket_is_missing_bucket() {
        let err = object_store::Error::Generic {
            store: "S3",
            source: "Client error with status 404: NoSuchBucket".into(),
        };
        assert!(matches!(
            from_object_store(err, "media"),
            RemoteStorageError::BucketNotFound(_)
        ));
    }

    #[test]
    fn test_generic_access_denied_is_auth() {
        let err = object_store::Error::Generic {
            store: "S3",
            source: "Client error with status 403: AccessDenied".into(),
        };
        assert!(matches!(
            from_object_store(err, "media"),
            RemoteStorageError::Auth(_)
        ));
    }

    #[test]
    fn test_io_permission_denied_is_auth() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(
            from_io(err, "read /srv"),
            RemoteStorageError::Auth(_)
        ));

        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            from_io(err, "read /srv"),
            RemoteStorageError::Transport(_)
        ));
    }
}
