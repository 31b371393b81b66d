//! Error types for the remote segmentation boundary.

/// Errors crossing the remote segmentation boundary.
///
/// Every variant is recoverable by design: the orchestration in
/// [`crate::adapter`] answers each of them with the local flood-fill
/// fallback, so a dead or misbehaving service degrades the feature
/// instead of breaking the selection flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The request never produced a response (network failure, timeout,
    /// connection refused). Carried as a message because transports are
    /// pluggable.
    #[error("segmentation transport failed: {0}")]
    Transport(String),

    /// The service responded but reported failure (`success == false`).
    #[error("segmentation service reported failure: {0}")]
    Service(String),

    /// The service reported success without including a mask.
    #[error("segmentation response is missing the mask payload")]
    MissingMask,

    /// The run-length counts do not describe a mask of the declared
    /// size.
    #[error("malformed RLE mask: {0}")]
    MalformedRle(String),

    /// The source image could not be encoded for transmission.
    #[error("failed to encode request image: {0}")]
    ImageEncode(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_carry_detail() {
        let err = RemoteError::Transport("connection refused".into());
        assert_eq!(
            err.to_string(),
            "segmentation transport failed: connection refused",
        );
        let err = RemoteError::MalformedRle("counts sum to 9, expected 16".into());
        assert!(err.to_string().contains("counts sum to 9"));
    }
}
