// Data-quality errors raised while reducing a snapshot. Never fatal to the service.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("Malformed record {key}: {reason}")]
    MalformedRecord { key: String, reason: String },
}

impl FeedError {
    pub fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        FeedError::MalformedRecord {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
