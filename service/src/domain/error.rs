#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read site content: {0}")]
    Read(String),

    #[error("failed to write site content: {0}")]
    Write(String),

    #[error("site content was changed concurrently: expected row version {expected}, found {actual}")]
    Conflict { expected: i64, actual: i64 },
}

#[derive(Debug, thiserror::Error)]
pub enum SiteManagementError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("version {0} not found")]
    VersionNotFound(i64),

    #[error("stored version {0} cannot be incremented")]
    VersionExhausted(i64),
}
