/// Failure of a top-level command.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Aborted by the user")]
    Aborted,
    #[error(transparent)]
    Usage(#[from] lexopt::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Error(#[from] anyhow::Error),
}

impl Error {
    #[track_caller]
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(lexopt::Error::from(message.into()))
    }
}
