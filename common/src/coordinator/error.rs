/// Errors returned to writers submitting through a [`WriteCoordinatorHandle`].
///
/// [`WriteCoordinatorHandle`]: super::WriteCoordinatorHandle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// The write queue is full.
    Backpressure,
    /// The coordinator task has stopped.
    Shutdown,
    /// The applier rejected the write at the given epoch.
    ApplyError(u64, String),
}

impl std::error::Error for WriteError {}

impl std::fmt::Display for WriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteError::Backpressure => write!(f, "write queue is full"),
            WriteError::Shutdown => write!(f, "write coordinator has shut down"),
            WriteError::ApplyError(epoch, msg) => {
                write!(f, "write at epoch {} failed: {}", epoch, msg)
            }
        }
    }
}

pub type WriteResult<T> = std::result::Result<T, WriteError>;
