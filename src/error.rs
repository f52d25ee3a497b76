use crate::backend::BackendError;

/// Error returned by the waiting variants of find and save.
///
/// The callback-based variants report [`BackendError`] directly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// The backend dropped the completion without invoking it.
    #[error("backend dropped the completion callback without reporting a result")]
    Disconnected,
}
