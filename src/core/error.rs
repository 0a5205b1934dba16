use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoupError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Menu item '{0}' not found")]
    NotFound(String),

    #[error("Lock error: {0}")]
    LockError(String),

    #[error("Store writer for key '{0}' has stopped")]
    WriterStopped(String),

    #[error("Donation error: {0}")]
    Donation(String),
}

pub type Result<T> = std::result::Result<T, SoupError>;

impl<T> From<std::sync::PoisonError<T>> for SoupError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<std::io::Error> for SoupError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
