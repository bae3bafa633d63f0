use crate::ports::PersistenceError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("Index {index} out of range for {len} tasks")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type AppResult<T> = Result<T, AppError>;
