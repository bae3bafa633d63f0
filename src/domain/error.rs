use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid priority: {0} (expected low, medium or high)")]
    InvalidPriority(String),

    #[error("Invalid project path: {0}")]
    InvalidPath(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
