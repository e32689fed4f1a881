use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngagementError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
