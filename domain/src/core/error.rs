//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These arise from local validation and never reach a transport.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
