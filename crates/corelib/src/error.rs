//! Core errors (renderer-agnostic).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown math backend '{0}' (expected 'manual' or 'glam')")]
    UnknownBackend(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
