use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("expected {expected} floats, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}

pub type Result<T> = core::result::Result<T, MathError>;
