use ark_serialize::SerializationError;
use core::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SparseVectorError {
    #[error("Index {index} out of range for domain size {domain_size}")]
    OutOfRange { index: usize, domain_size: usize },
    #[error("Sparse vector invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Arithmetic overflow in {0}")]
    ArithmeticOverflow(String),
    #[error("Malformed stream: {0}")]
    MalformedStream(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SparseVectorError> for SerializationError {
    fn from(err: SparseVectorError) -> Self {
        match err {
            SparseVectorError::Serialization(err) => err,
            SparseVectorError::Io(err) => SerializationError::IoError(err),
            _ => SerializationError::InvalidData,
        }
    }
}
