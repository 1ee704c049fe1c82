pub mod commands;

pub use sparse_core::{GroupElement, ScalarMul, SparseVector, SparseVectorError};
