#![allow(clippy::too_long_first_doc_paragraph)]

pub mod field;
pub mod poly;
pub mod utils;

pub use field::{GroupElement, ScalarMul};
pub use poly::sparse_vector::SparseVector;
pub use utils::errors::SparseVectorError;
