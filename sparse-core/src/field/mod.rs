use std::fmt::Debug;
use std::ops::{Add, AddAssign};

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::Zero;

use crate::utils::FixedBitWidth;

pub mod bn254;

/// An element of an additive group that can be stored in a
/// [`SparseVector`](crate::poly::sparse_vector::SparseVector).
///
/// Only the capabilities the sparse representation relies on are required:
/// an identity (`Zero`), addition, canonical (de)serialization, and a fixed
/// bit width used for size accounting.
pub trait GroupElement:
    'static
    + Sized
    + Zero
    + Add<Self, Output = Self>
    + AddAssign<Self>
    + for<'a> AddAssign<&'a Self>
    + Copy
    + Eq
    + Debug
    + Send
    + Sync
    + CanonicalSerialize
    + CanonicalDeserialize
    + FixedBitWidth
{
}

/// A scalar that can multiply elements of the group `G`.
pub trait ScalarMul<G: GroupElement>: Sync {
    fn scalar_mul(&self, element: &G) -> G;
}
