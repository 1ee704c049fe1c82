pub mod bits;
pub mod errors;
pub mod math;

pub use bits::{
    deserialize_bit_vector, int_list_to_bits, is_little_endian, serialize_bit_vector,
    size_in_bits, FixedBitWidth, INDEX_BIT_WIDTH,
};
pub use math::{bitreverse, div_ceil, exp2, log2, Math};
