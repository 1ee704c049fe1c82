use ark_serialize::{Read, Write};

use super::errors::SparseVectorError;

/// Width in bits of the canonical encoding of an index or count. Fixed at 64
/// so that size accounting does not depend on the host's pointer width.
pub const INDEX_BIT_WIDTH: usize = 64;

const INDEX_NUM_BYTES: usize = INDEX_BIT_WIDTH / 8;

/// Types whose values all occupy the same number of bits.
pub trait FixedBitWidth {
    const BIT_WIDTH: usize;
}

impl FixedBitWidth for bool {
    const BIT_WIDTH: usize = 1;
}

impl FixedBitWidth for u8 {
    const BIT_WIDTH: usize = 8;
}

impl FixedBitWidth for u16 {
    const BIT_WIDTH: usize = 16;
}

impl FixedBitWidth for u32 {
    const BIT_WIDTH: usize = 32;
}

impl FixedBitWidth for u64 {
    const BIT_WIDTH: usize = 64;
}

impl FixedBitWidth for usize {
    const BIT_WIDTH: usize = INDEX_BIT_WIDTH;
}

/// Number of bits needed to store `v` element by element.
#[inline]
pub fn size_in_bits<T: FixedBitWidth>(v: &[T]) -> usize {
    v.len() * T::BIT_WIDTH
}

/// Runtime probe of the host byte order.
pub fn is_little_endian() -> bool {
    let probe: u32 = 1;
    probe.to_ne_bytes()[0] == 1
}

/// Canonical (little-endian) encoding of an index, independent of the host.
#[inline]
pub fn index_to_bytes(index: usize) -> [u8; INDEX_NUM_BYTES] {
    let value = index as u64;
    if is_little_endian() {
        value.to_ne_bytes()
    } else {
        value.swap_bytes().to_ne_bytes()
    }
}

/// Inverse of [`index_to_bytes`]. Fails if the value does not fit in a
/// `usize` on this host.
#[inline]
pub fn index_from_bytes(bytes: [u8; INDEX_NUM_BYTES]) -> Result<usize, SparseVectorError> {
    let raw = u64::from_ne_bytes(bytes);
    let value = if is_little_endian() {
        raw
    } else {
        raw.swap_bytes()
    };
    usize::try_from(value).map_err(|_| {
        SparseVectorError::MalformedStream(format!("index {value} does not fit in usize"))
    })
}

pub fn write_index<W: Write>(mut writer: W, index: usize) -> Result<(), SparseVectorError> {
    writer.write_all(&index_to_bytes(index))?;
    Ok(())
}

/// Reads one canonical index. A truncated stream is reported as
/// `MalformedStream` rather than a raw I/O error.
pub fn read_index<R: Read>(mut reader: R) -> Result<usize, SparseVectorError> {
    let mut buf = [0u8; INDEX_NUM_BYTES];
    reader.read_exact(&mut buf).map_err(truncated)?;
    index_from_bytes(buf)
}

pub(crate) fn truncated(err: std::io::Error) -> SparseVectorError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        SparseVectorError::MalformedStream("unexpected end of stream".to_string())
    } else {
        SparseVectorError::Io(err)
    }
}

/// Writes `v` as a 64-bit count followed by the bits packed
/// most-significant-bit first. The last byte is zero padded.
#[tracing::instrument(skip_all, name = "serialize_bit_vector")]
pub fn serialize_bit_vector<W: Write>(mut writer: W, v: &[bool]) -> Result<(), SparseVectorError> {
    write_index(&mut writer, v.len())?;
    let packed: Vec<u8> = v
        .chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, &bit)| byte | ((bit as u8) << (7 - i)))
        })
        .collect();
    writer.write_all(&packed)?;
    Ok(())
}

#[tracing::instrument(skip_all, name = "deserialize_bit_vector")]
pub fn deserialize_bit_vector<R: Read>(mut reader: R) -> Result<Vec<bool>, SparseVectorError> {
    let count = read_index(&mut reader)?;
    let num_bytes = count.div_ceil(8);

    let mut packed = Vec::new();
    reader
        .by_ref()
        .take(num_bytes as u64)
        .read_to_end(&mut packed)?;
    if packed.len() != num_bytes {
        return Err(SparseVectorError::MalformedStream(format!(
            "expected {num_bytes} bytes for {count} bits, found {}",
            packed.len()
        )));
    }

    let padding = num_bytes * 8 - count;
    if let Some(last) = packed.last() {
        let mask = (1u16 << padding) as u8 - 1;
        if padding > 0 && last & mask != 0 {
            return Err(SparseVectorError::MalformedStream(
                "non-zero padding bits in final byte".to_string(),
            ));
        }
    }

    Ok((0..count)
        .map(|i| (packed[i / 8] >> (7 - i % 8)) & 1 == 1)
        .collect())
}

/// Expands each word of `list` into `wordsize` bits, most significant bit
/// first, and concatenates the results.
pub fn int_list_to_bits(list: &[u64], wordsize: usize) -> Vec<bool> {
    debug_assert!(wordsize <= u64::BITS as usize);
    list.iter()
        .flat_map(|&word| (0..wordsize).rev().map(move |i| (word >> i) & 1 == 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::test_rng;
    use ark_std::rand::Rng;

    #[test]
    fn size_in_bits_per_type() {
        assert_eq!(size_in_bits::<bool>(&[true, false, true]), 3);
        assert_eq!(size_in_bits::<u32>(&[1, 2]), 64);
        assert_eq!(size_in_bits::<usize>(&[0; 5]), 5 * INDEX_BIT_WIDTH);
        assert_eq!(size_in_bits::<u64>(&[]), 0);
    }

    #[test]
    fn bit_vector_layout() {
        let bits = vec![true, false, true, true, false, false, false, false, true, true];
        let mut buf = Vec::new();
        serialize_bit_vector(&mut buf, &bits).unwrap();

        assert_eq!(buf.len(), 8 + 2);
        assert_eq!(&buf[..8], &10u64.to_le_bytes());
        assert_eq!(buf[8], 0b1011_0000);
        assert_eq!(buf[9], 0b1100_0000);

        let decoded = deserialize_bit_vector(&buf[..]).unwrap();
        assert_eq!(decoded, bits);
    }

    #[test]
    fn bit_vector_random_lengths() {
        let mut rng = test_rng();
        for len in [0usize, 1, 7, 8, 9, 63, 64, 65, 1000] {
            let bits: Vec<bool> = (0..len).map(|_| rng.gen()).collect();
            let mut buf = Vec::new();
            serialize_bit_vector(&mut buf, &bits).unwrap();
            assert_eq!(buf.len(), 8 + len.div_ceil(8));
            assert_eq!(deserialize_bit_vector(&buf[..]).unwrap(), bits);
        }
    }

    #[test]
    fn bit_vector_rejects_truncation_and_padding() {
        let bits = vec![true; 12];
        let mut buf = Vec::new();
        serialize_bit_vector(&mut buf, &bits).unwrap();

        let truncated = &buf[..buf.len() - 1];
        assert!(matches!(
            deserialize_bit_vector(truncated),
            Err(SparseVectorError::MalformedStream(_))
        ));
        assert!(matches!(
            deserialize_bit_vector(&buf[..4]),
            Err(SparseVectorError::MalformedStream(_))
        ));

        let mut dirty = buf.clone();
        *dirty.last_mut().unwrap() |= 1;
        assert!(matches!(
            deserialize_bit_vector(&dirty[..]),
            Err(SparseVectorError::MalformedStream(_))
        ));
    }

    #[test]
    fn int_list_to_bits_msb_first() {
        let bits = int_list_to_bits(&[0b101, 0b011], 3);
        assert_eq!(bits, vec![true, false, true, false, true, true]);

        let bits = int_list_to_bits(&[1], 8);
        assert_eq!(bits.len(), 8);
        assert!(bits[7]);
        assert!(bits[..7].iter().all(|b| !b));

        assert!(int_list_to_bits(&[], 32).is_empty());
    }

    #[test]
    fn index_encoding_is_little_endian() {
        assert_eq!(is_little_endian(), cfg!(target_endian = "little"));
        let bytes = index_to_bytes(0x0102_0304);
        assert_eq!(bytes, [4, 3, 2, 1, 0, 0, 0, 0]);
        assert_eq!(index_from_bytes(bytes).unwrap(), 0x0102_0304);
    }
}
