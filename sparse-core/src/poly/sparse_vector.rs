use std::fmt;
use std::str::FromStr;

use ark_ec::{CurveGroup, VariableBaseMSM};
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, Read, SerializationError, Valid, Validate,
    Write,
};
use ark_std::rand::Rng;
use ark_std::UniformRand;
use itertools::{EitherOrBoth, Itertools};

use crate::field::{GroupElement, ScalarMul};
use crate::utils::bits::{read_index, truncated, write_index, INDEX_BIT_WIDTH};
use crate::utils::errors::SparseVectorError;
use crate::utils::size_in_bits;

/// Upper bound on how many entries are preallocated from an untrusted length
/// prefix. Longer vectors still decode, they just grow as they go.
const MAX_PREALLOCATED_ENTRIES: usize = 1 << 16;

/// A vector of length `domain_size` over the group `T` in which only the
/// positions listed in `indices` may differ from the identity.
///
/// The fields are public so that callers can assemble vectors incrementally.
/// Such vectors must pass [`SparseVector::is_valid`] before any other
/// operation is relied upon: `indices` and `values` have the same length,
/// `indices` is strictly increasing, and every index is below `domain_size`.
/// [`SparseVector::new`] and the deserializers enforce this for you.
#[derive(Clone, Debug)]
pub struct SparseVector<T: GroupElement> {
    pub indices: Vec<usize>,
    pub values: Vec<T>,
    pub domain_size: usize,
}

impl<T: GroupElement> Default for SparseVector<T> {
    fn default() -> Self {
        Self {
            indices: vec![],
            values: vec![],
            domain_size: 0,
        }
    }
}

impl<T: GroupElement> From<Vec<T>> for SparseVector<T> {
    /// Records every position of `dense`, identity values included.
    fn from(dense: Vec<T>) -> Self {
        Self {
            indices: (0..dense.len()).collect(),
            domain_size: dense.len(),
            values: dense,
        }
    }
}

impl<T: GroupElement> SparseVector<T> {
    pub fn new(
        indices: Vec<usize>,
        values: Vec<T>,
        domain_size: usize,
    ) -> Result<Self, SparseVectorError> {
        let vector = Self::new_unchecked(indices, values, domain_size);
        vector.check_invariants()?;
        Ok(vector)
    }

    pub fn new_unchecked(indices: Vec<usize>, values: Vec<T>, domain_size: usize) -> Self {
        Self {
            indices,
            values,
            domain_size,
        }
    }

    /// Random vector in which each position is recorded with probability
    /// `density`. Intended for tests and benchmarks.
    pub fn random<R: Rng>(domain_size: usize, density: f64, rng: &mut R) -> Self
    where
        T: UniformRand,
    {
        let indices: Vec<usize> = (0..domain_size)
            .filter(|_| rng.gen_bool(density))
            .collect();
        let values = indices.iter().map(|_| T::rand(rng)).collect();
        Self {
            indices,
            values,
            domain_size,
        }
    }

    /// Returns the value at dense position `idx`, or the identity if `idx` is
    /// not recorded.
    pub fn get(&self, idx: usize) -> Result<T, SparseVectorError> {
        if idx >= self.domain_size {
            return Err(SparseVectorError::OutOfRange {
                index: idx,
                domain_size: self.domain_size,
            });
        }
        Ok(match self.indices.binary_search(&idx) {
            Ok(pos) => self.values[pos],
            Err(_) => T::zero(),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.check_invariants().is_ok()
    }

    /// Like [`SparseVector::is_valid`], but reports which invariant fails.
    pub fn check_invariants(&self) -> Result<(), SparseVectorError> {
        if self.indices.len() != self.values.len() {
            return Err(SparseVectorError::InvariantViolation(format!(
                "{} indices but {} values",
                self.indices.len(),
                self.values.len()
            )));
        }
        if let Some((a, b)) = self
            .indices
            .iter()
            .tuple_windows()
            .find(|(a, b)| a >= b)
        {
            return Err(SparseVectorError::InvariantViolation(format!(
                "indices not strictly increasing: {a} followed by {b}"
            )));
        }
        match self.indices.last() {
            Some(&index) if index >= self.domain_size => Err(SparseVectorError::OutOfRange {
                index,
                domain_size: self.domain_size,
            }),
            _ => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn domain_size(&self) -> usize {
        self.domain_size
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Number of bits needed to store this vector: every entry's index and
    /// value, plus the domain size.
    pub fn size_in_bits(&self) -> usize {
        size_in_bits(&self.indices) + size_in_bits(&self.values) + INDEX_BIT_WIDTH
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.indices.iter().copied().zip(self.values.iter())
    }

    pub fn to_dense(&self) -> Vec<T> {
        let mut dense = vec![T::zero(); self.domain_size];
        for (index, value) in self.iter() {
            dense[index] = *value;
        }
        dense
    }

    /// Folds this vector against `range`, the scalar weights of dense
    /// positions `offset..offset + range.len()`.
    ///
    /// Returns the accumulated value and the residual vector:
    /// - entries below `offset` are added as they are;
    /// - entries inside the window are scaled by their weight and added;
    /// - entries at or past the window end form the residual, with indices
    ///   and domain size shifted down by `offset + range.len()`.
    ///
    /// Requires `offset <= domain_size` and a valid vector. Runs in one pass
    /// over both the entries and the weights.
    #[tracing::instrument(skip_all, name = "SparseVector::accumulate")]
    pub fn accumulate<F: ScalarMul<T>>(&self, range: &[F], offset: usize) -> (T, SparseVector<T>) {
        let mut window = T::zero();
        let (head, residual) = self.fold_window(range, offset, |weight, value| {
            window += weight.scalar_mul(value);
        });
        (head + window, residual)
    }

    /// [`SparseVector::accumulate`] for curve groups, with the in-window
    /// terms evaluated as one multi-scalar multiplication.
    #[tracing::instrument(skip_all, name = "SparseVector::accumulate_msm")]
    pub fn accumulate_msm(
        &self,
        range: &[T::ScalarField],
        offset: usize,
    ) -> (T, SparseVector<T>)
    where
        T: CurveGroup,
    {
        let mut bases = Vec::new();
        let mut scalars = Vec::new();
        let (head, residual) = self.fold_window(range, offset, |weight, value| {
            bases.push(*value);
            scalars.push(*weight);
        });
        let bases = T::normalize_batch(&bases);
        (
            head + <T as VariableBaseMSM>::msm_unchecked(&bases, &scalars),
            residual,
        )
    }

    /// Shared pass of the accumulate variants: sums the entries below
    /// `offset`, hands each in-window `(weight, value)` pair to `visit` and
    /// returns the rebased residual.
    fn fold_window<F>(
        &self,
        range: &[F],
        offset: usize,
        mut visit: impl FnMut(&F, &T),
    ) -> (T, SparseVector<T>) {
        debug_assert!(offset <= self.domain_size);
        let window_end = offset + range.len();

        let mut entries = self.iter().peekable();
        let mut head = T::zero();

        while let Some((_, value)) = entries.next_if(|&(index, _)| index < offset) {
            head += value;
        }

        // `cursor` is the dense position of the next weight `weights` yields.
        let mut weights = range.iter();
        let mut cursor = offset;
        while let Some((index, value)) = entries.next_if(|&(index, _)| index < window_end) {
            if let Some(weight) = index
                .checked_sub(cursor)
                .and_then(|skip| weights.nth(skip))
            {
                visit(weight, value);
                cursor = index + 1;
            }
        }

        let (indices, values) = entries
            .map(|(index, value)| (index - window_end, *value))
            .unzip();
        let residual = SparseVector {
            indices,
            values,
            domain_size: self.domain_size.saturating_sub(window_end),
        };

        (head, residual)
    }

    /// [`SparseVector::accumulate`] with its preconditions checked.
    pub fn accumulate_checked<F: ScalarMul<T>>(
        &self,
        range: &[F],
        offset: usize,
    ) -> Result<(T, SparseVector<T>), SparseVectorError> {
        if offset > self.domain_size {
            return Err(SparseVectorError::OutOfRange {
                index: offset,
                domain_size: self.domain_size,
            });
        }
        self.check_invariants()?;
        Ok(self.accumulate(range, offset))
    }

    #[tracing::instrument(skip_all, name = "SparseVector::to_bytes")]
    pub fn to_bytes(&self) -> Result<Vec<u8>, SparseVectorError> {
        let mut bytes = Vec::with_capacity(self.compressed_size());
        self.write_to(&mut bytes, Compress::Yes)?;
        Ok(bytes)
    }

    #[tracing::instrument(skip_all, name = "SparseVector::from_bytes")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SparseVectorError> {
        let mut reader = bytes;
        let vector = Self::read_from(&mut reader, Compress::Yes, Validate::Yes)?;
        if !reader.is_empty() {
            return Err(SparseVectorError::MalformedStream(format!(
                "{} trailing bytes",
                reader.len()
            )));
        }
        Ok(vector)
    }

    fn write_to<W: Write>(&self, mut writer: W, compress: Compress) -> Result<(), SparseVectorError> {
        write_index(&mut writer, self.domain_size)?;
        write_index(&mut writer, self.len())?;
        for &index in &self.indices {
            write_index(&mut writer, index)?;
        }
        for value in &self.values {
            value.serialize_with_mode(&mut writer, compress)?;
        }
        Ok(())
    }

    fn read_from<R: Read>(
        mut reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SparseVectorError> {
        let domain_size = read_index(&mut reader)?;
        let len = read_index(&mut reader)?;

        let mut indices = Vec::with_capacity(len.min(MAX_PREALLOCATED_ENTRIES));
        for _ in 0..len {
            indices.push(read_index(&mut reader)?);
        }
        let mut values = Vec::with_capacity(len.min(MAX_PREALLOCATED_ENTRIES));
        for _ in 0..len {
            values.push(
                T::deserialize_with_mode(&mut reader, compress, validate)
                    .map_err(element_error)?,
            );
        }

        let vector = Self {
            indices,
            values,
            domain_size,
        };
        if let Validate::Yes = validate {
            vector.check_invariants()?;
        }
        Ok(vector)
    }
}

fn element_error(err: SerializationError) -> SparseVectorError {
    match err {
        SerializationError::IoError(err) => truncated(err),
        err => SparseVectorError::Serialization(err),
    }
}

impl<T: GroupElement> PartialEq for SparseVector<T> {
    /// Positions missing from one side must hold the identity on the other.
    fn eq(&self, other: &Self) -> bool {
        self.domain_size == other.domain_size
            && self
                .iter()
                .merge_join_by(other.iter(), |(i, _), (j, _)| i.cmp(j))
                .all(|entry| match entry {
                    EitherOrBoth::Both((_, a), (_, b)) => a == b,
                    EitherOrBoth::Left((_, v)) | EitherOrBoth::Right((_, v)) => v.is_zero(),
                })
    }
}

impl<T: GroupElement> Eq for SparseVector<T> {}

impl<T: GroupElement> PartialEq<[T]> for SparseVector<T> {
    /// The dense side is canonical: it may be shorter than the domain (the
    /// tail is implicitly the identity) but every recorded index must fall
    /// inside it.
    fn eq(&self, other: &[T]) -> bool {
        if other.len() > self.domain_size {
            return false;
        }
        let mut entries = self.iter().peekable();
        other.iter().enumerate().all(|(pos, dense)| {
            match entries.next_if(|&(index, _)| index == pos) {
                Some((_, value)) => value == dense,
                None => dense.is_zero(),
            }
        }) && entries.next().is_none()
    }
}

impl<T: GroupElement> PartialEq<Vec<T>> for SparseVector<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        <Self as PartialEq<[T]>>::eq(self, other)
    }
}

impl<T: GroupElement> CanonicalSerialize for SparseVector<T> {
    fn serialize_with_mode<W: Write>(
        &self,
        writer: W,
        compress: Compress,
    ) -> Result<(), SerializationError> {
        Ok(self.write_to(writer, compress)?)
    }

    fn serialized_size(&self, compress: Compress) -> usize {
        (INDEX_BIT_WIDTH / 8) * (2 + self.len())
            + self
                .values
                .iter()
                .map(|value| value.serialized_size(compress))
                .sum::<usize>()
    }
}

impl<T: GroupElement> Valid for SparseVector<T> {
    fn check(&self) -> Result<(), SerializationError> {
        self.check_invariants()?;
        self.values.check()
    }
}

impl<T: GroupElement> CanonicalDeserialize for SparseVector<T> {
    fn deserialize_with_mode<R: Read>(
        reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        Ok(Self::read_from(reader, compress, validate)?)
    }
}

/// Text form: the domain size and entry count on their own lines, then all
/// indices on one line and all values on the next, each value as hex of its
/// compressed encoding.
impl<T: GroupElement> fmt::Display for SparseVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.domain_size)?;
        writeln!(f, "{}", self.len())?;
        writeln!(f, "{}", self.indices.iter().join(" "))?;
        let values = self
            .values
            .iter()
            .map(|value| -> Result<String, SerializationError> {
                let mut bytes = Vec::with_capacity(value.compressed_size());
                value.serialize_compressed(&mut bytes)?;
                Ok(hex::encode(bytes))
            })
            .collect::<Result<Vec<_>, SerializationError>>()
            .map_err(|_| fmt::Error)?;
        writeln!(f, "{}", values.join(" "))
    }
}

impl<T: GroupElement> FromStr for SparseVector<T> {
    type Err = SparseVectorError;

    #[tracing::instrument(skip_all, name = "SparseVector::from_str")]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let mut next_token = |what: &str| {
            tokens
                .next()
                .ok_or_else(|| SparseVectorError::MalformedStream(format!("missing {what}")))
        };
        let parse_index = |token: &str, what: &str| {
            token.parse::<usize>().map_err(|err| {
                SparseVectorError::MalformedStream(format!("bad {what} {token:?}: {err}"))
            })
        };

        let domain_size = parse_index(next_token("domain size")?, "domain size")?;
        let len = parse_index(next_token("entry count")?, "entry count")?;

        let mut indices = Vec::with_capacity(len.min(MAX_PREALLOCATED_ENTRIES));
        for _ in 0..len {
            indices.push(parse_index(next_token("index")?, "index")?);
        }
        let mut values = Vec::with_capacity(len.min(MAX_PREALLOCATED_ENTRIES));
        for _ in 0..len {
            let token = next_token("value")?;
            let bytes = hex::decode(token).map_err(|err| {
                SparseVectorError::MalformedStream(format!("bad value {token:?}: {err}"))
            })?;
            values.push(T::deserialize_compressed(&bytes[..]).map_err(element_error)?);
        }
        if let Some(token) = tokens.next() {
            return Err(SparseVectorError::MalformedStream(format!(
                "unexpected trailing token {token:?}"
            )));
        }

        let vector = Self {
            indices,
            values,
            domain_size,
        };
        vector.check_invariants()?;
        Ok(vector)
    }
}
