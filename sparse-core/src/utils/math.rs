use super::errors::SparseVectorError;

pub trait Math {
    fn pow2(self) -> usize;
    fn log_2(self) -> usize;
}

impl Math for usize {
    #[inline]
    fn pow2(self) -> usize {
        let base: usize = 2;
        base.pow(self as u32)
    }

    /// Ceiling log2: the smallest `k` such that `2^k >= self`. `0.log_2()` is 0.
    fn log_2(self) -> usize {
        if self <= 1 {
            return 0;
        }

        if self.is_power_of_two() {
            (1usize.leading_zeros() - self.leading_zeros()) as usize
        } else {
            (0usize.leading_zeros() - self.leading_zeros()) as usize
        }
    }
}

/// Returns `ceil(log2(n))`, so `1 << log2(n)` is the smallest power of 2 not
/// less than `n`.
#[inline]
pub fn log2(n: usize) -> usize {
    n.log_2()
}

#[inline]
pub fn exp2(k: usize) -> usize {
    k.pow2()
}

/// Reverses the low `l` bits of `n`. Bits above `l` are discarded.
pub fn bitreverse(mut n: usize, l: usize) -> usize {
    let mut r = 0;
    for _ in 0..l {
        r = (r << 1) | (n & 1);
        n >>= 1;
    }
    r
}

/// Integer ceiling division, rounding toward positive infinity for every
/// sign combination. `i64::MIN / -1` is reported as an overflow.
pub fn div_ceil(x: i64, y: i64) -> Result<i64, SparseVectorError> {
    if y == 0 {
        return Err(SparseVectorError::DivisionByZero);
    }
    let overflow = || SparseVectorError::ArithmeticOverflow(format!("{x} / {y}"));
    let q = x.checked_div(y).ok_or_else(overflow)?;
    let r = x.checked_rem(y).ok_or_else(overflow)?;
    if r != 0 && ((r > 0) == (y > 0)) {
        q.checked_add(1).ok_or_else(overflow)
    } else {
        Ok(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log2_boundaries() {
        assert_eq!(log2(0), 0);
        assert_eq!(log2(1), 0);
        assert_eq!(log2(2), 1);
        assert_eq!(log2(3), 2);
        assert_eq!(log2(4), 2);
        assert_eq!(log2(5), 3);
        assert_eq!(log2(1 << 20), 20);
        assert_eq!(log2((1 << 20) + 1), 21);
    }

    #[test]
    fn exp2_inverts_log2() {
        for k in 0..32 {
            assert_eq!(log2(exp2(k)), k);
        }
        for n in 1..5000usize {
            assert!(exp2(log2(n)) >= n);
            if n > 1 {
                assert!(exp2(log2(n) - 1) < n);
            }
        }
    }

    #[test]
    fn bitreverse_low_bits() {
        assert_eq!(bitreverse(0b0001, 4), 0b1000);
        assert_eq!(bitreverse(0b0110, 4), 0b0110);
        assert_eq!(bitreverse(0b1101, 4), 0b1011);
        assert_eq!(bitreverse(0b11, 0), 0);
        // bits above l are dropped
        assert_eq!(bitreverse(0b1_0001, 4), 0b1000);
        for n in 0..256 {
            assert_eq!(bitreverse(bitreverse(n, 8), 8), n);
        }
    }

    #[test]
    fn div_ceil_signs() {
        assert_eq!(div_ceil(7, 2).unwrap(), 4);
        assert_eq!(div_ceil(8, 2).unwrap(), 4);
        assert_eq!(div_ceil(0, 3).unwrap(), 0);
        assert_eq!(div_ceil(-7, 2).unwrap(), -3);
        assert_eq!(div_ceil(7, -2).unwrap(), -3);
        assert_eq!(div_ceil(-7, -2).unwrap(), 4);
        assert!(matches!(
            div_ceil(1, 0),
            Err(SparseVectorError::DivisionByZero)
        ));
        assert!(matches!(
            div_ceil(i64::MIN, -1),
            Err(SparseVectorError::ArithmeticOverflow(_))
        ));
        assert_eq!(div_ceil(i64::MIN, 1).unwrap(), i64::MIN);
        assert_eq!(div_ceil(i64::MIN, 2).unwrap(), i64::MIN / 2);
        assert_eq!(div_ceil(i64::MAX, 2).unwrap(), i64::MAX / 2 + 1);
        assert_eq!(div_ceil(i64::MIN + 1, -1).unwrap(), i64::MAX);
    }
}
