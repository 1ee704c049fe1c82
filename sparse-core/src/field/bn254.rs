use ark_bn254::{g1, g2, Fq, Fr, G1Projective, G2Projective};
use ark_ec::short_weierstrass::Projective;
use ark_ff::PrimeField;
use ark_std::{One, Zero};

use super::{GroupElement, ScalarMul};
use crate::utils::FixedBitWidth;

impl FixedBitWidth for Fr {
    const BIT_WIDTH: usize = Fr::MODULUS_BIT_SIZE as usize;
}

// Compressed points: one base field coordinate per component plus a flag bit.
impl FixedBitWidth for Projective<g1::Config> {
    const BIT_WIDTH: usize = Fq::MODULUS_BIT_SIZE as usize + 1;
}

impl FixedBitWidth for Projective<g2::Config> {
    const BIT_WIDTH: usize = 2 * Fq::MODULUS_BIT_SIZE as usize + 1;
}

impl GroupElement for Fr {}
impl GroupElement for Projective<g1::Config> {}
impl GroupElement for Projective<g2::Config> {}

impl ScalarMul<Fr> for Fr {
    #[inline(always)]
    fn scalar_mul(&self, element: &Fr) -> Fr {
        if self.is_zero() || element.is_zero() {
            Fr::zero()
        } else if self.is_one() {
            *element
        } else if element.is_one() {
            *self
        } else {
            *self * element
        }
    }
}

impl ScalarMul<Projective<g1::Config>> for Fr {
    #[inline]
    fn scalar_mul(&self, element: &G1Projective) -> G1Projective {
        if self.is_zero() {
            G1Projective::zero()
        } else if self.is_one() {
            *element
        } else {
            *element * self
        }
    }
}

impl ScalarMul<Projective<g2::Config>> for Fr {
    #[inline]
    fn scalar_mul(&self, element: &G2Projective) -> G2Projective {
        if self.is_zero() {
            G2Projective::zero()
        } else if self.is_one() {
            *element
        } else {
            *element * self
        }
    }
}
