use ark_bn254::{Fr, G1Projective, G2Projective};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{test_rng, UniformRand, Zero};
use sparse_core::utils::{deserialize_bit_vector, int_list_to_bits, serialize_bit_vector};
use sparse_core::{GroupElement, ScalarMul, SparseVector};

fn weighted_sum<T: GroupElement, F: ScalarMul<T>>(dense: &[T], weights: &[F]) -> T {
    dense
        .iter()
        .zip(weights.iter())
        .fold(T::zero(), |acc, (value, weight)| acc + weight.scalar_mul(value))
}

#[test]
fn windowed_folding_matches_full_fold() {
    let mut rng = test_rng();
    let domain_size = 96;
    let vector = SparseVector::<G1Projective>::random(domain_size, 0.3, &mut rng);
    let weights: Vec<Fr> = (0..domain_size).map(|_| Fr::rand(&mut rng)).collect();

    let expected = weighted_sum(&vector.to_dense(), &weights);

    // Consume the vector window by window, always at offset 0 of the residual.
    let mut total = G1Projective::zero();
    let mut residual = vector.clone();
    let mut consumed = 0;
    for window in [10, 1, 0, 25, 60] {
        let (value, rest) = residual.accumulate(&weights[consumed..consumed + window], 0);
        total += value;
        residual = rest;
        consumed += window;
    }

    assert_eq!(consumed, domain_size);
    assert_eq!(total, expected);
    assert!(residual.is_empty());
    assert_eq!(residual.domain_size(), 0);
}

#[test]
fn round_trips_across_groups_and_modes() {
    let mut rng = test_rng();
    for density in [0.0, 0.05, 0.5, 1.0] {
        let g2 = SparseVector::<G2Projective>::random(20, density, &mut rng);
        let mut compressed = Vec::new();
        g2.serialize_compressed(&mut compressed).unwrap();
        assert_eq!(
            SparseVector::<G2Projective>::deserialize_compressed(&compressed[..]).unwrap(),
            g2
        );

        let fr = SparseVector::<Fr>::random(200, density, &mut rng);
        let mut uncompressed = Vec::new();
        fr.serialize_uncompressed(&mut uncompressed).unwrap();
        assert_eq!(
            SparseVector::<Fr>::deserialize_uncompressed(&uncompressed[..]).unwrap(),
            fr
        );

        let text = fr.to_string();
        assert_eq!(text.parse::<SparseVector<Fr>>().unwrap(), fr);
    }
}

#[test]
fn dense_vectors_round_trip_through_sparse_form() {
    let mut rng = test_rng();
    let dense: Vec<Fr> = (0..33).map(|_| Fr::rand(&mut rng)).collect();
    let sparse = SparseVector::from(dense.clone());

    let decoded = SparseVector::<Fr>::from_bytes(&sparse.to_bytes().unwrap()).unwrap();
    assert_eq!(decoded, dense);
    assert_eq!(decoded.to_dense(), dense);
}

#[test]
fn packed_bits_of_words_round_trip() {
    let words = [0xdead_beef_u64, 0, u32::MAX as u64, 1];
    let bits = int_list_to_bits(&words, 32);
    assert_eq!(bits.len(), 128);

    let mut buf = Vec::new();
    serialize_bit_vector(&mut buf, &bits).unwrap();
    assert_eq!(&buf[8..12], &0xdead_beef_u32.to_be_bytes());

    assert_eq!(deserialize_bit_vector(&buf[..]).unwrap(), bits);
}
