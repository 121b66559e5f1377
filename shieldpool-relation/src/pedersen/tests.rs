use bitvec::prelude::*;
use proptest::prelude::*;

use super::*;

#[test]
fn chunk_encoding() {
    shieldpool_test::init();

    // (1 - 2x₂)⋅(1 + x₀ + 2x₁) for a single chunk
    let cases: [([bool; 3], i64); 8] = [
        ([false, false, false], 1),
        ([true, false, false], 2),
        ([false, true, false], 3),
        ([true, true, false], 4),
        ([false, false, true], -1),
        ([true, false, true], -2),
        ([false, true, true], -3),
        ([true, true, true], -4),
    ];

    for (bits, expected) in cases {
        let chunk: BitVec<u8, Lsb0> = bits.iter().copied().collect();
        let expected = if expected < 0 {
            -jubjub::Fr::from(expected.unsigned_abs())
        } else {
            jubjub::Fr::from(expected as u64)
        };

        assert_eq!(M_i(&chunk), expected, "chunk {bits:?}");
    }
}

#[test]
fn chunk_weights_and_padding() {
    shieldpool_test::init();

    // chunk 0 encodes 2, chunk 1 encodes 1 and is weighted by 2^4,
    // and the trailing single bit is padded to the chunk [1, 0, 0] = 2, weighted by 2^8.
    let segment = bitvec![u8, Lsb0; 1, 0, 0, 0, 0, 0, 1];

    assert_eq!(M_i(&segment), jubjub::Fr::from(2 + 16 + 2 * 256));
}

#[test]
fn generators() {
    shieldpool_test::init();

    assert_eq!(COMMITMENT_HASHER.width(), 496);
    assert_eq!(COMMITMENT_HASHER.generators.len(), 3);
    assert_eq!(NULLIFIER_HASHER.width(), 248);
    assert_eq!(NULLIFIER_HASHER.generators.len(), 2);

    for generator in COMMITMENT_HASHER
        .generators
        .iter()
        .chain(NULLIFIER_HASHER.generators.iter())
    {
        assert!(bool::from(generator.is_prime_order()));
    }

    // The instances have independent bases.
    for commitment_generator in COMMITMENT_HASHER.generators.iter() {
        assert!(!NULLIFIER_HASHER.generators.contains(commitment_generator));
    }
}

#[test]
fn generators_are_deterministic() {
    shieldpool_test::init();

    let rederived = PedersenHasher::new(COMMITMENT_HASHER.domain(), COMMITMENT_BITS);

    assert_eq!(rederived.generators, COMMITMENT_HASHER.generators);
}

#[test]
#[should_panic(expected = "fixed width")]
fn wrong_width_panics() {
    let bits = bitvec![u8, Lsb0; 0; NULLIFIER_BITS - 1];

    NULLIFIER_HASHER.hash(&bits);
}

proptest! {
    #![proptest_config(
        proptest::test_runner::Config::with_cases(shieldpool_test::proptest_cases(32))
    )]

    /// Identical inputs always hash to identical outputs.
    #[test]
    fn hash_is_deterministic(bytes in any::<[u8; 31]>()) {
        shieldpool_test::init();

        let bits = bytes.view_bits::<Lsb0>();

        prop_assert_eq!(NULLIFIER_HASHER.hash(bits), NULLIFIER_HASHER.hash(bits));
    }

    /// A 248-bit hash is unrelated to the 496-bit hash of the same bits
    /// followed by zeros.
    #[test]
    fn instances_are_independent(bytes in any::<[u8; 31]>()) {
        shieldpool_test::init();

        let mut extended = bytes.view_bits::<Lsb0>().to_bitvec();
        extended.extend_from_bitslice(bitvec![u8, Lsb0; 0; NULLIFIER_BITS].as_bitslice());

        prop_assert_ne!(
            NULLIFIER_HASHER.hash_to_point(bytes.view_bits::<Lsb0>()),
            COMMITMENT_HASHER.hash_to_point(&extended)
        );
    }

    /// Flipping any single input bit changes the hash.
    #[test]
    fn single_bit_changes_hash(bytes in any::<[u8; 31]>(), position in 0..NULLIFIER_BITS) {
        shieldpool_test::init();

        let original = bytes.view_bits::<Lsb0>().to_bitvec();
        let mut flipped = original.clone();
        let bit = flipped[position];
        flipped.set(position, !bit);

        prop_assert_ne!(NULLIFIER_HASHER.hash(&original), NULLIFIER_HASHER.hash(&flipped));
    }
}
