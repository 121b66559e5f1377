use proptest::prelude::*;

use crate::field::{from_short_bytes, Base};

use super::*;

/// Inverts [`feistel`], to check that it is a permutation of the state.
fn inverse_feistel(mut left: Base, mut right: Base, key: Base) -> (Base, Base) {
    for (round, constant) in ROUND_CONSTANTS.iter().enumerate().rev() {
        if round == ROUNDS - 1 {
            let t = left + key + constant;
            right -= t.square().square() * t;
        } else {
            let previous_left = right;
            let t = previous_left + key + constant;
            right = left - t.square().square() * t;
            left = previous_left;
        }
    }

    (left, right)
}

/// A strategy for arbitrary field elements.
fn any_base() -> impl Strategy<Value = Base> {
    any::<[u8; 32]>().prop_map(|bytes| {
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(&bytes);
        Base::from_bytes_wide(&wide)
    })
}

#[test]
fn round_constants() {
    shieldpool_test::init();

    assert_eq!(ROUND_CONSTANTS[0], Base::zero());
    assert_eq!(ROUND_CONSTANTS[ROUNDS - 1], Base::zero());

    let inner = &ROUND_CONSTANTS[1..ROUNDS - 1];
    assert!(inner.iter().all(|constant| *constant != Base::zero()));

    for (i, constant) in inner.iter().enumerate() {
        assert!(!inner[i + 1..].contains(constant), "round constants are distinct");
    }
}

#[test]
fn sponge_absorbs_in_order() {
    shieldpool_test::init();

    let a = Base::from(1u64);
    let b = Base::from(2u64);

    assert_eq!(sponge(&[]), Base::zero());
    assert_eq!(hash_pair(a, b), sponge(&[a, b]));

    // The first absorption leaves the capacity element in play.
    let (left, right) = feistel(a, Base::zero(), Base::zero());
    assert_eq!(hash_pair(a, b), feistel(left + b, right, Base::zero()).0);
}

#[test]
fn zero_inputs_do_not_hash_to_zero() {
    shieldpool_test::init();

    assert_ne!(hash_pair(Base::zero(), Base::zero()), Base::zero());
}

proptest! {
    #![proptest_config(
        proptest::test_runner::Config::with_cases(shieldpool_test::proptest_cases(64))
    )]

    #[test]
    fn feistel_is_a_permutation(left in any_base(), right in any_base(), key in any_base()) {
        shieldpool_test::init();

        let (permuted_left, permuted_right) = feistel(left, right, key);

        prop_assert_eq!(inverse_feistel(permuted_left, permuted_right, key), (left, right));
    }

    /// Identical inputs always hash to identical outputs.
    #[test]
    fn hash_pair_is_deterministic(left in any_base(), right in any_base()) {
        shieldpool_test::init();

        prop_assert_eq!(hash_pair(left, right), hash_pair(left, right));
    }

    #[test]
    fn hash_pair_is_order_sensitive(left in any::<[u8; 31]>(), right in any::<[u8; 31]>()) {
        shieldpool_test::init();

        let left = from_short_bytes(&left);
        let right = from_short_bytes(&right);
        prop_assume!(left != right);

        prop_assert_ne!(hash_pair(left, right), hash_pair(right, left));
    }
}
