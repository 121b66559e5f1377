use proptest::prelude::*;

use crate::field::{from_short_bytes, Base};

use super::*;

#[test]
fn non_boolean_selectors_are_rejected() {
    shieldpool_test::init();

    let in0 = Base::from(10u64);
    let in1 = Base::from(20u64);

    for s in [Base::from(2u64), -Base::one(), Base::from(u64::MAX)] {
        assert_eq!(select(in0, in1, s), Err(NonBooleanSelector));
    }
}

proptest! {
    #[test]
    fn selector_orders_pairs(in0 in any::<[u8; 31]>(), in1 in any::<[u8; 31]>()) {
        shieldpool_test::init();

        let in0 = from_short_bytes(&in0);
        let in1 = from_short_bytes(&in1);

        prop_assert_eq!(select(in0, in1, Base::zero()), Ok((in0, in1)));
        prop_assert_eq!(select(in0, in1, Base::one()), Ok((in1, in0)));
    }
}
