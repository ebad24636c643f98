//! Property-based tests for PayoutService.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::payout::service::PayoutService;

/// Amounts up to 10_000_000 with two decimal places.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Percentages in (0, 100] with up to one decimal place.
fn arb_percentage() -> impl Strategy<Value = Decimal> {
    (1i64..=1000).prop_map(|tenths| Decimal::new(tenths, 1))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The split is exact: staff + platform always reconstructs the
    /// requested amount, and the staff share never exceeds it.
    #[test]
    fn prop_split_conserves_amount(amount in arb_amount(), pct in arb_percentage()) {
        let split = PayoutService::compute_split(amount, pct).unwrap();
        prop_assert_eq!(split.staff_amount + split.platform_amount, amount);
        prop_assert!(split.staff_amount <= amount);
        prop_assert!(split.staff_amount >= Decimal::ZERO);
        prop_assert!(split.platform_amount >= Decimal::ZERO);
    }

    /// Rounding direction: the staff share is the floor, so it is never
    /// more than the exact proportional share.
    #[test]
    fn prop_staff_share_rounds_down(amount in arb_amount(), pct in arb_percentage()) {
        let split = PayoutService::compute_split(amount, pct).unwrap();
        let exact = amount * pct / Decimal::ONE_HUNDRED;
        prop_assert!(split.staff_amount <= exact);
        prop_assert!(exact - split.staff_amount < Decimal::ONE);
    }

    /// Percentages outside (0, 100] are always rejected.
    #[test]
    fn prop_out_of_range_percentage_rejected(amount in arb_amount(), pct in 101i64..10_000) {
        prop_assert!(PayoutService::compute_split(amount, Decimal::from(pct)).is_err());
        prop_assert!(PayoutService::compute_split(amount, Decimal::from(-pct)).is_err());
        prop_assert!(PayoutService::compute_split(amount, Decimal::ZERO).is_err());
    }
}
