//! Split calculation and payment-request transitions.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::booking::types::{Booking, BookingState, BookingStatus, PaymentStatus};
use crate::payout::error::PayoutError;
use crate::payout::types::{PaymentRequest, PaymentRequestStatus, PaymentSplit};

/// Stateless service for staff payout math and request transitions.
pub struct PayoutService;

impl PayoutService {
    /// Splits an amount between staff and platform.
    ///
    /// The staff share rounds down (never over-pay staff); the platform
    /// retains the remainder, so the two always sum to the requested
    /// amount.
    pub fn compute_split(
        requested_amount: Decimal,
        percentage: Decimal,
    ) -> Result<PaymentSplit, PayoutError> {
        if percentage <= Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
            return Err(PayoutError::InvalidPercentage { percentage });
        }
        if requested_amount.is_sign_negative() {
            return Err(PayoutError::NegativeAmount {
                amount: requested_amount,
            });
        }

        let staff_amount = (requested_amount * percentage / Decimal::ONE_HUNDRED).floor();
        Ok(PaymentSplit {
            staff_amount,
            platform_amount: requested_amount - staff_amount,
        })
    }

    /// Checks payout eligibility: only completed, paid bookings qualify.
    pub fn ensure_eligible(state: &BookingState) -> Result<(), PayoutError> {
        if state.booking == BookingStatus::Completed && state.payment == PaymentStatus::Paid {
            Ok(())
        } else {
            Err(PayoutError::NotEligible {
                booking: state.booking,
                payment: state.payment,
            })
        }
    }

    /// Derives a PENDING payment request from an eligible booking.
    pub fn build_request(
        booking: &Booking,
        percentage: Decimal,
    ) -> Result<PaymentRequest, PayoutError> {
        Self::ensure_eligible(&booking.state)?;
        let split = Self::compute_split(booking.total_amount, percentage)?;
        Ok(PaymentRequest {
            booking_id: booking.id,
            requested_amount: booking.total_amount,
            percentage,
            staff_amount: split.staff_amount,
            status: PaymentRequestStatus::Pending,
            rejection_reason: None,
            requested_at: Utc::now(),
        })
    }

    /// Payout succeeded: PENDING → PAID.
    pub fn approve(
        current: PaymentRequestStatus,
    ) -> Result<PaymentRequestStatus, PayoutError> {
        Self::step(current, PaymentRequestStatus::Pending, PaymentRequestStatus::Paid)
    }

    /// Payout failed: PENDING → FAILED.
    pub fn fail(current: PaymentRequestStatus) -> Result<PaymentRequestStatus, PayoutError> {
        Self::step(
            current,
            PaymentRequestStatus::Pending,
            PaymentRequestStatus::Failed,
        )
    }

    /// Re-queue a failed payout: FAILED → PENDING.
    pub fn requeue(current: PaymentRequestStatus) -> Result<PaymentRequestStatus, PayoutError> {
        Self::step(
            current,
            PaymentRequestStatus::Failed,
            PaymentRequestStatus::Pending,
        )
    }

    /// Provider rejects the request: PENDING → CANCELLED, reason required.
    pub fn reject(
        current: PaymentRequestStatus,
        reason: &str,
    ) -> Result<PaymentRequestStatus, PayoutError> {
        if reason.trim().is_empty() {
            return Err(PayoutError::RejectionReasonRequired);
        }
        Self::step(
            current,
            PaymentRequestStatus::Pending,
            PaymentRequestStatus::Cancelled,
        )
    }

    fn step(
        current: PaymentRequestStatus,
        expected: PaymentRequestStatus,
        to: PaymentRequestStatus,
    ) -> Result<PaymentRequestStatus, PayoutError> {
        if current == expected {
            Ok(to)
        } else {
            Err(PayoutError::InvalidRequestTransition { from: current, to })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(1000), dec!(70), dec!(700), dec!(300))]
    #[case(dec!(999), dec!(33), dec!(329), dec!(670))]
    #[case(dec!(250), dec!(100), dec!(250), dec!(0))]
    #[case(dec!(0), dec!(50), dec!(0), dec!(0))]
    #[case(dec!(101), dec!(50), dec!(50), dec!(51))]
    fn test_split_cases(
        #[case] amount: Decimal,
        #[case] pct: Decimal,
        #[case] staff: Decimal,
        #[case] platform: Decimal,
    ) {
        let split = PayoutService::compute_split(amount, pct).unwrap();
        assert_eq!(split.staff_amount, staff);
        assert_eq!(split.platform_amount, platform);
    }

    #[test]
    fn test_split_rejects_bad_percentage() {
        assert!(matches!(
            PayoutService::compute_split(dec!(100), dec!(0)),
            Err(PayoutError::InvalidPercentage { .. })
        ));
        assert!(matches!(
            PayoutService::compute_split(dec!(100), dec!(101)),
            Err(PayoutError::InvalidPercentage { .. })
        ));
        assert!(matches!(
            PayoutService::compute_split(dec!(100), dec!(-5)),
            Err(PayoutError::InvalidPercentage { .. })
        ));
    }

    #[test]
    fn test_split_rejects_negative_amount() {
        assert!(matches!(
            PayoutService::compute_split(dec!(-1), dec!(50)),
            Err(PayoutError::NegativeAmount { .. })
        ));
    }

    #[test]
    fn test_eligibility_gate() {
        use crate::booking::types::TrackingStatus;

        let eligible = BookingState {
            booking: BookingStatus::Completed,
            payment: PaymentStatus::Paid,
            tracking: TrackingStatus::Completed,
        };
        assert!(PayoutService::ensure_eligible(&eligible).is_ok());

        let in_progress = BookingState {
            booking: BookingStatus::Confirmed,
            payment: PaymentStatus::Paid,
            tracking: TrackingStatus::ServiceStarted,
        };
        assert!(matches!(
            PayoutService::ensure_eligible(&in_progress),
            Err(PayoutError::NotEligible { .. })
        ));
    }

    #[test]
    fn test_request_lifecycle() {
        let paid = PayoutService::approve(PaymentRequestStatus::Pending).unwrap();
        assert_eq!(paid, PaymentRequestStatus::Paid);

        let failed = PayoutService::fail(PaymentRequestStatus::Pending).unwrap();
        assert_eq!(failed, PaymentRequestStatus::Failed);

        let requeued = PayoutService::requeue(failed).unwrap();
        assert_eq!(requeued, PaymentRequestStatus::Pending);

        let rejected =
            PayoutService::reject(PaymentRequestStatus::Pending, "Duplicate request").unwrap();
        assert_eq!(rejected, PaymentRequestStatus::Cancelled);
    }

    #[test]
    fn test_terminal_requests_are_closed() {
        for terminal in [PaymentRequestStatus::Paid, PaymentRequestStatus::Cancelled] {
            assert!(PayoutService::approve(terminal).is_err());
            assert!(PayoutService::fail(terminal).is_err());
            assert!(PayoutService::requeue(terminal).is_err());
            assert!(PayoutService::reject(terminal, "reason").is_err());
        }
    }

    #[test]
    fn test_reject_requires_reason() {
        let result = PayoutService::reject(PaymentRequestStatus::Pending, "  ");
        assert!(matches!(result, Err(PayoutError::RejectionReasonRequired)));
    }
}
