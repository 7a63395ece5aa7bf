use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

/// NPV magnitude below which the IRR search is considered converged.
pub const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);

const MAX_IRR_ITERATIONS: u32 = 1000;
const BRACKET_LOW: Decimal = dec!(-0.99);
const BRACKET_HIGH: Decimal = dec!(10.0);

/// Net Present Value of a series of cash flows: Σ cf[t] / (1+rate)^t,
/// index 0 included undiscounted.
///
/// Total over finite inputs. Discount factors are built by iterative
/// multiplication; once a factor leaves the representable Decimal range the
/// remaining tail contributes nothing measurable and is skipped.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> Money {
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;
    let mut total = Decimal::ZERO;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = match discount.checked_mul(one_plus_r) {
                Some(d) if !d.is_zero() => d,
                _ => break,
            };
        }
        let term = match cf.checked_div(discount) {
            Some(v) => v,
            None if cf.is_sign_negative() => Decimal::MIN,
            None => Decimal::MAX,
        };
        total = total.saturating_add(term);
    }

    total
}

/// Internal Rate of Return by bisection over [-0.99, 10.0].
///
/// Returns `None` when the rate is undefined: fewer than two cash flows, or
/// no sign change across the bracket (a series that never breaks even, or
/// never goes negative, has no root to find). If the loop exhausts its
/// iteration budget before reaching tolerance, the midpoint of the final
/// bracket is returned as a best-effort approximation.
pub fn irr(cash_flows: &[Money]) -> Option<Rate> {
    if cash_flows.len() < 2 {
        return None;
    }

    let mut lo = BRACKET_LOW;
    let mut hi = BRACKET_HIGH;
    let mut npv_lo = npv(lo, cash_flows);
    let npv_hi = npv(hi, cash_flows);

    if npv_lo.abs() < CONVERGENCE_THRESHOLD {
        return Some(lo);
    }
    if npv_hi.abs() < CONVERGENCE_THRESHOLD {
        return Some(hi);
    }
    if npv_lo.is_sign_positive() == npv_hi.is_sign_positive() {
        return None;
    }

    for _ in 0..MAX_IRR_ITERATIONS {
        let mid = (lo + hi) / dec!(2);
        let npv_mid = npv(mid, cash_flows);

        if npv_mid.abs() < CONVERGENCE_THRESHOLD {
            return Some(mid);
        }

        if npv_mid.is_sign_positive() == npv_lo.is_sign_positive() {
            lo = mid;
            npv_lo = npv_mid;
        } else {
            hi = mid;
        }
    }

    Some((lo + hi) / dec!(2))
}

/// Level annual payment amortizing `principal` over `periods` years at
/// `rate`: P·r(1+r)^n / ((1+r)^n − 1). Zero rate degrades to straight-line;
/// zero periods yields no payment.
pub fn annuity_payment(principal: Money, rate: Rate, periods: u32) -> Money {
    if periods == 0 || principal.is_zero() {
        return Decimal::ZERO;
    }
    if rate.is_zero() {
        return principal / Decimal::from(periods);
    }

    let one_plus_r = Decimal::ONE + rate;
    let factor = one_plus_r.powi(periods as i64);
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return principal / Decimal::from(periods);
    }

    principal * rate * factor / denominator
}
