//! Net pay derivation.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{HrError, HrResult};

/// Decimal places of every stored money amount.
pub const MONEY_SCALE: u32 = 2;

/// Rounds a money amount to two decimal places, ties to even.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

fn out_of_range() -> HrError {
    HrError::validation("net_pay", "amounts are too large to sum")
}

/// Prorates a monthly salary: `salary / standard_days * attended_days`.
///
/// The result is exact, not rounded; rounding happens once, on net pay.
/// A month without standard days prorates to zero.
///
/// # Errors
///
/// [`HrError::Validation`] on `base_salary` if the product overflows.
pub fn prorate(salary: Decimal, standard_days: u32, attended_days: u32) -> HrResult<Decimal> {
    if standard_days == 0 {
        return Ok(Decimal::ZERO);
    }
    salary
        .checked_div(Decimal::from(standard_days))
        .and_then(|daily| daily.checked_mul(Decimal::from(attended_days)))
        .ok_or_else(|| HrError::validation("base_salary", "prorated salary overflows"))
}

/// Computes net pay as
/// `base + allowance - deduction + overtime + bonus - tax`, rounded to two
/// decimal places (ties to even).
///
/// # Errors
///
/// [`HrError::Validation`] on `net_pay` if the sum overflows.
///
/// # Example
///
/// ```
/// use hr_admin::payroll::compute_net_pay;
/// use rust_decimal::Decimal;
///
/// let net = compute_net_pay(
///     Decimal::from(4_800_000),
///     Decimal::from(1_000_000),
///     Decimal::from(1_050_000),
///     Decimal::ZERO,
///     Decimal::ZERO,
///     Decimal::ZERO,
/// )
/// .unwrap();
/// assert_eq!(net.to_string(), "4750000.00");
/// ```
pub fn compute_net_pay(
    base: Decimal,
    allowance: Decimal,
    deduction: Decimal,
    overtime: Decimal,
    bonus: Decimal,
    tax: Decimal,
) -> HrResult<Decimal> {
    let sum = base
        .checked_add(allowance)
        .and_then(|v| v.checked_sub(deduction))
        .and_then(|v| v.checked_add(overtime))
        .and_then(|v| v.checked_add(bonus))
        .and_then(|v| v.checked_sub(tax))
        .ok_or_else(out_of_range)?;
    let mut net = round_money(sum);
    // Fix the scale so "4750000" renders as "4750000.00".
    net.rescale(MONEY_SCALE);
    Ok(net)
}
