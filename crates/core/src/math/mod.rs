use rust_decimal::Decimal;

/// Calculates the total for a single order line (unit price times quantity)
pub fn line_total(unit_price: Decimal, quantity: u32) -> Option<Decimal> {
    unit_price.checked_mul(Decimal::from(quantity))
}

/// Sums a sequence of amounts, `None` on overflow
pub fn sum_amounts<I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
}

/// Rounds an amount to cents for display
pub fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}
