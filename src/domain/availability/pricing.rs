//! Stay pricing: fee rates, rounding, and the cost breakdown.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Scale of every stored monetary amount (2 decimal places).
pub const MONEY_SCALE: u32 = 2;

/// Round a monetary amount half-up to 2 decimal places.
///
/// Applied at every derived quantity, not only at the total, so results
/// match a fixed-point ledger.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a stored minor-unit amount (cents) into a decimal amount.
pub fn from_minor_units(cents: i64) -> Decimal {
    Decimal::new(cents, MONEY_SCALE)
}

/// Convert a decimal amount into minor units (cents), rounding half-up first.
///
/// Returns `None` when the amount does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    round_money(amount)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()
}

/// Platform fee and tax rates applied to every stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Platform service fee as a fraction of the accommodation cost
    pub service_fee_rate: Decimal,
    /// Tax rate applied to accommodation cost plus service fee
    pub tax_rate: Decimal,
}

impl PricingPolicy {
    /// 10% platform fee, 8% tax.
    pub const STANDARD: PricingPolicy = PricingPolicy {
        service_fee_rate: Decimal::from_parts(10, 0, 0, false, 2),
        tax_rate: Decimal::from_parts(8, 0, 0, false, 2),
    };

    /// Price a stay of `nights` nights.
    pub fn price(&self, nightly_rate: Decimal, cleaning_fee: Decimal, nights: u32) -> CostBreakdown {
        let accommodation_cost = round_money(nightly_rate * Decimal::from(nights));
        let cleaning_fee = round_money(cleaning_fee);
        let service_fee = round_money(accommodation_cost * self.service_fee_rate);
        let taxes = round_money((accommodation_cost + service_fee) * self.tax_rate);
        let total = accommodation_cost + cleaning_fee + service_fee + taxes;

        CostBreakdown {
            accommodation_cost,
            cleaning_fee,
            service_fee,
            taxes,
            total,
        }
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Cost breakdown of a stay. All amounts carry 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub accommodation_cost: Decimal,
    pub cleaning_fee: Decimal,
    pub service_fee: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
}

impl CostBreakdown {
    /// Sum of the components; equals `total` for any breakdown produced by
    /// [`PricingPolicy::price`].
    pub fn components_sum(&self) -> Decimal {
        self.accommodation_cost + self.cleaning_fee + self.service_fee + self.taxes
    }
}
