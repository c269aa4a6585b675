//! Discount policies.
//!
//! A policy is a pure function from the order's lines to a discount amount. The
//! aggregate receives the policy at recompute time, so new rules can be added
//! without touching [`crate::Order`].

use rust_decimal::{Decimal, RoundingStrategy};

use crate::line::{ComboSlot, OrderItem, subtotal};

/// Computes the discount for a finalized set of order lines.
pub trait DiscountPolicy: Send + Sync {
    fn discount(&self, items: &[OrderItem]) -> Decimal;
}

impl<F> DiscountPolicy for F
where
    F: Fn(&[OrderItem]) -> Decimal + Send + Sync,
{
    fn discount(&self, items: &[OrderItem]) -> Decimal {
        self(items)
    }
}

/// Policy that never discounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiscount;

impl DiscountPolicy for NoDiscount {
    fn discount(&self, _items: &[OrderItem]) -> Decimal {
        Decimal::ZERO
    }
}

/// Round a monetary amount to cents (midpoint away from zero).
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Combination of items that earns a combo discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboTier {
    /// Sandwich + fries + soft drink.
    Full,
    /// Sandwich + soft drink.
    SandwichAndDrink,
    /// Sandwich + fries.
    SandwichAndFries,
}

impl ComboTier {
    /// Fraction of the subtotal taken off.
    pub fn rate(self) -> Decimal {
        match self {
            ComboTier::Full => Decimal::new(20, 2),
            ComboTier::SandwichAndDrink => Decimal::new(15, 2),
            ComboTier::SandwichAndFries => Decimal::new(10, 2),
        }
    }
}

/// Combo discount rules.
///
/// Tiers are checked from richest to poorest and the first match wins:
///
/// | sandwich | fries | soft drink | discount |
/// |----------|-------|------------|----------|
/// | yes      | yes   | yes        | 20%      |
/// | yes      | any   | yes        | 15%      |
/// | yes      | yes   | no         | 10%      |
/// | no       | any   | any        | 0        |
///
/// The rate applies to the whole subtotal, not just the combo lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComboDiscountPolicy;

impl ComboDiscountPolicy {
    pub fn tier(items: &[OrderItem]) -> Option<ComboTier> {
        let has = |slot: ComboSlot| items.iter().any(|i| i.combo_slot() == Some(slot));

        let has_sandwich = has(ComboSlot::Sandwich);
        let has_fries = has(ComboSlot::Fries);
        let has_soft_drink = has(ComboSlot::SoftDrink);

        if has_sandwich && has_fries && has_soft_drink {
            Some(ComboTier::Full)
        } else if has_sandwich && has_soft_drink {
            Some(ComboTier::SandwichAndDrink)
        } else if has_sandwich && has_fries {
            Some(ComboTier::SandwichAndFries)
        } else {
            None
        }
    }
}

impl DiscountPolicy for ComboDiscountPolicy {
    fn discount(&self, items: &[OrderItem]) -> Decimal {
        if items.is_empty() {
            return Decimal::ZERO;
        }

        match Self::tier(items) {
            Some(tier) => round_currency(subtotal(items) * tier.rate()),
            None => Decimal::ZERO,
        }
    }
}
