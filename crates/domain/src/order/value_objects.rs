//! Value objects for the order domain.

use common::ProductId;
use serde::{Deserialize, Serialize};

/// Money amount represented in cents to avoid floating point issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = $10.00)
    cents: i64,
}

impl Money {
    /// Largest dollar amount accepted from a floating point source.
    const MAX_DOLLARS: f64 = 90_000_000_000_000.0;

    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Converts a floating point dollar amount, rounding to the nearest cent.
    ///
    /// Returns None for NaN, infinite, negative, or out-of-range values.
    pub fn from_dollars_f64(dollars: f64) -> Option<Self> {
        if !dollars.is_finite() || dollars < 0.0 || dollars > Self::MAX_DOLLARS {
            return None;
        }
        Some(Self {
            cents: (dollars * 100.0).round() as i64,
        })
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the amount in dollars as a float, for presentation.
    pub fn as_dollars_f64(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after dollars).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    /// Multiplies by a quantity, or None if the result does not fit.
    pub fn checked_mul(&self, quantity: u32) -> Option<Money> {
        self.cents
            .checked_mul(i64::from(quantity))
            .map(Money::from_cents)
    }

    /// Adds two amounts, or None if the result does not fit.
    pub fn checked_add(&self, rhs: Money) -> Option<Money> {
        self.cents.checked_add(rhs.cents).map(Money::from_cents)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cents < 0 {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

/// A product and quantity requested by a client, before pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedItem {
    /// The product identifier.
    pub product_id: ProductId,

    /// Quantity requested.
    pub quantity: u32,
}

impl RequestedItem {
    /// Creates a new requested item.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A priced line item of a placed order.
///
/// Name, description, and price are copies of the catalog entry taken when
/// the order was placed; later catalog edits do not change them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedProduct {
    /// The product identifier.
    pub product_id: ProductId,

    /// Product name at order time.
    pub name: String,

    /// Product description at order time.
    pub description: String,

    /// Unit price at order time.
    pub price: Money,

    /// Quantity ordered.
    pub quantity: u32,
}

impl OrderedProduct {
    /// Returns quantity * price, or None if it overflows.
    pub fn line_total(&self) -> Option<Money> {
        self.price.checked_mul(self.quantity)
    }
}
