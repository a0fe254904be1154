//! # Money Module
//!
//! Provides the `Money` and `Weight` types used by every rate and order
//! calculation.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A shipping engine splitting ₹1000 into advance + remainder must        │
//! │  never leak a paisa between the two halves.                             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹10.99 is stored as 1099 paise. All arithmetic is exact; the only    │
//! │    rounding happens where we choose it (per-kg proration, rupee         │
//! │    rounding of the final shipping total).                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Weights follow the same rule: integer grams, so a 1.5 kg parcel is 1500
//! and the free first kilogram is an exact subtraction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paise (the smallest INR unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Every monetary value in the system flows through this type: product
/// prices, shipping rates, free-shipping thresholds, advance and remainder
/// amounts. Only the UI converts to rupees for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use monsoon_core::money::Money;
    ///
    /// let rate = Money::from_paise(5000); // ₹50.00
    /// assert_eq!(rate.paise(), 5000);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// Convenient for configuration defaults, which the business states in
    /// round rupee amounts (base rate ₹50, threshold ₹500, ...).
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use monsoon_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(49900); // ₹499.00
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.paise(), 99800); // ₹998.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Treats this value as a per-kilogram rate and charges it for the given
    /// weight, prorated by the gram.
    ///
    /// ## Implementation
    /// Integer math with i128 widening: `(rate_paise * grams + 500) / 1000`.
    /// The +500 rounds the prorated amount to the nearest paisa.
    ///
    /// ## Example
    /// ```rust
    /// use monsoon_core::money::{Money, Weight};
    ///
    /// let per_kg = Money::from_rupees(20);
    /// let charge = per_kg.per_kilogram(Weight::from_grams(500)); // half a kg
    /// assert_eq!(charge.paise(), 1000); // ₹10.00
    /// ```
    pub fn per_kilogram(&self, weight: Weight) -> Money {
        let paise = (self.0 as i128 * weight.grams() as i128 + 500) / 1000;
        Money::from_paise(paise as i64)
    }

    /// Takes the ceiling of a basis-point fraction of this amount.
    ///
    /// Used for the COD advance: `ceil(grand_total × advance_fraction)`.
    /// Ceiling, not rounding, so the advance never under-collects by a
    /// paisa against the configured fraction.
    ///
    /// ## Example
    /// ```rust
    /// use monsoon_core::money::Money;
    ///
    /// let total = Money::from_paise(100050); // ₹1000.50
    /// let tenth = total.fraction_ceil(1000); // 10%
    /// assert_eq!(tenth.paise(), 10005);
    /// ```
    pub fn fraction_ceil(&self, bps: u32) -> Money {
        let scaled = self.0 as i128 * bps as i128;
        Money::from_paise(((scaled + 9999) / 10000) as i64)
    }

    /// Rounds to the nearest whole rupee.
    ///
    /// The shipping total customers see is a round rupee figure; the
    /// intermediate per-kg proration keeps paise precision until this final
    /// step.
    pub fn round_to_rupee(&self) -> Money {
        let sign = if self.0 < 0 { -1 } else { 1 };
        let rupees = (self.0.abs() + 50) / 100;
        Money::from_paise(sign * rupees * 100)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. Use frontend formatting for actual UI
/// display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Weight Type
// =============================================================================

/// A parcel weight in grams.
///
/// Same shape as [`Money`]: a signed integer newtype so arithmetic is exact
/// and a negative value (an upstream bug) is representable and detectable
/// rather than silently clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Weight(i64);

/// One kilogram, the unit the per-kg rate is quoted in.
pub const GRAMS_PER_KG: i64 = 1000;

impl Weight {
    /// Creates a weight from grams.
    #[inline]
    pub const fn from_grams(grams: i64) -> Self {
        Weight(grams)
    }

    /// Creates a weight from fractional kilograms, rounded to the gram.
    ///
    /// For convenience at the boundary: carts typically carry item weights
    /// as decimal kilograms (0.5, 1.5). Internally everything is grams.
    pub fn from_kg(kg: f64) -> Self {
        Weight((kg * GRAMS_PER_KG as f64).round() as i64)
    }

    /// Returns the weight in grams.
    #[inline]
    pub const fn grams(&self) -> i64 {
        self.0
    }

    /// Returns zero weight.
    #[inline]
    pub const fn zero() -> Self {
        Weight(0)
    }

    /// Checks if the weight is negative (invalid input).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies weight by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Weight(self.0 * qty)
    }

    /// Subtracts the included first kilogram, saturating at zero.
    ///
    /// A 700 g parcel bills 0 g of surcharge weight; a 1.5 kg parcel bills
    /// 500 g.
    pub fn billable_beyond_first_kg(&self) -> Weight {
        Weight((self.0 - GRAMS_PER_KG).max(0))
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}kg", self.0 / GRAMS_PER_KG, (self.0 % GRAMS_PER_KG).abs())
    }
}

impl Default for Weight {
    fn default() -> Self {
        Weight::zero()
    }
}

impl Add for Weight {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Weight(self.0 + other.0)
    }
}

impl AddAssign for Weight {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(1099);
        assert_eq!(money.paise(), 1099);
        assert_eq!(money.rupees(), 10);
        assert_eq!(money.paise_part(), 99);
    }

    #[test]
    fn test_from_rupees() {
        assert_eq!(Money::from_rupees(50).paise(), 5000);
        assert_eq!(Money::from_rupees(-5).paise(), -500);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paise(1099)), "₹10.99");
        assert_eq!(format!("{}", Money::from_paise(500)), "₹5.00");
        assert_eq!(format!("{}", Money::from_paise(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::from_paise(0)), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        let result: Money = a * 3;
        assert_eq!(result.paise(), 3000);
    }

    #[test]
    fn test_per_kilogram_exact() {
        // ₹20/kg over 500 g = ₹10 exactly
        let per_kg = Money::from_rupees(20);
        assert_eq!(per_kg.per_kilogram(Weight::from_grams(500)).paise(), 1000);
    }

    #[test]
    fn test_per_kilogram_rounds_to_paisa() {
        // 1999 paise/kg over 333 g = 665.667 paise → 666
        let per_kg = Money::from_paise(1999);
        assert_eq!(per_kg.per_kilogram(Weight::from_grams(333)).paise(), 666);
    }

    #[test]
    fn test_fraction_ceil() {
        // 10% of ₹1000.00 = ₹100.00 exact
        assert_eq!(Money::from_paise(100000).fraction_ceil(1000).paise(), 10000);
        // 10% of ₹0.01 = 0.001 paise → ceils to 1 paisa
        assert_eq!(Money::from_paise(1).fraction_ceil(1000).paise(), 1);
        // 0% is always zero
        assert_eq!(Money::from_paise(100000).fraction_ceil(0).paise(), 0);
    }

    #[test]
    fn test_round_to_rupee() {
        assert_eq!(Money::from_paise(6049).round_to_rupee().paise(), 6000);
        assert_eq!(Money::from_paise(6050).round_to_rupee().paise(), 6100);
        assert_eq!(Money::from_paise(6000).round_to_rupee().paise(), 6000);
        assert_eq!(Money::zero().round_to_rupee().paise(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_paise(100);
        assert!(!positive.is_zero());
        assert!(positive.is_positive());
        assert!(!positive.is_negative());

        let negative = Money::from_paise(-100);
        assert!(!negative.is_zero());
        assert!(!negative.is_positive());
        assert!(negative.is_negative());
    }

    #[test]
    fn test_weight_billable_beyond_first_kg() {
        assert_eq!(Weight::from_grams(1500).billable_beyond_first_kg().grams(), 500);
        assert_eq!(Weight::from_grams(700).billable_beyond_first_kg().grams(), 0);
        assert_eq!(Weight::from_grams(1000).billable_beyond_first_kg().grams(), 0);
        assert_eq!(Weight::zero().billable_beyond_first_kg().grams(), 0);
    }

    #[test]
    fn test_weight_from_kg() {
        assert_eq!(Weight::from_kg(1.5).grams(), 1500);
        assert_eq!(Weight::from_kg(0.1).grams(), 100);
        assert_eq!(Weight::from_kg(0.0).grams(), 0);
    }

    #[test]
    fn test_weight_display() {
        assert_eq!(format!("{}", Weight::from_grams(1500)), "1.500kg");
        assert_eq!(format!("{}", Weight::from_grams(50)), "0.050kg");
    }
}
