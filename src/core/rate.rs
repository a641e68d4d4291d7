use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a percentage falls outside `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("percentage {0} is outside the range 0..=100")]
pub struct RateOutOfRange(pub Decimal);

/// A percentage in `[0, 100]`, the unit used by every fiscal rate table
/// (nominal rates, base reductions, deferrals, substitution markups).
///
/// Out-of-range values are rejected at construction — calculators never
/// re-check or clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Rate(Decimal);

impl Rate {
    /// 0%.
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// Construct from a percentage value, rejecting anything outside `[0, 100]`.
    pub fn new(percent: Decimal) -> Result<Self, RateOutOfRange> {
        if percent.is_sign_negative() || percent > Decimal::ONE_HUNDRED {
            return Err(RateOutOfRange(percent));
        }
        Ok(Rate(percent))
    }

    /// The percentage value (e.g. `18` for 18%).
    pub fn percent(&self) -> Decimal {
        self.0
    }

    /// As a fraction of one (e.g. `0.18` for 18%).
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Apply the rate to a base amount: `base × rate / 100`.
    pub fn of(&self, base: Decimal) -> Decimal {
        base * self.0 / Decimal::ONE_HUNDRED
    }

    /// The complement as a fraction: `1 − rate / 100`.
    ///
    /// Used for base reductions: `effective_base = base * reduction.complement()`.
    pub fn complement(&self) -> Decimal {
        Decimal::ONE - self.fraction()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl TryFrom<Decimal> for Rate {
    type Error = RateOutOfRange;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Rate::new(value)
    }
}

impl From<Rate> for Decimal {
    fn from(rate: Rate) -> Decimal {
        rate.0
    }
}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn accepts_bounds() {
        assert!(Rate::new(dec!(0)).is_ok());
        assert!(Rate::new(dec!(100)).is_ok());
        assert!(Rate::new(dec!(18.5)).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(Rate::new(dec!(-0.01)), Err(RateOutOfRange(dec!(-0.01))));
        assert_eq!(Rate::new(dec!(100.01)), Err(RateOutOfRange(dec!(100.01))));
    }

    #[test]
    fn applies_to_base() {
        let rate = Rate::new(dec!(18)).unwrap();
        assert_eq!(rate.of(dec!(1000)), dec!(180));
        assert_eq!(rate.of(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn complement_for_reductions() {
        let reduction = Rate::new(dec!(20)).unwrap();
        assert_eq!(dec!(1000) * reduction.complement(), dec!(800.0));
    }

    #[test]
    fn zero_rate_yields_zero_tax() {
        assert_eq!(Rate::ZERO.of(dec!(12345.67)), Decimal::ZERO);
    }
}
