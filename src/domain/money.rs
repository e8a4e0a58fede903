use crate::error::RentalError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

/// A non-negative price per unit (per hour or per kilometre).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(into = "Decimal")]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, RentalError> {
        if value.is_sign_negative() && !value.is_zero() {
            Err(RentalError::validation(format!(
                "rate must not be negative, got {value}"
            )))
        } else {
            Ok(Self(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<Rate> for Decimal {
    fn from(rate: Rate) -> Self {
        rate.0.normalize()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Kilometres driven during a rental. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Distance(Decimal);

impl Distance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(km: Decimal) -> Result<Self, RentalError> {
        if km.is_sign_negative() && !km.is_zero() {
            Err(RentalError::validation(format!(
                "distance driven must not be negative, got {km}"
            )))
        } else {
            Ok(Self(km))
        }
    }

    pub fn km(&self) -> Decimal {
        self.0
    }
}

/// A monetary amount as billed. Kept at full precision; only [`Money::rounded`]
/// and `Display` reduce it to cents.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Rounded to cents, half away from zero.
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_validation() {
        assert!(Rate::new(dec!(0)).is_ok());
        assert!(Rate::new(dec!(0.8)).is_ok());
        assert!(matches!(
            Rate::new(dec!(-0.01)),
            Err(RentalError::Validation(_))
        ));
    }

    #[test]
    fn test_distance_validation() {
        assert_eq!(Distance::new(dec!(150)).unwrap().km(), dec!(150));
        assert!(matches!(
            Distance::new(dec!(-1)),
            Err(RentalError::Validation(_))
        ));
    }

    #[test]
    fn test_money_display_rounds_to_cents() {
        assert_eq!(Money::new(dec!(220)).to_string(), "220.00");
        assert_eq!(Money::new(dec!(0.005)).to_string(), "0.01");
        assert_eq!(Money::new(dec!(119.99999)).to_string(), "120.00");
        assert_eq!(Money::new(dec!(0.0001388888)).to_string(), "0.00");
    }

    #[test]
    fn test_money_keeps_full_precision() {
        let m = Money::new(dec!(1.234567));
        assert_eq!(m.value(), dec!(1.234567));
        assert_eq!(m.rounded(), dec!(1.23));
    }
}
