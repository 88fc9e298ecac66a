//! 金额值对象
//!
//! 以 `rust_decimal::Decimal` 精确表示，不做任何舍入；显示格式由调用方负责

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 金额错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("amount must be greater than zero")]
    NotPositive,
    #[error("cannot divide an amount into zero units")]
    ZeroUnits,
    #[error("per-unit amount rounds to zero")]
    RoundsToZero,
    #[error("amount arithmetic overflowed")]
    Overflow,
}

/// 金额值对象
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// 创建严格为正的金额
    pub fn positive(amount: Decimal) -> Result<Self, MoneyError> {
        if amount <= Decimal::ZERO {
            return Err(MoneyError::NotPositive);
        }
        Ok(Self(amount))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// 按件均摊：`amount / units`
    ///
    /// 十进制除法，结果精度上限为 28 位有效数字；正金额的商舍入为零时报错
    pub fn per_unit(&self, units: u32) -> Result<Self, MoneyError> {
        if units == 0 {
            return Err(MoneyError::ZeroUnits);
        }
        let amount = self
            .0
            .checked_div(Decimal::from(units))
            .ok_or(MoneyError::Overflow)?
            .normalize();
        if self.0 > Decimal::ZERO && amount <= Decimal::ZERO {
            return Err(MoneyError::RoundsToZero);
        }
        Ok(Self(amount))
    }

    /// 按件累计：`amount * units`
    pub fn times(&self, units: u32) -> Result<Self, MoneyError> {
        self.0
            .checked_mul(Decimal::from(units))
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_positive_rejects_zero_and_negative() {
        assert_eq!(Money::positive(Decimal::ZERO), Err(MoneyError::NotPositive));
        assert_eq!(Money::positive(dec!(-0.01)), Err(MoneyError::NotPositive));
        assert!(Money::positive(dec!(0.0001)).is_ok());
    }

    #[test]
    fn test_per_unit_is_exact() {
        let packet = Money::positive(dec!(55.90)).unwrap();
        assert_eq!(packet.per_unit(250).unwrap().amount(), dec!(0.2236));

        let packet = Money::positive(dec!(10)).unwrap();
        assert_eq!(packet.per_unit(4).unwrap().amount(), dec!(2.5));
    }

    #[test]
    fn test_per_unit_non_terminating_keeps_full_precision() {
        let unit = Money::positive(dec!(1)).unwrap().per_unit(3).unwrap();
        assert_eq!(unit.amount(), dec!(0.3333333333333333333333333333));
    }

    #[test]
    fn test_per_unit_zero_units() {
        let packet = Money::positive(dec!(10)).unwrap();
        assert_eq!(packet.per_unit(0), Err(MoneyError::ZeroUnits));
    }

    #[test]
    fn test_per_unit_rejects_quotient_below_precision() {
        let packet = Money::positive(dec!(0.0000000000000000000000000001)).unwrap();
        assert_eq!(packet.per_unit(3), Err(MoneyError::RoundsToZero));
        assert!(packet.per_unit(1).is_ok());
    }

    #[test]
    fn test_times() {
        let unit = Money::positive(dec!(0.45)).unwrap();
        assert_eq!(unit.times(300).unwrap().amount(), dec!(135.00));
    }

    #[test]
    fn test_serializes_transparently() {
        let json = serde_json::to_string(&Money::new(dec!(0.35))).unwrap();
        assert_eq!(json, "\"0.35\"");
    }
}
