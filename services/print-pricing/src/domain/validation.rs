//! 字段级校验工具
//!
//! 每个函数在失败时向 `ValidationErrors` 追加一条记录并返回 `None`，
//! 调用方据此一次性收集整条记录的所有字段错误

use std::str::FromStr;

use domain_core::Money;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{FieldError, PricingError, ValidationErrors};

/// 整数字段允许的上限（与存储层的 INTEGER 列一致）
pub const MAX_INTEGER_FIELD: u32 = i32::MAX as u32;

/// 必填文本：去除首尾空白后不能为空
pub fn required_text(errors: &mut ValidationErrors, field: &str, value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        Some(_) => {
            errors.push(FieldError::new(field, "must not be empty"));
            None
        }
        None => {
            errors.push(FieldError::new(field, "is required"));
            None
        }
    }
}

/// 可选文本：空白视为未提供
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// 正整数
pub fn positive_integer(errors: &mut ValidationErrors, field: &str, value: Option<Decimal>) -> Option<u32> {
    let Some(value) = value else {
        errors.push(FieldError::new(field, "is required"));
        return None;
    };

    if !value.fract().is_zero() {
        errors.push(FieldError::new(field, "must be an integer"));
        return None;
    }
    if value <= Decimal::ZERO {
        errors.push(FieldError::new(field, "must be a positive integer"));
        return None;
    }

    match value.to_u32().filter(|v| *v <= MAX_INTEGER_FIELD) {
        Some(v) => Some(v),
        None => {
            errors.push(FieldError::new(
                field,
                format!("must not exceed {}", MAX_INTEGER_FIELD),
            ));
            None
        }
    }
}

/// 正数金额
pub fn positive_money(errors: &mut ValidationErrors, field: &str, value: Option<Decimal>) -> Option<Money> {
    let Some(value) = value else {
        errors.push(FieldError::new(field, "is required"));
        return None;
    };

    match Money::positive(value) {
        Ok(money) => Some(money),
        Err(_) => {
            errors.push(FieldError::new(field, "must be a positive number"));
            None
        }
    }
}

/// 解析可选的记录 ID；格式错误属于调用方误用，返回 `InvalidRequest`
pub fn optional_id<T: FromStr>(kind: &str, value: Option<&str>) -> Result<Option<T>, PricingError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| PricingError::invalid_request(format!("malformed {} id: {}", kind, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::MaterialId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_required_text_trims() {
        let mut errors = ValidationErrors::new();
        assert_eq!(
            required_text(&mut errors, "name", Some("  Couchê  ")),
            Some("Couchê".to_string())
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_required_text_reports_blank_and_missing() {
        let mut errors = ValidationErrors::new();
        assert!(required_text(&mut errors, "name", Some("   ")).is_none());
        assert!(required_text(&mut errors, "format", None).is_none());

        assert_eq!(errors.field("name").unwrap().message, "must not be empty");
        assert_eq!(errors.field("format").unwrap().message, "is required");
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        assert_eq!(optional_text(Some(" ")), None);
        assert_eq!(optional_text(None), None);
        assert_eq!(optional_text(Some(" Suzano")), Some("Suzano".to_string()));
    }

    #[test]
    fn test_positive_integer_rules() {
        let mut errors = ValidationErrors::new();
        assert_eq!(positive_integer(&mut errors, "a", Some(dec!(170))), Some(170));
        assert_eq!(positive_integer(&mut errors, "b", Some(dec!(170.0))), Some(170));
        assert!(positive_integer(&mut errors, "c", Some(dec!(0))).is_none());
        assert!(positive_integer(&mut errors, "d", Some(dec!(-5))).is_none());
        assert!(positive_integer(&mut errors, "e", Some(dec!(1.5))).is_none());
        assert!(positive_integer(&mut errors, "f", Some(dec!(2147483648))).is_none());
        assert!(positive_integer(&mut errors, "g", None).is_none());

        assert_eq!(errors.len(), 5);
        assert_eq!(errors.field("c").unwrap().message, "must be a positive integer");
        assert_eq!(errors.field("e").unwrap().message, "must be an integer");
        assert_eq!(errors.field("f").unwrap().message, "must not exceed 2147483647");
    }

    #[test]
    fn test_positive_money_rules() {
        let mut errors = ValidationErrors::new();
        assert_eq!(
            positive_money(&mut errors, "packetCost", Some(dec!(55.90))).map(|m| m.amount()),
            Some(dec!(55.90))
        );
        assert!(positive_money(&mut errors, "unitPrice", Some(dec!(0))).is_none());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_optional_id() {
        let id = MaterialId::new();
        let parsed: Option<MaterialId> = optional_id("material", Some(&id.to_string())).unwrap();
        assert_eq!(parsed, Some(id));

        let missing: Option<MaterialId> = optional_id("material", Some("  ")).unwrap();
        assert!(missing.is_none());

        let err = optional_id::<MaterialId>("material", Some("abc")).unwrap_err();
        assert_eq!(err.kind(), "invalid_request");
    }
}
