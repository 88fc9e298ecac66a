//! 价格阶梯准入

use std::future::Future;

use errors::AppResult;

use crate::domain::entities::{NormalizedTier, PriceTier, PriceTierInput, validate_tier_shape};
use crate::domain::services::check_overlap;
use crate::domain::value_objects::ProductId;
use crate::error::{PricingError, PricingResult, TierConflict};

/// 校验形状、读取同产品既有阶梯、检测重叠，通过后返回可写入的阶梯
///
/// `fetch_existing` 由调用方注入（通常是事务内的仓储查询），其错误原样作为
/// `PricingError::Store` 返回。函数本身没有隐藏状态，可在事务重试中重复执行。
/// 更新时以 `input.id` 排除被编辑的阶梯本身
pub async fn admit_new_tier<F, Fut>(input: &PriceTierInput, fetch_existing: F) -> PricingResult<NormalizedTier>
where
    F: FnOnce(ProductId) -> Fut,
    Fut: Future<Output = AppResult<Vec<PriceTier>>>,
{
    let tier = validate_tier_shape(input)?;

    let existing = fetch_existing(tier.product_id().clone()).await?;

    if let Some(conflict) = check_overlap(tier.product_id(), &tier.range(), &existing, tier.id.as_ref()) {
        return Err(PricingError::Conflict(TierConflict {
            tier_id: conflict.id.to_string(),
            min_quantity: conflict.min_quantity(),
            max_quantity: conflict.max_quantity(),
        }));
    }

    Ok(tier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PriceTierDraft;
    use crate::domain::value_objects::{PriceTierId, QuantityRange};
    use domain_core::Money;
    use errors::AppError;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    const PRODUCT: &str = "cartao-de-visita";

    fn input(min: Decimal, max: Decimal, price: Decimal) -> PriceTierInput {
        PriceTierInput {
            id: None,
            product_id: Some(PRODUCT.to_string()),
            min_quantity: Some(min),
            max_quantity: Some(max),
            unit_price: Some(price),
        }
    }

    fn stored(min: u32, max: u32) -> PriceTier {
        PriceTier::new(
            PriceTierId::new(),
            PriceTierDraft {
                product_id: ProductId::parse(PRODUCT).unwrap(),
                range: QuantityRange::new(min, max).unwrap(),
                unit_price: Money::new(dec!(0.45)),
            },
        )
    }

    #[tokio::test]
    async fn test_admits_into_empty_product() {
        let tier = admit_new_tier(&input(dec!(100), dec!(499), dec!(0.45)), |_| async {
            Ok(Vec::new())
        })
        .await
        .unwrap();

        assert_eq!(tier.range().min_quantity(), 100);
    }

    #[tokio::test]
    async fn test_fetch_receives_normalized_product_id() {
        let raw = PriceTierInput {
            product_id: Some(format!("  {}  ", PRODUCT)),
            ..input(dec!(1), dec!(10), dec!(1))
        };
        admit_new_tier(&raw, |product_id| async move {
            assert_eq!(product_id.as_str(), PRODUCT);
            Ok(Vec::new())
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_conflict_carries_bounds() {
        let existing = vec![stored(1, 10)];
        let err = admit_new_tier(&input(dec!(10), dec!(20), dec!(0.30)), |_| async move {
            Ok(existing)
        })
        .await
        .unwrap_err();

        let PricingError::Conflict(conflict) = err else {
            panic!("expected conflict");
        };
        assert_eq!((conflict.min_quantity, conflict.max_quantity), (1, 10));
    }

    #[tokio::test]
    async fn test_invalid_shape_skips_fetch() {
        let mut fetched = false;
        let err = admit_new_tier(&input(dec!(500), dec!(500), dec!(0.30)), |_| {
            fetched = true;
            async { Ok(Vec::new()) }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, PricingError::RangeOrder { .. }));
        assert!(!fetched);
    }

    #[tokio::test]
    async fn test_store_error_propagates_unchanged() {
        let err = admit_new_tier(&input(dec!(1), dec!(10), dec!(1)), |_| async {
            Err(AppError::unavailable("connection refused"))
        })
        .await
        .unwrap_err();

        assert_eq!(err, PricingError::Store(AppError::unavailable("connection refused")));
    }

    #[tokio::test]
    async fn test_update_excludes_itself() {
        let current = stored(100, 499);
        let sibling = stored(500, 999);
        let editing = PriceTierInput {
            id: Some(current.id.to_string()),
            ..input(dec!(100), dec!(500), dec!(0.45))
        };

        let err = admit_new_tier(&editing, |_| {
            let tiers = vec![current.clone(), sibling.clone()];
            async move { Ok(tiers) }
        })
        .await
        .unwrap_err();
        let PricingError::Conflict(conflict) = err else {
            panic!("expected conflict");
        };
        assert_eq!(conflict.tier_id, sibling.id.to_string());

        let widened = PriceTierInput {
            id: Some(current.id.to_string()),
            ..input(dec!(50), dec!(499), dec!(0.45))
        };
        let tier = admit_new_tier(&widened, |_| {
            let tiers = vec![current.clone(), sibling.clone()];
            async move { Ok(tiers) }
        })
        .await
        .unwrap();
        assert_eq!(tier.id, Some(current.id));
    }
}
