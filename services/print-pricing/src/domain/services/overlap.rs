//! 价格阶梯重叠检测

use crate::domain::entities::PriceTier;
use crate::domain::value_objects::{PriceTierId, ProductId, QuantityRange};

/// 在同一产品的既有阶梯中查找与候选区间相交的阶梯
///
/// 按 `existing` 的顺序扫描并返回第一个冲突；`exclude` 用于更新时跳过被编辑的阶梯本身。
/// 不读取存储，调用方负责提供决策时刻的完整阶梯集合
pub fn check_overlap<'a>(
    product_id: &ProductId,
    range: &QuantityRange,
    existing: &'a [PriceTier],
    exclude: Option<&PriceTierId>,
) -> Option<&'a PriceTier> {
    existing.iter().find(|tier| {
        &tier.product_id == product_id
            && Some(&tier.id) != exclude
            && tier.range.overlaps(range)
    })
}

/// 查找闭区间包含 `quantity` 的阶梯
///
/// 阶梯互不重叠，因此最多只有一个匹配
pub fn tier_for_quantity(tiers: &[PriceTier], quantity: u32) -> Option<&PriceTier> {
    tiers.iter().find(|tier| tier.range.contains(quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PriceTierDraft;
    use domain_core::Money;
    use rust_decimal_macros::dec;

    fn product() -> ProductId {
        ProductId::parse("cartao-de-visita").unwrap()
    }

    fn tier(product_id: &ProductId, min: u32, max: u32) -> PriceTier {
        PriceTier::new(
            PriceTierId::new(),
            PriceTierDraft {
                product_id: product_id.clone(),
                range: QuantityRange::new(min, max).unwrap(),
                unit_price: Money::new(dec!(0.45)),
            },
        )
    }

    fn range(min: u32, max: u32) -> QuantityRange {
        QuantityRange::new(min, max).unwrap()
    }

    #[test]
    fn test_no_tiers_no_conflict() {
        assert!(check_overlap(&product(), &range(1, 10), &[], None).is_none());
    }

    #[test]
    fn test_adjacent_tiers_do_not_conflict() {
        let existing = [tier(&product(), 1, 10)];
        assert!(check_overlap(&product(), &range(11, 20), &existing, None).is_none());
    }

    #[test]
    fn test_boundary_sharing_conflicts() {
        let existing = [tier(&product(), 1, 10)];
        let conflict = check_overlap(&product(), &range(10, 20), &existing, None).unwrap();
        assert_eq!((conflict.min_quantity(), conflict.max_quantity()), (1, 10));
    }

    #[test]
    fn test_first_conflict_in_supplied_order() {
        let existing = [tier(&product(), 100, 499), tier(&product(), 500, 999)];
        let conflict = check_overlap(&product(), &range(400, 600), &existing, None).unwrap();
        assert_eq!(conflict.id, existing[0].id);
    }

    #[test]
    fn test_excluded_tier_is_skipped() {
        let existing = [tier(&product(), 100, 499)];
        let editing = existing[0].id;
        assert!(check_overlap(&product(), &range(100, 500), &existing, Some(&editing)).is_none());
    }

    #[test]
    fn test_exclusion_still_sees_siblings() {
        let existing = [tier(&product(), 100, 499), tier(&product(), 500, 999)];
        let editing = existing[0].id;
        let conflict =
            check_overlap(&product(), &range(100, 500), &existing, Some(&editing)).unwrap();
        assert_eq!(conflict.id, existing[1].id);
    }

    #[test]
    fn test_other_products_are_independent() {
        let other = ProductId::parse("flyer-a5").unwrap();
        let existing = [tier(&other, 1, 1000)];
        assert!(check_overlap(&product(), &range(1, 10), &existing, None).is_none());
    }

    #[test]
    fn test_check_is_symmetric() {
        let a = tier(&product(), 1, 10);
        let b = tier(&product(), 10, 20);
        assert_eq!(
            check_overlap(&product(), &a.range, std::slice::from_ref(&b), None).is_some(),
            check_overlap(&product(), &b.range, std::slice::from_ref(&a), None).is_some()
        );
    }

    #[test]
    fn test_tier_for_quantity() {
        let tiers = [tier(&product(), 100, 499), tier(&product(), 500, 999)];
        assert_eq!(tier_for_quantity(&tiers, 499).map(|t| t.id), Some(tiers[0].id));
        assert_eq!(tier_for_quantity(&tiers, 500).map(|t| t.id), Some(tiers[1].id));
        assert!(tier_for_quantity(&tiers, 99).is_none());
        assert!(tier_for_quantity(&tiers, 1000).is_none());
    }
}
