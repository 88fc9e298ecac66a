//! 价格阶梯实体与阶梯形状校验

use domain_core::{Entity, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::validation::{optional_id, positive_integer, positive_money};
use crate::domain::value_objects::{PriceTierId, ProductId, QuantityRange};
use crate::error::{FieldError, PricingError, PricingResult, ValidationErrors};

/// 调用方提交的原始价格阶梯数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTierInput {
    pub id: Option<String>,
    pub product_id: Option<String>,
    pub min_quantity: Option<Decimal>,
    pub max_quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
}

/// 待写入存储的阶梯内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTierDraft {
    pub product_id: ProductId,
    #[serde(flatten)]
    pub range: QuantityRange,
    pub unit_price: Money,
}

/// 形状校验通过的阶梯；`id` 仅在更新时存在
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTier {
    pub id: Option<PriceTierId>,
    pub draft: PriceTierDraft,
}

impl NormalizedTier {
    pub fn product_id(&self) -> &ProductId {
        &self.draft.product_id
    }

    pub fn range(&self) -> QuantityRange {
        self.draft.range
    }
}

/// 已持久化的价格阶梯
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTier {
    pub id: PriceTierId,
    pub product_id: ProductId,
    #[serde(flatten)]
    pub range: QuantityRange,
    pub unit_price: Money,
}

impl PriceTier {
    pub fn new(id: PriceTierId, draft: PriceTierDraft) -> Self {
        Self {
            id,
            product_id: draft.product_id,
            range: draft.range,
            unit_price: draft.unit_price,
        }
    }

    pub fn min_quantity(&self) -> u32 {
        self.range.min_quantity()
    }

    pub fn max_quantity(&self) -> u32 {
        self.range.max_quantity()
    }
}

impl Entity for PriceTier {
    type Id = PriceTierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// 校验阶梯的结构
///
/// 先逐字段校验并一次性返回所有字段错误；字段全部合法后才检查
/// `maxQuantity > minQuantity`，违反时返回 `RangeOrder`
pub fn validate_tier_shape(input: &PriceTierInput) -> PricingResult<NormalizedTier> {
    let id = optional_id::<PriceTierId>("price tier", input.id.as_deref())?;

    let mut errors = ValidationErrors::new();
    let product_id = match input.product_id.as_deref() {
        Some(raw) => ProductId::parse(raw).or_else(|| {
            errors.push(FieldError::new("productId", "must not be empty"));
            None
        }),
        None => {
            errors.push(FieldError::new("productId", "is required"));
            None
        }
    };
    let min_quantity = positive_integer(&mut errors, "minQuantity", input.min_quantity);
    let max_quantity = positive_integer(&mut errors, "maxQuantity", input.max_quantity);
    let unit_price = positive_money(&mut errors, "unitPrice", input.unit_price);

    let (Some(product_id), Some(min_quantity), Some(max_quantity), Some(unit_price)) =
        (product_id, min_quantity, max_quantity, unit_price)
    else {
        return Err(PricingError::Validation(errors));
    };

    let range = QuantityRange::new(min_quantity, max_quantity).ok_or(PricingError::RangeOrder {
        min_quantity,
        max_quantity,
    })?;

    Ok(NormalizedTier {
        id,
        draft: PriceTierDraft {
            product_id,
            range,
            unit_price,
        },
    })
}
