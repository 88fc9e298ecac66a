//! Pricing queries

use domain_core::Money;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::entities::PriceTier;
use crate::domain::value_objects::MaterialId;

/// 获取材料查询
#[derive(Debug, Clone)]
pub struct GetMaterialQuery {
    pub material_id: MaterialId,
}

/// 列出产品价格阶梯查询
#[derive(Debug, Clone)]
pub struct ListPriceTiersQuery {
    pub product_id: String,
}

/// 按数量报价查询
#[derive(Debug, Clone)]
pub struct QuoteUnitPriceQuery {
    pub product_id: String,
    pub quantity: Option<Decimal>,
}

/// 报价结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitPriceQuote {
    pub tier: PriceTier,
    pub quantity: u32,
    /// `unit_price * quantity`，不做舍入
    pub total: Money,
}
