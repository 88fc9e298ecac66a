//! 数据库行映射结构

use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// 材料数据库行
#[derive(Debug, FromRow)]
pub struct MaterialRow {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub grammage: i32,
    pub format: String,
    pub packet_cost: Decimal,
    pub packet_qty: i32,
    pub unit_cost: Decimal,
}

/// 价格阶梯数据库行
#[derive(Debug, FromRow)]
pub struct PriceTierRow {
    pub id: Uuid,
    pub product_id: String,
    pub min_quantity: i32,
    pub max_quantity: i32,
    pub unit_price: Decimal,
}
