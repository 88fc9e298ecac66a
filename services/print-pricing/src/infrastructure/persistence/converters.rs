//! 数据库行与领域对象之间的转换

use domain_core::Money;
use errors::{AppError, AppResult};
use tracing::warn;

use crate::domain::entities::{Material, MaterialDraft, PriceTier, PriceTierDraft};
use crate::domain::value_objects::{MaterialId, PriceTierId, ProductId, QuantityRange};

use super::rows::{MaterialRow, PriceTierRow};

/// 领域整数字段写入 INTEGER 列
pub fn to_db_int(field: &str, value: u32) -> AppResult<i32> {
    i32::try_from(value)
        .map_err(|_| AppError::validation(format!("{} out of range: {}", field, value)))
}

fn from_db_int(field: &str, value: i32) -> AppResult<u32> {
    u32::try_from(value)
        .map_err(|_| AppError::internal(format!("Stored {} is negative: {}", field, value)))
}

/// 将 MaterialRow 转换为 Material
///
/// 单张成本按行内的整包数据重新推导，不直接信任存储的 `unit_cost`
pub fn material_from_row(row: MaterialRow) -> AppResult<Material> {
    let packet_cost = Money::positive(row.packet_cost)
        .map_err(|e| AppError::internal(format!("Stored packet_cost of {}: {}", row.id, e)))?;

    let draft = MaterialDraft::new(
        row.name,
        row.brand,
        from_db_int("grammage", row.grammage)?,
        row.format,
        packet_cost,
        from_db_int("packet_qty", row.packet_qty)?,
    )
    .map_err(|e| AppError::internal(format!("Stored material {}: {}", row.id, e)))?;

    if draft.unit_cost().amount() != row.unit_cost {
        warn!(
            material_id = %row.id,
            stored = %row.unit_cost,
            derived = %draft.unit_cost(),
            "Stored unit cost drifted from packet data"
        );
    }

    Ok(Material::new(MaterialId::from_uuid(row.id), draft))
}

/// 将 PriceTierRow 转换为 PriceTier
pub fn price_tier_from_row(row: PriceTierRow) -> AppResult<PriceTier> {
    let product_id = ProductId::parse(&row.product_id)
        .ok_or_else(|| AppError::internal(format!("Price tier {} has an empty product_id", row.id)))?;

    let range = QuantityRange::new(
        from_db_int("min_quantity", row.min_quantity)?,
        from_db_int("max_quantity", row.max_quantity)?,
    )
    .ok_or_else(|| AppError::internal(format!("Price tier {} has an inverted range", row.id)))?;

    Ok(PriceTier::new(
        PriceTierId::from_uuid(row.id),
        PriceTierDraft {
            product_id,
            range,
            unit_price: Money::new(row.unit_price),
        },
    ))
}
