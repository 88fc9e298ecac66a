//! 示例数据
//!
//! 一种铜版纸和一个名片产品的两档价格，可重复执行：已存在的材料按名称与规格跳过，
//! 已存在的阶梯会被重叠检查拒绝并记为跳过

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::application::PricingHandler;
use crate::domain::entities::{MaterialInput, PriceTierInput};
use crate::error::{PricingError, PricingResult};

/// 示例数据执行结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub materials_created: usize,
    pub materials_skipped: usize,
    pub tiers_admitted: usize,
    pub tiers_skipped: usize,
}

fn sample_material() -> MaterialInput {
    MaterialInput {
        id: None,
        name: Some("Couchê Fosco 170g".to_string()),
        brand: Some("Suzano".to_string()),
        grammage: Some(Decimal::from(170)),
        format: Some("SRA3".to_string()),
        packet_cost: Some(Decimal::new(5590, 2)),
        packet_qty: Some(Decimal::from(250)),
    }
}

fn sample_tiers(product_id: &str) -> Vec<PriceTierInput> {
    [(100, 499, Decimal::new(45, 2)), (500, 999, Decimal::new(35, 2))]
        .into_iter()
        .map(|(min, max, price)| PriceTierInput {
            id: None,
            product_id: Some(product_id.to_string()),
            min_quantity: Some(Decimal::from(min)),
            max_quantity: Some(Decimal::from(max)),
            unit_price: Some(price),
        })
        .collect()
}

/// 写入示例材料与价格阶梯
pub async fn seed_sample_data(handler: &PricingHandler, product_id: &str) -> PricingResult<SeedReport> {
    let mut report = SeedReport::default();

    let material = sample_material();
    let existing = handler.list_materials().await?;
    let already_seeded = existing.iter().any(|m| {
        Some(m.name()) == material.name.as_deref() && Some(m.format()) == material.format.as_deref()
    });
    if already_seeded {
        report.materials_skipped += 1;
        info!("Sample paper stock already present, skipping");
    } else {
        let created = handler.create_material(material).await?;
        report.materials_created += 1;
        info!(name = %created.name(), unit_cost = %created.unit_cost(), "Seeded paper stock");
    }

    for tier in sample_tiers(product_id) {
        match handler.create_price_tier(tier).await {
            Ok(_) => report.tiers_admitted += 1,
            Err(PricingError::Conflict(conflict)) => {
                report.tiers_skipped += 1;
                warn!(
                    min_quantity = conflict.min_quantity,
                    max_quantity = conflict.max_quantity,
                    "Sample price tier overlaps an existing tier, skipping"
                );
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        materials_created = report.materials_created,
        tiers_admitted = report.tiers_admitted,
        tiers_skipped = report.tiers_skipped,
        "Seed complete"
    );
    Ok(report)
}
