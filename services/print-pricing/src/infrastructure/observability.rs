//! Pricing metrics
//!
//! 业务指标记录；未安装 recorder 时为空操作

use metrics::counter;

/// 记录一次价格阶梯提交的结果
///
/// `outcome`: `admitted` 或 `PricingError::kind()`
pub fn record_tier_admission(outcome: &'static str) {
    counter!("price_tier_admissions_total", "outcome" => outcome).increment(1);
}

/// 记录一次材料写入
pub fn record_material_write(operation: &'static str) {
    counter!("material_writes_total", "operation" => operation).increment(1);
}
