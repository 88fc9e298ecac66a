//! Pricing commands
//!
//! 材料与价格阶梯的新建、更新直接使用领域层的 `MaterialInput` / `PriceTierInput`

use rust_decimal::Decimal;

use crate::domain::value_objects::MaterialId;

/// 记录一次整包采购
///
/// 最新的采购价格替换材料的整包成本，单张成本随之重新推导
#[derive(Debug, Clone)]
pub struct RecordPacketPurchaseCommand {
    pub material_id: MaterialId,
    pub packet_cost: Option<Decimal>,
    pub packet_qty: Option<Decimal>,
}
