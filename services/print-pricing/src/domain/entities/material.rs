//! 材料（纸张库存）实体与材料成本引擎

use domain_core::{Entity, Money, MoneyError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::validation::{
    optional_id, optional_text, positive_integer, positive_money, required_text,
};
use crate::domain::value_objects::MaterialId;
use crate::error::{FieldError, PricingError, PricingResult, ValidationErrors};

/// 调用方提交的原始材料数据
///
/// 数值字段以十进制接收，整数字段的小数部分会被判为类型错误
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialInput {
    pub id: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub grammage: Option<Decimal>,
    pub format: Option<String>,
    pub packet_cost: Option<Decimal>,
    pub packet_qty: Option<Decimal>,
}

/// 校验通过、单张成本已推导的材料内容（尚未分配 ID）
///
/// `unit_cost` 只能由 `packet_cost / packet_qty` 得出，没有任何设置入口
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDraft {
    name: String,
    brand: Option<String>,
    grammage: u32,
    format: String,
    packet_cost: Money,
    packet_qty: u32,
    unit_cost: Money,
}

impl MaterialDraft {
    pub fn new(
        name: String,
        brand: Option<String>,
        grammage: u32,
        format: String,
        packet_cost: Money,
        packet_qty: u32,
    ) -> Result<Self, MoneyError> {
        let unit_cost = packet_cost.per_unit(packet_qty)?;
        Ok(Self {
            name,
            brand,
            grammage,
            format,
            packet_cost,
            packet_qty,
            unit_cost,
        })
    }

    /// 用一次新的整包采购替换成本数据，并重新推导单张成本
    pub fn with_packet(&self, packet_cost: Money, packet_qty: u32) -> Result<Self, MoneyError> {
        Self::new(
            self.name.clone(),
            self.brand.clone(),
            self.grammage,
            self.format.clone(),
            packet_cost,
            packet_qty,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn grammage(&self) -> u32 {
        self.grammage
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn packet_cost(&self) -> Money {
        self.packet_cost
    }

    pub fn packet_qty(&self) -> u32 {
        self.packet_qty
    }

    pub fn unit_cost(&self) -> Money {
        self.unit_cost
    }
}

/// 已持久化的材料
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    id: MaterialId,
    #[serde(flatten)]
    draft: MaterialDraft,
}

impl Material {
    pub fn new(id: MaterialId, draft: MaterialDraft) -> Self {
        Self { id, draft }
    }

    pub fn draft(&self) -> &MaterialDraft {
        &self.draft
    }
}

impl Entity for Material {
    type Id = MaterialId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl std::ops::Deref for Material {
    type Target = MaterialDraft;

    fn deref(&self) -> &Self::Target {
        &self.draft
    }
}

/// 校验结果：`id` 仅在更新时存在
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedMaterial {
    pub id: Option<MaterialId>,
    pub draft: MaterialDraft,
}

/// 校验材料输入并推导单张成本
///
/// 所有字段错误一次性返回；纯函数，无副作用
pub fn validate_and_prepare_material(input: &MaterialInput) -> PricingResult<PreparedMaterial> {
    let id = optional_id::<MaterialId>("material", input.id.as_deref())?;

    let mut errors = ValidationErrors::new();
    let name = required_text(&mut errors, "name", input.name.as_deref());
    let grammage = positive_integer(&mut errors, "grammage", input.grammage);
    let format = required_text(&mut errors, "format", input.format.as_deref());
    let packet_cost = positive_money(&mut errors, "packetCost", input.packet_cost);
    let packet_qty = positive_integer(&mut errors, "packetQty", input.packet_qty);

    let (Some(name), Some(grammage), Some(format), Some(packet_cost), Some(packet_qty)) =
        (name, grammage, format, packet_cost, packet_qty)
    else {
        return Err(PricingError::Validation(errors));
    };

    let draft = MaterialDraft::new(
        name,
        optional_text(input.brand.as_deref()),
        grammage,
        format,
        packet_cost,
        packet_qty,
    )
    .map_err(|e| {
        PricingError::Validation(FieldError::new("packetCost", e.to_string()).into())
    })?;

    Ok(PreparedMaterial { id, draft })
}

/// 更新变体：必须带 `id`，缺失时返回 `InvalidRequest` 而不是字段错误
///
/// `id` 先于字段校验检查，空白视为缺失
pub fn validate_material_update(input: &MaterialInput) -> PricingResult<(MaterialId, MaterialDraft)> {
    if input.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
        return Err(PricingError::invalid_request("material id is required for update"));
    }
    let prepared = validate_and_prepare_material(input)?;
    let id = prepared
        .id
        .ok_or_else(|| PricingError::invalid_request("material id is required for update"))?;
    Ok((id, prepared.draft))
}
