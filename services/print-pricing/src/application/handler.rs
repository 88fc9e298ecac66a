//! Business logic handler

use std::sync::Arc;

use domain_core::Entity;
use errors::AppError;
use ports::{Repository, UnitOfWork};
use tracing::{debug, info, warn};

use crate::domain::entities::{
    Material, MaterialInput, NormalizedTier, PriceTier, PriceTierInput,
    validate_and_prepare_material, validate_material_update, validate_tier_shape,
};
use crate::domain::repositories::{MaterialRepository, PriceTierRepository};
use crate::domain::services::{admit_new_tier, tier_for_quantity};
use crate::domain::unit_of_work::{PriceTierUnitOfWork, PriceTierUnitOfWorkFactory};
use crate::domain::validation::{positive_integer, positive_money};
use crate::domain::value_objects::{MaterialId, PriceTierId, ProductId};
use crate::error::{FieldError, PricingError, PricingResult, ValidationErrors};
use crate::infrastructure::observability::{record_material_write, record_tier_admission};

use super::commands::*;
use super::queries::*;

pub struct PricingHandler {
    material_repo: Arc<dyn MaterialRepository>,
    tier_repo: Arc<dyn PriceTierRepository>,
    tier_uow_factory: Arc<dyn PriceTierUnitOfWorkFactory>,
}

impl PricingHandler {
    pub fn new(
        material_repo: Arc<dyn MaterialRepository>,
        tier_repo: Arc<dyn PriceTierRepository>,
        tier_uow_factory: Arc<dyn PriceTierUnitOfWorkFactory>,
    ) -> Self {
        Self {
            material_repo,
            tier_repo,
            tier_uow_factory,
        }
    }

    // ========== 材料 ==========

    /// 创建材料
    ///
    /// ID 由存储分配，输入中的 `id` 不参与创建
    pub async fn create_material(&self, input: MaterialInput) -> PricingResult<Material> {
        let prepared = validate_and_prepare_material(&input)?;
        if let Some(id) = prepared.id {
            debug!(material_id = %id, "Ignoring caller-supplied id on create");
        }

        let material = self.material_repo.create(&prepared.draft).await?;
        record_material_write("create");

        info!(
            material_id = %material.id(),
            name = %material.name(),
            unit_cost = %material.unit_cost(),
            "Material created"
        );
        Ok(material)
    }

    /// 整体替换材料并重新推导单张成本
    pub async fn update_material(&self, input: MaterialInput) -> PricingResult<Material> {
        let (id, draft) = validate_material_update(&input)?;

        let material = self.material_repo.update(&id, &draft).await?;
        record_material_write("update");

        info!(
            material_id = %id,
            unit_cost = %material.unit_cost(),
            "Material updated"
        );
        Ok(material)
    }

    /// 删除材料
    pub async fn delete_material(&self, id: &MaterialId) -> PricingResult<()> {
        self.material_repo.delete(id).await?;
        record_material_write("delete");

        info!(material_id = %id, "Material deleted");
        Ok(())
    }

    /// 获取材料
    pub async fn get_material(&self, query: GetMaterialQuery) -> PricingResult<Material> {
        self.material_repo
            .find_by_id(&query.material_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Material {} not found", query.material_id)).into()
            })
    }

    /// 列出全部材料
    pub async fn list_materials(&self) -> PricingResult<Vec<Material>> {
        Ok(self.material_repo.list().await?)
    }

    /// 记录一次整包采购，替换整包成本并重新推导单张成本
    pub async fn record_packet_purchase(&self, cmd: RecordPacketPurchaseCommand) -> PricingResult<Material> {
        let mut errors = ValidationErrors::new();
        let packet_cost = positive_money(&mut errors, "packetCost", cmd.packet_cost);
        let packet_qty = positive_integer(&mut errors, "packetQty", cmd.packet_qty);
        let (Some(packet_cost), Some(packet_qty)) = (packet_cost, packet_qty) else {
            return Err(PricingError::Validation(errors));
        };

        let current = self
            .material_repo
            .find_by_id(&cmd.material_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Material {} not found", cmd.material_id)))?;

        let draft = current
            .draft()
            .with_packet(packet_cost, packet_qty)
            .map_err(|e| PricingError::Validation(FieldError::new("packetCost", e.to_string()).into()))?;

        let material = self.material_repo.update(&cmd.material_id, &draft).await?;
        record_material_write("purchase");

        info!(
            material_id = %cmd.material_id,
            previous_unit_cost = %current.unit_cost(),
            unit_cost = %material.unit_cost(),
            "Packet purchase recorded"
        );
        Ok(material)
    }

    // ========== 价格阶梯 ==========

    /// 创建价格阶梯
    pub async fn create_price_tier(&self, input: PriceTierInput) -> PricingResult<PriceTier> {
        // 新阶梯没有可排除的自身
        let input = PriceTierInput { id: None, ..input };
        self.write_price_tier(&input).await
    }

    /// 更新价格阶梯，重叠检查时排除其自身
    pub async fn update_price_tier(&self, input: PriceTierInput) -> PricingResult<PriceTier> {
        if input.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            record_tier_admission("invalid_request");
            return Err(PricingError::invalid_request(
                "price tier id is required for update",
            ));
        }
        self.write_price_tier(&input).await
    }

    /// 删除价格阶梯
    pub async fn delete_price_tier(&self, id: &PriceTierId) -> PricingResult<()> {
        self.tier_repo.delete(id).await?;

        info!(tier_id = %id, "Price tier deleted");
        Ok(())
    }

    /// 列出产品的价格阶梯（按最小数量升序）
    pub async fn list_price_tiers(&self, query: ListPriceTiersQuery) -> PricingResult<Vec<PriceTier>> {
        let product_id = parse_product_id(&query.product_id)?;
        Ok(self.tier_repo.find_by_product(&product_id).await?)
    }

    /// 按数量查找适用的阶梯单价；没有覆盖该数量的阶梯时返回 `None`
    pub async fn quote_unit_price(&self, query: QuoteUnitPriceQuery) -> PricingResult<Option<UnitPriceQuote>> {
        let mut errors = ValidationErrors::new();
        let product_id = ProductId::parse(&query.product_id);
        if product_id.is_none() {
            errors.push(FieldError::new("productId", "must not be empty"));
        }
        let quantity = positive_integer(&mut errors, "quantity", query.quantity);
        let (Some(product_id), Some(quantity)) = (product_id, quantity) else {
            return Err(PricingError::Validation(errors));
        };

        let tiers = self.tier_repo.find_by_product(&product_id).await?;
        let Some(tier) = tier_for_quantity(&tiers, quantity) else {
            debug!(product_id = %product_id, quantity, "No price tier covers quantity");
            return Ok(None);
        };

        let total = tier
            .unit_price
            .times(quantity)
            .map_err(|e| AppError::internal(format!("Failed to compute quote total: {}", e)))?;

        Ok(Some(UnitPriceQuote {
            tier: tier.clone(),
            quantity,
            total,
        }))
    }

    /// 在产品级工作单元内完成 校验 -> 读取 -> 重叠检查 -> 写入
    async fn write_price_tier(&self, input: &PriceTierInput) -> PricingResult<PriceTier> {
        let outcome = self.admit_price_tier(input).await;

        match &outcome {
            Ok(tier) => {
                record_tier_admission("admitted");
                info!(
                    tier_id = %tier.id,
                    product_id = %tier.product_id,
                    min_quantity = tier.min_quantity(),
                    max_quantity = tier.max_quantity(),
                    unit_price = %tier.unit_price,
                    "Price tier admitted"
                );
            }
            Err(PricingError::Conflict(conflict)) => {
                record_tier_admission("conflict");
                warn!(
                    conflicting_tier = %conflict.tier_id,
                    min_quantity = conflict.min_quantity,
                    max_quantity = conflict.max_quantity,
                    "Price tier rejected: quantity range overlaps"
                );
            }
            Err(e) => {
                record_tier_admission(e.kind());
                debug!(error = %e, "Price tier rejected");
            }
        }

        outcome
    }

    async fn admit_price_tier(&self, input: &PriceTierInput) -> PricingResult<PriceTier> {
        // 形状错误无需加锁即可拒绝
        let shape = validate_tier_shape(input)?;

        let uow = self
            .tier_uow_factory
            .begin_for_product(shape.product_id())
            .await?;

        let outcome = Self::admit_in(uow.as_ref(), input, &shape).await;
        match outcome {
            Ok(tier) => {
                uow.commit().await?;
                Ok(tier)
            }
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(error = %rollback_err, "Failed to roll back price tier unit of work");
                }
                Err(e)
            }
        }
    }

    async fn admit_in(
        uow: &dyn PriceTierUnitOfWork,
        input: &PriceTierInput,
        shape: &NormalizedTier,
    ) -> PricingResult<PriceTier> {
        let repo = uow.price_tiers();

        if let Some(id) = &shape.id {
            let current = repo
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Price tier {} not found", id)))?;
            if &current.product_id != shape.product_id() {
                return Err(PricingError::invalid_request(format!(
                    "price tier {} belongs to product {}, not {}",
                    id,
                    current.product_id,
                    shape.product_id()
                )));
            }
        }

        let tier = admit_new_tier(input, |product_id| async move {
            repo.find_by_product(&product_id).await
        })
        .await?;

        let stored = match &tier.id {
            Some(id) => repo.update(id, &tier.draft).await?,
            None => repo.create(&tier.draft).await?,
        };
        Ok(stored)
    }
}

fn parse_product_id(raw: &str) -> PricingResult<ProductId> {
    ProductId::parse(raw).ok_or_else(|| {
        PricingError::Validation(FieldError::new("productId", "must not be empty").into())
    })
}
