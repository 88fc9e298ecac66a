//! 内存记录存储
//!
//! 与 Postgres 实现遵守同一契约：按产品串行化的工作单元、提交前写入不可见，
//! 以及与排他约束等价的重叠拒绝。用于测试和无数据库的本地运行

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use domain_core::Entity;
use errors::{AppError, AppResult};
use ports::{Repository, UnitOfWork};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::entities::{Material, MaterialDraft, PriceTier, PriceTierDraft};
use crate::domain::repositories::{MaterialRepository, PriceTierRepository};
use crate::domain::unit_of_work::{PriceTierUnitOfWork, PriceTierUnitOfWorkFactory};
use crate::domain::value_objects::{MaterialId, PriceTierId, ProductId};

type MaterialTable = Arc<RwLock<HashMap<MaterialId, Material>>>;
type PriceTierTable = Arc<RwLock<HashMap<PriceTierId, PriceTier>>>;

/// 内存存储，克隆后共享同一份数据
#[derive(Clone, Default)]
pub struct InMemoryStore {
    materials: MaterialTable,
    price_tiers: PriceTierTable,
    product_locks: Arc<Mutex<HashMap<ProductId, Arc<Mutex<()>>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn material_repository(&self) -> InMemoryMaterialRepository {
        InMemoryMaterialRepository {
            materials: self.materials.clone(),
        }
    }

    pub fn price_tier_repository(&self) -> InMemoryPriceTierRepository {
        InMemoryPriceTierRepository {
            price_tiers: self.price_tiers.clone(),
        }
    }

    /// 取得产品锁；顺带清理无人持有的条目，表大小以同时活跃的产品数为界
    async fn product_lock(&self, product_id: &ProductId) -> Arc<Mutex<()>> {
        let mut locks = self.product_locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(product_id.clone()).or_default().clone()
    }
}

// ============================================================================
// MaterialRepository 实现
// ============================================================================

pub struct InMemoryMaterialRepository {
    materials: MaterialTable,
}

#[async_trait]
impl Repository<Material, MaterialDraft, MaterialId> for InMemoryMaterialRepository {
    async fn find_by_id(&self, id: &MaterialId) -> AppResult<Option<Material>> {
        Ok(self.materials.read().await.get(id).cloned())
    }

    async fn create(&self, draft: &MaterialDraft) -> AppResult<Material> {
        let material = Material::new(MaterialId::new(), draft.clone());
        self.materials
            .write()
            .await
            .insert(*material.id(), material.clone());
        Ok(material)
    }

    async fn update(&self, id: &MaterialId, draft: &MaterialDraft) -> AppResult<Material> {
        let mut materials = self.materials.write().await;
        let slot = materials
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("Material {} not found", id)))?;

        *slot = Material::new(*id, draft.clone());
        Ok(slot.clone())
    }

    async fn delete(&self, id: &MaterialId) -> AppResult<()> {
        self.materials
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Material {} not found", id)))
    }
}

#[async_trait]
impl MaterialRepository for InMemoryMaterialRepository {
    async fn list(&self) -> AppResult<Vec<Material>> {
        let mut materials: Vec<Material> = self.materials.read().await.values().cloned().collect();
        materials.sort_by(|a, b| {
            a.name()
                .cmp(b.name())
                .then_with(|| a.id().0.cmp(&b.id().0))
        });
        Ok(materials)
    }
}

// ============================================================================
// 价格阶梯表操作
// ============================================================================

fn tiers_for_product(table: &HashMap<PriceTierId, PriceTier>, product_id: &ProductId) -> Vec<PriceTier> {
    let mut tiers: Vec<PriceTier> = table
        .values()
        .filter(|tier| &tier.product_id == product_id)
        .cloned()
        .collect();
    tiers.sort_by_key(|tier| (tier.min_quantity(), tier.id.0));
    tiers
}

/// 写入前检查与 Postgres 排他约束等价的条件
fn put_tier(table: &mut HashMap<PriceTierId, PriceTier>, tier: PriceTier) -> AppResult<()> {
    let overlapping = table.values().any(|other| {
        other.id != tier.id && other.product_id == tier.product_id && other.range.overlaps(&tier.range)
    });
    if overlapping {
        return Err(AppError::conflict(
            "Exclusion constraint violation: price_tiers_no_overlap",
        ));
    }
    table.insert(tier.id, tier);
    Ok(())
}

fn not_found(id: &PriceTierId) -> AppError {
    AppError::not_found(format!("Price tier {} not found", id))
}

// ============================================================================
// PriceTierRepository 实现（直接写入）
// ============================================================================

pub struct InMemoryPriceTierRepository {
    price_tiers: PriceTierTable,
}

#[async_trait]
impl Repository<PriceTier, PriceTierDraft, PriceTierId> for InMemoryPriceTierRepository {
    async fn find_by_id(&self, id: &PriceTierId) -> AppResult<Option<PriceTier>> {
        Ok(self.price_tiers.read().await.get(id).cloned())
    }

    async fn create(&self, draft: &PriceTierDraft) -> AppResult<PriceTier> {
        let tier = PriceTier::new(PriceTierId::new(), draft.clone());
        put_tier(&mut *self.price_tiers.write().await, tier.clone())?;
        Ok(tier)
    }

    async fn update(&self, id: &PriceTierId, draft: &PriceTierDraft) -> AppResult<PriceTier> {
        let mut table = self.price_tiers.write().await;
        if !table.contains_key(id) {
            return Err(not_found(id));
        }
        let tier = PriceTier::new(*id, draft.clone());
        put_tier(&mut table, tier.clone())?;
        Ok(tier)
    }

    async fn delete(&self, id: &PriceTierId) -> AppResult<()> {
        self.price_tiers
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl PriceTierRepository for InMemoryPriceTierRepository {
    async fn find_by_product(&self, product_id: &ProductId) -> AppResult<Vec<PriceTier>> {
        Ok(tiers_for_product(&*self.price_tiers.read().await, product_id))
    }
}

// ============================================================================
// 事务内的 PriceTierRepository：写入暂存，提交时一次性应用
// ============================================================================

enum StagedWrite {
    Put(PriceTier),
    Delete(PriceTierId),
}

pub struct InMemoryTxPriceTierRepository {
    committed: PriceTierTable,
    staged: Mutex<Vec<StagedWrite>>,
}

impl InMemoryTxPriceTierRepository {
    /// 已提交数据叠加本事务暂存的写入
    async fn snapshot(&self) -> HashMap<PriceTierId, PriceTier> {
        let mut view = self.committed.read().await.clone();
        for write in self.staged.lock().await.iter() {
            match write {
                StagedWrite::Put(tier) => {
                    view.insert(tier.id, tier.clone());
                }
                StagedWrite::Delete(id) => {
                    view.remove(id);
                }
            }
        }
        view
    }

    async fn apply(&self) -> AppResult<()> {
        let mut committed = self.committed.write().await;
        let mut next = committed.clone();
        for write in self.staged.lock().await.drain(..) {
            match write {
                StagedWrite::Put(tier) => put_tier(&mut next, tier)?,
                StagedWrite::Delete(id) => {
                    next.remove(&id);
                }
            }
        }
        *committed = next;
        Ok(())
    }
}

#[async_trait]
impl Repository<PriceTier, PriceTierDraft, PriceTierId> for InMemoryTxPriceTierRepository {
    async fn find_by_id(&self, id: &PriceTierId) -> AppResult<Option<PriceTier>> {
        Ok(self.snapshot().await.remove(id))
    }

    async fn create(&self, draft: &PriceTierDraft) -> AppResult<PriceTier> {
        let tier = PriceTier::new(PriceTierId::new(), draft.clone());
        self.staged.lock().await.push(StagedWrite::Put(tier.clone()));
        Ok(tier)
    }

    async fn update(&self, id: &PriceTierId, draft: &PriceTierDraft) -> AppResult<PriceTier> {
        if !self.snapshot().await.contains_key(id) {
            return Err(not_found(id));
        }
        let tier = PriceTier::new(*id, draft.clone());
        self.staged.lock().await.push(StagedWrite::Put(tier.clone()));
        Ok(tier)
    }

    async fn delete(&self, id: &PriceTierId) -> AppResult<()> {
        if !self.snapshot().await.contains_key(id) {
            return Err(not_found(id));
        }
        self.staged.lock().await.push(StagedWrite::Delete(*id));
        Ok(())
    }
}

#[async_trait]
impl PriceTierRepository for InMemoryTxPriceTierRepository {
    async fn find_by_product(&self, product_id: &ProductId) -> AppResult<Vec<PriceTier>> {
        Ok(tiers_for_product(&self.snapshot().await, product_id))
    }
}

// ============================================================================
// Unit of Work
// ============================================================================

/// 持有产品锁的内存工作单元；锁随工作单元一起释放
pub struct InMemoryPriceTierUnitOfWork {
    _product_guard: OwnedMutexGuard<()>,
    price_tier_repo: InMemoryTxPriceTierRepository,
}

impl PriceTierUnitOfWork for InMemoryPriceTierUnitOfWork {
    fn price_tiers(&self) -> &dyn PriceTierRepository {
        &self.price_tier_repo
    }
}

#[async_trait]
impl UnitOfWork for InMemoryPriceTierUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.price_tier_repo.apply().await
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl PriceTierUnitOfWorkFactory for InMemoryStore {
    async fn begin_for_product(&self, product_id: &ProductId) -> AppResult<Box<dyn PriceTierUnitOfWork>> {
        let guard = self.product_lock(product_id).await.lock_owned().await;

        Ok(Box::new(InMemoryPriceTierUnitOfWork {
            _product_guard: guard,
            price_tier_repo: InMemoryTxPriceTierRepository {
                committed: self.price_tiers.clone(),
                staged: Mutex::new(Vec::new()),
            },
        }))
    }
}
