//! PostgreSQL repository implementation

use std::sync::Arc;

use adapter_postgres::{TransactionManager, map_sqlx_error};
use async_trait::async_trait;
use errors::{AppError, AppResult};
use ports::{Repository, UnitOfWork};
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::entities::{Material, MaterialDraft, PriceTier, PriceTierDraft};
use crate::domain::repositories::{MaterialRepository, PriceTierRepository};
use crate::domain::unit_of_work::{PriceTierUnitOfWork, PriceTierUnitOfWorkFactory};
use crate::domain::value_objects::{MaterialId, PriceTierId, ProductId};

use super::converters::{material_from_row, price_tier_from_row, to_db_int};
use super::rows::{MaterialRow, PriceTierRow};

const MATERIAL_COLUMNS: &str =
    "id, name, brand, grammage, format, packet_cost, packet_qty, unit_cost";

const PRICE_TIER_COLUMNS: &str = "id, product_id, min_quantity, max_quantity, unit_price";

// ============================================================================
// MaterialRepository 实现
// ============================================================================

pub struct PostgresMaterialRepository {
    pool: PgPool,
}

impl PostgresMaterialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Material, MaterialDraft, MaterialId> for PostgresMaterialRepository {
    async fn find_by_id(&self, id: &MaterialId) -> AppResult<Option<Material>> {
        let row = sqlx::query_as::<_, MaterialRow>(&format!(
            "SELECT {} FROM materials WHERE id = $1",
            MATERIAL_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(material_from_row).transpose()
    }

    async fn create(&self, draft: &MaterialDraft) -> AppResult<Material> {
        let id = MaterialId::new();

        let row = sqlx::query_as::<_, MaterialRow>(&format!(
            r#"
            INSERT INTO materials (id, name, brand, grammage, format, packet_cost, packet_qty, unit_cost)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            MATERIAL_COLUMNS
        ))
        .bind(id.0)
        .bind(draft.name())
        .bind(draft.brand())
        .bind(to_db_int("grammage", draft.grammage())?)
        .bind(draft.format())
        .bind(draft.packet_cost().amount())
        .bind(to_db_int("packet_qty", draft.packet_qty())?)
        .bind(draft.unit_cost().amount())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        material_from_row(row)
    }

    async fn update(&self, id: &MaterialId, draft: &MaterialDraft) -> AppResult<Material> {
        let row = sqlx::query_as::<_, MaterialRow>(&format!(
            r#"
            UPDATE materials
            SET name = $2, brand = $3, grammage = $4, format = $5,
                packet_cost = $6, packet_qty = $7, unit_cost = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            MATERIAL_COLUMNS
        ))
        .bind(id.0)
        .bind(draft.name())
        .bind(draft.brand())
        .bind(to_db_int("grammage", draft.grammage())?)
        .bind(draft.format())
        .bind(draft.packet_cost().amount())
        .bind(to_db_int("packet_qty", draft.packet_qty())?)
        .bind(draft.unit_cost().amount())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .ok_or_else(|| AppError::not_found(format!("Material {} not found", id)))?;

        material_from_row(row)
    }

    async fn delete(&self, id: &MaterialId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Material {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl MaterialRepository for PostgresMaterialRepository {
    async fn list(&self) -> AppResult<Vec<Material>> {
        let rows = sqlx::query_as::<_, MaterialRow>(&format!(
            "SELECT {} FROM materials ORDER BY name ASC, id ASC",
            MATERIAL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(material_from_row).collect()
    }
}

// ============================================================================
// 价格阶梯查询（连接池与事务共用）
// ============================================================================

async fn select_tier<'e, E: PgExecutor<'e>>(executor: E, id: &PriceTierId) -> AppResult<Option<PriceTier>> {
    let row = sqlx::query_as::<_, PriceTierRow>(&format!(
        "SELECT {} FROM price_tiers WHERE id = $1",
        PRICE_TIER_COLUMNS
    ))
    .bind(id.0)
    .fetch_optional(executor)
    .await
    .map_err(map_sqlx_error)?;

    row.map(price_tier_from_row).transpose()
}

async fn select_tiers_by_product<'e, E: PgExecutor<'e>>(
    executor: E,
    product_id: &ProductId,
) -> AppResult<Vec<PriceTier>> {
    let rows = sqlx::query_as::<_, PriceTierRow>(&format!(
        "SELECT {} FROM price_tiers WHERE product_id = $1 ORDER BY min_quantity ASC",
        PRICE_TIER_COLUMNS
    ))
    .bind(product_id.as_str())
    .fetch_all(executor)
    .await
    .map_err(map_sqlx_error)?;

    rows.into_iter().map(price_tier_from_row).collect()
}

async fn insert_tier<'e, E: PgExecutor<'e>>(executor: E, draft: &PriceTierDraft) -> AppResult<PriceTier> {
    let row = sqlx::query_as::<_, PriceTierRow>(&format!(
        r#"
        INSERT INTO price_tiers (id, product_id, min_quantity, max_quantity, unit_price)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        PRICE_TIER_COLUMNS
    ))
    .bind(PriceTierId::new().0)
    .bind(draft.product_id.as_str())
    .bind(to_db_int("min_quantity", draft.range.min_quantity())?)
    .bind(to_db_int("max_quantity", draft.range.max_quantity())?)
    .bind(draft.unit_price.amount())
    .fetch_one(executor)
    .await
    .map_err(map_sqlx_error)?;

    price_tier_from_row(row)
}

async fn update_tier<'e, E: PgExecutor<'e>>(
    executor: E,
    id: &PriceTierId,
    draft: &PriceTierDraft,
) -> AppResult<PriceTier> {
    let row = sqlx::query_as::<_, PriceTierRow>(&format!(
        r#"
        UPDATE price_tiers
        SET product_id = $2, min_quantity = $3, max_quantity = $4, unit_price = $5, updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        PRICE_TIER_COLUMNS
    ))
    .bind(id.0)
    .bind(draft.product_id.as_str())
    .bind(to_db_int("min_quantity", draft.range.min_quantity())?)
    .bind(to_db_int("max_quantity", draft.range.max_quantity())?)
    .bind(draft.unit_price.amount())
    .fetch_optional(executor)
    .await
    .map_err(map_sqlx_error)?
    .ok_or_else(|| AppError::not_found(format!("Price tier {} not found", id)))?;

    price_tier_from_row(row)
}

async fn delete_tier<'e, E: PgExecutor<'e>>(executor: E, id: &PriceTierId) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM price_tiers WHERE id = $1")
        .bind(id.0)
        .execute(executor)
        .await
        .map_err(map_sqlx_error)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(format!("Price tier {} not found", id)));
    }
    Ok(())
}

// ============================================================================
// PriceTierRepository 实现（连接池）
// ============================================================================

pub struct PostgresPriceTierRepository {
    pool: PgPool,
}

impl PostgresPriceTierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<PriceTier, PriceTierDraft, PriceTierId> for PostgresPriceTierRepository {
    async fn find_by_id(&self, id: &PriceTierId) -> AppResult<Option<PriceTier>> {
        select_tier(&self.pool, id).await
    }

    async fn create(&self, draft: &PriceTierDraft) -> AppResult<PriceTier> {
        insert_tier(&self.pool, draft).await
    }

    async fn update(&self, id: &PriceTierId, draft: &PriceTierDraft) -> AppResult<PriceTier> {
        update_tier(&self.pool, id, draft).await
    }

    async fn delete(&self, id: &PriceTierId) -> AppResult<()> {
        delete_tier(&self.pool, id).await
    }
}

#[async_trait]
impl PriceTierRepository for PostgresPriceTierRepository {
    async fn find_by_product(&self, product_id: &ProductId) -> AppResult<Vec<PriceTier>> {
        select_tiers_by_product(&self.pool, product_id).await
    }
}

// ============================================================================
// 事务感知的 PriceTierRepository
// ============================================================================

/// Shared transaction type
pub type SharedTx = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

pub struct TxPriceTierRepository {
    tx: SharedTx,
}

impl TxPriceTierRepository {
    pub fn new(tx: SharedTx) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Repository<PriceTier, PriceTierDraft, PriceTierId> for TxPriceTierRepository {
    async fn find_by_id(&self, id: &PriceTierId) -> AppResult<Option<PriceTier>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        select_tier(&mut **tx, id).await
    }

    async fn create(&self, draft: &PriceTierDraft) -> AppResult<PriceTier> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        insert_tier(&mut **tx, draft).await
    }

    async fn update(&self, id: &PriceTierId, draft: &PriceTierDraft) -> AppResult<PriceTier> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        update_tier(&mut **tx, id, draft).await
    }

    async fn delete(&self, id: &PriceTierId) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        delete_tier(&mut **tx, id).await
    }
}

#[async_trait]
impl PriceTierRepository for TxPriceTierRepository {
    async fn find_by_product(&self, product_id: &ProductId) -> AppResult<Vec<PriceTier>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        select_tiers_by_product(&mut **tx, product_id).await
    }
}

// ============================================================================
// Unit of Work
// ============================================================================

/// Postgres Unit of Work 工厂
///
/// 每个工作单元在事务内持有以产品为键的 advisory lock，同一产品的
/// 读取-检查-写入因此串行执行；表上的排他约束再兜底拒绝任何重叠写入
pub struct PostgresPriceTierUnitOfWorkFactory {
    tx_manager: TransactionManager,
}

impl PostgresPriceTierUnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tx_manager: TransactionManager::new(pool),
        }
    }
}

fn lock_key(product_id: &ProductId) -> String {
    format!("price_tiers:{}", product_id)
}

#[async_trait]
impl PriceTierUnitOfWorkFactory for PostgresPriceTierUnitOfWorkFactory {
    async fn begin_for_product(&self, product_id: &ProductId) -> AppResult<Box<dyn PriceTierUnitOfWork>> {
        let tx = self.tx_manager.begin_locked(&lock_key(product_id)).await?;
        debug!(product_id = %product_id, "Price tier unit of work started");

        Ok(Box::new(PostgresPriceTierUnitOfWork::new(tx)))
    }
}

/// Postgres Unit of Work 实现
pub struct PostgresPriceTierUnitOfWork {
    tx: SharedTx,
    price_tier_repo: TxPriceTierRepository,
}

impl PostgresPriceTierUnitOfWork {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        let tx = Arc::new(Mutex::new(Some(tx)));

        Self {
            tx: tx.clone(),
            price_tier_repo: TxPriceTierRepository::new(tx),
        }
    }
}

impl PriceTierUnitOfWork for PostgresPriceTierUnitOfWork {
    fn price_tiers(&self) -> &dyn PriceTierRepository {
        &self.price_tier_repo
    }
}

#[async_trait]
impl UnitOfWork for PostgresPriceTierUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))?;

        TransactionManager::commit(tx).await
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))?;

        TransactionManager::rollback(tx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_key_is_scoped_to_product() {
        let a = ProductId::parse("cartao-de-visita").unwrap();
        let b = ProductId::parse("flyer-a5").unwrap();

        assert_eq!(lock_key(&a), "price_tiers:cartao-de-visita");
        assert_ne!(lock_key(&a), lock_key(&b));
    }
}
