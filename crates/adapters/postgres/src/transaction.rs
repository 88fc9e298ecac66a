//! PostgreSQL 事务管理模块
//!
//! 提供事务管理器和事务级 advisory lock

use errors::{AppError, AppResult};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

/// 事务管理器
#[derive(Clone)]
pub struct TransactionManager {
    pool: PgPool,
}

impl TransactionManager {
    /// 创建新的事务管理器
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 开始事务
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))
    }

    /// 开始事务并持有以 `key` 为键的事务级 advisory lock
    ///
    /// 同一 `key` 的事务在此串行执行，锁随提交或回滚自动释放
    pub async fn begin_locked(&self, key: &str) -> AppResult<Transaction<'static, Postgres>> {
        let mut tx = self.begin().await?;
        advisory_xact_lock(&mut tx, key).await?;
        Ok(tx)
    }

    /// 提交事务
    pub async fn commit(tx: Transaction<'static, Postgres>) -> AppResult<()> {
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {}", e)))
    }

    /// 回滚事务
    pub async fn rollback(tx: Transaction<'static, Postgres>) -> AppResult<()> {
        tx.rollback()
            .await
            .map_err(|e| AppError::database(format!("Failed to rollback transaction: {}", e)))
    }
}

/// 在当前事务内获取 advisory lock，阻塞直到其他持有者结束事务
pub async fn advisory_xact_lock(tx: &mut Transaction<'static, Postgres>, key: &str) -> AppResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(key)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to acquire advisory lock: {}", e)))?;

    debug!(lock_key = %key, "Advisory lock acquired");
    Ok(())
}
