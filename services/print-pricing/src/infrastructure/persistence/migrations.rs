//! 内嵌的数据库迁移

use adapter_postgres::{Migration, MigrationManager, MigrationResult};
use errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::info;

/// 本服务的全部迁移，按版本号排列
pub fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "create_materials",
            include_str!("../../../migrations/0001_create_materials.sql"),
        ),
        Migration::new(
            2,
            "create_price_tiers",
            include_str!("../../../migrations/0002_create_price_tiers.sql"),
        ),
        Migration::new(
            3,
            "widen_price_tier_exclusion",
            include_str!("../../../migrations/0003_widen_price_tier_exclusion.sql"),
        ),
    ]
}

/// 应用待执行的迁移；任一迁移失败即返回错误
pub async fn run_migrations(pool: &PgPool) -> AppResult<MigrationResult> {
    let result = MigrationManager::new(pool.clone()).migrate(&migrations()).await?;

    if let Some(failure) = result.errors.first() {
        return Err(AppError::database(format!(
            "Migration {} ({}) failed: {}",
            failure.version, failure.name, failure.error
        )));
    }

    info!(
        applied = result.applied_count(),
        skipped = result.skipped.len(),
        "Migrations complete"
    );
    Ok(result)
}
