//! print-pricing - 迁移数据库并写入示例数据

use std::sync::Arc;
use std::time::Duration;

use adapter_postgres::{PostgresConfig, check_connection, create_pool};
use config::AppConfig;
use secrecy::ExposeSecret;
use tracing::{debug, info};

use print_pricing::application::PricingHandler;
use print_pricing::infrastructure::persistence::{
    PostgresMaterialRepository, PostgresPriceTierRepository, PostgresPriceTierUnitOfWorkFactory,
    run_migrations,
};
use print_pricing::seed::seed_sample_data;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // 1. 加载配置
    let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let config = AppConfig::load(&config_dir)?;

    // 2. 初始化日志与指标
    telemetry::init_for_env(config.is_production(), &config.telemetry.log_level);
    let metrics = if config.telemetry.metrics_enabled {
        Some(telemetry::init_metrics()?)
    } else {
        None
    };

    info!(
        app_name = %config.app_name,
        app_env = %config.app_env,
        "Runtime initialized"
    );

    // 3. 连接数据库并迁移
    let pg_config = PostgresConfig::new(config.database.url.expose_secret())
        .with_max_connections(config.database.max_connections)
        .with_connect_timeout(Duration::from_secs(config.database.connect_timeout_secs));
    let pool = create_pool(&pg_config).await?;
    check_connection(&pool).await?;
    info!(
        "PostgreSQL connection pool created (max_connections: {})",
        config.database.max_connections
    );

    run_migrations(&pool).await?;

    // 4. 示例数据
    if config.seed.enabled {
        let handler = PricingHandler::new(
            Arc::new(PostgresMaterialRepository::new(pool.clone())),
            Arc::new(PostgresPriceTierRepository::new(pool.clone())),
            Arc::new(PostgresPriceTierUnitOfWorkFactory::new(pool.clone())),
        );
        seed_sample_data(&handler, &config.seed.product_id).await?;
    } else {
        info!("Seeding disabled");
    }

    if let Some(handle) = metrics {
        debug!(metrics = %handle.render(), "Metrics snapshot");
    }

    pool.close().await;
    Ok(())
}
