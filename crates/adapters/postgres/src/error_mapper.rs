//! 数据库错误映射工具
//!
//! 提供统一的 SQLx 错误到 AppError 的转换

use errors::AppError;

/// 将 SQLx 错误转换为 AppError，区分不同错误类型
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    // PostgreSQL 约束违规代码
                    "23505" => AppError::conflict("Duplicate entry violates unique constraint"),
                    "23P01" => AppError::conflict(format!(
                        "Exclusion constraint violation: {}",
                        db_err.constraint().unwrap_or("unknown")
                    )),
                    "23503" => AppError::validation("Foreign key constraint violation"),
                    "23514" => AppError::validation(format!(
                        "Check constraint violation: {}",
                        db_err.constraint().unwrap_or("unknown")
                    )),
                    "23502" => AppError::validation("Not null constraint violation"),
                    "22001" => AppError::validation("String data too long"),
                    "22P02" => AppError::validation("Invalid input syntax"),
                    // 40001: serialization_failure, 40P01: deadlock_detected
                    "40001" | "40P01" => {
                        AppError::unavailable(format!("Transaction aborted ({}): {}", code, db_err))
                    }
                    _ => AppError::database(format!("Database error ({}): {}", code, db_err)),
                }
            } else {
                AppError::database(db_err.to_string())
            }
        }
        sqlx::Error::PoolTimedOut => AppError::unavailable("Database connection pool timeout"),
        sqlx::Error::PoolClosed => AppError::unavailable("Database connection pool is closed"),
        sqlx::Error::Io(err) => AppError::unavailable(format!("Database I/O error: {}", err)),
        sqlx::Error::Protocol(msg) => {
            AppError::internal(format!("Database protocol error: {}", msg))
        }
        _ => AppError::database(e.to_string()),
    }
}
