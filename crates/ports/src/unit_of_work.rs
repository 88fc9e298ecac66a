//! Unit of Work trait 定义

use async_trait::async_trait;
use errors::AppResult;

/// Unit of Work trait
///
/// 事务边界：提交前的写入对其他事务不可见，回滚后不保留任何部分状态
#[async_trait]
pub trait UnitOfWork: Send {
    /// 提交事务
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// 回滚事务
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}
