//! Repository trait 定义

use async_trait::async_trait;
use errors::AppResult;

/// 基础 Repository trait
///
/// - `T`: 已持久化的记录
/// - `D`: 经过校验、尚未分配 ID 的记录内容
/// - `ID`: 由存储分配的标识
///
/// 存储错误（未找到、连接失败等）原样返回，不在此层重试。
#[async_trait]
pub trait Repository<T, D, ID>: Send + Sync
where
    T: Send + Sync,
    D: Send + Sync,
    ID: Send + Sync,
{
    /// 根据 ID 查找
    async fn find_by_id(&self, id: &ID) -> AppResult<Option<T>>;

    /// 新建记录，返回分配了 ID 的记录
    async fn create(&self, draft: &D) -> AppResult<T>;

    /// 整体替换记录内容
    ///
    /// 记录不存在时返回 `AppError::NotFound`
    async fn update(&self, id: &ID, draft: &D) -> AppResult<T>;

    /// 删除记录
    ///
    /// 记录不存在时返回 `AppError::NotFound`
    async fn delete(&self, id: &ID) -> AppResult<()>;
}
