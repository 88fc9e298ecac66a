//! 材料仓储接口

use async_trait::async_trait;
use errors::AppResult;
use ports::Repository;

use crate::domain::entities::{Material, MaterialDraft};
use crate::domain::value_objects::MaterialId;

/// 材料仓储接口
#[async_trait]
pub trait MaterialRepository: Repository<Material, MaterialDraft, MaterialId> {
    /// 按名称排序列出全部材料
    async fn list(&self) -> AppResult<Vec<Material>>;
}
