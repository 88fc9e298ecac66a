//! 价格阶梯仓储接口

use async_trait::async_trait;
use errors::AppResult;
use ports::Repository;

use crate::domain::entities::{PriceTier, PriceTierDraft};
use crate::domain::value_objects::{PriceTierId, ProductId};

/// 价格阶梯仓储接口
#[async_trait]
pub trait PriceTierRepository: Repository<PriceTier, PriceTierDraft, PriceTierId> {
    /// 产品当前的全部阶梯，按 `min_quantity` 升序；没有时返回空列表
    async fn find_by_product(&self, product_id: &ProductId) -> AppResult<Vec<PriceTier>>;
}
