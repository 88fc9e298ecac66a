//! 价格阶梯的 Unit of Work
//!
//! 重叠检查与写入是两个步骤，必须在同一个按产品串行化的事务里完成，
//! 否则两个并发提交可能各自通过检查后都写入

use async_trait::async_trait;
use errors::AppResult;
use ports::UnitOfWork;

use crate::domain::repositories::PriceTierRepository;
use crate::domain::value_objects::ProductId;

/// 持有某个产品写锁的工作单元
///
/// 同一产品同时最多存在一个未结束的工作单元；提交或回滚后释放
pub trait PriceTierUnitOfWork: UnitOfWork + Sync {
    /// 事务内的价格阶梯仓储
    fn price_tiers(&self) -> &dyn PriceTierRepository;
}

/// Unit of Work 工厂
#[async_trait]
pub trait PriceTierUnitOfWorkFactory: Send + Sync {
    /// 开始事务并等待获得该产品的写锁
    async fn begin_for_product(&self, product_id: &ProductId) -> AppResult<Box<dyn PriceTierUnitOfWork>>;
}
