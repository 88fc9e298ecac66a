//! 领域层
//!
//! 包含实体、值对象、纯函数领域服务、仓储接口和工作单元

pub mod entities;
pub mod repositories;
pub mod services;
pub mod unit_of_work;
pub mod validation;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use services::*;
pub use unit_of_work::*;
pub use value_objects::*;
