//! print-pricing - 印刷材料成本与数量阶梯定价
//!
//! - 材料成本引擎：校验纸张记录并由整包采购价推导单张成本
//! - 价格阶梯引擎：校验阶梯形状，检测同一产品下数量区间的重叠

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod seed;

pub use error::{FieldError, PricingError, PricingResult, TierConflict, ValidationErrors};
