//! 领域服务（纯函数）

mod overlap;
mod tier_admission;

pub use overlap::{check_overlap, tier_for_quantity};
pub use tier_admission::admit_new_tier;
