//! 值对象模块

mod ids;
mod quantity_range;

pub use ids::{MaterialId, PriceTierId, ProductId};
pub use quantity_range::QuantityRange;
