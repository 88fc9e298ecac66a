//! 仓储接口

mod material_repository;
mod price_tier_repository;

pub use material_repository::MaterialRepository;
pub use price_tier_repository::PriceTierRepository;
