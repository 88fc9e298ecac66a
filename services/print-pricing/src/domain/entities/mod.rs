//! 领域实体

mod material;
mod price_tier;

pub use material::{
    Material, MaterialDraft, MaterialInput, PreparedMaterial, validate_and_prepare_material,
    validate_material_update,
};
pub use price_tier::{NormalizedTier, PriceTier, PriceTierDraft, PriceTierInput, validate_tier_shape};
