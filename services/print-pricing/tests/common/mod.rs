//! 集成测试共用工具

#![allow(dead_code)]

use std::sync::Arc;

use print_pricing::application::PricingHandler;
use print_pricing::domain::{MaterialInput, PriceTierInput};
use print_pricing::infrastructure::persistence::InMemoryStore;
use rust_decimal::Decimal;

pub const PRODUCT: &str = "cartao-de-visita";

pub fn handler(store: &InMemoryStore) -> PricingHandler {
    PricingHandler::new(
        Arc::new(store.material_repository()),
        Arc::new(store.price_tier_repository()),
        Arc::new(store.clone()),
    )
}

pub fn tier(min: i64, max: i64, price: Decimal) -> PriceTierInput {
    PriceTierInput {
        id: None,
        product_id: Some(PRODUCT.to_string()),
        min_quantity: Some(Decimal::from(min)),
        max_quantity: Some(Decimal::from(max)),
        unit_price: Some(price),
    }
}

pub fn couche() -> MaterialInput {
    MaterialInput {
        id: None,
        name: Some("Couchê Fosco 170g".to_string()),
        brand: Some("Suzano".to_string()),
        grammage: Some(Decimal::from(170)),
        format: Some("SRA3".to_string()),
        packet_cost: Some(Decimal::new(5590, 2)),
        packet_qty: Some(Decimal::from(250)),
    }
}
