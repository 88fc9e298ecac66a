//! 材料成本引擎流程测试

mod common;

use domain_core::Entity;
use errors::AppError;
use print_pricing::PricingError;
use print_pricing::application::{GetMaterialQuery, RecordPacketPurchaseCommand};
use print_pricing::domain::{MaterialId, MaterialInput};
use print_pricing::infrastructure::persistence::InMemoryStore;
use rust_decimal_macros::dec;

use common::{couche, handler};

#[tokio::test]
async fn test_create_material_derives_unit_cost() {
    let store = InMemoryStore::new();
    let handler = handler(&store);

    let material = handler.create_material(couche()).await.unwrap();

    assert_eq!(material.unit_cost().amount(), dec!(0.2236));
    assert_eq!(material.packet_cost().amount(), dec!(55.90));

    let fetched = handler
        .get_material(GetMaterialQuery {
            material_id: *material.id(),
        })
        .await
        .unwrap();
    assert_eq!(fetched, material);
}

#[tokio::test]
async fn test_update_recomputes_from_new_packet_data() {
    let store = InMemoryStore::new();
    let handler = handler(&store);
    let material = handler.create_material(couche()).await.unwrap();

    let updated = handler
        .update_material(MaterialInput {
            id: Some(material.id().to_string()),
            packet_cost: Some(dec!(70)),
            packet_qty: Some(dec!(500)),
            ..couche()
        })
        .await
        .unwrap();

    assert_eq!(updated.id(), material.id());
    assert_eq!(updated.unit_cost().amount(), dec!(0.14));
    assert_eq!(updated.packet_qty(), 500);
}

#[tokio::test]
async fn test_update_without_id_is_invalid_request() {
    let store = InMemoryStore::new();
    let err = handler(&store).update_material(couche()).await.unwrap_err();

    assert!(matches!(err, PricingError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_update_without_id_is_invalid_request_even_with_bad_fields() {
    let store = InMemoryStore::new();
    let err = handler(&store)
        .update_material(MaterialInput {
            id: None,
            grammage: Some(dec!(0)),
            ..couche()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, PricingError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_unit_cost_rounding_to_zero_is_rejected() {
    let store = InMemoryStore::new();
    let handler = handler(&store);

    let err = handler
        .create_material(MaterialInput {
            packet_cost: Some(dec!(0.0000000000000000000000000001)),
            packet_qty: Some(dec!(3)),
            ..couche()
        })
        .await
        .unwrap_err();

    let PricingError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert!(errors.field("packetCost").is_some());
    assert!(handler.list_materials().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_missing_material_propagates_not_found() {
    let store = InMemoryStore::new();
    let err = handler(&store)
        .update_material(MaterialInput {
            id: Some(MaterialId::new().to_string()),
            ..couche()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, PricingError::Store(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_invalid_material_is_not_persisted() {
    let store = InMemoryStore::new();
    let handler = handler(&store);

    let err = handler
        .create_material(MaterialInput {
            grammage: Some(dec!(0)),
            ..couche()
        })
        .await
        .unwrap_err();

    let PricingError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert!(errors.field("grammage").is_some());
    assert!(handler.list_materials().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_packet_purchase_replaces_unit_cost() {
    let store = InMemoryStore::new();
    let handler = handler(&store);
    let material = handler.create_material(couche()).await.unwrap();

    let repriced = handler
        .record_packet_purchase(RecordPacketPurchaseCommand {
            material_id: *material.id(),
            packet_cost: Some(dec!(62.50)),
            packet_qty: Some(dec!(250)),
        })
        .await
        .unwrap();

    assert_eq!(repriced.unit_cost().amount(), dec!(0.25));
    assert_eq!(repriced.name(), material.name());
    assert_eq!(repriced.grammage(), material.grammage());
}

#[tokio::test]
async fn test_packet_purchase_validates_fields() {
    let store = InMemoryStore::new();
    let handler = handler(&store);
    let material = handler.create_material(couche()).await.unwrap();

    let err = handler
        .record_packet_purchase(RecordPacketPurchaseCommand {
            material_id: *material.id(),
            packet_cost: Some(dec!(-1)),
            packet_qty: None,
        })
        .await
        .unwrap_err();

    let PricingError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.len(), 2);
}

#[tokio::test]
async fn test_delete_material() {
    let store = InMemoryStore::new();
    let handler = handler(&store);
    let material = handler.create_material(couche()).await.unwrap();

    handler.delete_material(material.id()).await.unwrap();

    let err = handler.delete_material(material.id()).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert!(handler.list_materials().await.unwrap().is_empty());
}
