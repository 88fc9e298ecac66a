//! 示例数据测试

mod common;

use print_pricing::infrastructure::persistence::InMemoryStore;
use print_pricing::seed::{SeedReport, seed_sample_data};
use rust_decimal_macros::dec;

use common::{PRODUCT, handler};

#[tokio::test]
async fn test_seed_is_rerunnable() {
    let store = InMemoryStore::new();
    let handler = handler(&store);

    let first = seed_sample_data(&handler, PRODUCT).await.unwrap();
    assert_eq!(
        first,
        SeedReport {
            materials_created: 1,
            materials_skipped: 0,
            tiers_admitted: 2,
            tiers_skipped: 0,
        }
    );

    let second = seed_sample_data(&handler, PRODUCT).await.unwrap();
    assert_eq!(
        second,
        SeedReport {
            materials_created: 0,
            materials_skipped: 1,
            tiers_admitted: 0,
            tiers_skipped: 2,
        }
    );

    let materials = handler.list_materials().await.unwrap();
    assert_eq!(materials.len(), 1);
    assert_eq!(materials[0].unit_cost().amount(), dec!(0.2236));
}
