use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Duration, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use spicetrack_client::error::AppError;
use spicetrack_client::services::InventoryService;
use spicetrack_client::store::local::LocalStore;
use spicetrack_client::store::{Collections, InventoryBackend};
use shared::models::{NewProduct, NewPurchase, NewSupplier, Product, StockStatus};
use shared::types::{PaymentMethod, Unit};

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("spicetrack-test-{}", Uuid::new_v4()))
}

fn service() -> InventoryService {
    let store = LocalStore::open(temp_dir()).expect("temp store");
    InventoryService::new(Arc::new(store))
}

fn new_product(name: &str, stock: i64, min: i64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        barcode: None,
        category: "Whole Spices".to_string(),
        unit: Unit::Kg,
        unit_price: Decimal::new(200, 2),
        current_stock: Decimal::from(stock),
        min_stock_level: Decimal::from(min),
        lead_time: 7,
        notes: None,
    }
}

fn new_supplier(name: &str) -> NewSupplier {
    NewSupplier {
        name: name.to_string(),
        contact_person: None,
        email: None,
        phone: "+94 11 234 5678".to_string(),
        address: None,
        notes: None,
    }
}

fn purchase_of(product: &Product, supplier_id: Uuid, qty: i64, price_cents: i64) -> NewPurchase {
    NewPurchase {
        date: None,
        product_id: product.id,
        quantity: Decimal::from(qty),
        unit_price: Decimal::new(price_cents, 2),
        supplier_id,
        payment_method: PaymentMethod::Cash,
        notes: None,
    }
}

#[tokio::test]
async fn low_stock_boundary_is_inclusive() {
    let svc = service();
    let at = svc.add_product(new_product("At threshold", 5, 5)).await.unwrap();
    let below = svc.add_product(new_product("Below", 2, 5)).await.unwrap();
    let _above = svc.add_product(new_product("Above", 6, 5)).await.unwrap();

    let low: Vec<Uuid> = svc.low_stock_products().await.iter().map(|p| p.id).collect();
    assert_eq!(low, vec![at.id, below.id]);
}

#[tokio::test]
async fn stock_alerts_grade_severity() {
    let svc = service();
    svc.add_product(new_product("Empty", 0, 5)).await.unwrap();
    svc.add_product(new_product("Scarce", 2, 5)).await.unwrap();
    svc.add_product(new_product("Near", 4, 5)).await.unwrap();

    let alerts = svc.stock_alerts().await;
    assert_eq!(alerts.len(), 3);
    assert_eq!(alerts[0].status, StockStatus::Critical);
    assert_eq!(alerts[1].status, StockStatus::Low);
    assert_eq!(alerts[2].status, StockStatus::Reorder);
}

#[tokio::test]
async fn purchase_increments_stock_and_denormalizes_names() {
    let svc = service();
    let product = svc.add_product(new_product("Cinnamon", 10, 4)).await.unwrap();
    let supplier = svc.add_supplier(new_supplier("Ceylon Spice Traders")).await.unwrap();

    let before = product.last_updated;
    let recorded = svc
        .add_purchase(purchase_of(&product, supplier.id, 5, 220))
        .await
        .unwrap();

    assert_eq!(recorded.product_name, "Cinnamon");
    assert_eq!(recorded.supplier_name, "Ceylon Spice Traders");
    assert_eq!(recorded.total_price, Decimal::new(1100, 2));

    let product = svc
        .products()
        .await
        .into_iter()
        .find(|p| p.id == product.id)
        .unwrap();
    assert_eq!(product.current_stock, Decimal::from(15));
    assert!(product.last_updated > before);
}

#[tokio::test]
async fn purchase_against_missing_references_records_nothing() {
    let svc = service();
    let product = svc.add_product(new_product("Cinnamon", 10, 4)).await.unwrap();
    let supplier = svc.add_supplier(new_supplier("Ceylon Spice Traders")).await.unwrap();

    let mut missing_product = purchase_of(&product, supplier.id, 5, 220);
    missing_product.product_id = Uuid::new_v4();
    let err = svc.add_purchase(missing_product).await.unwrap_err();
    assert!(matches!(err, AppError::ReferenceNotFound { entity: "product", .. }));

    let mut missing_supplier = purchase_of(&product, supplier.id, 5, 220);
    missing_supplier.supplier_id = Uuid::new_v4();
    let err = svc.add_purchase(missing_supplier).await.unwrap_err();
    assert!(matches!(err, AppError::ReferenceNotFound { entity: "supplier", .. }));

    assert!(svc.purchases().await.is_empty());
    assert_eq!(
        svc.products().await[0].current_stock,
        Decimal::from(10),
        "stock must not move when the purchase is rejected"
    );
}

#[tokio::test]
async fn concurrent_purchases_both_land() {
    let svc = Arc::new(service());
    let product = svc.add_product(new_product("Cinnamon", 10, 4)).await.unwrap();
    let supplier = svc.add_supplier(new_supplier("Ceylon Spice Traders")).await.unwrap();

    let a = svc.add_purchase(purchase_of(&product, supplier.id, 5, 220));
    let b = svc.add_purchase(purchase_of(&product, supplier.id, 3, 220));
    let (a, b) = tokio::join!(a, b);
    a.unwrap();
    b.unwrap();

    let product = svc
        .products()
        .await
        .into_iter()
        .find(|p| p.id == product.id)
        .unwrap();
    assert_eq!(product.current_stock, Decimal::from(18));
    assert_eq!(svc.purchases().await.len(), 2);
}

#[tokio::test]
async fn average_price_weights_by_quantity() {
    let svc = service();
    let product = svc.add_product(new_product("Cinnamon", 10, 4)).await.unwrap();
    let supplier = svc.add_supplier(new_supplier("Ceylon Spice Traders")).await.unwrap();

    // No purchases yet: the catalog reference price stands in.
    assert_eq!(
        svc.average_purchase_price(product.id).await.unwrap(),
        Decimal::new(200, 2)
    );

    svc.add_purchase(purchase_of(&product, supplier.id, 1, 100)).await.unwrap();
    svc.add_purchase(purchase_of(&product, supplier.id, 3, 300)).await.unwrap();

    // (1 * 1.00 + 3 * 3.00) / 4 = 2.50
    assert_eq!(
        svc.average_purchase_price(product.id).await.unwrap(),
        Decimal::new(250, 2)
    );
}

#[tokio::test]
async fn recent_purchases_cutoff_is_inclusive() {
    let svc = service();
    let product = svc.add_product(new_product("Cinnamon", 10, 4)).await.unwrap();
    let supplier = svc.add_supplier(new_supplier("Ceylon Spice Traders")).await.unwrap();

    let today = Utc::now().date_naive();
    let mut old = purchase_of(&product, supplier.id, 1, 200);
    old.date = Some(today - Duration::days(31));
    svc.add_purchase(old).await.unwrap();

    let mut edge = purchase_of(&product, supplier.id, 1, 200);
    edge.date = Some(today - Duration::days(30));
    svc.add_purchase(edge).await.unwrap();

    svc.add_purchase(purchase_of(&product, supplier.id, 1, 200)).await.unwrap();

    assert_eq!(svc.recent_purchases(30).await.len(), 2);
    assert_eq!(svc.recent_purchases(0).await.len(), 1);
}

#[tokio::test]
async fn deleting_a_product_leaves_its_purchases_intact() {
    let svc = service();
    let product = svc.add_product(new_product("Cinnamon", 10, 4)).await.unwrap();
    let supplier = svc.add_supplier(new_supplier("Ceylon Spice Traders")).await.unwrap();
    svc.add_purchase(purchase_of(&product, supplier.id, 5, 220)).await.unwrap();

    svc.delete_product(product.id).await.unwrap();
    svc.delete_supplier(supplier.id).await.unwrap();

    let purchases = svc.purchases().await;
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].product_name, "Cinnamon");
    assert_eq!(purchases[0].supplier_name, "Ceylon Spice Traders");
}

#[tokio::test]
async fn deletes_and_updates_report_missing_references() {
    let svc = service();
    let err = svc.delete_product(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::ReferenceNotFound { entity: "product", .. }));

    let err = svc.delete_supplier(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::ReferenceNotFound { entity: "supplier", .. }));
}

#[tokio::test]
async fn rejects_negative_numbers_at_the_door() {
    let svc = service();
    let mut bad = new_product("Bad", 10, 4);
    bad.unit_price = Decimal::from(-1);
    let err = svc.add_product(bad).await.unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    let product = svc.add_product(new_product("Cinnamon", 10, 4)).await.unwrap();
    let supplier = svc.add_supplier(new_supplier("Ceylon Spice Traders")).await.unwrap();
    let zero_quantity = purchase_of(&product, supplier.id, 0, 220);
    let err = svc.add_purchase(zero_quantity).await.unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn collections_survive_a_store_round_trip() {
    let dir = temp_dir();
    let store = Arc::new(LocalStore::open(&dir).expect("temp store"));

    let svc = InventoryService::new(store.clone());
    let product = svc.add_product(new_product("Cinnamon", 10, 4)).await.unwrap();
    let supplier = svc.add_supplier(new_supplier("Ceylon Spice Traders")).await.unwrap();
    svc.add_purchase(purchase_of(&product, supplier.id, 5, 220)).await.unwrap();
    let expected = Collections {
        products: svc.products().await,
        suppliers: svc.suppliers().await,
        purchases: svc.purchases().await,
    };

    let reopened = LocalStore::open(&dir).expect("reopen");
    let loaded = reopened.load().await.unwrap().expect("persisted collections");
    assert_eq!(loaded, expected);
}

#[tokio::test]
async fn empty_store_hydrates_sample_data() {
    let svc = service();
    svc.hydrate().await.unwrap();
    assert!(!svc.products().await.is_empty());
    assert!(!svc.suppliers().await.is_empty());
    assert!(svc.last_error().await.is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn low_stock_set_matches_the_predicate(
        levels in proptest::collection::vec((0i64..1000, 1i64..1000), 1..20)
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let svc = service();
            for (i, (stock, min)) in levels.iter().enumerate() {
                svc.add_product(new_product(&format!("p{i}"), *stock, *min))
                    .await
                    .unwrap();
            }
            let expected = levels.iter().filter(|(s, m)| s <= m).count();
            prop_assert_eq!(svc.low_stock_products().await.len(), expected);
            Ok(())
        })?;
    }

    #[test]
    fn total_price_is_quantity_times_unit_price(
        qty in 1i64..10_000,
        price_cents in 0i64..100_000
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let svc = service();
            let product = svc.add_product(new_product("Cinnamon", 10, 4)).await.unwrap();
            let supplier = svc.add_supplier(new_supplier("Ceylon Spice Traders")).await.unwrap();
            let recorded = svc
                .add_purchase(purchase_of(&product, supplier.id, qty, price_cents))
                .await
                .unwrap();
            prop_assert_eq!(
                recorded.total_price,
                Decimal::from(qty) * Decimal::new(price_cents, 2)
            );
            Ok(())
        })?;
    }
}
