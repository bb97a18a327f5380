//! Built-in sample data
//!
//! Seeds a first launch (or a failed load) with a small spice catalog so the
//! dashboard and reports have something to show.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::store::Collections;
use shared::models::{Product, Purchase, Supplier};
use shared::types::{PaymentMethod, Unit};

fn product(
    name: &str,
    category: &str,
    unit: Unit,
    unit_price: Decimal,
    current_stock: Decimal,
    min_stock_level: Decimal,
    lead_time: i32,
) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        name: name.to_string(),
        barcode: None,
        category: category.to_string(),
        unit,
        unit_price,
        current_stock,
        min_stock_level,
        lead_time,
        notes: None,
        added_date: now,
        last_updated: now,
    }
}

fn supplier(name: &str, contact: &str, phone: &str) -> Supplier {
    let now = Utc::now();
    Supplier {
        id: Uuid::new_v4(),
        name: name.to_string(),
        contact_person: Some(contact.to_string()),
        email: None,
        phone: phone.to_string(),
        address: None,
        notes: None,
        added_date: now,
        last_updated: now,
    }
}

/// Starter collections for a fresh installation
pub fn default_collections() -> Collections {
    let products = vec![
        product(
            "Cinnamon (Ceylon)",
            "Whole Spices",
            Unit::Kg,
            Decimal::new(1250, 2),
            Decimal::from(10),
            Decimal::from(4),
            7,
        ),
        product(
            "Turmeric Powder",
            "Ground Spices",
            Unit::Kg,
            Decimal::new(680, 2),
            Decimal::from(25),
            Decimal::from(8),
            5,
        ),
        product(
            "Black Peppercorns",
            "Whole Spices",
            Unit::Kg,
            Decimal::new(2200, 2),
            Decimal::from(6),
            Decimal::from(6),
            10,
        ),
        product(
            "Green Cardamom",
            "Whole Spices",
            Unit::G,
            Decimal::new(4, 2),
            Decimal::from(1500),
            Decimal::from(500),
            14,
        ),
        product(
            "Cumin Seeds",
            "Whole Spices",
            Unit::Kg,
            Decimal::new(540, 2),
            Decimal::new(15, 1),
            Decimal::from(5),
            5,
        ),
    ];

    let suppliers = vec![
        supplier("Ceylon Spice Traders", "Nimal Perera", "+94 11 234 5678"),
        supplier("Malabar Imports", "Asha Nair", "+91 484 223 4455"),
    ];

    let today = Utc::now().date_naive();
    let purchases = vec![Purchase {
        id: Uuid::new_v4(),
        date: today - Duration::days(3),
        product_id: products[1].id,
        product_name: products[1].name.clone(),
        quantity: Decimal::from(10),
        unit_price: Decimal::new(650, 2),
        total_price: Decimal::new(6500, 2),
        supplier_id: suppliers[1].id,
        supplier_name: suppliers[1].name.clone(),
        payment_method: PaymentMethod::Cash,
        notes: None,
        created_at: Utc::now(),
    }];

    Collections {
        products,
        suppliers,
        purchases,
    }
}
