use super::*;
use crate::services::{CatalogEntry, CatalogError, InMemoryCatalog};
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::order::{
    EditItemInput, ItemStatus, OrderEventKind, OrderType, PaymentStatus, SessionStatus,
    SpiceLevel,
};
use shared::request::SubmittedItem;

const RESTO: &str = "resto-1";

fn catalog_entry(item_id: &str, name: &str, price: Decimal, spice_level: SpiceLevel) -> CatalogEntry {
    CatalogEntry {
        restaurant_id: RESTO.to_string(),
        item_id: item_id.to_string(),
        name: name.to_string(),
        price,
        spice_level,
    }
}

/// A = 100, B = 50, C = 12.50 (default Spicy)
fn test_catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_entries(vec![
        catalog_entry("A", "Paneer Tikka", Decimal::from(100), SpiceLevel::Medium),
        catalog_entry("B", "Garlic Naan", Decimal::from(50), SpiceLevel::Mild),
        catalog_entry("C", "Chilli Chicken", Decimal::new(1250, 2), SpiceLevel::Spicy),
    ])
}

fn create_test_manager() -> OrdersManager {
    create_test_manager_with(Arc::new(test_catalog()))
}

fn create_test_manager_with(catalog: Arc<dyn CatalogLookup>) -> OrdersManager {
    let storage = OrderStorage::open_in_memory().unwrap();
    OrdersManager::with_storage(storage, catalog, DEFAULT_EVENT_CHANNEL_CAPACITY)
}

/// Catalog whose backend is down
struct UnavailableCatalog;

#[async_trait]
impl CatalogLookup for UnavailableCatalog {
    async fn lookup(
        &self,
        _restaurant_id: &str,
        _item_id: &str,
    ) -> Result<Option<crate::services::CatalogEntry>, CatalogError> {
        Err(CatalogError::Unavailable("connection refused".to_string()))
    }
}

// ========================================================================
// Helpers
// ========================================================================

fn open_table(manager: &OrdersManager, table_number: u32) -> Session {
    manager
        .get_or_create_session(table_number, RESTO)
        .unwrap()
        .into_inner()
}

fn item(item_id: &str, quantity: u32, spice_level: SpiceLevel) -> SubmittedItem {
    SubmittedItem::new(item_id, quantity, spice_level)
}

fn submit_req(session: &Session, items: Vec<SubmittedItem>) -> SubmitItemsRequest {
    SubmitItemsRequest {
        table_number: session.table_number,
        restaurant_id: session.restaurant_id.clone(),
        session_id: session.id.clone(),
        items,
        customer_name: None,
    }
}

async fn submit(
    manager: &OrdersManager,
    session: &Session,
    items: Vec<SubmittedItem>,
) -> Upserted<Order> {
    manager.submit_items(submit_req(session, items)).await.unwrap()
}

fn edit_input(item_id: &str, price: i64, quantity: u32) -> EditItemInput {
    EditItemInput {
        line_id: None,
        item_id: Some(item_id.to_string()),
        name: Some(format!("Item {}", item_id)),
        price: Some(Decimal::from(price)),
        quantity: Some(quantity),
        spice_level: None,
    }
}

fn assert_total_invariant(order: &Order) {
    assert_eq!(
        order.total_amount,
        money::items_total(&order.items),
        "totalAmount must equal Σ price × quantity"
    );
}
