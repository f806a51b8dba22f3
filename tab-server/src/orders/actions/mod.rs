//! Order and session action implementations
//!
//! Each action implements [`OrderAction`](super::traits::OrderAction) and
//! handles one operation inside one write transaction.

mod close_order;
mod create_parcel;
mod delete_order;
mod edit_order;
mod item_status;
mod open_session;
pub mod submit_items;

pub use close_order::{CloseOrderAction, PayOrderAction};
pub use create_parcel::CreateParcelOrderAction;
pub use delete_order::{DeleteOrderAction, RemoveSessionAction};
pub use edit_order::EditOrderAction;
pub use item_status::{AdvanceItemsAction, SetItemStatusAction};
pub use open_session::{OpenSessionAction, RESERVED_RESTAURANT_IDS};
pub use submit_items::SubmitItemsAction;

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::orders::storage::OrderStorage;
    use crate::orders::traits::{ActionContext, OrderAction, OrderResult};
    use rust_decimal::Decimal;
    use shared::order::{ItemStatus, LineItem, Order, OrderEvent, Session, SpiceLevel};

    pub fn storage() -> OrderStorage {
        OrderStorage::open_in_memory().unwrap()
    }

    /// Execute and commit one action, returning its output and events
    pub fn run<A: OrderAction>(
        storage: &OrderStorage,
        action: &A,
    ) -> OrderResult<(A::Output, Vec<OrderEvent>)> {
        let txn = storage.begin_write().unwrap();
        let mut ctx = ActionContext::new(&txn, storage, shared::util::now_millis());
        let output = action.execute(&mut ctx)?;
        let events = ctx.into_events();
        txn.commit().unwrap();
        Ok((output, events))
    }

    pub fn line(item_id: &str, spice_level: SpiceLevel, price: i64, quantity: u32) -> LineItem {
        LineItem {
            line_id: shared::util::new_id(),
            item_id: item_id.to_string(),
            name: format!("Item {}", item_id),
            price: Decimal::from(price),
            quantity,
            spice_level,
            status: ItemStatus::Pending,
        }
    }

    pub fn open_session(storage: &OrderStorage, restaurant_id: &str, table_number: u32) -> Session {
        run(
            storage,
            &OpenSessionAction {
                restaurant_id: restaurant_id.to_string(),
                table_number,
            },
        )
        .unwrap()
        .0
        .into_inner()
    }

    /// Dine-in order on table 5 of resto-1
    pub fn seed_order(storage: &OrderStorage, items: Vec<LineItem>) -> Order {
        let session = open_session(storage, "resto-1", 5);
        run(
            storage,
            &SubmitItemsAction {
                session_id: session.id,
                restaurant_id: session.restaurant_id,
                table_number: session.table_number,
                customer_name: None,
                items,
            },
        )
        .unwrap()
        .0
        .into_inner()
    }
}
