//! SubmitItems action
//!
//! Creates the session's running order from a guest batch, or merges the
//! batch into it. Lines arrive already priced from the catalog; see
//! [`build_line`].

use crate::orders::consolidate::{consolidate, merge};
use crate::orders::money;
use crate::orders::traits::{ActionContext, OrderAction, OrderError, OrderResult};
use crate::orders::Upserted;
use crate::services::CatalogEntry;
use rust_decimal::Decimal;
use shared::order::{
    ItemStatus, LineItem, Order, OrderEvent, OrderEventKind, OrderStatus, OrderType,
    PaymentStatus, SpiceLevel,
};

/// Build a Pending line from catalog data
///
/// Name and price always come from the catalog entry. A missing spice level
/// falls back to the entry's default.
pub fn build_line(
    entry: &CatalogEntry,
    quantity: u32,
    spice_level: Option<SpiceLevel>,
) -> OrderResult<LineItem> {
    money::validate_quantity(quantity)?;
    let price = money::round_price(entry.price);
    money::validate_price(price)?;

    Ok(LineItem {
        line_id: shared::util::new_id(),
        item_id: entry.item_id.clone(),
        name: entry.name.clone(),
        price,
        quantity,
        spice_level: spice_level.unwrap_or(entry.spice_level),
        status: ItemStatus::Pending,
    })
}

/// Reject an empty batch and quantities pushed over the limit by merging
pub(super) fn validate_lines(items: &[LineItem]) -> OrderResult<()> {
    if items.is_empty() {
        return Err(OrderError::validation(
            "Order must contain at least one item",
        ));
    }
    for item in items {
        money::validate_quantity(item.quantity)?;
    }
    Ok(())
}

/// SubmitItems action
#[derive(Debug, Clone)]
pub struct SubmitItemsAction {
    pub session_id: String,
    pub restaurant_id: String,
    pub table_number: u32,
    pub customer_name: Option<String>,
    /// Catalog-priced lines of this batch
    pub items: Vec<LineItem>,
}

impl OrderAction for SubmitItemsAction {
    type Output = Upserted<Order>;

    fn execute(&self, ctx: &mut ActionContext<'_>) -> OrderResult<Self::Output> {
        validate_lines(&self.items)?;

        // 1. The session must be this table's open occupancy
        let session = ctx.load_session(&self.session_id)?;
        if !session.is_active() {
            return Err(OrderError::validation(format!(
                "Session {} is closed",
                session.id
            )));
        }
        if session.restaurant_id != self.restaurant_id || session.table_number != self.table_number
        {
            return Err(OrderError::validation(format!(
                "Session {} does not belong to table {} of restaurant {}",
                session.id, self.table_number, self.restaurant_id
            )));
        }

        let now = ctx.now();

        // 2. Merge into the running order
        if let Some(mut order) = ctx.session_order(&session.id)? {
            let items = merge(std::mem::take(&mut order.items), self.items.clone());
            validate_lines(&items)?;
            order.items = items;
            if let Some(name) = &self.customer_name {
                order.customer_name = Some(name.clone());
            }
            money::recalculate_totals(&mut order);
            order.updated_at = now;

            ctx.save_order(&order)?;
            ctx.emit(OrderEvent::for_order(
                OrderEventKind::ItemsMerged,
                &order,
                now,
            ));
            tracing::debug!(order_id = %order.id, lines = order.items.len(), "Items merged");
            return Ok(Upserted::Existing(order));
        }

        // 3. First batch of the session
        let mut order = Order {
            id: shared::util::new_id(),
            table_number: Some(session.table_number),
            session_id: Some(session.id.clone()),
            restaurant_id: session.restaurant_id.clone(),
            customer_name: self.customer_name.clone(),
            items: consolidate(self.items.clone()),
            total_amount: Decimal::ZERO,
            order_type: OrderType::DineIn,
            status: OrderStatus::Active,
            payment_status: PaymentStatus::Unpaid,
            created_at: now,
            updated_at: now,
        };
        validate_lines(&order.items)?;
        money::recalculate_totals(&mut order);

        ctx.save_order(&order)?;
        ctx.bind_session_order(&session.id, &order.id)?;
        ctx.emit(OrderEvent::for_order(
            OrderEventKind::OrderCreated,
            &order,
            now,
        ));
        tracing::info!(
            order_id = %order.id,
            session_id = %session.id,
            table_number = session.table_number,
            "Order created"
        );
        Ok(Upserted::Created(order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::actions::testing::{line, open_session, run, storage};
    use crate::orders::actions::CloseOrderAction;

    fn submit(session: &shared::order::Session, items: Vec<LineItem>) -> SubmitItemsAction {
        SubmitItemsAction {
            session_id: session.id.clone(),
            restaurant_id: session.restaurant_id.clone(),
            table_number: session.table_number,
            customer_name: None,
            items,
        }
    }

    #[test]
    fn test_build_line_uses_catalog() {
        let entry = CatalogEntry {
            restaurant_id: "resto-1".to_string(),
            item_id: "A".to_string(),
            name: "Butter Chicken".to_string(),
            price: Decimal::new(12345, 3),
            spice_level: SpiceLevel::Spicy,
        };

        let line = build_line(&entry, 2, None).unwrap();
        assert_eq!(line.price, Decimal::new(1235, 2));
        assert_eq!(line.spice_level, SpiceLevel::Spicy);
        assert_eq!(line.status, ItemStatus::Pending);

        let line = build_line(&entry, 1, Some(SpiceLevel::Mild)).unwrap();
        assert_eq!(line.spice_level, SpiceLevel::Mild);

        assert!(build_line(&entry, 0, None).is_err());
    }

    #[test]
    fn test_first_batch_creates_order() {
        let storage = storage();
        let session = open_session(&storage, "resto-1", 5);

        let (result, events) = run(
            &storage,
            &submit(
                &session,
                vec![
                    line("A", SpiceLevel::Medium, 100, 1),
                    line("A", SpiceLevel::Medium, 100, 1),
                ],
            ),
        )
        .unwrap();

        assert!(result.is_created());
        let order = result.into_inner();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.total_amount, Decimal::from(200));
        assert_eq!(order.order_type, OrderType::DineIn);
        assert_eq!(events[0].kind, OrderEventKind::OrderCreated);
    }

    #[test]
    fn test_second_batch_merges_and_keeps_progress() {
        let storage = storage();
        let session = open_session(&storage, "resto-1", 5);

        let mut cooking = line("A", SpiceLevel::Medium, 100, 2);
        cooking.status = ItemStatus::InProgress;
        let (first, _) = run(&storage, &submit(&session, vec![cooking])).unwrap();

        let (second, events) = run(
            &storage,
            &submit(
                &session,
                vec![
                    line("A", SpiceLevel::Medium, 100, 1),
                    line("B", SpiceLevel::Mild, 50, 1),
                ],
            ),
        )
        .unwrap();

        assert!(!second.is_created());
        let order = second.into_inner();
        assert_eq!(order.id, first.into_inner().id);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].quantity, 3);
        assert_eq!(order.items[0].status, ItemStatus::InProgress);
        assert_eq!(order.items[1].status, ItemStatus::Pending);
        assert_eq!(order.total_amount, Decimal::from(350));
        assert_eq!(events[0].kind, OrderEventKind::ItemsMerged);
    }

    #[test]
    fn test_rejects_empty_batch() {
        let storage = storage();
        let session = open_session(&storage, "resto-1", 5);

        let result = run(&storage, &submit(&session, vec![]));
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[test]
    fn test_rejects_unknown_or_mismatched_session() {
        let storage = storage();
        let session = open_session(&storage, "resto-1", 5);

        let mut missing = submit(&session, vec![line("A", SpiceLevel::Medium, 1, 1)]);
        missing.session_id = "nope".to_string();
        assert!(matches!(
            run(&storage, &missing),
            Err(OrderError::SessionNotFound(_))
        ));

        let mut wrong_table = submit(&session, vec![line("A", SpiceLevel::Medium, 1, 1)]);
        wrong_table.table_number = 6;
        assert!(matches!(
            run(&storage, &wrong_table),
            Err(OrderError::Validation(_))
        ));
    }

    #[test]
    fn test_closed_session_rejects_items() {
        let storage = storage();
        let session = open_session(&storage, "resto-1", 5);
        let (order, _) = run(
            &storage,
            &submit(&session, vec![line("A", SpiceLevel::Medium, 1, 1)]),
        )
        .unwrap();
        run(
            &storage,
            &CloseOrderAction {
                order_id: order.into_inner().id,
            },
        )
        .unwrap();

        let result = run(
            &storage,
            &submit(&session, vec![line("B", SpiceLevel::Medium, 1, 1)]),
        );
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[test]
    fn test_merge_over_quantity_limit_is_rejected() {
        let storage = storage();
        let session = open_session(&storage, "resto-1", 5);
        run(
            &storage,
            &submit(
                &session,
                vec![line("A", SpiceLevel::Medium, 1, money::MAX_QUANTITY)],
            ),
        )
        .unwrap();

        let result = run(
            &storage,
            &submit(&session, vec![line("A", SpiceLevel::Medium, 1, 1)]),
        );
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }
}
