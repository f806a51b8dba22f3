//! CreateParcelOrder action
//!
//! A takeaway order entered by an operator: no table, no session.

use super::submit_items::validate_lines;
use crate::orders::consolidate::consolidate;
use crate::orders::money;
use crate::orders::traits::{ActionContext, OrderAction, OrderError, OrderResult};
use rust_decimal::Decimal;
use shared::order::{
    LineItem, Order, OrderEvent, OrderEventKind, OrderStatus, OrderType, PaymentStatus,
};

/// CreateParcelOrder action
#[derive(Debug, Clone)]
pub struct CreateParcelOrderAction {
    pub restaurant_id: String,
    pub customer_name: Option<String>,
    /// Catalog-priced lines
    pub items: Vec<LineItem>,
}

impl OrderAction for CreateParcelOrderAction {
    type Output = Order;

    fn execute(&self, ctx: &mut ActionContext<'_>) -> OrderResult<Order> {
        if self.restaurant_id.trim().is_empty() {
            return Err(OrderError::validation("restaurantId must not be empty"));
        }
        validate_lines(&self.items)?;

        let now = ctx.now();
        let mut order = Order {
            id: shared::util::new_id(),
            table_number: None,
            session_id: None,
            restaurant_id: self.restaurant_id.clone(),
            customer_name: self.customer_name.clone(),
            items: consolidate(self.items.clone()),
            total_amount: Decimal::ZERO,
            order_type: OrderType::Parcel,
            status: OrderStatus::Active,
            payment_status: PaymentStatus::Unpaid,
            created_at: now,
            updated_at: now,
        };
        validate_lines(&order.items)?;
        money::recalculate_totals(&mut order);

        ctx.save_order(&order)?;
        ctx.emit(OrderEvent::for_order(
            OrderEventKind::OrderCreated,
            &order,
            now,
        ));
        tracing::info!(order_id = %order.id, restaurant_id = %order.restaurant_id, "Parcel order created");
        Ok(order)
    }
}
