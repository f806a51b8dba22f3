//! Deletion actions
//!
//! Deleting an order and removing its session are two actions. The manager
//! commits the order removal before it attempts the session removal.

use crate::orders::traits::{ActionContext, OrderAction, OrderResult};
use shared::order::{Order, OrderEvent, OrderEventKind, Session};

/// DeleteOrder action
#[derive(Debug, Clone)]
pub struct DeleteOrderAction {
    pub order_id: String,
}

impl OrderAction for DeleteOrderAction {
    /// The removed order
    type Output = Order;

    fn execute(&self, ctx: &mut ActionContext<'_>) -> OrderResult<Order> {
        let order = ctx.load_order(&self.order_id)?;

        ctx.remove_order(&order.id)?;
        if let Some(session_id) = &order.session_id {
            ctx.unbind_session_order(session_id)?;
        }

        let now = ctx.now();
        ctx.emit(OrderEvent::order_deleted(&order, now));
        tracing::info!(order_id = %order.id, "Order deleted");
        Ok(order)
    }
}

/// RemoveSession action
#[derive(Debug, Clone)]
pub struct RemoveSessionAction {
    pub session_id: String,
}

impl OrderAction for RemoveSessionAction {
    /// The removed session
    type Output = Session;

    fn execute(&self, ctx: &mut ActionContext<'_>) -> OrderResult<Session> {
        let session = ctx.load_session(&self.session_id)?;

        ctx.release_table(&session)?;
        ctx.remove_session(&session.id)?;

        let now = ctx.now();
        ctx.emit(OrderEvent::for_session(
            OrderEventKind::SessionReleased,
            &session,
            now,
        ));
        tracing::info!(session_id = %session.id, table_number = session.table_number, "Session removed");
        Ok(session)
    }
}
