//! Closure and payment actions
//!
//! Closing an order closes its session and frees the table. Order and session
//! are written in the same transaction.

use crate::orders::traits::{ActionContext, OrderAction, OrderError, OrderResult};
use shared::order::{
    Order, OrderEvent, OrderEventKind, OrderStatus, OrderType, PaymentStatus, SessionStatus,
};

/// Close the session behind an order and release its table
fn close_session(ctx: &mut ActionContext<'_>, session_id: &str) -> OrderResult<()> {
    let mut session = match ctx.load_session(session_id) {
        Ok(session) => session,
        Err(OrderError::SessionNotFound(_)) => {
            tracing::warn!(session_id = %session_id, "Session of closed order is gone");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    ctx.release_table(&session)?;
    if session.is_active() {
        session.status = SessionStatus::Closed;
        session.updated_at = ctx.now();
        ctx.save_session(&session)?;
        let now = ctx.now();
        ctx.emit(OrderEvent::for_session(
            OrderEventKind::SessionReleased,
            &session,
            now,
        ));
    }
    Ok(())
}

/// CloseOrder action (kitchen done, bill not necessarily settled)
#[derive(Debug, Clone)]
pub struct CloseOrderAction {
    pub order_id: String,
}

impl OrderAction for CloseOrderAction {
    type Output = Order;

    fn execute(&self, ctx: &mut ActionContext<'_>) -> OrderResult<Order> {
        let mut order = ctx.load_order(&self.order_id)?;
        if !order.is_active() {
            return Ok(order);
        }

        let now = ctx.now();
        order.status = OrderStatus::Closed;
        order.updated_at = now;
        ctx.save_order(&order)?;
        ctx.emit(OrderEvent::for_order(OrderEventKind::OrderClosed, &order, now));

        if let Some(session_id) = order.session_id.clone() {
            close_session(ctx, &session_id)?;
        }

        tracing::info!(order_id = %order.id, payment_status = ?order.payment_status, "Order closed");
        Ok(order)
    }
}

/// PayOrder action
#[derive(Debug, Clone)]
pub struct PayOrderAction {
    pub order_id: String,
}

impl OrderAction for PayOrderAction {
    type Output = Order;

    fn execute(&self, ctx: &mut ActionContext<'_>) -> OrderResult<Order> {
        let mut order = ctx.load_order(&self.order_id)?;
        if order.is_paid() {
            return Err(OrderError::Conflict(format!(
                "Order {} is already paid",
                order.id
            )));
        }

        let now = ctx.now();
        order.payment_status = PaymentStatus::Paid;
        order.status = OrderStatus::Closed;
        order.updated_at = now;
        ctx.save_order(&order)?;
        ctx.emit(OrderEvent::for_order(OrderEventKind::OrderPaid, &order, now));

        if order.order_type == OrderType::DineIn
            && let Some(session_id) = order.session_id.clone()
        {
            close_session(ctx, &session_id)?;
        }

        tracing::info!(order_id = %order.id, total = %order.total_amount, "Order paid");
        Ok(order)
    }
}
