//! Kitchen status actions
//!
//! - [`SetItemStatusAction`]: move one line, rejecting regressions
//! - [`AdvanceItemsAction`]: move every line that may legally move, skip the rest

use crate::orders::status::{self, Transition};
use crate::orders::traits::{ActionContext, OrderAction, OrderError, OrderResult};
use shared::order::{ItemStatus, LineItem, Order, OrderEvent, OrderEventKind};

/// SetItemStatus action
#[derive(Debug, Clone)]
pub struct SetItemStatusAction {
    pub order_id: String,
    pub line_id: String,
    pub status: ItemStatus,
}

impl OrderAction for SetItemStatusAction {
    type Output = LineItem;

    fn execute(&self, ctx: &mut ActionContext<'_>) -> OrderResult<LineItem> {
        let mut order = ctx.load_order(&self.order_id)?;
        let now = ctx.now();

        let line = order
            .find_line_mut(&self.line_id)
            .ok_or_else(|| OrderError::ItemNotFound(self.line_id.clone()))?;

        match status::check(line.status, self.status) {
            Transition::Unchanged => return Ok(line.clone()),
            Transition::Rejected { allowed } => {
                return Err(OrderError::Validation(status::rejection_message(
                    line.status,
                    self.status,
                    allowed,
                )));
            }
            Transition::Advance => {}
        }

        tracing::debug!(
            order_id = %self.order_id,
            line_id = %self.line_id,
            from = %line.status,
            to = %self.status,
            "Item status changed"
        );
        line.status = self.status;
        let updated = line.clone();
        order.updated_at = now;

        ctx.save_order(&order)?;
        ctx.emit(OrderEvent::for_order(
            OrderEventKind::ItemStatusChanged,
            &order,
            now,
        ));
        Ok(updated)
    }
}

/// AdvanceItems action
#[derive(Debug, Clone)]
pub struct AdvanceItemsAction {
    pub order_id: String,
    pub status: ItemStatus,
}

impl OrderAction for AdvanceItemsAction {
    /// The order and the number of lines that moved
    type Output = (Order, usize);

    fn execute(&self, ctx: &mut ActionContext<'_>) -> OrderResult<Self::Output> {
        let mut order = ctx.load_order(&self.order_id)?;
        let now = ctx.now();

        let mut updated = 0;
        for line in order.items.iter_mut() {
            if status::check(line.status, self.status) == Transition::Advance {
                line.status = self.status;
                updated += 1;
            }
        }

        if updated > 0 {
            order.updated_at = now;
            ctx.save_order(&order)?;
            ctx.emit(OrderEvent::for_order(
                OrderEventKind::ItemStatusChanged,
                &order,
                now,
            ));
        }

        Ok((order, updated))
    }
}
