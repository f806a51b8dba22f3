//! OpenSession action
//!
//! Returns the table's Active session, or opens one. At most one Active
//! session exists per (restaurant, table): the index row is checked and
//! written in the same transaction.

use crate::orders::Upserted;
use crate::orders::traits::{ActionContext, OrderAction, OrderError, OrderResult};
use shared::order::{OrderEvent, OrderEventKind, Session, SessionStatus};

/// Path segments the `/api/order/...` routes claim where a restaurant id
/// would otherwise sit (`GET /api/order/{restaurantId}/{tableNumber}`)
pub const RESERVED_RESTAURANT_IDS: &[&str] = &["id", "complete", "pay", "parcel"];

/// OpenSession action
#[derive(Debug, Clone)]
pub struct OpenSessionAction {
    pub restaurant_id: String,
    pub table_number: u32,
}

impl OrderAction for OpenSessionAction {
    type Output = Upserted<Session>;

    fn execute(&self, ctx: &mut ActionContext<'_>) -> OrderResult<Self::Output> {
        if self.restaurant_id.trim().is_empty() {
            return Err(OrderError::validation("restaurantId must not be empty"));
        }
        if RESERVED_RESTAURANT_IDS.contains(&self.restaurant_id.as_str()) {
            return Err(OrderError::validation(format!(
                "restaurantId '{}' is reserved",
                self.restaurant_id
            )));
        }
        if self.table_number == 0 {
            return Err(OrderError::validation("tableNumber must be at least 1"));
        }

        if let Some(session) = ctx.active_session(&self.restaurant_id, self.table_number)? {
            return Ok(Upserted::Existing(session));
        }

        let now = ctx.now();
        let session = Session {
            id: shared::util::new_id(),
            table_number: self.table_number,
            restaurant_id: self.restaurant_id.clone(),
            status: SessionStatus::Active,
            created_at: now,
            updated_at: now,
        };
        ctx.save_session(&session)?;
        ctx.occupy_table(&session)?;
        ctx.emit(OrderEvent::for_session(
            OrderEventKind::SessionOpened,
            &session,
            now,
        ));

        tracing::info!(
            session_id = %session.id,
            restaurant_id = %session.restaurant_id,
            table_number = session.table_number,
            "Session opened"
        );
        Ok(Upserted::Created(session))
    }
}
