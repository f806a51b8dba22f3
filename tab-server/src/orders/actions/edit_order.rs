//! EditOrder action - operator edits of the item list
//!
//! | Action | Effect |
//! |--------|--------|
//! | bulkEdit | Replace the list; matched lines keep status and line id |
//! | addItem | Add one Pending line (merges into an existing key) |
//! | editItem | Replace one line's name/price/quantity/spice, keep status |
//! | removeItem | Delete one line |
//!
//! A line is matched by `lineId` when one is given, otherwise by `itemId`.
//! After every edit the list is consolidated by key and the total recomputed.
//! A fold keeps the most advanced status of the lines it joins; editItem keeps
//! the edited line's id, bulkEdit keeps the id of the line furthest along.

use crate::orders::consolidate::{consolidate_with, merge, KeepLine, KeepMostAdvanced};
use crate::orders::money;
use crate::orders::traits::{ActionContext, OrderAction, OrderError, OrderResult};
use rust_decimal::Decimal;
use shared::order::{
    EditAction, EditActionKind, EditItemInput, ItemStatus, LineItem, LineSelector, Order,
    OrderEvent, OrderEventKind, SpiceLevel,
};

/// Edit payload with every required field present
#[derive(Debug, Clone)]
struct ItemFields {
    line_id: Option<String>,
    item_id: String,
    name: String,
    price: Decimal,
    quantity: u32,
    spice_level: Option<SpiceLevel>,
}

impl ItemFields {
    fn require(input: &EditItemInput, action: EditActionKind) -> OrderResult<Self> {
        let missing =
            |field: &str| OrderError::validation(format!("Action {} requires field '{}'", action, field));

        let item_id = input.item_id.clone().ok_or_else(|| missing("itemId"))?;
        let name = input.name.clone().ok_or_else(|| missing("name"))?;
        let price = money::round_price(input.price.ok_or_else(|| missing("price"))?);
        let quantity = input.quantity.ok_or_else(|| missing("quantity"))?;

        money::validate_price(price)?;
        money::validate_quantity(quantity)?;

        Ok(Self {
            line_id: input.line_id.clone(),
            item_id,
            name,
            price,
            quantity,
            spice_level: input.spice_level,
        })
    }
}

/// Index of the line a selector points at
///
/// `lineId` wins when given. Otherwise the itemId must identify exactly one
/// line: an item present at several spice levels needs a lineId.
fn locate(items: &[LineItem], item_id: &str, line_id: Option<&str>) -> OrderResult<usize> {
    if let Some(line_id) = line_id {
        return items
            .iter()
            .position(|i| i.line_id == line_id)
            .ok_or_else(|| OrderError::ItemNotFound(line_id.to_string()));
    }

    let mut matches = items
        .iter()
        .enumerate()
        .filter(|(_, i)| i.item_id == item_id)
        .map(|(pos, _)| pos);
    match (matches.next(), matches.next()) {
        (Some(pos), None) => Ok(pos),
        (None, _) => Err(OrderError::ItemNotFound(item_id.to_string())),
        (Some(_), Some(_)) => Err(OrderError::validation(format!(
            "Item {} appears at several spice levels; specify lineId",
            item_id
        ))),
    }
}

/// EditOrder action
#[derive(Debug, Clone)]
pub struct EditOrderAction {
    pub order_id: String,
    pub action: EditAction,
}

impl OrderAction for EditOrderAction {
    type Output = Order;

    fn execute(&self, ctx: &mut ActionContext<'_>) -> OrderResult<Order> {
        let mut order = ctx.load_order(&self.order_id)?;
        let now = ctx.now();

        let items = std::mem::take(&mut order.items);
        order.items = match &self.action {
            EditAction::BulkEdit {
                items: incoming,
                customer_name,
            } => {
                if let Some(name) = customer_name {
                    order.customer_name = Some(name.clone());
                }
                bulk_edit(items, incoming)?
            }
            EditAction::AddItem(input) => add_item(items, input)?,
            EditAction::EditItem(input) => edit_item(items, input)?,
            EditAction::RemoveItem(selector) => remove_item(items, selector)?,
        };
        money::recalculate_totals(&mut order);
        order.updated_at = now;

        ctx.save_order(&order)?;
        ctx.emit(OrderEvent::for_order(
            OrderEventKind::OrderEdited,
            &order,
            now,
        ));
        tracing::info!(
            order_id = %order.id,
            action = %self.action.kind(),
            lines = order.items.len(),
            total = %order.total_amount,
            "Order edited"
        );
        Ok(order)
    }
}

/// Replace the whole list
///
/// Each incoming line claims at most one existing line: by lineId, then by
/// exact key, then by itemId. A claimed line lends its status and line id;
/// unclaimed incoming lines start Pending. Existing lines nobody claimed are
/// dropped.
fn bulk_edit(existing: Vec<LineItem>, incoming: &[EditItemInput]) -> OrderResult<Vec<LineItem>> {
    let fields = incoming
        .iter()
        .map(|input| ItemFields::require(input, EditActionKind::BulkEdit))
        .collect::<OrderResult<Vec<_>>>()?;

    let mut claimed = vec![false; existing.len()];
    let mut claim = |pred: &dyn Fn(&LineItem) -> bool| -> Option<usize> {
        let pos = existing
            .iter()
            .enumerate()
            .position(|(pos, line)| !claimed[pos] && pred(line))?;
        claimed[pos] = true;
        Some(pos)
    };

    let mut lines = Vec::with_capacity(fields.len());
    for f in fields {
        let matched = f
            .line_id
            .as_deref()
            .and_then(|line_id| claim(&|l: &LineItem| l.line_id == line_id))
            .or_else(|| {
                f.spice_level.and_then(|spice| {
                    claim(&|l: &LineItem| l.item_id == f.item_id && l.spice_level == spice)
                })
            })
            .or_else(|| claim(&|l: &LineItem| l.item_id == f.item_id))
            .map(|pos| &existing[pos]);

        let (line_id, status, spice_level) = match matched {
            Some(line) => (
                line.line_id.clone(),
                line.status,
                f.spice_level.unwrap_or(line.spice_level),
            ),
            None => (
                shared::util::new_id(),
                ItemStatus::Pending,
                f.spice_level.unwrap_or_default(),
            ),
        };

        lines.push(LineItem {
            line_id,
            item_id: f.item_id,
            name: f.name,
            price: f.price,
            quantity: f.quantity,
            spice_level,
            status,
        });
    }

    validated(consolidate_with(lines, &KeepMostAdvanced))
}

fn add_item(existing: Vec<LineItem>, input: &EditItemInput) -> OrderResult<Vec<LineItem>> {
    let f = ItemFields::require(input, EditActionKind::AddItem)?;
    let line = LineItem {
        line_id: shared::util::new_id(),
        item_id: f.item_id,
        name: f.name,
        price: f.price,
        quantity: f.quantity,
        spice_level: f.spice_level.unwrap_or_default(),
        status: ItemStatus::Pending,
    };
    validated(merge(existing, vec![line]))
}

fn edit_item(mut existing: Vec<LineItem>, input: &EditItemInput) -> OrderResult<Vec<LineItem>> {
    let f = ItemFields::require(input, EditActionKind::EditItem)?;
    let pos = locate(&existing, &f.item_id, f.line_id.as_deref())?;

    let line = &mut existing[pos];
    let line_id = line.line_id.clone();
    line.item_id = f.item_id;
    line.name = f.name;
    line.price = f.price;
    line.quantity = f.quantity;
    if let Some(spice) = f.spice_level {
        line.spice_level = spice;
    }

    validated(consolidate_with(existing, &KeepLine(&line_id)))
}

fn remove_item(mut existing: Vec<LineItem>, selector: &LineSelector) -> OrderResult<Vec<LineItem>> {
    let pos = locate(&existing, &selector.item_id, selector.line_id.as_deref())?;
    existing.remove(pos);
    Ok(existing)
}

fn validated(items: Vec<LineItem>) -> OrderResult<Vec<LineItem>> {
    for item in &items {
        money::validate_quantity(item.quantity)?;
    }
    Ok(items)
}
