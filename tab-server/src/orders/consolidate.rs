//! Line consolidation by [`ItemKey`]
//!
//! Within an order each (itemId, spiceLevel) pair is one line. When two lines
//! share a key they fold into one at the earlier line's position: quantities
//! add and the status is the further along of the two, so folding never moves
//! units backwards in the kitchen. Which line lends its id, name and price is
//! decided by the caller's [`Survivor`] policy.

use super::status;
use shared::order::{ItemKey, LineItem};
use std::collections::HashMap;

/// Which line keeps its identity when two lines share a key
pub trait Survivor {
    /// `true` when `incoming` should replace `kept` as the surviving line
    fn prefers(&self, kept: &LineItem, incoming: &LineItem) -> bool;
}

/// The earlier line survives (guest merges, new orders)
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepFirst;

impl Survivor for KeepFirst {
    fn prefers(&self, _kept: &LineItem, _incoming: &LineItem) -> bool {
        false
    }
}

/// The line further along in the kitchen survives; ties keep the earlier one
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepMostAdvanced;

impl Survivor for KeepMostAdvanced {
    fn prefers(&self, kept: &LineItem, incoming: &LineItem) -> bool {
        matches!(
            status::check(kept.status, incoming.status),
            status::Transition::Advance
        )
    }
}

/// One named line always survives
#[derive(Debug, Clone, Copy)]
pub struct KeepLine<'a>(pub &'a str);

impl Survivor for KeepLine<'_> {
    fn prefers(&self, _kept: &LineItem, incoming: &LineItem) -> bool {
        incoming.line_id == self.0
    }
}

/// Merge lines sharing a key, preserving first-seen order
pub fn consolidate(items: impl IntoIterator<Item = LineItem>) -> Vec<LineItem> {
    consolidate_with(items, &KeepFirst)
}

/// [`consolidate`] with an explicit survivor policy
pub fn consolidate_with(
    items: impl IntoIterator<Item = LineItem>,
    survivor: &dyn Survivor,
) -> Vec<LineItem> {
    let mut merged: Vec<LineItem> = Vec::new();
    let mut index: HashMap<ItemKey, usize> = HashMap::new();

    for item in items {
        match index.get(&item.key()) {
            Some(&pos) => {
                let kept = &mut merged[pos];
                let quantity = kept.quantity.saturating_add(item.quantity);
                let status = status::most_advanced(kept.status, item.status);
                if survivor.prefers(kept, &item) {
                    *kept = item;
                }
                kept.quantity = quantity;
                kept.status = status;
            }
            None => {
                index.insert(item.key(), merged.len());
                merged.push(item);
            }
        }
    }

    merged
}

/// Append `incoming` after `existing` and consolidate
///
/// Lines already on the order keep their id; incoming lines that match
/// nothing are appended as given.
pub fn merge(existing: Vec<LineItem>, incoming: Vec<LineItem>) -> Vec<LineItem> {
    consolidate(existing.into_iter().chain(incoming))
}
