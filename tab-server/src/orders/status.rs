//! Kitchen status machine for line items
//!
//! Forward only: Pending → {In Progress, Completed}, In Progress → {Completed}.
//! Completed is terminal.

use shared::order::ItemStatus;

/// Allowed next states per status
pub const TRANSITIONS: &[(ItemStatus, &[ItemStatus])] = &[
    (
        ItemStatus::Pending,
        &[ItemStatus::InProgress, ItemStatus::Completed],
    ),
    (ItemStatus::InProgress, &[ItemStatus::Completed]),
    (ItemStatus::Completed, &[]),
];

/// Outcome of a requested status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Requested state equals the current one; nothing to write
    Unchanged,
    /// Legal forward move
    Advance,
    /// Regression or skip the table does not allow
    Rejected { allowed: &'static [ItemStatus] },
}

pub fn allowed_next(from: ItemStatus) -> &'static [ItemStatus] {
    TRANSITIONS
        .iter()
        .find(|(status, _)| *status == from)
        .map(|(_, next)| *next)
        .unwrap_or(&[])
}

pub fn check(from: ItemStatus, to: ItemStatus) -> Transition {
    if from == to {
        return Transition::Unchanged;
    }
    let allowed = allowed_next(from);
    if allowed.contains(&to) {
        Transition::Advance
    } else {
        Transition::Rejected { allowed }
    }
}

/// The further along of two statuses
///
/// Used when two lines are folded into one: the result never sits behind
/// either input.
pub fn most_advanced(a: ItemStatus, b: ItemStatus) -> ItemStatus {
    match check(a, b) {
        Transition::Advance => b,
        Transition::Unchanged | Transition::Rejected { .. } => a,
    }
}

/// "Completed", "In Progress, Completed" or "none"
pub fn describe(allowed: &[ItemStatus]) -> String {
    if allowed.is_empty() {
        return "none".to_string();
    }
    allowed
        .iter()
        .map(ItemStatus::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validation message for a rejected transition
pub fn rejection_message(from: ItemStatus, to: ItemStatus, allowed: &[ItemStatus]) -> String {
    format!(
        "Cannot change item status from {} to {}; allowed next states: {}",
        from,
        to,
        describe(allowed)
    )
}
