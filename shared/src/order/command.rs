//! Operator edit commands
//!
//! On the wire an edit is `{ "action": "<name>", ... }`. Inside the server it
//! is an [`EditAction`], so an edit with an unknown action cannot exist past
//! the HTTP boundary.

use super::types::{SpiceLevel, UnknownVariant};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Item payload of an operator edit
///
/// Every field is optional on the wire so that a missing one is reported as a
/// validation failure naming the field, instead of a generic decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditItemInput {
    /// Pins the edit to one existing line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub spice_level: Option<SpiceLevel>,
}

/// Identifies the line a `removeItem` edit targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSelector {
    pub item_id: String,
    pub line_id: Option<String>,
}

/// Structural edit applied by an operator
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    /// Replace the whole item list
    BulkEdit {
        items: Vec<EditItemInput>,
        customer_name: Option<String>,
    },
    /// Append one item (always starts Pending)
    AddItem(EditItemInput),
    /// Replace one item's name/price/quantity/spice level, keeping its status
    EditItem(EditItemInput),
    /// Delete one item
    RemoveItem(LineSelector),
}

impl EditAction {
    pub fn kind(&self) -> EditActionKind {
        match self {
            EditAction::BulkEdit { .. } => EditActionKind::BulkEdit,
            EditAction::AddItem(_) => EditActionKind::AddItem,
            EditAction::EditItem(_) => EditActionKind::EditItem,
            EditAction::RemoveItem(_) => EditActionKind::RemoveItem,
        }
    }
}

/// Action names accepted on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditActionKind {
    BulkEdit,
    AddItem,
    EditItem,
    RemoveItem,
}

impl EditActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditActionKind::BulkEdit => "bulkEdit",
            EditActionKind::AddItem => "addItem",
            EditActionKind::EditItem => "editItem",
            EditActionKind::RemoveItem => "removeItem",
        }
    }
}

impl std::fmt::Display for EditActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditActionKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            EditActionKind::BulkEdit,
            EditActionKind::AddItem,
            EditActionKind::EditItem,
            EditActionKind::RemoveItem,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == s)
        .ok_or_else(|| UnknownVariant {
            kind: "edit action",
            value: s.to_string(),
        })
    }
}

/// Why an edit request could not become an [`EditAction`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditRequestError {
    #[error("Invalid action '{0}', expected one of bulkEdit, addItem, editItem, removeItem")]
    UnknownAction(String),

    #[error("Action {action} requires field '{field}'")]
    MissingField {
        action: EditActionKind,
        field: &'static str,
    },
}

/// `PATCH /api/order/{orderId}` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOrderRequest {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<EditItemInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<EditItemInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// removeItem target (falls back to `item.itemId`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    /// removeItem target line (falls back to `item.lineId`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
}

impl TryFrom<EditOrderRequest> for EditAction {
    type Error = EditRequestError;

    fn try_from(req: EditOrderRequest) -> Result<Self, Self::Error> {
        let kind: EditActionKind = req
            .action
            .parse()
            .map_err(|_| EditRequestError::UnknownAction(req.action.clone()))?;

        let missing = |field| EditRequestError::MissingField {
            action: kind,
            field,
        };

        match kind {
            EditActionKind::BulkEdit => Ok(EditAction::BulkEdit {
                items: req.items.ok_or_else(|| missing("items"))?,
                customer_name: req.customer_name,
            }),
            EditActionKind::AddItem => Ok(EditAction::AddItem(
                req.item.ok_or_else(|| missing("item"))?,
            )),
            EditActionKind::EditItem => Ok(EditAction::EditItem(
                req.item.ok_or_else(|| missing("item"))?,
            )),
            EditActionKind::RemoveItem => {
                let (nested_item_id, nested_line_id) = match req.item {
                    Some(item) => (item.item_id, item.line_id),
                    None => (None, None),
                };
                let item_id = req
                    .item_id
                    .or(nested_item_id)
                    .ok_or_else(|| missing("itemId"))?;
                Ok(EditAction::RemoveItem(LineSelector {
                    item_id,
                    line_id: req.line_id.or(nested_line_id),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> Result<EditAction, EditRequestError> {
        let req: EditOrderRequest = serde_json::from_value(json).unwrap();
        EditAction::try_from(req)
    }

    #[test]
    fn test_unknown_action_is_named() {
        let err = parse(serde_json::json!({ "action": "voidItem" })).unwrap_err();
        assert_eq!(err, EditRequestError::UnknownAction("voidItem".to_string()));
        assert!(err.to_string().contains("voidItem"));
    }

    #[test]
    fn test_bulk_edit_requires_items() {
        let err = parse(serde_json::json!({ "action": "bulkEdit" })).unwrap_err();
        assert_eq!(
            err,
            EditRequestError::MissingField {
                action: EditActionKind::BulkEdit,
                field: "items"
            }
        );
    }

    #[test]
    fn test_bulk_edit_parses_items_and_name() {
        let action = parse(serde_json::json!({
            "action": "bulkEdit",
            "customerName": "Asha",
            "items": [{ "itemId": "B", "name": "Naan", "price": 50, "quantity": 1, "spiceLevel": "Mild" }]
        }))
        .unwrap();
        match action {
            EditAction::BulkEdit {
                items,
                customer_name,
            } => {
                assert_eq!(customer_name.as_deref(), Some("Asha"));
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].price, Some(Decimal::from(50)));
                assert_eq!(items[0].spice_level, Some(SpiceLevel::Mild));
            }
            other => panic!("Expected BulkEdit, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_item_accepts_nested_item_id() {
        let action = parse(serde_json::json!({
            "action": "removeItem",
            "item": { "itemId": "A" }
        }))
        .unwrap();
        assert_eq!(
            action,
            EditAction::RemoveItem(LineSelector {
                item_id: "A".to_string(),
                line_id: None
            })
        );
        assert_eq!(action.kind(), EditActionKind::RemoveItem);
    }
}
