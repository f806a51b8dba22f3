//! Shared enums and keys for the table tab model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A wire string that matches none of an enum's variants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// ============================================================================
// Spice Level
// ============================================================================

/// 辣度
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SpiceLevel {
    Mild,
    #[default]
    Medium,
    Spicy,
}

impl SpiceLevel {
    pub const ALL: [SpiceLevel; 3] = [SpiceLevel::Mild, SpiceLevel::Medium, SpiceLevel::Spicy];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpiceLevel::Mild => "Mild",
            SpiceLevel::Medium => "Medium",
            SpiceLevel::Spicy => "Spicy",
        }
    }
}

impl fmt::Display for SpiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpiceLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpiceLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("spice level", s))
    }
}

// ============================================================================
// Kitchen Item Status
// ============================================================================

/// Kitchen preparation state of a single line item
///
/// Only moves forward: `Pending → In Progress → Completed`, and `Pending`
/// may skip straight to `Completed`. The allowed moves live in the server's
/// transition table, not here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ItemStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 3] = [
        ItemStatus::Pending,
        ItemStatus::InProgress,
        ItemStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "Pending",
            ItemStatus::InProgress => "In Progress",
            ItemStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("item status", s))
    }
}

// ============================================================================
// Order / Session Status
// ============================================================================

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Active,
    Closed,
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(OrderStatus::Active),
            "Closed" => Ok(OrderStatus::Closed),
            other => Err(UnknownVariant::new("order status", other)),
        }
    }
}

/// Payment flag (no real payment processing)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

/// 服务类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OrderType {
    /// 堂食 - bound to a table session
    #[default]
    #[serde(rename = "Dine-In")]
    DineIn,
    /// 外带 - created by an operator, no table
    Parcel,
}

/// Table occupancy status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Active,
    Closed,
}

// ============================================================================
// Consolidation Key
// ============================================================================

/// Identity of a line item for consolidation: the same catalog item at the
/// same spice level is one line, whatever order it was submitted in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub item_id: String,
    pub spice_level: SpiceLevel,
}

impl ItemKey {
    pub fn new(item_id: impl Into<String>, spice_level: SpiceLevel) -> Self {
        Self {
            item_id: item_id.into(),
            spice_level,
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.item_id, self.spice_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ItemStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        let parsed: ItemStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(parsed, ItemStatus::Completed);
        assert_eq!("In Progress".parse::<ItemStatus>(), Ok(ItemStatus::InProgress));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = "Cooking".parse::<ItemStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown item status 'Cooking'");
        assert!("in progress".parse::<ItemStatus>().is_err());
    }

    #[test]
    fn test_order_type_wire_names() {
        assert_eq!(serde_json::to_string(&OrderType::DineIn).unwrap(), "\"Dine-In\"");
        assert_eq!(serde_json::to_string(&OrderType::Parcel).unwrap(), "\"Parcel\"");
    }

    #[test]
    fn test_item_key_distinguishes_spice() {
        let mild = ItemKey::new("dal", SpiceLevel::Mild);
        let spicy = ItemKey::new("dal", SpiceLevel::Spicy);
        assert_ne!(mild, spicy);
        assert_eq!(mild, ItemKey::new("dal".to_string(), SpiceLevel::Mild));
    }

    #[test]
    fn test_item_key_is_not_its_display_text() {
        let a = ItemKey::new("a (Mild)", SpiceLevel::Medium);
        let b = ItemKey::new("a", SpiceLevel::Mild);
        assert_ne!(a, b);
        assert_eq!(b.to_string(), "a (Mild)");
    }
}
