//! Inventory event models
//!
//! Six events ship with the system. `EventKind` is the authoritative
//! enumeration the aggregation loop is driven by; the `events` table is the
//! persisted catalog of the same six rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog row describing an inventory-changing event type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub event_code: EventKind,
    pub event_name: String,
    pub description: String,
    /// +1 for additive events, -1 for subtractive ones
    pub modifier: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub modified_by: Option<String>,
}

/// The fixed set of inventory-changing events
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Import,
    Order,
    Use,
    Waste,
    Destroy,
    Loss,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::Import,
        EventKind::Order,
        EventKind::Use,
        EventKind::Waste,
        EventKind::Destroy,
        EventKind::Loss,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Import => "IMPORT",
            EventKind::Order => "ORDER",
            EventKind::Use => "USE",
            EventKind::Waste => "WASTE",
            EventKind::Destroy => "DESTROY",
            EventKind::Loss => "LOSS",
        }
    }

    pub fn from_code(code: &str) -> Option<EventKind> {
        match code {
            "IMPORT" => Some(EventKind::Import),
            "ORDER" => Some(EventKind::Order),
            "USE" => Some(EventKind::Use),
            "WASTE" => Some(EventKind::Waste),
            "DESTROY" => Some(EventKind::Destroy),
            "LOSS" => Some(EventKind::Loss),
            _ => None,
        }
    }

    /// Sign applied exactly once, at write time, to every ledger amount
    /// recorded against this event.
    pub fn modifier(&self) -> i32 {
        match self {
            EventKind::Import | EventKind::Order => 1,
            EventKind::Use | EventKind::Waste | EventKind::Destroy | EventKind::Loss => -1,
        }
    }

    pub fn is_subtractive(&self) -> bool {
        self.modifier() < 0
    }

    /// Whether this event seeds a reporting period's starting stock.
    /// Exactly one Import entry is expected per medication per period.
    pub fn seeds_period(&self) -> bool {
        matches!(self, EventKind::Import)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EventKind::Import => "Import",
            EventKind::Order => "Order",
            EventKind::Use => "Use",
            EventKind::Waste => "Waste",
            EventKind::Destroy => "Destroy",
            EventKind::Loss => "Loss",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_signs() {
        assert_eq!(EventKind::Import.modifier(), 1);
        assert_eq!(EventKind::Order.modifier(), 1);
        assert_eq!(EventKind::Use.modifier(), -1);
        assert_eq!(EventKind::Waste.modifier(), -1);
        assert_eq!(EventKind::Destroy.modifier(), -1);
        assert_eq!(EventKind::Loss.modifier(), -1);
    }

    #[test]
    fn test_only_import_seeds_period() {
        for kind in EventKind::ALL {
            assert_eq!(kind.seeds_period(), kind == EventKind::Import);
        }
    }

    #[test]
    fn test_code_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_code(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::from_code("RETURN"), None);
    }
}
