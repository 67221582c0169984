//! Round ledger entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::Drink;

/// Lifecycle of a round. Discarded rounds leave the ledger entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoundState {
    /// Still editable.
    Draft,
    /// Counted in standings; items are frozen.
    Confirmed {
        /// When the buyer confirmed the round.
        confirmed_at: DateTime<Utc>,
    },
}

/// One line of a round: a recipient and the drink they get.
///
/// `drink_name` and `unit_price` are copied from the catalog when the line is
/// created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundItem {
    /// Line identifier.
    pub id: Uuid,
    /// Weak reference to the receiving member.
    pub recipient_id: Uuid,
    /// Weak reference to the drink.
    pub drink_id: Uuid,
    /// Drink name at the time the line was added.
    pub drink_name: String,
    /// Drink price at the time the line was added.
    pub unit_price: Option<f64>,
    /// Quantity, always at least 1.
    pub qty: u32,
}

impl RoundItem {
    /// A single serving of `drink` for `recipient_id`.
    #[must_use]
    pub fn single(id: Uuid, recipient_id: Uuid, drink: &Drink) -> Self {
        Self {
            id,
            recipient_id,
            drink_id: drink.id,
            drink_name: drink.name.clone(),
            unit_price: drink.price,
            qty: 1,
        }
    }

    /// Price of this line; an unpriced drink counts as zero.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.unit_price.unwrap_or(0.0) * f64::from(self.qty)
    }
}

/// A round: one buyer paying for a set of lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Round {
    /// Round identifier.
    pub id: Uuid,
    /// Sequence number, unique within the tab and never reused.
    pub number: u32,
    /// Weak reference to the paying member.
    pub buyer_id: Uuid,
    /// Lines in insertion order.
    pub items: Vec<RoundItem>,
    /// When the round was started.
    pub created_at: DateTime<Utc>,
    /// Draft or confirmed.
    pub state: RoundState,
}

impl Round {
    /// Returns `true` while the round is still a draft.
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.state == RoundState::Draft
    }

    /// Confirmation time, if confirmed.
    #[must_use]
    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            RoundState::Draft => None,
            RoundState::Confirmed { confirmed_at } => Some(confirmed_at),
        }
    }

    /// Returns `true` if `member_id` is paying for this round.
    #[must_use]
    pub fn is_bought_by(&self, member_id: Uuid) -> bool {
        self.buyer_id == member_id
    }

    /// Finds a line by id.
    #[must_use]
    pub fn item(&self, item_id: Uuid) -> Option<&RoundItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub(crate) fn item_mut(&mut self, item_id: Uuid) -> Option<&mut RoundItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }
}

/// Partial update for a line. Absent fields are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ItemChange {
    /// New quantity; must be at least 1.
    pub qty: Option<u32>,
}

/// The +/− quantity controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityStep {
    /// One more.
    Up,
    /// One fewer, never below 1.
    Down,
}

impl QuantityStep {
    /// Quantity after taking this step from `qty`.
    #[must_use]
    pub fn apply(self, qty: u32) -> u32 {
        match self {
            Self::Up => qty.saturating_add(1),
            Self::Down => qty.saturating_sub(1).max(1),
        }
    }
}
