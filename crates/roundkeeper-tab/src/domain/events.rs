//! Domain events for the Tab context.

use roundkeeper_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ledger::RoundItem;

/// Emitted when a tab is opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    /// The tab identifier.
    pub tab_id: Uuid,
    /// Join code.
    pub code: String,
}

/// Emitted when a tab stops accepting new rounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClosed {
    /// The tab identifier.
    pub tab_id: Uuid,
}

/// Emitted when someone joins the tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberAdded {
    /// The new member.
    pub member_id: Uuid,
    /// Trimmed display name.
    pub name: String,
    /// Decorative emoji.
    pub emoji: String,
    /// Whether the member may edit the catalog.
    pub is_admin: bool,
}

/// Emitted when a different member takes over the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActingMemberSwitched {
    /// The member now acting.
    pub member_id: Uuid,
}

/// Emitted when a member picks or clears their default drink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultDrinkSet {
    /// The member.
    pub member_id: Uuid,
    /// The new default, or `None` to clear it.
    pub drink_id: Option<Uuid>,
}

/// Emitted when a member opts in to or out of auto-join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoJoinSet {
    /// The member.
    pub member_id: Uuid,
    /// New flag value.
    pub auto_join: bool,
}

/// Emitted when an admin adds a drink to the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkAdded {
    /// The new drink.
    pub drink_id: Uuid,
    /// Trimmed display name.
    pub name: String,
    /// Parsed price, if any.
    pub price: Option<f64>,
}

/// Emitted when a round is started, with its auto-populated lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundStarted {
    /// The new round.
    pub round_id: Uuid,
    /// Its sequence number.
    pub number: u32,
    /// Who is paying.
    pub buyer_id: Uuid,
    /// `true` when populated from a hand-picked selection.
    pub split: bool,
    /// Lines captured when the round started.
    pub items: Vec<RoundItem>,
}

/// Emitted when the editor is closed without confirming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditingCancelled {
    /// The round that had the focus.
    pub round_id: Uuid,
    /// `true` when the round was an empty draft and has been dropped.
    pub discarded: bool,
}

/// Emitted when a buyer confirms a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundConfirmed {
    /// The confirmed round.
    pub round_id: Uuid,
}

/// Emitted when a draft is put back into the editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftReopened {
    /// The reopened draft.
    pub round_id: Uuid,
}

/// Emitted when a draft is thrown away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftDeleted {
    /// The deleted draft.
    pub round_id: Uuid,
}

/// Emitted when a line is added to a draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemAdded {
    /// The draft.
    pub round_id: Uuid,
    /// The new line.
    pub item: RoundItem,
}

/// Emitted when a line's quantity changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemChanged {
    /// The draft.
    pub round_id: Uuid,
    /// The line.
    pub item_id: Uuid,
    /// New quantity.
    pub qty: u32,
}

/// Emitted when a line is removed from a draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRemoved {
    /// The draft.
    pub round_id: Uuid,
    /// The removed line.
    pub item_id: Uuid,
}

/// Event type identifier for [`SessionStarted`].
pub const SESSION_STARTED_EVENT_TYPE: &str = "tab.session_started";
/// Event type identifier for [`SessionClosed`].
pub const SESSION_CLOSED_EVENT_TYPE: &str = "tab.session_closed";
/// Event type identifier for [`MemberAdded`].
pub const MEMBER_ADDED_EVENT_TYPE: &str = "tab.member_added";
/// Event type identifier for [`ActingMemberSwitched`].
pub const ACTING_MEMBER_SWITCHED_EVENT_TYPE: &str = "tab.acting_member_switched";
/// Event type identifier for [`DefaultDrinkSet`].
pub const DEFAULT_DRINK_SET_EVENT_TYPE: &str = "tab.default_drink_set";
/// Event type identifier for [`AutoJoinSet`].
pub const AUTO_JOIN_SET_EVENT_TYPE: &str = "tab.auto_join_set";
/// Event type identifier for [`DrinkAdded`].
pub const DRINK_ADDED_EVENT_TYPE: &str = "tab.drink_added";
/// Event type identifier for [`RoundStarted`].
pub const ROUND_STARTED_EVENT_TYPE: &str = "tab.round_started";
/// Event type identifier for [`EditingCancelled`].
pub const EDITING_CANCELLED_EVENT_TYPE: &str = "tab.editing_cancelled";
/// Event type identifier for [`RoundConfirmed`].
pub const ROUND_CONFIRMED_EVENT_TYPE: &str = "tab.round_confirmed";
/// Event type identifier for [`DraftReopened`].
pub const DRAFT_REOPENED_EVENT_TYPE: &str = "tab.draft_reopened";
/// Event type identifier for [`DraftDeleted`].
pub const DRAFT_DELETED_EVENT_TYPE: &str = "tab.draft_deleted";
/// Event type identifier for [`ItemAdded`].
pub const ITEM_ADDED_EVENT_TYPE: &str = "tab.item_added";
/// Event type identifier for [`ItemChanged`].
pub const ITEM_CHANGED_EVENT_TYPE: &str = "tab.item_changed";
/// Event type identifier for [`ItemRemoved`].
pub const ITEM_REMOVED_EVENT_TYPE: &str = "tab.item_removed";

/// Event payload variants for the Tab context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TabEventKind {
    /// A tab was opened.
    SessionStarted(SessionStarted),
    /// A tab was closed.
    SessionClosed(SessionClosed),
    /// A member joined.
    MemberAdded(MemberAdded),
    /// The acting member changed.
    ActingMemberSwitched(ActingMemberSwitched),
    /// A default drink was set or cleared.
    DefaultDrinkSet(DefaultDrinkSet),
    /// An auto-join flag changed.
    AutoJoinSet(AutoJoinSet),
    /// A drink was added to the list.
    DrinkAdded(DrinkAdded),
    /// A round was started.
    RoundStarted(RoundStarted),
    /// The editor was closed.
    EditingCancelled(EditingCancelled),
    /// A round was confirmed.
    RoundConfirmed(RoundConfirmed),
    /// A draft was reopened.
    DraftReopened(DraftReopened),
    /// A draft was deleted.
    DraftDeleted(DraftDeleted),
    /// A line was added.
    ItemAdded(ItemAdded),
    /// A line's quantity changed.
    ItemChanged(ItemChanged),
    /// A line was removed.
    ItemRemoved(ItemRemoved),
}

impl TabEventKind {
    /// The event type identifier for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionStarted(_) => SESSION_STARTED_EVENT_TYPE,
            Self::SessionClosed(_) => SESSION_CLOSED_EVENT_TYPE,
            Self::MemberAdded(_) => MEMBER_ADDED_EVENT_TYPE,
            Self::ActingMemberSwitched(_) => ACTING_MEMBER_SWITCHED_EVENT_TYPE,
            Self::DefaultDrinkSet(_) => DEFAULT_DRINK_SET_EVENT_TYPE,
            Self::AutoJoinSet(_) => AUTO_JOIN_SET_EVENT_TYPE,
            Self::DrinkAdded(_) => DRINK_ADDED_EVENT_TYPE,
            Self::RoundStarted(_) => ROUND_STARTED_EVENT_TYPE,
            Self::EditingCancelled(_) => EDITING_CANCELLED_EVENT_TYPE,
            Self::RoundConfirmed(_) => ROUND_CONFIRMED_EVENT_TYPE,
            Self::DraftReopened(_) => DRAFT_REOPENED_EVENT_TYPE,
            Self::DraftDeleted(_) => DRAFT_DELETED_EVENT_TYPE,
            Self::ItemAdded(_) => ITEM_ADDED_EVENT_TYPE,
            Self::ItemChanged(_) => ITEM_CHANGED_EVENT_TYPE,
            Self::ItemRemoved(_) => ITEM_REMOVED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Tab context.
#[derive(Debug, Clone)]
pub struct TabEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: TabEventKind,
}

impl DomainEvent for TabEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("TabEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
