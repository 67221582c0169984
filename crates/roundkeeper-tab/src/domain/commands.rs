//! Commands for the Tab context.

use roundkeeper_core::command::Command;
use uuid::Uuid;

use super::ledger::{ItemChange, QuantityStep};

/// Implements [`Command`] for a struct with `correlation_id` and `tab_id`.
macro_rules! tab_command {
    ($name:ident, $command_type:literal) => {
        impl Command for $name {
            fn command_type(&self) -> &'static str {
                $command_type
            }

            fn correlation_id(&self) -> Uuid {
                self.correlation_id
            }

            fn target_id(&self) -> Option<Uuid> {
                Some(self.tab_id)
            }
        }
    };
}

/// Command to open a new tab.
#[derive(Debug, Clone)]
pub struct StartSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for StartSession {
    fn command_type(&self) -> &'static str {
        "tab.start_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to close a tab to new rounds.
#[derive(Debug, Clone)]
pub struct CloseSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
}

tab_command!(CloseSession, "tab.close_session");

/// Command to add a member.
#[derive(Debug, Clone)]
pub struct AddMember {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
    /// Display name; trimmed, must not be blank.
    pub name: String,
    /// Whether the member may edit the catalog.
    pub is_admin: bool,
}

tab_command!(AddMember, "tab.add_member");

/// Command to change who is operating the client.
#[derive(Debug, Clone)]
pub struct SwitchActingMember {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
    /// The member taking over.
    pub member_id: Uuid,
}

tab_command!(SwitchActingMember, "tab.switch_acting_member");

/// Command to set or clear a member's default drink.
#[derive(Debug, Clone)]
pub struct SetDefaultDrink {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
    /// The member.
    pub member_id: Uuid,
    /// The drink, or `None` to clear.
    pub drink_id: Option<Uuid>,
}

tab_command!(SetDefaultDrink, "tab.set_default_drink");

/// Command to toggle a member's auto-join flag.
#[derive(Debug, Clone)]
pub struct SetAutoJoin {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
    /// The member.
    pub member_id: Uuid,
    /// New flag value.
    pub auto_join: bool,
}

tab_command!(SetAutoJoin, "tab.set_auto_join");

/// Command to add a drink to the list. Only admins may do this.
#[derive(Debug, Clone)]
pub struct AddDrink {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
    /// Display name; trimmed, must not be blank.
    pub name: String,
    /// Raw price text as typed; unparsable text means "no price".
    pub price: Option<String>,
}

tab_command!(AddDrink, "tab.add_drink");

/// Command to start a round populated from everyone's auto-join setting.
#[derive(Debug, Clone)]
pub struct StartRound {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
    /// Who is paying.
    pub buyer_id: Uuid,
}

tab_command!(StartRound, "tab.start_round");

/// Command to start a round for a hand-picked set of members.
#[derive(Debug, Clone)]
pub struct StartSplitRound {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
    /// Who is paying.
    pub buyer_id: Uuid,
    /// Members to include.
    pub member_ids: Vec<Uuid>,
}

tab_command!(StartSplitRound, "tab.start_split_round");

/// Command to close the round editor without confirming.
#[derive(Debug, Clone)]
pub struct CancelEditing {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
}

tab_command!(CancelEditing, "tab.cancel_editing");

/// Command to confirm a round.
#[derive(Debug, Clone)]
pub struct ConfirmRound {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
    /// The round.
    pub round_id: Uuid,
}

tab_command!(ConfirmRound, "tab.confirm_round");

/// Command to put a draft back into the editor. Only its buyer may do this.
#[derive(Debug, Clone)]
pub struct ReopenDraft {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
    /// The draft.
    pub round_id: Uuid,
}

tab_command!(ReopenDraft, "tab.reopen_draft");

/// Command to throw a draft away. Only its buyer may do this.
#[derive(Debug, Clone)]
pub struct DeleteDraft {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
    /// The draft.
    pub round_id: Uuid,
}

tab_command!(DeleteDraft, "tab.delete_draft");

/// Command to add a member's default drink to a draft (late joiners).
#[derive(Debug, Clone)]
pub struct AddRecipientItem {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
    /// The draft.
    pub round_id: Uuid,
    /// Who gets the drink.
    pub recipient_id: Uuid,
}

tab_command!(AddRecipientItem, "tab.add_recipient_item");

/// Command to apply a partial update to a line.
#[derive(Debug, Clone)]
pub struct ChangeItem {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
    /// The draft.
    pub round_id: Uuid,
    /// The line.
    pub item_id: Uuid,
    /// Fields to overwrite.
    pub change: ItemChange,
}

tab_command!(ChangeItem, "tab.change_item");

/// Command to bump a line's quantity up or down by one.
#[derive(Debug, Clone)]
pub struct StepItemQuantity {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
    /// The draft.
    pub round_id: Uuid,
    /// The line.
    pub item_id: Uuid,
    /// Direction.
    pub step: QuantityStep,
}

tab_command!(StepItemQuantity, "tab.step_item_quantity");

/// Command to remove a line.
#[derive(Debug, Clone)]
pub struct RemoveItem {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tab.
    pub tab_id: Uuid,
    /// The draft.
    pub round_id: Uuid,
    /// The line.
    pub item_id: Uuid,
}

tab_command!(RemoveItem, "tab.remove_item");
