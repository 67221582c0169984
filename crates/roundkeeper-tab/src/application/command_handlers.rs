//! Command handlers for the Tab context.
//!
//! Each handler loads the tab's event stream, replays it, runs one domain
//! method, and appends whatever events that produced. A rejected command
//! leaves the stream untouched.

use std::sync::Mutex;

use roundkeeper_core::aggregate::AggregateRoot;
use roundkeeper_core::clock::Clock;
use roundkeeper_core::command::Command;
use roundkeeper_core::error::DomainError;
use roundkeeper_core::repository::{EventRepository, StoredEvent};
use roundkeeper_core::rng::DeterministicRng;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::aggregates::Tab;
use crate::domain::commands::{
    AddDrink, AddMember, AddRecipientItem, CancelEditing, ChangeItem, CloseSession,
    ConfirmRound, DeleteDraft, RemoveItem, ReopenDraft, SetAutoJoin, SetDefaultDrink,
    StartRound, StartSession, StartSplitRound, StepItemQuantity, SwitchActingMember,
};
use crate::domain::events::{TabEvent, TabEventKind};

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct TabCommandResult {
    /// The tab affected or created by the command.
    pub aggregate_id: Uuid,
    /// The stored events produced and persisted. Empty when there was nothing to change.
    pub stored_events: Vec<StoredEvent>,
    /// Id of the member, drink, round, or line the command created, if any.
    pub created_id: Option<Uuid>,
}

/// Reconstitutes a `Tab` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(tab_id: Uuid, existing_events: &[StoredEvent]) -> Result<Tab, DomainError> {
    let mut tab = Tab::new(tab_id);
    for stored in existing_events {
        let kind: TabEventKind = serde_json::from_value(stored.payload.clone()).map_err(|e| {
            DomainError::Infrastructure(format!("event deserialization failed: {e}"))
        })?;
        tab.apply(&TabEvent {
            metadata: stored.metadata(),
            kind,
        });
    }
    Ok(tab)
}

/// Loads and replays a tab that must already exist.
pub(crate) async fn load_tab(tab_id: Uuid, repo: &dyn EventRepository) -> Result<Tab, DomainError> {
    let existing_events = repo.load_events(tab_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(tab_id));
    }
    reconstitute(tab_id, &existing_events)
}

/// Locks the RNG only for the synchronous domain call, never across an await.
fn with_rng<T>(
    rng: &Mutex<dyn DeterministicRng + Send>,
    op: impl FnOnce(&mut dyn DeterministicRng) -> Result<T, DomainError>,
) -> Result<T, DomainError> {
    let mut rng_guard = rng
        .lock()
        .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
    op(&mut *rng_guard)
}

async fn persist(
    tab: &mut Tab,
    created_id: Option<Uuid>,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    let stored_events: Vec<StoredEvent> = tab
        .uncommitted_events()
        .iter()
        .map(StoredEvent::from_domain_event)
        .collect();

    if !stored_events.is_empty() {
        repo.append_events(tab.id, tab.version(), &stored_events)
            .await?;
    }
    tab.clear_uncommitted_events();

    Ok(TabCommandResult {
        aggregate_id: tab.id,
        stored_events,
        created_id,
    })
}

/// Load, run `op`, persist. `op` returns the id of anything it created.
#[instrument(
    skip_all,
    fields(
        %tab_id,
        command_type = command.command_type(),
        correlation_id = %command.correlation_id(),
    )
)]
async fn execute<F>(
    tab_id: Uuid,
    command: &dyn Command,
    repo: &dyn EventRepository,
    op: F,
) -> Result<TabCommandResult, DomainError>
where
    F: FnOnce(&mut Tab) -> Result<Option<Uuid>, DomainError>,
{
    let mut tab = load_tab(tab_id, repo).await?;
    let created_id = op(&mut tab).inspect_err(|e| {
        debug!(error = %e, "command rejected");
    })?;
    persist(&mut tab, created_id, repo).await
}

/// Handles the `StartSession` command: creates a new tab with a fresh join
/// code and persists the resulting event.
///
/// # Errors
///
/// Returns `DomainError` if the RNG is unavailable or event appending fails.
pub async fn handle_start_session(
    command: &StartSession,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    let mut tab = Tab::new(Uuid::new_v4());
    with_rng(rng, |rng| tab.start_session(command.correlation_id, clock, rng))?;
    persist(&mut tab, None, repo).await
}

/// Handles the `CloseSession` command.
///
/// # Errors
///
/// Returns `DomainError` if the tab is missing, already closed, or persistence fails.
pub async fn handle_close_session(
    command: &CloseSession,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        tab.close_session(command.correlation_id, clock).map(|()| None)
    })
    .await
}

/// Handles the `AddMember` command. The new member id is in `created_id`.
///
/// # Errors
///
/// Returns `DomainError` if the tab is missing, the name is blank, or persistence fails.
pub async fn handle_add_member(
    command: &AddMember,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        with_rng(rng, |rng| {
            tab.add_member(&command.name, command.is_admin, command.correlation_id, clock, rng)
        })
        .map(Some)
    })
    .await
}

/// Handles the `SwitchActingMember` command.
///
/// # Errors
///
/// Returns `DomainError` if the tab or member is missing, or persistence fails.
pub async fn handle_switch_acting_member(
    command: &SwitchActingMember,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        tab.switch_acting_member(command.member_id, command.correlation_id, clock)
            .map(|()| None)
    })
    .await
}

/// Handles the `SetDefaultDrink` command.
///
/// # Errors
///
/// Returns `DomainError` if the tab or member is missing, or persistence fails.
pub async fn handle_set_default_drink(
    command: &SetDefaultDrink,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        tab.set_default_drink(command.member_id, command.drink_id, command.correlation_id, clock)
            .map(|()| None)
    })
    .await
}

/// Handles the `SetAutoJoin` command.
///
/// # Errors
///
/// Returns `DomainError` if the tab or member is missing, or persistence fails.
pub async fn handle_set_auto_join(
    command: &SetAutoJoin,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        tab.set_auto_join(command.member_id, command.auto_join, command.correlation_id, clock)
            .map(|()| None)
    })
    .await
}

/// Handles the `AddDrink` command. The new drink id is in `created_id`.
///
/// # Errors
///
/// Returns `DomainError` if the acting member is not an admin, the name is
/// blank, or persistence fails.
pub async fn handle_add_drink(
    command: &AddDrink,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        tab.add_drink(
            &command.name,
            command.price.as_deref(),
            command.correlation_id,
            clock,
        )
        .map(Some)
    })
    .await
}

/// Handles the `StartRound` command. The new round id is in `created_id`.
///
/// # Errors
///
/// Returns `DomainError` if the session is closed, the buyer is unknown, or
/// persistence fails.
pub async fn handle_start_round(
    command: &StartRound,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        tab.start_round(command.buyer_id, command.correlation_id, clock)
            .map(Some)
    })
    .await
}

/// Handles the `StartSplitRound` command. The new round id is in `created_id`.
///
/// # Errors
///
/// Same as [`handle_start_round`].
pub async fn handle_start_split_round(
    command: &StartSplitRound,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        tab.start_split_round(
            command.buyer_id,
            &command.member_ids,
            command.correlation_id,
            clock,
        )
        .map(Some)
    })
    .await
}

/// Handles the `CancelEditing` command.
///
/// # Errors
///
/// Returns `DomainError` if the tab is missing or persistence fails.
pub async fn handle_cancel_editing(
    command: &CancelEditing,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        tab.cancel_editing(command.correlation_id, clock).map(|()| None)
    })
    .await
}

/// Handles the `ConfirmRound` command.
///
/// # Errors
///
/// Returns `DomainError` if the round is missing or already confirmed, or
/// persistence fails.
pub async fn handle_confirm_round(
    command: &ConfirmRound,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        tab.confirm_round(command.round_id, command.correlation_id, clock)
            .map(|()| None)
    })
    .await
}

/// Handles the `ReopenDraft` command. Only the round's buyer may reopen it.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` if someone else is acting, or another
/// `DomainError` if the round is not a draft or persistence fails.
pub async fn handle_reopen_draft(
    command: &ReopenDraft,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        tab.ensure_acting_buyer(command.round_id)?;
        tab.reopen_draft(command.round_id, command.correlation_id, clock)
            .map(|()| None)
    })
    .await
}

/// Handles the `DeleteDraft` command. Only the round's buyer may delete it.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` if someone else is acting, or another
/// `DomainError` if the round is not a draft or persistence fails.
pub async fn handle_delete_draft(
    command: &DeleteDraft,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        tab.ensure_acting_buyer(command.round_id)?;
        tab.delete_draft(command.round_id, command.correlation_id, clock)
            .map(|()| None)
    })
    .await
}

/// Handles the `AddRecipientItem` command. The new line id is in `created_id`.
///
/// # Errors
///
/// Returns `DomainError` if the round is not a draft, the recipient has no
/// default drink, or persistence fails.
pub async fn handle_add_recipient_item(
    command: &AddRecipientItem,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        tab.add_default_for_recipient(
            command.round_id,
            command.recipient_id,
            command.correlation_id,
            clock,
        )
        .map(Some)
    })
    .await
}

/// Handles the `ChangeItem` command.
///
/// # Errors
///
/// Returns `DomainError` if the line is missing, the round is confirmed, the
/// quantity is zero, or persistence fails.
pub async fn handle_change_item(
    command: &ChangeItem,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        tab.change_item(
            command.round_id,
            command.item_id,
            command.change,
            command.correlation_id,
            clock,
        )
        .map(|()| None)
    })
    .await
}

/// Handles the `StepItemQuantity` command.
///
/// # Errors
///
/// Returns `DomainError` if the line is missing, the round is confirmed, or
/// persistence fails.
pub async fn handle_step_item_quantity(
    command: &StepItemQuantity,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        tab.step_item_quantity(
            command.round_id,
            command.item_id,
            command.step,
            command.correlation_id,
            clock,
        )
        .map(|()| None)
    })
    .await
}

/// Handles the `RemoveItem` command.
///
/// # Errors
///
/// Returns `DomainError` if the line is missing, the round is confirmed, or
/// persistence fails.
pub async fn handle_remove_item(
    command: &RemoveItem,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<TabCommandResult, DomainError> {
    execute(command.tab_id, command, repo, |tab| {
        tab.remove_item(command.round_id, command.item_id, command.correlation_id, clock)
            .map(|()| None)
    })
    .await
}
