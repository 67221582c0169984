//! Routes for the Tab bounded context.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use roundkeeper_tab::application::command_handlers::{self, TabCommandResult};
use roundkeeper_tab::application::query_handlers::{self, StandingsView, TabView};
use roundkeeper_tab::domain::commands;
use roundkeeper_tab::domain::ledger::{ItemChange, QuantityStep};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for commands that only name the tab.
#[derive(Debug, Deserialize)]
pub struct TabRequest {
    /// The tab.
    pub tab_id: Uuid,
}

/// Request body for POST /add-member.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// The tab.
    pub tab_id: Uuid,
    /// Display name.
    pub name: String,
    /// Whether the member may edit the drink list.
    #[serde(default)]
    pub is_admin: bool,
}

/// Request body for POST /switch-acting-member.
#[derive(Debug, Deserialize)]
pub struct MemberRequest {
    /// The tab.
    pub tab_id: Uuid,
    /// The member.
    pub member_id: Uuid,
}

/// Request body for POST /set-default-drink.
#[derive(Debug, Deserialize)]
pub struct SetDefaultDrinkRequest {
    /// The tab.
    pub tab_id: Uuid,
    /// The member.
    pub member_id: Uuid,
    /// The drink; omit or null to clear.
    #[serde(default)]
    pub drink_id: Option<Uuid>,
}

/// Request body for POST /set-auto-join.
#[derive(Debug, Deserialize)]
pub struct SetAutoJoinRequest {
    /// The tab.
    pub tab_id: Uuid,
    /// The member.
    pub member_id: Uuid,
    /// New auto-join flag.
    pub auto_join: bool,
}

/// Request body for POST /add-drink.
#[derive(Debug, Deserialize)]
pub struct AddDrinkRequest {
    /// The tab.
    pub tab_id: Uuid,
    /// Drink name.
    pub name: String,
    /// Price as typed; anything that does not parse leaves the drink unpriced.
    #[serde(default)]
    pub price: Option<String>,
}

/// Request body for POST /start-round.
#[derive(Debug, Deserialize)]
pub struct StartRoundRequest {
    /// The tab.
    pub tab_id: Uuid,
    /// Who pays.
    pub buyer_id: Uuid,
}

/// Request body for POST /start-split-round.
#[derive(Debug, Deserialize)]
pub struct StartSplitRoundRequest {
    /// The tab.
    pub tab_id: Uuid,
    /// Who pays.
    pub buyer_id: Uuid,
    /// Who gets a drink.
    pub member_ids: Vec<Uuid>,
}

/// Request body for the round controls.
#[derive(Debug, Deserialize)]
pub struct RoundRequest {
    /// The tab.
    pub tab_id: Uuid,
    /// The round.
    pub round_id: Uuid,
}

/// Request body for POST /add-recipient-item.
#[derive(Debug, Deserialize)]
pub struct AddRecipientItemRequest {
    /// The tab.
    pub tab_id: Uuid,
    /// The draft round.
    pub round_id: Uuid,
    /// Who gets the drink.
    pub recipient_id: Uuid,
}

/// Request body for POST /change-item.
#[derive(Debug, Deserialize)]
pub struct ChangeItemRequest {
    /// The tab.
    pub tab_id: Uuid,
    /// The draft round.
    pub round_id: Uuid,
    /// The line.
    pub item_id: Uuid,
    /// New quantity, if changing it.
    #[serde(default)]
    pub qty: Option<u32>,
}

/// Request body for POST /step-item.
#[derive(Debug, Deserialize)]
pub struct StepItemRequest {
    /// The tab.
    pub tab_id: Uuid,
    /// The draft round.
    pub round_id: Uuid,
    /// The line.
    pub item_id: Uuid,
    /// `up` or `down`.
    pub step: QuantityStep,
}

/// Request body for POST /remove-item.
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    /// The tab.
    pub tab_id: Uuid,
    /// The draft round.
    pub round_id: Uuid,
    /// The line.
    pub item_id: Uuid,
}

/// Response body returned after a command is successfully handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// The tab the command applied to.
    pub aggregate_id: Uuid,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
    /// ID of the member, drink, round, or line created, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_id: Option<Uuid>,
}

impl From<TabCommandResult> for CommandResponse {
    fn from(result: TabCommandResult) -> Self {
        Self {
            aggregate_id: result.aggregate_id,
            event_ids: result.stored_events.iter().map(|e| e.event_id).collect(),
            created_id: result.created_id,
        }
    }
}

/// POST /start-session
#[instrument(skip(state))]
async fn start_session(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::StartSession {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling start_session command");

    let result = command_handlers::handle_start_session(
        &command,
        state.clock.as_ref(),
        &state.rng,
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /close-session
#[instrument(skip(state, request), fields(tab_id = %request.tab_id))]
async fn close_session(
    State(state): State<AppState>,
    Json(request): Json<TabRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::CloseSession {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
    };

    info!(correlation_id = %command.correlation_id, "handling close_session command");

    let result = command_handlers::handle_close_session(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /add-member
#[instrument(skip(state, request), fields(tab_id = %request.tab_id))]
async fn add_member(
    State(state): State<AppState>,
    Json(request): Json<AddMemberRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::AddMember {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
        name: request.name,
        is_admin: request.is_admin,
    };

    info!(correlation_id = %command.correlation_id, "handling add_member command");

    let result = command_handlers::handle_add_member(
        &command,
        state.clock.as_ref(),
        &state.rng,
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /switch-acting-member
#[instrument(skip(state, request), fields(tab_id = %request.tab_id, member_id = %request.member_id))]
async fn switch_acting_member(
    State(state): State<AppState>,
    Json(request): Json<MemberRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::SwitchActingMember {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
        member_id: request.member_id,
    };

    info!(correlation_id = %command.correlation_id, "handling switch_acting_member command");

    let result = command_handlers::handle_switch_acting_member(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /set-default-drink
#[instrument(skip(state, request), fields(tab_id = %request.tab_id, member_id = %request.member_id))]
async fn set_default_drink(
    State(state): State<AppState>,
    Json(request): Json<SetDefaultDrinkRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::SetDefaultDrink {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
        member_id: request.member_id,
        drink_id: request.drink_id,
    };

    info!(correlation_id = %command.correlation_id, "handling set_default_drink command");

    let result = command_handlers::handle_set_default_drink(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /set-auto-join
#[instrument(skip(state, request), fields(tab_id = %request.tab_id, member_id = %request.member_id))]
async fn set_auto_join(
    State(state): State<AppState>,
    Json(request): Json<SetAutoJoinRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::SetAutoJoin {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
        member_id: request.member_id,
        auto_join: request.auto_join,
    };

    info!(correlation_id = %command.correlation_id, "handling set_auto_join command");

    let result = command_handlers::handle_set_auto_join(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /add-drink
#[instrument(skip(state, request), fields(tab_id = %request.tab_id))]
async fn add_drink(
    State(state): State<AppState>,
    Json(request): Json<AddDrinkRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::AddDrink {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
        name: request.name,
        price: request.price,
    };

    info!(correlation_id = %command.correlation_id, "handling add_drink command");

    let result = command_handlers::handle_add_drink(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /start-round
#[instrument(skip(state, request), fields(tab_id = %request.tab_id, buyer_id = %request.buyer_id))]
async fn start_round(
    State(state): State<AppState>,
    Json(request): Json<StartRoundRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::StartRound {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
        buyer_id: request.buyer_id,
    };

    info!(correlation_id = %command.correlation_id, "handling start_round command");

    let result = command_handlers::handle_start_round(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /start-split-round
#[instrument(skip(state, request), fields(tab_id = %request.tab_id, buyer_id = %request.buyer_id))]
async fn start_split_round(
    State(state): State<AppState>,
    Json(request): Json<StartSplitRoundRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::StartSplitRound {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
        buyer_id: request.buyer_id,
        member_ids: request.member_ids,
    };

    info!(correlation_id = %command.correlation_id, "handling start_split_round command");

    let result = command_handlers::handle_start_split_round(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /cancel-editing
#[instrument(skip(state, request), fields(tab_id = %request.tab_id))]
async fn cancel_editing(
    State(state): State<AppState>,
    Json(request): Json<TabRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::CancelEditing {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
    };

    info!(correlation_id = %command.correlation_id, "handling cancel_editing command");

    let result = command_handlers::handle_cancel_editing(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /confirm-round
#[instrument(skip(state, request), fields(tab_id = %request.tab_id, round_id = %request.round_id))]
async fn confirm_round(
    State(state): State<AppState>,
    Json(request): Json<RoundRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::ConfirmRound {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
        round_id: request.round_id,
    };

    info!(correlation_id = %command.correlation_id, "handling confirm_round command");

    let result = command_handlers::handle_confirm_round(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /reopen-draft
#[instrument(skip(state, request), fields(tab_id = %request.tab_id, round_id = %request.round_id))]
async fn reopen_draft(
    State(state): State<AppState>,
    Json(request): Json<RoundRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::ReopenDraft {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
        round_id: request.round_id,
    };

    info!(correlation_id = %command.correlation_id, "handling reopen_draft command");

    let result = command_handlers::handle_reopen_draft(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /delete-draft
#[instrument(skip(state, request), fields(tab_id = %request.tab_id, round_id = %request.round_id))]
async fn delete_draft(
    State(state): State<AppState>,
    Json(request): Json<RoundRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::DeleteDraft {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
        round_id: request.round_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_draft command");

    let result = command_handlers::handle_delete_draft(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /add-recipient-item
#[instrument(skip(state, request), fields(tab_id = %request.tab_id, round_id = %request.round_id))]
async fn add_recipient_item(
    State(state): State<AppState>,
    Json(request): Json<AddRecipientItemRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::AddRecipientItem {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
        round_id: request.round_id,
        recipient_id: request.recipient_id,
    };

    info!(correlation_id = %command.correlation_id, "handling add_recipient_item command");

    let result = command_handlers::handle_add_recipient_item(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /change-item
#[instrument(skip(state, request), fields(tab_id = %request.tab_id, item_id = %request.item_id))]
async fn change_item(
    State(state): State<AppState>,
    Json(request): Json<ChangeItemRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::ChangeItem {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
        round_id: request.round_id,
        item_id: request.item_id,
        change: ItemChange { qty: request.qty },
    };

    info!(correlation_id = %command.correlation_id, "handling change_item command");

    let result = command_handlers::handle_change_item(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /step-item
#[instrument(skip(state, request), fields(tab_id = %request.tab_id, item_id = %request.item_id))]
async fn step_item(
    State(state): State<AppState>,
    Json(request): Json<StepItemRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::StepItemQuantity {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
        round_id: request.round_id,
        item_id: request.item_id,
        step: request.step,
    };

    info!(correlation_id = %command.correlation_id, "handling step_item_quantity command");

    let result = command_handlers::handle_step_item_quantity(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /remove-item
#[instrument(skip(state, request), fields(tab_id = %request.tab_id, item_id = %request.item_id))]
async fn remove_item(
    State(state): State<AppState>,
    Json(request): Json<ItemRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::RemoveItem {
        correlation_id: Uuid::new_v4(),
        tab_id: request.tab_id,
        round_id: request.round_id,
        item_id: request.item_id,
    };

    info!(correlation_id = %command.correlation_id, "handling remove_item command");

    let result = command_handlers::handle_remove_item(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// GET /{tab_id}
#[instrument(skip(state))]
async fn get_tab(
    State(state): State<AppState>,
    Path(tab_id): Path<Uuid>,
) -> Result<Json<TabView>, ApiError> {
    let view = query_handlers::get_tab_by_id(tab_id, &*state.event_repository).await?;
    Ok(Json(view))
}

/// GET /{tab_id}/standings
#[instrument(skip(state))]
async fn get_standings(
    State(state): State<AppState>,
    Path(tab_id): Path<Uuid>,
) -> Result<Json<StandingsView>, ApiError> {
    let view = query_handlers::get_standings(tab_id, &*state.event_repository).await?;
    Ok(Json(view))
}

/// Returns the router for the tab context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start-session", post(start_session))
        .route("/close-session", post(close_session))
        .route("/add-member", post(add_member))
        .route("/switch-acting-member", post(switch_acting_member))
        .route("/set-default-drink", post(set_default_drink))
        .route("/set-auto-join", post(set_auto_join))
        .route("/add-drink", post(add_drink))
        .route("/start-round", post(start_round))
        .route("/start-split-round", post(start_split_round))
        .route("/cancel-editing", post(cancel_editing))
        .route("/confirm-round", post(confirm_round))
        .route("/reopen-draft", post(reopen_draft))
        .route("/delete-draft", post(delete_draft))
        .route("/add-recipient-item", post(add_recipient_item))
        .route("/change-item", post(change_item))
        .route("/step-item", post(step_item))
        .route("/remove-item", post(remove_item))
        .route("/{tab_id}", get(get_tab))
        .route("/{tab_id}/standings", get(get_standings))
}
