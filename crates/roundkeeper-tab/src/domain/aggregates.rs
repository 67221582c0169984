//! Aggregate root for the Tab context.

use roundkeeper_core::aggregate::AggregateRoot;
use roundkeeper_core::clock::Clock;
use roundkeeper_core::error::DomainError;
use roundkeeper_core::event::EventMetadata;
use roundkeeper_core::rng::DeterministicRng;
use uuid::Uuid;

use super::aggregation::{self, Standing};
use super::catalog::{self, Drink};
use super::events::{
    ActingMemberSwitched, AutoJoinSet, DefaultDrinkSet, DraftDeleted, DraftReopened, DrinkAdded,
    EditingCancelled, ItemAdded, ItemChanged, ItemRemoved, MemberAdded, RoundConfirmed,
    RoundStarted, SessionClosed, SessionStarted, TabEvent, TabEventKind,
};
use super::ledger::{ItemChange, QuantityStep, Round, RoundItem, RoundState};
use super::roster::{self, Member};
use super::session::{self, SessionInfo, SessionStatus};

/// The aggregate root for a tab.
///
/// Every command method either records exactly one event or returns an
/// error without touching state. A few commands succeed without recording
/// anything when there is nothing to change.
#[derive(Debug)]
pub struct Tab {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (persisted event count).
    pub(crate) version: i64,
    /// Set once the session has started.
    pub(crate) session: Option<SessionInfo>,
    /// Who is operating the client; gates catalog writes.
    pub(crate) acting_member_id: Option<Uuid>,
    /// Roster, in join order.
    pub(crate) members: Vec<Member>,
    /// Catalog, in insertion order.
    pub(crate) drinks: Vec<Drink>,
    /// Ledger, in creation order.
    pub(crate) rounds: Vec<Round>,
    /// The round open in the editor.
    pub(crate) editing_id: Option<Uuid>,
    /// Highest round number ever issued, including deleted drafts.
    pub(crate) highest_round_number: u32,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<TabEvent>,
}

impl Tab {
    /// Creates an empty tab. Call [`Tab::start_session`] before anything else.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            session: None,
            acting_member_id: None,
            members: Vec::new(),
            drinks: Vec::new(),
            rounds: Vec::new(),
            editing_id: None,
            highest_round_number: 0,
            uncommitted_events: Vec::new(),
        }
    }

    // --- reads -----------------------------------------------------------

    /// Session identity, once started.
    #[must_use]
    pub fn session(&self) -> Option<&SessionInfo> {
        self.session.as_ref()
    }

    /// The roster in join order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Looks up a member.
    #[must_use]
    pub fn member(&self, member_id: Uuid) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }

    /// The acting member's id, if one is set.
    #[must_use]
    pub fn acting_member_id(&self) -> Option<Uuid> {
        self.acting_member_id
    }

    /// The member currently operating the client.
    #[must_use]
    pub fn acting_member(&self) -> Option<&Member> {
        self.acting_member_id.and_then(|id| self.member(id))
    }

    /// The catalog in insertion order.
    #[must_use]
    pub fn drinks(&self) -> &[Drink] {
        &self.drinks
    }

    /// The ledger in creation order.
    #[must_use]
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Looks up a round.
    #[must_use]
    pub fn round(&self, round_id: Uuid) -> Option<&Round> {
        self.rounds.iter().find(|r| r.id == round_id)
    }

    /// Id of the round open in the editor.
    #[must_use]
    pub fn editing_id(&self) -> Option<Uuid> {
        self.editing_id
    }

    /// The round open in the editor.
    #[must_use]
    pub fn editing_round(&self) -> Option<&Round> {
        self.editing_id.and_then(|id| self.round(id))
    }

    /// Number the next round will get.
    #[must_use]
    pub fn next_round_number(&self) -> u32 {
        self.highest_round_number.saturating_add(1)
    }

    /// The member's default drink, looked up live in the catalog.
    #[must_use]
    pub fn resolve_default_drink(&self, member: &Member) -> Option<&Drink> {
        catalog::resolve_drink(&self.drinks, member.default_drink_id)
    }

    /// The league table for the current ledger.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        aggregation::standings(&self.members, &self.rounds)
    }

    /// Checks that the acting member is the buyer of `round_id`.
    ///
    /// Draft controls (reopen, delete) are buyer-only; callers enforce this
    /// before invoking them.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the round does not exist and
    /// `DomainError::Forbidden` if someone else is acting.
    pub fn ensure_acting_buyer(&self, round_id: Uuid) -> Result<(), DomainError> {
        let round = self.require_round(round_id)?;
        match self.acting_member_id {
            Some(acting) if round.is_bought_by(acting) => Ok(()),
            _ => Err(DomainError::Forbidden(format!(
                "only the buyer of round {} may manage it",
                round.number
            ))),
        }
    }

    // --- session ---------------------------------------------------------

    /// Opens the session with a fresh join code, producing a `SessionStarted` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the session already started.
    pub fn start_session(
        &mut self,
        correlation_id: Uuid,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) -> Result<(), DomainError> {
        if self.session.is_some() {
            return Err(DomainError::InvalidState(format!(
                "tab {} already has a session",
                self.id
            )));
        }
        let code = session::generate_session_code(rng);
        self.record(
            TabEventKind::SessionStarted(SessionStarted {
                tab_id: self.id,
                code,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Stops new rounds from being started, producing a `SessionClosed` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the session is missing or
    /// already closed.
    pub fn close_session(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        if !self.require_session()?.is_active() {
            return Err(DomainError::InvalidState("session is already closed".to_owned()));
        }
        self.record(
            TabEventKind::SessionClosed(SessionClosed { tab_id: self.id }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    // --- roster ----------------------------------------------------------

    /// Adds a member, producing a `MemberAdded` event. Returns the new id.
    ///
    /// The first admin becomes the session admin, and the first member becomes
    /// the acting member.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `name` is blank.
    pub fn add_member(
        &mut self,
        name: &str,
        is_admin: bool,
        correlation_id: Uuid,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Uuid, DomainError> {
        self.require_session()?;
        let name = roster::required_name("member", name)?;
        let member_id = Uuid::new_v4();
        let emoji = roster::pick_emoji(rng).to_owned();
        self.record(
            TabEventKind::MemberAdded(MemberAdded {
                member_id,
                name,
                emoji,
                is_admin,
            }),
            correlation_id,
            clock,
        );
        Ok(member_id)
    }

    /// Hands the client to another member, producing an `ActingMemberSwitched` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the member does not exist.
    pub fn switch_acting_member(
        &mut self,
        member_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_session()?;
        self.require_member(member_id)?;
        self.record(
            TabEventKind::ActingMemberSwitched(ActingMemberSwitched { member_id }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Sets or clears a member's default drink, producing a `DefaultDrinkSet` event.
    ///
    /// The drink is a weak reference and is not checked against the catalog.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the member does not exist.
    pub fn set_default_drink(
        &mut self,
        member_id: Uuid,
        drink_id: Option<Uuid>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_session()?;
        self.require_member(member_id)?;
        self.record(
            TabEventKind::DefaultDrinkSet(DefaultDrinkSet {
                member_id,
                drink_id,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Opts a member in to or out of auto-join, producing an `AutoJoinSet` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the member does not exist.
    pub fn set_auto_join(
        &mut self,
        member_id: Uuid,
        auto_join: bool,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_session()?;
        self.require_member(member_id)?;
        self.record(
            TabEventKind::AutoJoinSet(AutoJoinSet {
                member_id,
                auto_join,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    // --- catalog ---------------------------------------------------------

    /// Adds a drink, producing a `DrinkAdded` event. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Forbidden` unless the acting member is an admin,
    /// and `DomainError::Validation` if `name` is blank.
    pub fn add_drink(
        &mut self,
        name: &str,
        price: Option<&str>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Uuid, DomainError> {
        self.require_session()?;
        if !self.acting_member().is_some_and(|m| m.is_admin) {
            return Err(DomainError::Forbidden(
                "only an admin may add drinks".to_owned(),
            ));
        }
        let name = roster::required_name("drink", name)?;
        let drink_id = Uuid::new_v4();
        self.record(
            TabEventKind::DrinkAdded(DrinkAdded {
                drink_id,
                name,
                price: catalog::parse_price(price),
            }),
            correlation_id,
            clock,
        );
        Ok(drink_id)
    }

    // --- round lifecycle -------------------------------------------------

    /// Starts a round for everyone opted in to auto-join who has a default
    /// drink, buyer included. Returns the new round id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the session is not active and
    /// `DomainError::NotFound` if the buyer does not exist.
    pub fn start_round(
        &mut self,
        buyer_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Uuid, DomainError> {
        self.ensure_can_start_round(buyer_id)?;
        let items = self.default_items(|m| m.auto_join);
        Ok(self.open_round(buyer_id, false, items, correlation_id, clock))
    }

    /// Starts a round for the selected members who have a default drink,
    /// ignoring auto-join. Unknown ids in the selection are skipped.
    ///
    /// # Errors
    ///
    /// Same as [`Tab::start_round`].
    pub fn start_split_round(
        &mut self,
        buyer_id: Uuid,
        member_ids: &[Uuid],
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Uuid, DomainError> {
        self.ensure_can_start_round(buyer_id)?;
        let items = self.default_items(|m| member_ids.contains(&m.id));
        Ok(self.open_round(buyer_id, true, items, correlation_id, clock))
    }

    /// Closes the editor, producing an `EditingCancelled` event.
    ///
    /// An empty draft is dropped from the ledger as if it never existed; any
    /// other round stays. With nothing in the editor this does nothing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the session has not started.
    pub fn cancel_editing(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        self.require_session()?;
        let Some(round_id) = self.editing_id else {
            return Ok(());
        };
        let discarded = self
            .round(round_id)
            .is_some_and(|r| r.is_draft() && r.items.is_empty());
        self.record(
            TabEventKind::EditingCancelled(EditingCancelled {
                round_id,
                discarded,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Confirms a round, producing a `RoundConfirmed` event. The editor is
    /// cleared. Empty rounds may be confirmed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the round does not exist and
    /// `DomainError::InvalidState` if it is already confirmed.
    pub fn confirm_round(
        &mut self,
        round_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_session()?;
        self.require_draft(round_id)?;
        self.record(
            TabEventKind::RoundConfirmed(RoundConfirmed { round_id }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Puts a draft back into the editor, producing a `DraftReopened` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the round does not exist and
    /// `DomainError::InvalidState` if it is confirmed.
    pub fn reopen_draft(
        &mut self,
        round_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_session()?;
        self.require_draft(round_id)?;
        self.record(
            TabEventKind::DraftReopened(DraftReopened { round_id }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Removes a draft from the ledger, producing a `DraftDeleted` event.
    /// Its number is not reused.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the round does not exist and
    /// `DomainError::InvalidState` if it is confirmed.
    pub fn delete_draft(
        &mut self,
        round_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_session()?;
        self.require_draft(round_id)?;
        self.record(
            TabEventKind::DraftDeleted(DraftDeleted { round_id }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    // --- draft lines -----------------------------------------------------

    /// Appends the recipient's current default drink to a draft, producing an
    /// `ItemAdded` event. Returns the new line id.
    ///
    /// Lines are never merged, so the same person may appear twice.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` for an unknown round or recipient,
    /// `DomainError::InvalidState` for a confirmed round, and
    /// `DomainError::Validation` if the recipient has no resolvable default.
    pub fn add_default_for_recipient(
        &mut self,
        round_id: Uuid,
        recipient_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Uuid, DomainError> {
        self.require_session()?;
        self.require_draft(round_id)?;
        let recipient = self.require_member(recipient_id)?;
        let Some(drink) = self.resolve_default_drink(recipient) else {
            return Err(DomainError::Validation(format!(
                "{} has no default drink",
                recipient.name
            )));
        };
        let item = RoundItem::single(Uuid::new_v4(), recipient_id, drink);
        let item_id = item.id;
        self.record(
            TabEventKind::ItemAdded(ItemAdded { round_id, item }),
            correlation_id,
            clock,
        );
        Ok(item_id)
    }

    /// Applies a partial update to a line, producing an `ItemChanged` event.
    /// An empty update changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` for an unknown round or line,
    /// `DomainError::InvalidState` for a confirmed round, and
    /// `DomainError::Validation` for a zero quantity.
    pub fn change_item(
        &mut self,
        round_id: Uuid,
        item_id: Uuid,
        change: ItemChange,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_session()?;
        self.require_item(round_id, item_id)?;
        let Some(qty) = change.qty else {
            return Ok(());
        };
        if qty == 0 {
            return Err(DomainError::Validation(
                "quantity must be at least 1; remove the line instead".to_owned(),
            ));
        }
        self.record(
            TabEventKind::ItemChanged(ItemChanged {
                round_id,
                item_id,
                qty,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Steps a line's quantity up or down by one, producing an `ItemChanged`
    /// event. Stepping down from 1 does nothing.
    ///
    /// # Errors
    ///
    /// Same as [`Tab::change_item`], minus the zero check.
    pub fn step_item_quantity(
        &mut self,
        round_id: Uuid,
        item_id: Uuid,
        step: QuantityStep,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_session()?;
        let current = self.require_item(round_id, item_id)?.qty;
        let qty = step.apply(current);
        if qty == current {
            return Ok(());
        }
        self.record(
            TabEventKind::ItemChanged(ItemChanged {
                round_id,
                item_id,
                qty,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Removes a line from a draft, producing an `ItemRemoved` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` for an unknown round or line and
    /// `DomainError::InvalidState` for a confirmed round.
    pub fn remove_item(
        &mut self,
        round_id: Uuid,
        item_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_session()?;
        self.require_item(round_id, item_id)?;
        self.record(
            TabEventKind::ItemRemoved(ItemRemoved { round_id, item_id }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    // --- internals -------------------------------------------------------

    fn require_session(&self) -> Result<&SessionInfo, DomainError> {
        self.session
            .as_ref()
            .ok_or_else(|| DomainError::InvalidState(format!("tab {} has no session", self.id)))
    }

    fn require_member(&self, member_id: Uuid) -> Result<&Member, DomainError> {
        self.member(member_id)
            .ok_or_else(|| DomainError::not_found("member", member_id))
    }

    fn require_round(&self, round_id: Uuid) -> Result<&Round, DomainError> {
        self.round(round_id)
            .ok_or_else(|| DomainError::not_found("round", round_id))
    }

    fn require_draft(&self, round_id: Uuid) -> Result<&Round, DomainError> {
        let round = self.require_round(round_id)?;
        if !round.is_draft() {
            return Err(DomainError::InvalidState(format!(
                "round {} is already confirmed",
                round.number
            )));
        }
        Ok(round)
    }

    fn require_item(&self, round_id: Uuid, item_id: Uuid) -> Result<&RoundItem, DomainError> {
        self.require_draft(round_id)?
            .item(item_id)
            .ok_or_else(|| DomainError::not_found("item", item_id))
    }

    fn ensure_can_start_round(&self, buyer_id: Uuid) -> Result<(), DomainError> {
        if !self.require_session()?.is_active() {
            return Err(DomainError::InvalidState(
                "rounds can only be started while the session is active".to_owned(),
            ));
        }
        self.require_member(buyer_id)?;
        Ok(())
    }

    /// One line per roster member passing `include` whose default resolves.
    fn default_items(&self, include: impl Fn(&Member) -> bool) -> Vec<RoundItem> {
        self.members
            .iter()
            .filter(|m| include(m))
            .filter_map(|m| {
                self.resolve_default_drink(m)
                    .map(|drink| RoundItem::single(Uuid::new_v4(), m.id, drink))
            })
            .collect()
    }

    fn open_round(
        &mut self,
        buyer_id: Uuid,
        split: bool,
        items: Vec<RoundItem>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Uuid {
        let round_id = Uuid::new_v4();
        self.record(
            TabEventKind::RoundStarted(RoundStarted {
                round_id,
                number: self.next_round_number(),
                buyer_id,
                split,
                items,
            }),
            correlation_id,
            clock,
        );
        round_id
    }

    /// Wraps `kind` in metadata, folds it into state, and queues it for
    /// persistence.
    fn record(&mut self, kind: TabEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = TabEvent {
            metadata: EventMetadata::caused_by_command(
                kind.event_type(),
                self.id,
                self.next_sequence_number(),
                correlation_id,
                clock.now(),
            ),
            kind,
        };
        self.mutate(&event);
        self.uncommitted_events.push(event);
    }

    fn member_mut(&mut self, member_id: Uuid) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| m.id == member_id)
    }

    fn round_mut(&mut self, round_id: Uuid) -> Option<&mut Round> {
        self.rounds.iter_mut().find(|r| r.id == round_id)
    }

    fn mutate(&mut self, event: &TabEvent) {
        let occurred_at = event.metadata.occurred_at;
        match &event.kind {
            TabEventKind::SessionStarted(payload) => {
                self.session = Some(SessionInfo {
                    code: payload.code.clone(),
                    status: SessionStatus::Active,
                    admin_id: None,
                    created_at: occurred_at,
                });
            }
            TabEventKind::SessionClosed(_) => {
                if let Some(session) = self.session.as_mut() {
                    session.status = SessionStatus::Closed;
                }
            }
            TabEventKind::MemberAdded(payload) => {
                self.members.push(Member::joined(
                    payload.member_id,
                    payload.name.clone(),
                    payload.emoji.clone(),
                    payload.is_admin,
                ));
                if payload.is_admin {
                    if let Some(session) = self.session.as_mut() {
                        session.admin_id.get_or_insert(payload.member_id);
                    }
                }
                self.acting_member_id.get_or_insert(payload.member_id);
            }
            TabEventKind::ActingMemberSwitched(payload) => {
                self.acting_member_id = Some(payload.member_id);
            }
            TabEventKind::DefaultDrinkSet(payload) => {
                if let Some(member) = self.member_mut(payload.member_id) {
                    member.default_drink_id = payload.drink_id;
                }
            }
            TabEventKind::AutoJoinSet(payload) => {
                if let Some(member) = self.member_mut(payload.member_id) {
                    member.auto_join = payload.auto_join;
                }
            }
            TabEventKind::DrinkAdded(payload) => {
                self.drinks.push(Drink {
                    id: payload.drink_id,
                    name: payload.name.clone(),
                    price: payload.price,
                });
            }
            TabEventKind::RoundStarted(payload) => {
                self.rounds.push(Round {
                    id: payload.round_id,
                    number: payload.number,
                    buyer_id: payload.buyer_id,
                    items: payload.items.clone(),
                    created_at: occurred_at,
                    state: RoundState::Draft,
                });
                self.highest_round_number = self.highest_round_number.max(payload.number);
                self.editing_id = Some(payload.round_id);
            }
            TabEventKind::EditingCancelled(payload) => {
                if payload.discarded {
                    self.rounds.retain(|r| r.id != payload.round_id);
                }
                self.editing_id = None;
            }
            TabEventKind::RoundConfirmed(payload) => {
                if let Some(round) = self.round_mut(payload.round_id) {
                    round.state = RoundState::Confirmed {
                        confirmed_at: occurred_at,
                    };
                }
                self.editing_id = None;
            }
            TabEventKind::DraftReopened(payload) => {
                self.editing_id = Some(payload.round_id);
            }
            TabEventKind::DraftDeleted(payload) => {
                self.rounds.retain(|r| r.id != payload.round_id);
                if self.editing_id == Some(payload.round_id) {
                    self.editing_id = None;
                }
            }
            TabEventKind::ItemAdded(payload) => {
                if let Some(round) = self.round_mut(payload.round_id) {
                    round.items.push(payload.item.clone());
                }
            }
            TabEventKind::ItemChanged(payload) => {
                if let Some(item) = self
                    .round_mut(payload.round_id)
                    .and_then(|r| r.item_mut(payload.item_id))
                {
                    item.qty = payload.qty;
                }
            }
            TabEventKind::ItemRemoved(payload) => {
                if let Some(round) = self.round_mut(payload.round_id) {
                    round.items.retain(|item| item.id != payload.item_id);
                }
            }
        }
    }
}

impl AggregateRoot for Tab {
    type Event = TabEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.mutate(event);
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
