//! Query handlers for the Tab context.
//!
//! Views are rebuilt from the event stream on every call; subtotals and
//! standings are never stored.

use chrono::{DateTime, Utc};
use roundkeeper_core::aggregate::AggregateRoot;
use roundkeeper_core::error::DomainError;
use roundkeeper_core::repository::EventRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::aggregates::Tab;
use crate::domain::aggregation::{self, Standing};
use crate::domain::catalog::Drink;
use crate::domain::ledger::{Round, RoundItem, RoundState};
use crate::domain::roster::Member;
use crate::domain::session::SessionStatus;

/// A roster entry with its default drink resolved against the catalog.
#[derive(Debug, Serialize)]
pub struct MemberView {
    /// The member identifier.
    pub member_id: Uuid,
    /// Display name.
    pub name: String,
    /// Display emoji.
    pub emoji: String,
    /// Whether the member may edit the catalog.
    pub is_admin: bool,
    /// Whether the member is included in auto-populated rounds.
    pub auto_join: bool,
    /// The stored default drink reference, which may dangle.
    pub default_drink_id: Option<Uuid>,
    /// Name of the default drink, if it still resolves.
    pub default_drink_name: Option<String>,
}

/// A ledger entry with its subtotal.
#[derive(Debug, Serialize)]
pub struct RoundView {
    /// The round identifier.
    pub round_id: Uuid,
    /// Display number.
    pub number: u32,
    /// Who pays.
    pub buyer_id: Uuid,
    /// Lines in insertion order.
    pub items: Vec<RoundItem>,
    /// Sum of the line totals.
    pub subtotal: f64,
    /// When the round was started.
    pub created_at: DateTime<Utc>,
    /// `draft` or `confirmed` with its timestamp.
    #[serde(flatten)]
    pub state: RoundState,
}

/// Read-only view of a tab.
#[derive(Debug, Serialize)]
pub struct TabView {
    /// The tab identifier.
    pub tab_id: Uuid,
    /// Join code.
    pub code: String,
    /// Whether rounds can still be started.
    pub status: SessionStatus,
    /// The designated session admin.
    pub admin_id: Option<Uuid>,
    /// When the session started.
    pub created_at: DateTime<Utc>,
    /// Who is operating the client.
    pub acting_member_id: Option<Uuid>,
    /// Roster in join order.
    pub members: Vec<MemberView>,
    /// Catalog in insertion order.
    pub drinks: Vec<Drink>,
    /// Ledger in creation order.
    pub rounds: Vec<RoundView>,
    /// The round open in the editor.
    pub editing_id: Option<Uuid>,
    /// Number the next round will get.
    pub next_round_number: u32,
    /// Total spend across confirmed rounds.
    pub ledger_total: f64,
    /// Current version (event count).
    pub version: i64,
}

/// The league table for a tab.
#[derive(Debug, Serialize)]
pub struct StandingsView {
    /// The tab identifier.
    pub tab_id: Uuid,
    /// Rows ordered by fewest rounds bought, then most drinks received, then name.
    pub standings: Vec<Standing>,
}

fn member_view(tab: &Tab, member: &Member) -> MemberView {
    MemberView {
        member_id: member.id,
        name: member.name.clone(),
        emoji: member.emoji.clone(),
        is_admin: member.is_admin,
        auto_join: member.auto_join,
        default_drink_id: member.default_drink_id,
        default_drink_name: tab.resolve_default_drink(member).map(|d| d.name.clone()),
    }
}

fn round_view(round: &Round) -> RoundView {
    RoundView {
        round_id: round.id,
        number: round.number,
        buyer_id: round.buyer_id,
        items: round.items.clone(),
        subtotal: aggregation::round_subtotal(round),
        created_at: round.created_at,
        state: round.state,
    }
}

/// Retrieves a tab by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_tab_by_id(tab_id: Uuid, repo: &dyn EventRepository) -> Result<TabView, DomainError> {
    let tab = command_handlers::load_tab(tab_id, repo).await?;
    let session = tab
        .session()
        .ok_or_else(|| DomainError::Infrastructure(format!("tab {tab_id} has no session event")))?;
    Ok(TabView {
        tab_id,
        code: session.code.clone(),
        status: session.status,
        admin_id: session.admin_id,
        created_at: session.created_at,
        acting_member_id: tab.acting_member_id(),
        members: tab.members().iter().map(|m| member_view(&tab, m)).collect(),
        drinks: tab.drinks().to_vec(),
        rounds: tab.rounds().iter().map(round_view).collect(),
        editing_id: tab.editing_id(),
        next_round_number: tab.next_round_number(),
        ledger_total: aggregation::ledger_total(tab.rounds()),
        version: tab.version(),
    })
}

/// Computes the standings for a tab.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_standings(tab_id: Uuid, repo: &dyn EventRepository) -> Result<StandingsView, DomainError> {
    let tab = command_handlers::load_tab(tab_id, repo).await?;
    Ok(StandingsView {
        tab_id,
        standings: tab.standings(),
    })
}

#[cfg(test)]
mod tests {
    use roundkeeper_core::aggregate::AggregateRoot;
    use roundkeeper_core::error::DomainError;
    use roundkeeper_core::repository::StoredEvent;
    use roundkeeper_test_support::{EmptyEventRepository, FixedClock, MockRng, RecordingEventRepository};
    use uuid::Uuid;

    use crate::application::query_handlers::{get_standings, get_tab_by_id};
    use crate::domain::aggregates::Tab;
    use crate::domain::ledger::ItemChange;
    use crate::domain::session::SessionStatus;

    fn history(tab: &Tab) -> Vec<StoredEvent> {
        tab.uncommitted_events()
            .iter()
            .map(StoredEvent::from_domain_event)
            .collect()
    }

    #[tokio::test]
    async fn test_get_tab_by_id_returns_view_with_state() {
        // Arrange
        let clock = FixedClock::default();
        let mut tab = Tab::new(Uuid::new_v4());
        tab.start_session(Uuid::new_v4(), &clock, &mut MockRng).unwrap();
        let ana = tab.add_member("Ana", true, Uuid::new_v4(), &clock, &mut MockRng).unwrap();
        let ben = tab.add_member("Ben", false, Uuid::new_v4(), &clock, &mut MockRng).unwrap();
        let beer = tab.add_drink("Beer", Some("3"), Uuid::new_v4(), &clock).unwrap();
        tab.set_default_drink(ana, Some(beer), Uuid::new_v4(), &clock).unwrap();
        tab.set_default_drink(ben, Some(Uuid::new_v4()), Uuid::new_v4(), &clock).unwrap();
        let first = tab.start_round(ana, Uuid::new_v4(), &clock).unwrap();
        let item_id = tab.round(first).unwrap().items[0].id;
        tab.change_item(first, item_id, ItemChange { qty: Some(2) }, Uuid::new_v4(), &clock)
            .unwrap();
        tab.confirm_round(first, Uuid::new_v4(), &clock).unwrap();
        let second = tab.start_round(ben, Uuid::new_v4(), &clock).unwrap();
        let events = history(&tab);
        let repo = RecordingEventRepository::new(events.clone());

        // Act
        let view = get_tab_by_id(tab.id, &repo).await.unwrap();

        // Assert
        assert_eq!(view.tab_id, tab.id);
        assert_eq!(view.code, "AAAA");
        assert_eq!(view.status, SessionStatus::Active);
        assert_eq!(view.admin_id, Some(ana));
        assert_eq!(view.acting_member_id, Some(ana));
        assert_eq!(view.members.len(), 2);
        assert_eq!(view.members[0].default_drink_name.as_deref(), Some("Beer"));
        assert!(view.members[1].default_drink_id.is_some());
        assert_eq!(view.members[1].default_drink_name, None);
        assert_eq!(view.rounds.len(), 2);
        assert!((view.rounds[0].subtotal - 6.0).abs() < f64::EPSILON);
        assert!((view.rounds[1].subtotal - 3.0).abs() < f64::EPSILON);
        assert!((view.ledger_total - 6.0).abs() < f64::EPSILON);
        assert_eq!(view.editing_id, Some(second));
        assert_eq!(view.next_round_number, 3);
        assert_eq!(view.version, i64::try_from(events.len()).unwrap());
    }

    #[tokio::test]
    async fn test_get_tab_by_id_serializes_round_status() {
        // Arrange
        let clock = FixedClock::default();
        let mut tab = Tab::new(Uuid::new_v4());
        tab.start_session(Uuid::new_v4(), &clock, &mut MockRng).unwrap();
        let ana = tab.add_member("Ana", true, Uuid::new_v4(), &clock, &mut MockRng).unwrap();
        tab.start_round(ana, Uuid::new_v4(), &clock).unwrap();
        let repo = RecordingEventRepository::new(history(&tab));

        // Act
        let view = get_tab_by_id(tab.id, &repo).await.unwrap();
        let json = serde_json::to_value(&view).unwrap();

        // Assert
        assert_eq!(json["rounds"][0]["status"], "draft");
        assert_eq!(json["status"], "active");
    }

    #[tokio::test]
    async fn test_get_tab_by_id_returns_not_found_for_empty_events() {
        // Arrange
        let tab_id = Uuid::new_v4();

        // Act
        let result = get_tab_by_id(tab_id, &EmptyEventRepository).await;

        // Assert
        match result {
            Err(DomainError::AggregateNotFound(id)) => assert_eq!(id, tab_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_standings_counts_confirmed_rounds_only() {
        // Arrange
        let clock = FixedClock::default();
        let mut tab = Tab::new(Uuid::new_v4());
        tab.start_session(Uuid::new_v4(), &clock, &mut MockRng).unwrap();
        let ana = tab.add_member("Ana", true, Uuid::new_v4(), &clock, &mut MockRng).unwrap();
        let ben = tab.add_member("Ben", false, Uuid::new_v4(), &clock, &mut MockRng).unwrap();
        let beer = tab.add_drink("Beer", Some("3"), Uuid::new_v4(), &clock).unwrap();
        tab.set_default_drink(ben, Some(beer), Uuid::new_v4(), &clock).unwrap();
        let confirmed = tab.start_round(ana, Uuid::new_v4(), &clock).unwrap();
        tab.confirm_round(confirmed, Uuid::new_v4(), &clock).unwrap();
        tab.start_round(ben, Uuid::new_v4(), &clock).unwrap();
        let repo = RecordingEventRepository::new(history(&tab));

        // Act
        let view = get_standings(tab.id, &repo).await.unwrap();

        // Assert
        let rows: Vec<(Uuid, u32, u32, i64)> = view
            .standings
            .iter()
            .map(|s| (s.member_id, s.rounds_bought, s.drinks_received, s.net))
            .collect();
        assert_eq!(rows, vec![(ben, 0, 1, -1), (ana, 1, 0, 1)]);
    }
}
