//! Derived views over the ledger: subtotals and the league table.
//!
//! Everything here is a pure function of the current roster and ledger and
//! is recomputed on each read.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use super::ledger::{Round, RoundItem};
use super::roster::Member;

/// Sum of `unit_price × qty` over the round's lines, unpriced lines as zero.
#[must_use]
pub fn round_subtotal(round: &Round) -> f64 {
    round.items.iter().map(RoundItem::line_total).sum()
}

/// Sum of subtotals over confirmed rounds.
#[must_use]
pub fn ledger_total(rounds: &[Round]) -> f64 {
    rounds
        .iter()
        .filter(|round| !round.is_draft())
        .map(round_subtotal)
        .sum()
}

/// One row of the league table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// The member this row describes.
    pub member_id: Uuid,
    /// Member name, for display and tie-breaking.
    pub name: String,
    /// Member emoji.
    pub emoji: String,
    /// Confirmed rounds this member paid for.
    pub rounds_bought: u32,
    /// Drinks this member received across confirmed rounds.
    pub drinks_received: u32,
    /// `rounds_bought - drinks_received`.
    pub net: i64,
}

/// Builds the league table.
///
/// Rows are ordered so whoever owes a round comes first: fewest rounds
/// bought, then most drinks received, then name. Drafts are ignored.
#[must_use]
pub fn standings(members: &[Member], rounds: &[Round]) -> Vec<Standing> {
    let mut bought: HashMap<Uuid, u32> = HashMap::new();
    let mut received: HashMap<Uuid, u32> = HashMap::new();

    for round in rounds.iter().filter(|round| !round.is_draft()) {
        let count = bought.entry(round.buyer_id).or_default();
        *count = count.saturating_add(1);
        for item in &round.items {
            let count = received.entry(item.recipient_id).or_default();
            *count = count.saturating_add(item.qty);
        }
    }

    let mut rows: Vec<Standing> = members
        .iter()
        .map(|member| {
            let rounds_bought = bought.get(&member.id).copied().unwrap_or_default();
            let drinks_received = received.get(&member.id).copied().unwrap_or_default();
            Standing {
                member_id: member.id,
                name: member.name.clone(),
                emoji: member.emoji.clone(),
                rounds_bought,
                drinks_received,
                net: i64::from(rounds_bought) - i64::from(drinks_received),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.rounds_bought
            .cmp(&b.rounds_bought)
            .then_with(|| b.drinks_received.cmp(&a.drinks_received))
            .then_with(|| compare_names(&a.name, &b.name))
    });
    rows
}

/// Collation order for display names: letters compare case-insensitively
/// first, and only names differing solely in case fall back to case, with
/// lowercase ahead of uppercase ("amy" < "Zed", "ana" < "Ana").
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::ledger::RoundState;

    fn member(name: &str) -> Member {
        Member::joined(Uuid::new_v4(), name.to_owned(), "🍺".to_owned(), false)
    }

    fn line(recipient_id: Uuid, unit_price: Option<f64>, qty: u32) -> RoundItem {
        RoundItem {
            id: Uuid::new_v4(),
            recipient_id,
            drink_id: Uuid::new_v4(),
            drink_name: "House red".to_owned(),
            unit_price,
            qty,
        }
    }

    fn round(number: u32, buyer_id: Uuid, items: Vec<RoundItem>, confirmed: bool) -> Round {
        let now = Utc::now();
        Round {
            id: Uuid::new_v4(),
            number,
            buyer_id,
            items,
            created_at: now,
            state: if confirmed {
                RoundState::Confirmed { confirmed_at: now }
            } else {
                RoundState::Draft
            },
        }
    }

    #[test]
    fn test_round_subtotal_sums_priced_lines_only() {
        let someone = Uuid::new_v4();
        let r = round(
            1,
            someone,
            vec![line(someone, Some(2.5), 2), line(someone, None, 1)],
            true,
        );

        assert!((round_subtotal(&r) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_round_subtotal_of_empty_round_is_zero() {
        let r = round(1, Uuid::new_v4(), Vec::new(), false);

        assert!(round_subtotal(&r).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ledger_total_skips_drafts() {
        let buyer = Uuid::new_v4();
        let rounds = vec![
            round(1, buyer, vec![line(buyer, Some(4.0), 1)], true),
            round(2, buyer, vec![line(buyer, Some(100.0), 1)], false),
            round(3, buyer, vec![line(buyer, Some(1.5), 2)], true),
        ];

        assert!((ledger_total(&rounds) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_standings_exclude_draft_rounds() {
        let a = member("Ana");
        let b = member("Ben");
        let rounds = vec![
            round(1, a.id, vec![line(b.id, Some(3.0), 2)], true),
            round(2, b.id, vec![line(a.id, Some(3.0), 1)], false),
        ];

        let table = standings(&[a.clone(), b.clone()], &rounds);

        let row_a = table.iter().find(|s| s.member_id == a.id).unwrap();
        let row_b = table.iter().find(|s| s.member_id == b.id).unwrap();
        assert_eq!((row_a.rounds_bought, row_a.drinks_received, row_a.net), (1, 0, 1));
        assert_eq!((row_b.rounds_bought, row_b.drinks_received, row_b.net), (0, 2, -2));
    }

    #[test]
    fn test_standings_order_surfaces_who_owes_a_round() {
        let ana = member("Ana");
        let ben = member("Ben");
        let cy = member("Cy");
        let dee = member("Dee");
        let rounds = vec![
            round(1, ana.id, vec![line(ben.id, None, 1), line(dee.id, None, 3)], true),
            round(2, cy.id, vec![line(ben.id, None, 2)], true),
        ];

        let table = standings(&[ana, ben, cy, dee], &rounds);
        let names: Vec<&str> = table.iter().map(|s| s.name.as_str()).collect();

        // Ben and Dee have bought nothing; Ben and Dee both received 3, so the
        // name breaks the tie. Ana and Cy bought one each; Ana received none.
        assert_eq!(names, vec!["Ben", "Dee", "Ana", "Cy"]);
    }

    #[test]
    fn test_standings_name_tiebreak_uses_collation_order() {
        let members = [member("Zed"), member("Ana"), member("amy"), member("ana")];

        let table = standings(&members, &[]);
        let names: Vec<&str> = table.iter().map(|s| s.name.as_str()).collect();

        assert_eq!(names, vec!["amy", "ana", "Ana", "Zed"]);
    }

    #[test]
    fn test_compare_names_breaks_case_ties_lowercase_first() {
        assert_eq!(compare_names("ana", "Ana"), Ordering::Less);
        assert_eq!(compare_names("Ana", "ana"), Ordering::Greater);
        assert_eq!(compare_names("Ana", "Ana"), Ordering::Equal);
        assert_eq!(compare_names("ben", "Ana"), Ordering::Greater);
    }

    #[test]
    fn test_standings_counts_saturate_instead_of_overflowing() {
        let ana = member("Ana");
        let ben = member("Ben");
        let rounds = vec![round(
            1,
            ana.id,
            vec![line(ben.id, None, u32::MAX), line(ben.id, None, 1)],
            true,
        )];

        let table = standings(&[ana, ben.clone()], &rounds);

        let row_ben = table.iter().find(|s| s.member_id == ben.id).unwrap();
        assert_eq!(row_ben.drinks_received, u32::MAX);
        assert_eq!(row_ben.net, -i64::from(u32::MAX));
    }

    #[test]
    fn test_standings_ignore_recipients_missing_from_roster() {
        let ana = member("Ana");
        let stranger = Uuid::new_v4();
        let rounds = vec![round(1, ana.id, vec![line(stranger, None, 4)], true)];

        let table = standings(std::slice::from_ref(&ana), &rounds);

        assert_eq!(table.len(), 1);
        assert_eq!(table[0].drinks_received, 0);
        assert_eq!(table[0].rounds_bought, 1);
    }
}
