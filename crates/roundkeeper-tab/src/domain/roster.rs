//! Roster entities: the members of a tab.

use roundkeeper_core::error::DomainError;
use roundkeeper_core::rng::DeterministicRng;
use serde::Serialize;
use uuid::Uuid;

/// Decorative emoji handed out to new members.
pub const MEMBER_EMOJI: [&str; 19] = [
    "🍺", "🍻", "🍷", "🥂", "🍸", "🍹", "🍾", "🧃", "🥤", "🧋", "☕", "🧉", "✨", "🎉", "🎈", "🎶",
    "🪩", "🌙", "⭐",
];

/// A person on the tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// Member identifier.
    pub id: Uuid,
    /// Display name (trimmed, never empty).
    pub name: String,
    /// Decorative emoji.
    pub emoji: String,
    /// Admins may add drinks to the catalog.
    pub is_admin: bool,
    /// Weak reference into the catalog; may dangle.
    pub default_drink_id: Option<Uuid>,
    /// Whether the member's default is added when a normal round starts.
    pub auto_join: bool,
}

impl Member {
    /// A freshly joined member: opted in to auto-join, no default drink.
    #[must_use]
    pub fn joined(id: Uuid, name: String, emoji: String, is_admin: bool) -> Self {
        Self {
            id,
            name,
            emoji,
            is_admin,
            default_drink_id: None,
            auto_join: true,
        }
    }
}

/// Picks a decorative emoji for a new member.
pub fn pick_emoji(rng: &mut dyn DeterministicRng) -> &'static str {
    MEMBER_EMOJI[rng.next_index(MEMBER_EMOJI.len())]
}

/// Trims a required name, rejecting blank input.
///
/// # Errors
///
/// Returns `DomainError::Validation` if `raw` is empty after trimming.
pub fn required_name(what: &str, raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{what} name must not be empty")));
    }
    Ok(trimmed.to_owned())
}
