//! Session identity: join code, status, and the designated admin.

use chrono::{DateTime, Utc};
use roundkeeper_core::rng::DeterministicRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Characters a join code is drawn from. `I`, `O`, `0` and `1` are left out
/// so codes can be read aloud across a noisy bar.
pub const SESSION_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a join code.
pub const SESSION_CODE_LEN: usize = 4;

/// Whether rounds may still be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Rounds may be started.
    Active,
    /// The session is over; the ledger is read-only for new rounds.
    Closed,
}

/// Identity of the running activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    /// Short join code shown to members.
    pub code: String,
    /// Current status.
    pub status: SessionStatus,
    /// The first member added with the admin flag.
    pub admin_id: Option<Uuid>,
    /// When the session was started.
    pub created_at: DateTime<Utc>,
}

impl SessionInfo {
    /// Returns `true` while rounds may be started.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}

/// Draws a fresh join code.
pub fn generate_session_code(rng: &mut dyn DeterministicRng) -> String {
    (0..SESSION_CODE_LEN)
        .map(|_| char::from(SESSION_CODE_ALPHABET[rng.next_index(SESSION_CODE_ALPHABET.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundkeeper_test_support::{MockRng, SequenceRng};

    #[test]
    fn test_generate_session_code_uses_alphabet_positions() {
        let mut rng = SequenceRng::new(vec![0, 8, 24, 31]);

        let code = generate_session_code(&mut rng);

        assert_eq!(code, "AJ29");
    }

    #[test]
    fn test_generate_session_code_has_fixed_length() {
        let code = generate_session_code(&mut MockRng);

        assert_eq!(code, "AAAA");
        assert_eq!(code.len(), SESSION_CODE_LEN);
    }
}
