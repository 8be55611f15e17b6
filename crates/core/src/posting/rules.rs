//! Posting rules that need no persistence.

use chrono::{DateTime, Duration, Utc};

use crate::ledger::{JournalEntry, LedgerError};

/// Activity log note for a post.
#[must_use]
pub const fn post_note(has_actor: bool) -> &'static str {
    if has_actor { "User-initiated post" } else { "Auto-posted by system" }
}

/// Activity log note for an unpost.
#[must_use]
pub const fn unpost_note(force: bool) -> &'static str {
    if force { "Forced unpost" } else { "User-initiated unpost" }
}

/// Rejects unposting an entry older than `window_days`.
///
/// # Errors
///
/// Returns `UnpostWindowExpired` when `now - entry.timestamp` exceeds the window.
pub fn check_unpost_window(
    entry: &JournalEntry,
    now: DateTime<Utc>,
    window_days: i64,
) -> Result<(), LedgerError> {
    let age = now - entry.timestamp;
    if age > Duration::days(window_days) {
        return Err(LedgerError::UnpostWindowExpired {
            entry_id: entry.id,
            age_days: age.num_days(),
            window_days,
        });
    }
    Ok(())
}
