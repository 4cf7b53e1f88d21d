//! History replay.
//!
//! Starting from the opening balance, apply every entry in order and
//! check two things: each entry's `balance_after` matches the running
//! total, and the final total matches the live balance.

use menagerie_types::LedgerEntry;

use crate::LedgerAnomaly;

/// Outcome of a wallet audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditResult {
    /// History and balance agree.
    Balanced,
    /// They disagree.
    Anomaly(LedgerAnomaly),
}

/// Replay `entries` from `opening` and compare with `actual`.
pub fn replay(opening: u64, entries: &[LedgerEntry], actual: u64) -> AuditResult {
    let mut running = opening;
    let mut first_bad_entry = None;

    for (index, entry) in entries.iter().enumerate() {
        let next = if entry.flow.is_debit() {
            running.checked_sub(entry.amount)
        } else {
            running.checked_add(entry.amount)
        };
        let Some(next) = next else {
            return AuditResult::Anomaly(LedgerAnomaly {
                replayed: running,
                actual,
                first_bad_entry: Some(index),
                message: format!(
                    "entry {index} ({:?} {}) leaves the balance out of range",
                    entry.flow, entry.amount
                ),
            });
        };
        if next != entry.balance_after && first_bad_entry.is_none() {
            first_bad_entry = Some(index);
        }
        running = next;
    }

    if running == actual && first_bad_entry.is_none() {
        return AuditResult::Balanced;
    }

    AuditResult::Anomaly(LedgerAnomaly {
        replayed: running,
        actual,
        first_bad_entry,
        message: format!("history replays to {running} coins but the wallet holds {actual}"),
    })
}
