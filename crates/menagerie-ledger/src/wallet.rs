//! The player's coin purse.
//!
//! The wallet is append-only on the history side: entries are never
//! edited or removed. Zero-coin movements (free items, zero-value sales)
//! leave the history untouched.

use chrono::Utc;
use tracing::{debug, warn};

use menagerie_types::{CoinFlow, LedgerEntry, LedgerEntryId};

use crate::LedgerError;
use crate::audit::{AuditResult, replay};

/// Coin balance plus the history that produced it.
#[derive(Debug, Clone)]
pub struct Wallet {
    opening_balance: u64,
    balance: u64,
    entries: Vec<LedgerEntry>,
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Wallet {
    /// Open a wallet with a starting balance and an empty history.
    pub const fn new(opening_balance: u64) -> Self {
        Self {
            opening_balance,
            balance: opening_balance,
            entries: Vec::new(),
        }
    }

    /// Coins currently held.
    pub const fn balance(&self) -> u64 {
        self.balance
    }

    /// Balance the wallet was opened with.
    pub const fn opening_balance(&self) -> u64 {
        self.opening_balance
    }

    /// The full history, oldest first.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Entries recorded during one tick.
    pub fn entries_for_tick(&self, tick: u64) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().filter(move |e| e.tick == tick)
    }

    /// Whether a debit of `amount` would succeed.
    pub const fn can_afford(&self, amount: u64) -> bool {
        self.balance >= amount
    }

    /// Take coins out. Nothing changes on error.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::WrongDirection`] for a credit flow and
    /// [`LedgerError::InsufficientFunds`] when the balance is too low.
    pub fn debit(
        &mut self,
        tick: u64,
        flow: CoinFlow,
        amount: u64,
        memo: impl Into<String>,
    ) -> Result<u64, LedgerError> {
        if !flow.is_debit() {
            return Err(LedgerError::WrongDirection {
                flow,
                attempted: "debit",
            });
        }
        let Some(next) = self.balance.checked_sub(amount) else {
            debug!(needed = amount, available = self.balance, ?flow, "debit rejected");
            return Err(LedgerError::InsufficientFunds {
                needed: amount,
                available: self.balance,
            });
        };
        self.commit(tick, flow, amount, next, memo.into());
        Ok(self.balance)
    }

    /// Add coins. Nothing changes on error.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::WrongDirection`] for a debit flow and
    /// [`LedgerError::Overflow`] if the balance would not fit in a `u64`.
    pub fn credit(
        &mut self,
        tick: u64,
        flow: CoinFlow,
        amount: u64,
        memo: impl Into<String>,
    ) -> Result<u64, LedgerError> {
        if flow.is_debit() {
            return Err(LedgerError::WrongDirection {
                flow,
                attempted: "credit",
            });
        }
        let next = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow { amount })?;
        self.commit(tick, flow, amount, next, memo.into());
        Ok(self.balance)
    }

    /// Replay the history against the live balance.
    pub fn audit(&self) -> AuditResult {
        let result = replay(self.opening_balance, &self.entries, self.balance);
        if let AuditResult::Anomaly(ref anomaly) = result {
            warn!(%anomaly, "wallet audit failed");
        }
        result
    }

    fn commit(&mut self, tick: u64, flow: CoinFlow, amount: u64, next: u64, memo: String) {
        self.balance = next;
        if amount == 0 {
            return;
        }
        self.entries.push(LedgerEntry {
            id: LedgerEntryId::new(),
            tick,
            flow,
            amount,
            balance_after: next,
            memo,
            recorded_at: Utc::now(),
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn debit_and_credit_move_the_balance() {
        let mut wallet = Wallet::new(200);
        assert_eq!(wallet.debit(1, CoinFlow::Purchase, 50, "goldfish").unwrap(), 150);
        assert_eq!(wallet.credit(1, CoinFlow::Sale, 30, "goldfish").unwrap(), 180);
        assert_eq!(wallet.entries().len(), 2);
        assert_eq!(wallet.entries()[0].balance_after, 150);
        assert_eq!(wallet.entries()[1].balance_after, 180);
    }

    #[test]
    fn overdraft_is_rejected_without_side_effects() {
        let mut wallet = Wallet::new(40);
        let err = wallet.debit(3, CoinFlow::Purchase, 50, "goldfish").unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                needed: 50,
                available: 40
            }
        );
        assert_eq!(wallet.balance(), 40);
        assert!(wallet.entries().is_empty());
    }

    #[test]
    fn exact_balance_can_be_spent() {
        let mut wallet = Wallet::new(50);
        assert!(wallet.can_afford(50));
        assert_eq!(wallet.debit(1, CoinFlow::Feed, 50, "pellets").unwrap(), 0);
        assert!(!wallet.can_afford(1));
    }

    #[test]
    fn flows_must_match_direction() {
        let mut wallet = Wallet::new(10);
        assert!(matches!(
            wallet.credit(1, CoinFlow::Purchase, 5, ""),
            Err(LedgerError::WrongDirection { .. })
        ));
        assert!(matches!(
            wallet.debit(1, CoinFlow::Harvest, 5, ""),
            Err(LedgerError::WrongDirection { .. })
        ));
        assert_eq!(wallet.balance(), 10);
    }

    #[test]
    fn zero_amounts_are_not_recorded() {
        let mut wallet = Wallet::new(10);
        wallet.debit(1, CoinFlow::Feed, 0, "water").unwrap();
        assert!(wallet.entries().is_empty());
        assert_eq!(wallet.balance(), 10);
    }

    #[test]
    fn entries_filter_by_tick() {
        let mut wallet = Wallet::new(100);
        wallet.credit(1, CoinFlow::PetReward, 5, "Rex").unwrap();
        wallet.credit(2, CoinFlow::PetReward, 5, "Rex").unwrap();
        wallet.credit(2, CoinFlow::RandomEvent, 20, "lucky coin").unwrap();
        assert_eq!(wallet.entries_for_tick(2).count(), 2);
    }

    #[test]
    fn history_serializes() {
        let mut wallet = Wallet::new(100);
        wallet.credit(7, CoinFlow::RestaurantPayout, 25, "pizza").unwrap();
        let json = serde_json::to_value(&wallet.entries()[0]).unwrap();
        assert_eq!(json["flow"], "restaurant_payout");
        assert_eq!(json["amount"], 25);
    }
}
