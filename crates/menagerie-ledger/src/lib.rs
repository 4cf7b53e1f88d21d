//! Coin wallet and append-only transaction history.
//!
//! Every coin that enters or leaves the player's purse goes through the
//! [`Wallet`]. The balance is an unsigned integer and can never go
//! negative: a debit larger than the balance is rejected before anything
//! is recorded.
//!
//! # Modules
//!
//! - [`wallet`] -- The [`Wallet`]: balance plus history, with checked
//!   credit and debit.
//! - [`audit`] -- Replays the history and confirms it reproduces the
//!   current balance.
//!
//! # Flows
//!
//! | Flow | Direction |
//! |------|-----------|
//! | Purchase | debit |
//! | Feed | debit |
//! | Sale | credit |
//! | `PetReward` | credit |
//! | Harvest | credit |
//! | `RestaurantPayout` | credit |
//! | `RandomEvent` | credit |
//!
//! # Usage
//!
//! ```
//! use menagerie_ledger::Wallet;
//! use menagerie_ledger::audit::AuditResult;
//! use menagerie_types::CoinFlow;
//!
//! let mut wallet = Wallet::new(200);
//! wallet.debit(1, CoinFlow::Purchase, 50, "goldfish").ok();
//! wallet.credit(2, CoinFlow::PetReward, 5, "Rex").ok();
//!
//! assert_eq!(wallet.balance(), 155);
//! assert_eq!(wallet.audit(), AuditResult::Balanced);
//! ```

pub mod audit;
pub mod wallet;

pub use audit::AuditResult;
pub use wallet::Wallet;

use menagerie_types::CoinFlow;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when moving coins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The wallet holds fewer coins than the debit needs.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds {
        /// Coins the debit needs.
        needed: u64,
        /// Coins currently held.
        available: u64,
    },

    /// A credit flow was passed to `debit` or the other way round.
    #[error("{flow:?} cannot be recorded as a {attempted}")]
    WrongDirection {
        /// The flow that was passed.
        flow: CoinFlow,
        /// `"debit"` or `"credit"`.
        attempted: &'static str,
    },

    /// The credit would overflow the balance.
    #[error("balance overflow crediting {amount} coins")]
    Overflow {
        /// The credit that did not fit.
        amount: u64,
    },
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A mismatch between the recorded history and the live balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAnomaly {
    /// Balance the history adds up to.
    pub replayed: u64,
    /// Balance the wallet actually holds.
    pub actual: u64,
    /// Index of the first entry whose `balance_after` disagrees with the
    /// replay, if any.
    pub first_bad_entry: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

impl core::fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
