//! Client for the chainbrawl on-chain boss fight.
//!
//! Wires a wallet identity to the deployed game contract: session state,
//! character minting, and the boss battle, with authoritative game state
//! arriving as contract events.

pub mod chain;
pub mod config;
pub mod error;
pub mod flows;
pub mod session;
pub mod wallet;

pub use chain::{ChainClient, ContractTransport, PendingTransaction, Subscription};
pub use config::ClientConfig;
pub use error::{ChainError, ConnectionError, MintError, TransactionError};
pub use flows::{AttackState, Battle, CharacterSelection};
pub use session::{Session, SessionPhase};
pub use wallet::WalletProvider;

#[cfg(test)]
pub(crate) mod testutil;
