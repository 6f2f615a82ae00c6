//! Error types for wallet and contract interaction.
//!
//! Nothing here retries: a connection failure halts in `Disconnected`, a
//! failed write resets presentational state, and every recovery path is a
//! manual user-initiated repeat of the action.

use chainbrawl_shared::NumericRangeError;

/// Wallet connection errors
#[derive(Debug)]
pub enum ConnectionError {
    /// No wallet provider is available in the host context
    NoProvider,
    /// The user declined the account prompt
    Rejected,
    /// The provider failed to service the request
    Provider(String),
}

impl std::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoProvider => write!(f, "No wallet provider available"),
            Self::Rejected => write!(f, "Wallet connection request rejected"),
            Self::Provider(e) => write!(f, "Wallet provider error: {}", e),
        }
    }
}

impl std::error::Error for ConnectionError {}

/// Read-path errors. Fatal to the current operation, never to the process.
#[derive(Debug)]
pub enum ChainError {
    /// The transport could not complete the call
    Transport(String),
    /// The payload did not match the expected wire shape
    Decode(String),
    /// A contract numeric exceeded the client's range
    Numeric(NumericRangeError),
}

impl std::fmt::Display for ChainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Contract call failed: {}", e),
            Self::Decode(e) => write!(f, "Malformed contract payload: {}", e),
            Self::Numeric(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ChainError {}

impl From<NumericRangeError> for ChainError {
    fn from(e: NumericRangeError) -> Self {
        Self::Numeric(e)
    }
}

/// Transaction submission and confirmation errors
#[derive(Debug)]
pub enum TransactionError {
    /// The write was never accepted by the transport
    Submit(String),
    /// The transaction was mined but reverted
    Reverted(String),
    /// The transaction was dropped before mining
    Dropped,
    /// The caller-supplied confirmation bound elapsed
    Timeout,
}

impl std::fmt::Display for TransactionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submit(e) => write!(f, "Transaction submission failed: {}", e),
            Self::Reverted(e) => write!(f, "Transaction reverted: {}", e),
            Self::Dropped => write!(f, "Transaction dropped before mining"),
            Self::Timeout => write!(f, "Timed out waiting for confirmation"),
        }
    }
}

impl std::error::Error for TransactionError {}

/// Mint flow errors
#[derive(Debug)]
pub enum MintError {
    /// The requested or confirmed index is outside the fetched roster
    UnknownTemplate(usize),
    /// The mint transaction failed or timed out
    Transaction(TransactionError),
    /// The minted event carried an index outside the client's range
    Numeric(NumericRangeError),
    /// The contract event feed closed before the minted event arrived
    EventStreamClosed,
}

impl std::fmt::Display for MintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTemplate(index) => write!(f, "No character template at index {}", index),
            Self::Transaction(e) => write!(f, "Mint failed: {}", e),
            Self::Numeric(e) => write!(f, "{}", e),
            Self::EventStreamClosed => write!(f, "Event feed closed before the mint was observed"),
        }
    }
}

impl std::error::Error for MintError {}

impl From<TransactionError> for MintError {
    fn from(e: TransactionError) -> Self {
        Self::Transaction(e)
    }
}
