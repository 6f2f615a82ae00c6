//! Wallet capability boundary.
//!
//! The host environment injects an implementation of this trait instead of
//! the client reaching for an ambient provider object. `authorized_accounts`
//! maps to the silent `eth_accounts` request, `request_accounts` to the
//! prompting `eth_requestAccounts`.

use std::sync::Arc;

use alloy_primitives::Address;
use futures::future::BoxFuture;

use crate::chain::ContractTransport;
use crate::error::ConnectionError;

pub trait WalletProvider: Send + Sync {
    /// Accounts the user has already authorized, without prompting.
    fn authorized_accounts(&self) -> BoxFuture<'_, Result<Vec<Address>, ConnectionError>>;

    /// Prompt the user to authorize account access.
    fn request_accounts(&self) -> BoxFuture<'_, Result<Vec<Address>, ConnectionError>>;

    /// Open a signer-bound connection to the deployed contract for one
    /// account.
    fn open_contract(
        &self,
        identity: Address,
        contract: Address,
    ) -> BoxFuture<'_, Result<Arc<dyn ContractTransport>, ConnectionError>>;
}
