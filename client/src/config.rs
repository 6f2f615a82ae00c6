//! Client configuration.

use alloy_primitives::{address, Address};

/// Address of the deployed game contract
const CONTRACT_ADDRESS: Address = address!("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

/// Settings for binding a session to the game contract.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The deployed contract every client call is issued against
    pub contract_address: Address,
}

impl ClientConfig {
    pub fn new(contract_address: Address) -> Self {
        Self { contract_address }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            contract_address: CONTRACT_ADDRESS,
        }
    }
}
