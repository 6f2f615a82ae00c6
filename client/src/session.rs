//! Session state: wallet identity and the owned character decide which flow
//! is active.

use std::sync::Arc;

use alloy_primitives::Address;
use log::{info, warn};

use chainbrawl_shared::PlayableCharacter;

use crate::chain::ChainClient;
use crate::config::ClientConfig;
use crate::error::ConnectionError;
use crate::wallet::WalletProvider;

/// Which screen of the client is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Disconnected,
    Connecting,
    /// Wallet connected, nothing minted yet: character selection
    ConnectedNoCharacter,
    /// Wallet connected with a minted character: the battle
    ConnectedWithCharacter,
}

/// Tracks the connected wallet identity and the owned character.
///
/// The wallet capability is injected; a host without one can still construct
/// a session, which then refuses to connect.
pub struct Session {
    wallet: Option<Arc<dyn WalletProvider>>,
    config: ClientConfig,
    phase: SessionPhase,
    identity: Option<Address>,
    client: Option<Arc<ChainClient>>,
    character: Option<PlayableCharacter>,
}

impl Session {
    pub fn new(wallet: Option<Arc<dyn WalletProvider>>, config: ClientConfig) -> Self {
        Self {
            wallet,
            config,
            phase: SessionPhase::Disconnected,
            identity: None,
            client: None,
            character: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn identity(&self) -> Option<Address> {
        self.identity
    }

    pub fn character(&self) -> Option<&PlayableCharacter> {
        self.character.as_ref()
    }

    /// Chain handle for the active flows; present in both connected phases.
    pub fn client(&self) -> Option<Arc<ChainClient>> {
        self.client.clone()
    }

    /// Silent reconnection on startup.
    ///
    /// Uses already-authorized accounts and never prompts; with no wallet or
    /// no authorized account the session stays `Disconnected`.
    pub async fn resume(&mut self) -> Result<SessionPhase, ConnectionError> {
        let Some(wallet) = self.wallet.clone() else {
            info!("No wallet provider found");
            return Ok(self.phase);
        };
        let accounts = wallet.authorized_accounts().await?;
        match accounts.first().copied() {
            Some(account) => {
                info!("Found an authorized account: {}", account);
                self.establish(account).await
            }
            None => {
                info!("No authorized account found");
                Ok(self.phase)
            }
        }
    }

    /// Prompt the user to connect their wallet.
    ///
    /// `Disconnected -> Connecting -> ConnectedNoCharacter |
    /// ConnectedWithCharacter`; any failure restores `Disconnected` and is
    /// returned for the host to surface.
    pub async fn connect_wallet(&mut self) -> Result<SessionPhase, ConnectionError> {
        let Some(wallet) = self.wallet.clone() else {
            warn!("Wallet connect requested but no provider is available");
            return Err(ConnectionError::NoProvider);
        };
        self.phase = SessionPhase::Connecting;
        let accounts = match wallet.request_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!("Wallet connect failed: {}", e);
                self.phase = SessionPhase::Disconnected;
                return Err(e);
            }
        };
        let Some(account) = accounts.first().copied() else {
            self.phase = SessionPhase::Disconnected;
            return Err(ConnectionError::Rejected);
        };
        info!("Connected account {}", account);
        self.establish(account).await
    }

    /// Record the character produced by the selection flow.
    pub fn character_minted(&mut self, character: PlayableCharacter) {
        if self.client.is_none() {
            warn!("Mint reported without an active connection; ignoring");
            return;
        }
        info!("Character '{}' is ready for battle", character.name);
        self.character = Some(character);
        self.phase = SessionPhase::ConnectedWithCharacter;
    }

    /// Apply a wallet-side account change.
    ///
    /// An empty set tears the session down to `Disconnected`; a new account
    /// rebinds everything under the new identity.
    pub async fn accounts_changed(
        &mut self,
        accounts: Vec<Address>,
    ) -> Result<SessionPhase, ConnectionError> {
        match accounts.first().copied() {
            None => {
                info!("Wallet revoked all accounts; disconnecting");
                self.reset();
                Ok(self.phase)
            }
            Some(account) if Some(account) == self.identity => Ok(self.phase),
            Some(account) => {
                info!("Wallet switched to account {}", account);
                self.reset();
                self.establish(account).await
            }
        }
    }

    /// Bind a chain client to `identity` and decide the connected phase from
    /// the on-chain owned-character read.
    async fn establish(&mut self, identity: Address) -> Result<SessionPhase, ConnectionError> {
        let Some(wallet) = self.wallet.clone() else {
            return Err(ConnectionError::NoProvider);
        };
        let client = match ChainClient::connect(wallet.as_ref(), identity, &self.config).await {
            Ok(client) => Arc::new(client),
            Err(e) => {
                warn!("Contract connection failed for {}: {}", identity, e);
                self.reset();
                return Err(e);
            }
        };

        // A failed read is not a failed connection: land in character
        // selection and let the user retry from there.
        self.character = match client.check_if_user_has_nft().await {
            Ok(found) => found,
            Err(e) => {
                warn!("Owned character lookup failed: {}", e);
                None
            }
        };

        self.identity = Some(identity);
        self.client = Some(client);
        self.phase = match self.character {
            Some(ref character) => {
                info!("Found minted character '{}'", character.name);
                SessionPhase::ConnectedWithCharacter
            }
            None => {
                info!("No minted character for {}", identity);
                SessionPhase::ConnectedNoCharacter
            }
        };
        Ok(self.phase)
    }

    fn reset(&mut self) {
        self.phase = SessionPhase::Disconnected;
        self.identity = None;
        self.client = None;
        self.character = None;
    }
}
