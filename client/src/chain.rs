//! Contract access: typed reads and writes over an opaque transport, plus
//! fan-out of emitted contract events to subscribers.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use alloy_primitives::Address;
use futures::future::BoxFuture;
use log::{debug, info};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use chainbrawl_shared::{
    normalize, Boss, Character, ContractEvent, EventKind, PlayableCharacter, RawCharacter,
    METHOD_ATTACK_BOSS, METHOD_CHECK_NFT, METHOD_DEFAULT_CHARACTERS, METHOD_GET_BOSS,
    METHOD_MINT_CHARACTER,
};

use crate::config::ClientConfig;
use crate::error::{ChainError, ConnectionError, TransactionError};
use crate::wallet::WalletProvider;

/// The opaque contract-access seam. Implementations bind a signer and the
/// contract ABI; the client only sees method names and JSON-shaped payloads.
pub trait ContractTransport: Send + Sync {
    /// Non-mutating contract call.
    fn call<'a>(
        &'a self,
        method: &'a str,
        args: Vec<Value>,
    ) -> BoxFuture<'a, Result<Value, ChainError>>;

    /// State-changing contract call. The returned handle's confirmation
    /// suspends until the transaction is mined.
    fn send<'a>(
        &'a self,
        method: &'a str,
        args: Vec<Value>,
    ) -> BoxFuture<'a, Result<PendingTransaction, TransactionError>>;

    /// Contract event feed in emission order. Consumed once per client.
    fn event_stream(
        &self,
    ) -> BoxFuture<'_, Result<mpsc::UnboundedReceiver<ContractEvent>, ChainError>>;
}

/// A submitted, not yet mined transaction.
pub struct PendingTransaction {
    hash: String,
    mined: BoxFuture<'static, Result<(), TransactionError>>,
}

impl PendingTransaction {
    pub fn new(
        hash: impl Into<String>,
        mined: BoxFuture<'static, Result<(), TransactionError>>,
    ) -> Self {
        Self {
            hash: hash.into(),
            mined,
        }
    }

    /// Transaction hash as submitted
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Suspend until the transaction is mined.
    ///
    /// `None` waits indefinitely; a bound fails with
    /// [`TransactionError::Timeout`] once elapsed. There is no client-side
    /// abort of a submitted write.
    pub async fn confirmation(self, timeout: Option<Duration>) -> Result<(), TransactionError> {
        match timeout {
            None => self.mined.await,
            Some(limit) => match tokio::time::timeout(limit, self.mined).await {
                Ok(result) => result,
                Err(_) => Err(TransactionError::Timeout),
            },
        }
    }
}

struct Subscriber {
    id: u64,
    kind: EventKind,
    sender: mpsc::UnboundedSender<ContractEvent>,
}

#[derive(Default)]
struct SubscriberTable {
    next_id: u64,
    entries: Vec<Subscriber>,
}

/// Receives one kind of contract event in delivery order.
///
/// Dropping the subscription deregisters it, so a flow that goes inactive
/// releases its slot with it.
pub struct Subscription {
    id: u64,
    receiver: mpsc::UnboundedReceiver<ContractEvent>,
    table: Weak<Mutex<SubscriberTable>>,
}

impl Subscription {
    /// Next event, suspending until one arrives. `None` once the client is
    /// gone.
    pub async fn next(&mut self) -> Option<ContractEvent> {
        self.receiver.recv().await
    }

    /// Next already-delivered event, if any. Never suspends.
    pub fn try_next(&mut self) -> Option<ContractEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            if let Ok(mut table) = table.lock() {
                table.entries.retain(|s| s.id != self.id);
            }
        }
    }
}

/// Signer-bound handle to the deployed game contract for one identity.
pub struct ChainClient {
    identity: Address,
    transport: Arc<dyn ContractTransport>,
    subscribers: Arc<Mutex<SubscriberTable>>,
    dispatcher: JoinHandle<()>,
}

impl ChainClient {
    /// Connect to the configured contract as `identity`.
    ///
    /// Fails with [`ConnectionError`] when the wallet cannot produce a
    /// signer-bound transport or its event feed.
    pub async fn connect(
        wallet: &dyn WalletProvider,
        identity: Address,
        config: &ClientConfig,
    ) -> Result<Self, ConnectionError> {
        let transport = wallet
            .open_contract(identity, config.contract_address)
            .await?;
        let events = transport
            .event_stream()
            .await
            .map_err(|e| ConnectionError::Provider(e.to_string()))?;

        let subscribers = Arc::new(Mutex::new(SubscriberTable::default()));
        let dispatcher = tokio::spawn(dispatch_events(events, Arc::clone(&subscribers)));
        info!("Contract client ready for {}", identity);

        Ok(Self {
            identity,
            transport,
            subscribers,
            dispatcher,
        })
    }

    pub fn identity(&self) -> Address {
        self.identity
    }

    /// Subscribe to one kind of contract event.
    pub fn subscribe(&self, kind: EventKind) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = match self.subscribers.lock() {
            Ok(mut table) => {
                table.next_id += 1;
                let id = table.next_id;
                table.entries.push(Subscriber { id, kind, sender });
                id
            }
            Err(_) => 0,
        };
        Subscription {
            id,
            receiver,
            table: Arc::downgrade(&self.subscribers),
        }
    }

    /// The character owned by this identity, if one was ever minted.
    ///
    /// The contract signals "none" with an empty name.
    pub async fn check_if_user_has_nft(&self) -> Result<Option<PlayableCharacter>, ChainError> {
        let value = self.transport.call(METHOD_CHECK_NFT, Vec::new()).await?;
        let raw: RawCharacter = decode(value)?;
        if raw.name.is_empty() {
            return Ok(None);
        }
        Ok(Some(normalize(&raw)?.into_playable()))
    }

    /// The roster of mintable character templates.
    pub async fn get_all_default_characters(&self) -> Result<Vec<Character>, ChainError> {
        let value = self
            .transport
            .call(METHOD_DEFAULT_CHARACTERS, Vec::new())
            .await?;
        let raws: Vec<RawCharacter> = decode(value)?;
        raws.iter()
            .map(|raw| normalize(raw).map_err(ChainError::from))
            .collect()
    }

    /// The boss singleton.
    pub async fn get_big_boss(&self) -> Result<Boss, ChainError> {
        let value = self.transport.call(METHOD_GET_BOSS, Vec::new()).await?;
        let raw: RawCharacter = decode(value)?;
        Ok(normalize(&raw)?.into_template())
    }

    /// Submit a mint for the template at `template_index`.
    pub async fn mint_character(
        &self,
        template_index: u32,
    ) -> Result<PendingTransaction, TransactionError> {
        self.transport
            .send(METHOD_MINT_CHARACTER, vec![Value::from(template_index)])
            .await
    }

    /// Submit an attack on the boss.
    pub async fn attack_boss(&self) -> Result<PendingTransaction, TransactionError> {
        self.transport.send(METHOD_ATTACK_BOSS, Vec::new()).await
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|t| t.entries.len()).unwrap_or(0)
    }
}

impl Drop for ChainClient {
    fn drop(&mut self) {
        self.dispatcher.abort();
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ChainError> {
    serde_json::from_value(value).map_err(|e| ChainError::Decode(e.to_string()))
}

/// Fan transport events out to matching subscribers, pruning closed ones.
async fn dispatch_events(
    mut events: mpsc::UnboundedReceiver<ContractEvent>,
    subscribers: Arc<Mutex<SubscriberTable>>,
) {
    while let Some(event) = events.recv().await {
        debug!("Contract event: {:?}", event);
        let Ok(mut table) = subscribers.lock() else {
            break;
        };
        table
            .entries
            .retain(|s| s.kind != event.kind() || s.sender.send(event.clone()).is_ok());
    }
    debug!("Contract event feed closed");
}
