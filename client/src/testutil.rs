//! Scripted wallet and transport doubles shared by the client tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, U256};
use futures::future::BoxFuture;
use serde_json::Value;
use tokio::sync::mpsc;

use chainbrawl_shared::{ContractEvent, RawCharacter};

use crate::chain::{ContractTransport, PendingTransaction};
use crate::error::{ChainError, ConnectionError, TransactionError};
use crate::wallet::WalletProvider;

pub(crate) fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("debug"),
    )
    .is_test(true)
    .try_init();
}

pub(crate) fn player() -> Address {
    Address::repeat_byte(0x11)
}

pub(crate) fn stranger() -> Address {
    Address::repeat_byte(0x22)
}

pub(crate) fn raw_character(
    name: &str,
    hp: u64,
    max_hp: u64,
    attack_damage: u64,
    defense: Option<u64>,
) -> RawCharacter {
    RawCharacter {
        name: name.to_string(),
        image_uri: format!("ipfs://{}", name.to_lowercase().replace(' ', "-")),
        hp: U256::from(hp),
        max_hp: U256::from(max_hp),
        attack_damage: U256::from(attack_damage),
        defense: defense.map(U256::from),
        critical_hit_at: None,
        critical_hit_counter: None,
    }
}

pub(crate) fn raw_json(raw: &RawCharacter) -> Value {
    serde_json::to_value(raw).unwrap()
}

/// Scripted transport: canned read results, a configurable write outcome,
/// and a handle for pushing contract events into connected clients.
pub(crate) struct MockTransport {
    reads: Mutex<HashMap<&'static str, Value>>,
    writes: Mutex<Vec<(String, Vec<Value>)>>,
    write_failure: Mutex<Option<TransactionError>>,
    hang_confirmations: AtomicBool,
    event_senders: Mutex<Vec<mpsc::UnboundedSender<ContractEvent>>>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            reads: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            write_failure: Mutex::new(None),
            hang_confirmations: AtomicBool::new(false),
            event_senders: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn insert_read(&self, method: &'static str, value: Value) {
        self.reads.lock().unwrap().insert(method, value);
    }

    pub(crate) fn fail_next_write(&self, error: TransactionError) {
        *self.write_failure.lock().unwrap() = Some(error);
    }

    /// All subsequent writes return confirmations that never resolve.
    pub(crate) fn never_confirm(&self) {
        self.hang_confirmations.store(true, Ordering::SeqCst);
    }

    pub(crate) fn push_event(&self, event: ContractEvent) {
        let mut senders = self.event_senders.lock().unwrap();
        senders.retain(|sender| sender.send(event.clone()).is_ok());
    }

    pub(crate) fn writes(&self) -> Vec<(String, Vec<Value>)> {
        self.writes.lock().unwrap().clone()
    }
}

impl ContractTransport for MockTransport {
    fn call<'a>(
        &'a self,
        method: &'a str,
        _args: Vec<Value>,
    ) -> BoxFuture<'a, Result<Value, ChainError>> {
        let result = self
            .reads
            .lock()
            .unwrap()
            .get(method)
            .cloned()
            .ok_or_else(|| ChainError::Transport(format!("no scripted result for {}", method)));
        Box::pin(async move { result })
    }

    fn send<'a>(
        &'a self,
        method: &'a str,
        args: Vec<Value>,
    ) -> BoxFuture<'a, Result<PendingTransaction, TransactionError>> {
        self.writes.lock().unwrap().push((method.to_string(), args));
        let failure = self.write_failure.lock().unwrap().take();
        let hang = self.hang_confirmations.load(Ordering::SeqCst);
        Box::pin(async move {
            if let Some(error) = failure {
                return Err(error);
            }
            let mined: BoxFuture<'static, Result<(), TransactionError>> = if hang {
                Box::pin(std::future::pending())
            } else {
                Box::pin(std::future::ready(Ok(())))
            };
            Ok(PendingTransaction::new("0xfeedbeef", mined))
        })
    }

    fn event_stream(
        &self,
    ) -> BoxFuture<'_, Result<mpsc::UnboundedReceiver<ContractEvent>, ChainError>> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.event_senders.lock().unwrap().push(sender);
        Box::pin(async move { Ok(receiver) })
    }
}

/// Scripted wallet capability bound to a [`MockTransport`].
pub(crate) struct MockWallet {
    transport: Arc<MockTransport>,
    authorized: Vec<Address>,
    prompt: Vec<Address>,
    reject: bool,
    prompted: AtomicBool,
}

impl MockWallet {
    pub(crate) fn new(transport: Arc<MockTransport>) -> Self {
        Self {
            transport,
            authorized: Vec::new(),
            prompt: Vec::new(),
            reject: false,
            prompted: AtomicBool::new(false),
        }
    }

    pub(crate) fn with_authorized(mut self, account: Address) -> Self {
        self.authorized.push(account);
        self
    }

    pub(crate) fn with_prompt(mut self, account: Address) -> Self {
        self.prompt.push(account);
        self
    }

    pub(crate) fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    pub(crate) fn was_prompted(&self) -> bool {
        self.prompted.load(Ordering::SeqCst)
    }
}

impl WalletProvider for MockWallet {
    fn authorized_accounts(&self) -> BoxFuture<'_, Result<Vec<Address>, ConnectionError>> {
        let accounts = self.authorized.clone();
        Box::pin(async move { Ok(accounts) })
    }

    fn request_accounts(&self) -> BoxFuture<'_, Result<Vec<Address>, ConnectionError>> {
        self.prompted.store(true, Ordering::SeqCst);
        let result = if self.reject {
            Err(ConnectionError::Rejected)
        } else {
            Ok(self.prompt.clone())
        };
        Box::pin(async move { result })
    }

    fn open_contract(
        &self,
        _identity: Address,
        _contract: Address,
    ) -> BoxFuture<'_, Result<Arc<dyn ContractTransport>, ConnectionError>> {
        let transport = Arc::clone(&self.transport) as Arc<dyn ContractTransport>;
        Box::pin(async move { Ok(transport) })
    }
}
