//! In-memory wallet and contract used by the unit tests.
use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc, Mutex, MutexGuard,
};

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use tokio::sync::Notify;

use crate::{
    clock::Clock,
    contract::NftContract,
    error::{Error, Result},
    wallet::{Wallet, WalletModal},
};

/// Contract storage shared by every fake wallet of a [`FakeChain`].
#[derive(Debug, Default)]
pub(crate) struct ContractState {
    pub(crate) token_ids: U256,
    pub(crate) owner: Address,
    pub(crate) presale_started: bool,
    pub(crate) presale_end: U256,
    pub(crate) fail_reads: bool,
    pub(crate) fail_writes: bool,
    pub(crate) token_id_reads: usize,
    pub(crate) fees: Vec<U256>,
}

#[derive(Debug, Default)]
struct Inner {
    chain_id: AtomicU64,
    contract: Mutex<ContractState>,
    gate: Mutex<Option<Arc<Notify>>>,
}

/// A fake chain hosting one NFT contract.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeChain(Arc<Inner>);

impl FakeChain {
    pub(crate) fn new(chain_id: u64) -> Self {
        let chain = Self::default();
        chain.set_chain_id(chain_id);
        chain
    }

    pub(crate) fn set_chain_id(&self, chain_id: u64) {
        self.0.chain_id.store(chain_id, Ordering::SeqCst);
    }

    pub(crate) fn contract(&self) -> MutexGuard<'_, ContractState> {
        self.0.contract.lock().unwrap()
    }

    /// Make every write wait until the returned [`Notify`] is notified.
    pub(crate) fn hold_writes(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.0.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    fn tx_hash(&self) -> TxHash {
        let nonce = self.contract().fees.len() + 1;
        TxHash::with_last_byte(u8::try_from(nonce).unwrap_or(u8::MAX))
    }

    async fn write(
        &self,
        sender: Option<Address>,
        apply: impl FnOnce(&mut ContractState, Address) -> bool + Send,
    ) -> Result<TxHash> {
        let gate = self.0.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let sender = sender.ok_or(Error::NoSigner)?;
        let hash = self.tx_hash();
        let mut contract = self.contract();
        if contract.fail_writes {
            return Err(Error::Connection("rpc unavailable".into()));
        }
        if apply(&mut contract, sender) {
            Ok(hash)
        } else {
            Err(Error::Reverted(hash))
        }
    }

    fn read<T>(&self, read: impl FnOnce(&mut ContractState) -> T) -> Result<T> {
        let mut contract = self.contract();
        if contract.fail_reads {
            return Err(Error::Connection("rpc unavailable".into()));
        }
        Ok(read(&mut contract))
    }
}

/// Fake provider selection handing out a [`FakeWallet`].
#[derive(Debug)]
pub(crate) struct FakeModal {
    chain: FakeChain,
    account: Option<Address>,
    prompts: Arc<AtomicUsize>,
    reject_next: Mutex<bool>,
}

impl FakeModal {
    pub(crate) fn new(chain: &FakeChain, account: Option<Address>) -> Self {
        Self {
            chain: chain.clone(),
            account,
            prompts: Arc::default(),
            reject_next: Mutex::new(false),
        }
    }

    /// Counter of how many times the user was prompted.
    pub(crate) fn prompts(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.prompts)
    }

    /// Make the next prompt fail as if the user dismissed it.
    pub(crate) fn reject_next(&self) {
        *self.reject_next.lock().unwrap() = true;
    }
}

#[async_trait]
impl WalletModal for FakeModal {
    async fn connect(&self) -> Result<Arc<dyn Wallet>> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        if std::mem::take(&mut *self.reject_next.lock().unwrap()) {
            return Err(Error::Connection("user rejected the request".into()));
        }
        Ok(Arc::new(FakeWallet {
            chain: self.chain.clone(),
            account: self.account,
        }))
    }
}

#[derive(Debug)]
struct FakeWallet {
    chain: FakeChain,
    account: Option<Address>,
}

#[async_trait]
impl Wallet for FakeWallet {
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain.0.chain_id.load(Ordering::SeqCst))
    }

    async fn account(&self) -> Result<Address> {
        self.account.ok_or(Error::NoSigner)
    }

    fn contract(&self, _address: Address) -> Arc<dyn NftContract> {
        Arc::new(FakeContract {
            chain: self.chain.clone(),
            sender: self.account,
        })
    }
}

#[derive(Debug)]
struct FakeContract {
    chain: FakeChain,
    sender: Option<Address>,
}

#[async_trait]
impl NftContract for FakeContract {
    async fn token_ids(&self) -> Result<U256> {
        self.chain.read(|contract| {
            contract.token_id_reads += 1;
            contract.token_ids
        })
    }

    async fn owner(&self) -> Result<Address> {
        self.chain.read(|contract| contract.owner)
    }

    async fn presale_started(&self) -> Result<bool> {
        self.chain.read(|contract| contract.presale_started)
    }

    async fn presale_ended(&self) -> Result<U256> {
        self.chain.read(|contract| contract.presale_end)
    }

    async fn start_presale(&self) -> Result<TxHash> {
        self.chain
            .write(self.sender, |contract, sender| {
                if sender != contract.owner || contract.presale_started {
                    return false;
                }
                contract.presale_started = true;
                true
            })
            .await
    }

    async fn presale_mint(&self, fee: U256) -> Result<TxHash> {
        self.chain
            .write(self.sender, |contract, _| {
                if !contract.presale_started {
                    return false;
                }
                contract.fees.push(fee);
                contract.token_ids += U256::from(1);
                true
            })
            .await
    }

    async fn mint(&self, fee: U256) -> Result<TxHash> {
        self.chain
            .write(self.sender, |contract, _| {
                contract.fees.push(fee);
                contract.token_ids += U256::from(1);
                true
            })
            .await
    }
}

/// [`Clock`] frozen at a settable instant.
#[derive(Debug, Default)]
pub(crate) struct FixedClock(AtomicU64);

impl FixedClock {
    pub(crate) fn at(now_millis: u64) -> Self {
        Self(AtomicU64::new(now_millis))
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}
