//! A user session.
//!
//! [`Session`] owns the wallet [`Connector`], the cached [`SessionState`] and
//! the pollers that keep it fresh. It is built once, loaded with
//! [`Session::load`] and stopped with [`Session::teardown`] (or by dropping
//! it).
//!
//! Reads follow one policy: a failed read is logged and ignored, the state
//! simply does not advance. A wrong network is the exception. It is recorded
//! in [`SessionState::network_error`] until a read succeeds again, so poller
//! ticks surface it too. Actions log their failure but hand the error back
//! so the caller can show it.
use std::{fmt, future::Future, sync::Arc, time::Duration};

use alloy::primitives::{Address, TxHash, U256};
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use crate::{
    clock::{Clock, SystemClock},
    config::Config,
    contract::NftContract,
    error::{Error, Result},
    poller::PollerHandle,
    state::{presale_has_ended, SessionState},
    view::Page,
    wallet::{Connector, Network, RpcModal, WalletModal},
};

/// Confirmation of a successful user operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The wallet is connected on the expected network.
    WalletConnected,
    /// The presale was started.
    PresaleStarted,
    /// A token was minted.
    Minted,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Notice::WalletConnected => "Wallet connected",
            Notice::PresaleStarted => "Presale started",
            Notice::Minted => "Successfully Minted a srtk",
        })
    }
}

/// A user session against one NFT contract.
pub struct Session {
    shared: Arc<Shared>,
    pollers: Mutex<PollerHandle>,
}

/// Part of the session the pollers hold on to.
struct Shared {
    connector: Connector,
    contract_address: Address,
    mint_fee: U256,
    max_supply: u64,
    poll_interval: Duration,
    clock: Arc<dyn Clock>,
    state: watch::Sender<SessionState>,
}

impl Session {
    /// Build a session connecting over JSON-RPC as configured.
    ///
    /// # Errors
    ///
    /// May fail if the rpc url or the private key are invalid, or if
    /// [`Config::validate`] rejects `config`.
    pub fn from_config(config: &Config) -> eyre::Result<Self> {
        let modal =
            RpcModal::new(&config.rpc_url, config.private_key.as_deref())?;
        Self::new(config, Box::new(modal))
    }

    /// Build a session obtaining its wallet from `modal`.
    ///
    /// # Errors
    ///
    /// May fail if [`Config::validate`] rejects `config`.
    pub fn new(
        config: &Config,
        modal: Box<dyn WalletModal>,
    ) -> eyre::Result<Self> {
        Self::with_clock(config, modal, Arc::new(SystemClock))
    }

    /// Like [`Session::new`], reading the current time from `clock`.
    ///
    /// # Errors
    ///
    /// May fail if [`Config::validate`] rejects `config`.
    pub fn with_clock(
        config: &Config,
        modal: Box<dyn WalletModal>,
        clock: Arc<dyn Clock>,
    ) -> eyre::Result<Self> {
        config.validate()?;
        let network =
            Network { name: config.network.clone(), chain_id: config.chain_id };
        let (state, _) = watch::channel(SessionState::default());
        let shared = Shared {
            connector: Connector::new(modal, network),
            contract_address: config.contract_address,
            mint_fee: config.mint_fee()?,
            max_supply: config.max_supply,
            poll_interval: config.poll_interval(),
            clock,
            state,
        };
        Ok(Self {
            shared: Arc::new(shared),
            pollers: Mutex::new(PollerHandle::default()),
        })
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state.subscribe()
    }

    /// Render the current state.
    #[must_use]
    pub fn page(&self) -> Page {
        Page::new(&self.shared.state.borrow(), self.shared.max_supply)
    }

    /// Run the page-load sequence and start polling.
    ///
    /// Connects the wallet, determines ownership, checks whether the presale
    /// started and, if so, whether it ended, reads the minted count and then
    /// starts both pollers. Calling it again restarts the pollers.
    ///
    /// # Errors
    ///
    /// Returns the wallet connection error, [`Error::WrongNetwork`] in
    /// particular; nothing else runs in that case.
    pub async fn load(&self) -> Result<Notice> {
        let notice = self.shared.connect_wallet().await?;
        self.shared.load_owner().await;
        if self.shared.check_presale_started().await == Some(true) {
            self.shared.check_presale_ended().await;
        }
        self.shared.refresh_minted().await;
        self.start_polling().await;
        Ok(notice)
    }

    /// Connect the wallet without loading anything else.
    ///
    /// # Errors
    ///
    /// See [`Connector::connect`].
    pub async fn connect_wallet(&self) -> Result<Notice> {
        self.shared.connect_wallet().await
    }

    /// Refresh `is_owner`.
    pub async fn load_owner(&self) {
        self.shared.load_owner().await;
    }

    /// Refresh `presale_started`, returning the value read.
    pub async fn check_presale_started(&self) -> Option<bool> {
        self.shared.check_presale_started().await
    }

    /// Refresh `presale_ended`, returning the value computed.
    pub async fn check_presale_ended(&self) -> Option<bool> {
        self.shared.check_presale_ended().await
    }

    /// Refresh the minted count, returning the value read.
    pub async fn refresh_minted(&self) -> Option<U256> {
        self.shared.refresh_minted().await
    }

    /// (Re)start the minted-count and presale pollers.
    pub async fn start_polling(&self) {
        let mut pollers = self.pollers.lock().await;
        pollers.stop();

        let period = self.shared.poll_interval;
        let shared = Arc::clone(&self.shared);
        pollers.spawn("minted", period, move || {
            let shared = Arc::clone(&shared);
            async move {
                shared.refresh_minted().await;
            }
        });
        let shared = Arc::clone(&self.shared);
        pollers.spawn("presale", period, move || {
            let shared = Arc::clone(&shared);
            async move {
                shared.poll_presale().await;
            }
        });
        info!(?period, "pollers started");
    }

    /// Number of pollers currently running.
    pub async fn pollers_running(&self) -> usize {
        self.pollers.lock().await.running()
    }

    /// Stop the pollers.
    pub async fn teardown(&self) {
        self.pollers.lock().await.stop();
        info!("session torn down");
    }

    /// Start the presale. Only the contract owner can.
    ///
    /// # Errors
    ///
    /// Any connection or transaction error, already logged.
    pub async fn start_presale(&self) -> Result<Notice> {
        self.shared
            .submit(
                "startPresale",
                |contract| async move { contract.start_presale().await },
                |state| assign(&mut state.presale_started, true),
            )
            .await?;
        Ok(Notice::PresaleStarted)
    }

    /// Mint during the presale, paying the configured fee.
    ///
    /// # Errors
    ///
    /// Any connection or transaction error, already logged.
    pub async fn presale_mint(&self) -> Result<Notice> {
        let fee = self.shared.mint_fee;
        self.shared
            .submit(
                "presaleMint",
                |contract| async move { contract.presale_mint(fee).await },
                |_| false,
            )
            .await?;
        Ok(Notice::Minted)
    }

    /// Mint after the presale, paying the configured fee.
    ///
    /// # Errors
    ///
    /// Any connection or transaction error, already logged.
    pub async fn public_mint(&self) -> Result<Notice> {
        let fee = self.shared.mint_fee;
        self.shared
            .submit(
                "mint",
                |contract| async move { contract.mint(fee).await },
                |_| false,
            )
            .await?;
        Ok(Notice::Minted)
    }
}

impl Shared {
    fn update(&self, modify: impl FnOnce(&mut SessionState) -> bool) {
        self.state.send_if_modified(modify);
    }

    async fn contract(
        &self,
        need_signer: bool,
    ) -> Result<Arc<dyn NftContract>> {
        let handle = self.connector.connect(need_signer).await?;
        Ok(handle.contract(self.contract_address))
    }

    async fn connect_wallet(&self) -> Result<Notice> {
        debug!("connecting wallet");
        if let Err(error) = self.connector.connect(false).await {
            warn!(%error, "wallet connection failed");
            return Err(error);
        }
        self.update(|state| {
            let connected = assign(&mut state.wallet_connected, true);
            assign(&mut state.network_error, None) | connected
        });
        info!(contract = %self.contract_address, "wallet connected");
        Ok(Notice::WalletConnected)
    }

    async fn load_owner(&self) {
        let read = async {
            let handle = self.connector.connect(true).await?;
            let owner =
                handle.contract(self.contract_address).owner().await?;
            Ok::<_, Error>(handle.account() == Some(owner))
        };
        let Some(is_owner) = self.logged("owner", read.await) else {
            return;
        };
        debug!(is_owner, "owner checked");
        self.update(|state| assign(&mut state.is_owner, is_owner));
    }

    async fn check_presale_started(&self) -> Option<bool> {
        let read =
            async { self.contract(false).await?.presale_started().await };
        let started = self.logged("presaleStarted", read.await)?;
        debug!(started, "presale start checked");
        self.update(|state| assign(&mut state.presale_started, started));
        Some(started)
    }

    async fn check_presale_ended(&self) -> Option<bool> {
        let read =
            async { self.contract(false).await?.presale_ended().await };
        let end = self.logged("presaleEnded", read.await)?;
        let ended = presale_has_ended(end, self.clock.now_millis());
        debug!(%end, ended, "presale end checked");
        self.update(|state| assign(&mut state.presale_ended, ended));
        Some(ended)
    }

    async fn refresh_minted(&self) -> Option<U256> {
        let read = async { self.contract(false).await?.token_ids().await };
        let minted = self.logged("tokenIds", read.await)?;
        debug!(%minted, "minted count read");
        self.update(|state| assign(&mut state.minted, minted.to_string()));
        Some(minted)
    }

    /// Log a failed read and drop the error. A network mismatch is also
    /// published in the state, and cleared by the next successful read.
    fn logged<T>(&self, read: &'static str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.update(|state| assign(&mut state.network_error, None));
                Some(value)
            }
            Err(error) if error.is_wrong_network() => {
                error!(read, %error, "wallet is on the wrong network");
                let message = Some(error.to_string());
                self.update(|state| assign(&mut state.network_error, message));
                None
            }
            Err(error) => {
                warn!(read, %error, "contract read failed");
                None
            }
        }
    }

    async fn poll_presale(&self) {
        if self.check_presale_started().await == Some(true) {
            self.check_presale_ended().await;
        }
    }

    /// Send a transaction built by `send` with a signing handle, applying
    /// `on_confirmed` to the state once it is mined. `loading` is set for the
    /// whole call.
    async fn submit<S, Fut>(
        &self,
        action: &'static str,
        send: S,
        on_confirmed: impl FnOnce(&mut SessionState) -> bool,
    ) -> Result<TxHash>
    where
        S: FnOnce(Arc<dyn NftContract>) -> Fut,
        Fut: Future<Output = Result<TxHash>>,
    {
        let _loading = Loading::set(&self.state);
        let result = async { send(self.contract(true).await?).await }.await;
        match &result {
            Ok(tx) => {
                info!(action, %tx, "transaction confirmed");
                self.update(on_confirmed);
            }
            Err(error) => warn!(action, %error, "transaction failed"),
        }
        result
    }
}

/// Keeps `loading` set until dropped.
struct Loading<'a>(&'a watch::Sender<SessionState>);

impl<'a> Loading<'a> {
    fn set(state: &'a watch::Sender<SessionState>) -> Self {
        state.send_if_modified(|state| assign(&mut state.loading, true));
        Self(state)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.0.send_if_modified(|state| assign(&mut state.loading, false));
    }
}

/// Store `value` in `slot`, reporting whether it changed.
fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
