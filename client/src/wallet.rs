//! Wallet connection.
//!
//! A [`WalletModal`] stands for the provider selection a user goes through to
//! hand a wallet to the dapp. The [`Connector`] owns one modal configured for
//! a single network, caches the wallet it yields for the rest of the session
//! and refuses to hand out anything while the wallet is on another chain.
use std::sync::Arc;

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::{
    contract::{NftContract, RpcNftContract},
    error::{Error, Result},
};

/// A connected wallet.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Chain id of the network the wallet is currently on.
    async fn chain_id(&self) -> Result<u64>;

    /// Address of the active signing account.
    ///
    /// # Errors
    ///
    /// * [`Error::NoSigner`] - If the wallet is read-only.
    async fn account(&self) -> Result<Address>;

    /// Bind the contract at `address` through this wallet.
    fn contract(&self, address: Address) -> Arc<dyn NftContract>;
}

/// Provider selection: yields a wallet once the user picked one.
#[async_trait]
pub trait WalletModal: Send + Sync {
    /// Prompt for a wallet.
    async fn connect(&self) -> Result<Arc<dyn Wallet>>;
}

/// Network a [`Connector`] is locked to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    /// Display name, e.g. `goerli`.
    pub name: String,
    /// Expected chain id.
    pub chain_id: u64,
}

/// Handle returned by [`Connector::connect`].
#[derive(Clone)]
pub enum Handle {
    /// Read access only.
    ReadOnly(Arc<dyn Wallet>),
    /// Transaction-capable access, bound to `account`.
    Signer {
        /// The wallet.
        wallet: Arc<dyn Wallet>,
        /// Account transactions are signed by.
        account: Address,
    },
}

impl Handle {
    /// The underlying wallet.
    #[must_use]
    pub fn wallet(&self) -> &Arc<dyn Wallet> {
        match self {
            Handle::ReadOnly(wallet) | Handle::Signer { wallet, .. } => wallet,
        }
    }

    /// The signing account, if this is a signer handle.
    #[must_use]
    pub fn account(&self) -> Option<Address> {
        match self {
            Handle::ReadOnly(_) => None,
            Handle::Signer { account, .. } => Some(*account),
        }
    }

    /// Bind the contract at `address` through this handle.
    #[must_use]
    pub fn contract(&self, address: Address) -> Arc<dyn NftContract> {
        self.wallet().contract(address)
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handle::ReadOnly(_) => f.write_str("ReadOnly"),
            Handle::Signer { account, .. } => {
                f.debug_struct("Signer").field("account", account).finish()
            }
        }
    }
}

/// Owns the provider selection for one session.
pub struct Connector {
    modal: Box<dyn WalletModal>,
    network: Network,
    wallet: OnceCell<Arc<dyn Wallet>>,
}

impl Connector {
    /// Create a connector locked to `network`.
    #[must_use]
    pub fn new(modal: Box<dyn WalletModal>, network: Network) -> Self {
        Self { modal, network, wallet: OnceCell::new() }
    }

    /// The network this connector is locked to.
    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Whether a wallet has been obtained in this session.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.wallet.initialized()
    }

    /// Obtain a read-only or, with `need_signer`, a signing handle.
    ///
    /// Prompts the modal only until a wallet has been obtained. The chain id
    /// is checked on every call since the user may switch networks.
    ///
    /// # Errors
    ///
    /// * [`Error::WrongNetwork`] - If the wallet is not on the configured
    ///   network.
    /// * [`Error::NoSigner`] - If `need_signer` is set and the wallet is
    ///   read-only.
    /// * Any error of the modal or of the chain id request.
    pub async fn connect(&self, need_signer: bool) -> Result<Handle> {
        let wallet = self
            .wallet
            .get_or_try_init(|| async {
                debug!(network = %self.network.name, "prompting for a wallet");
                self.modal.connect().await
            })
            .await?
            .clone();

        let actual = wallet.chain_id().await?;
        if actual != self.network.chain_id {
            warn!(
                expected = self.network.chain_id,
                actual, "wallet is on the wrong network"
            );
            return Err(Error::WrongNetwork {
                network: self.network.name.clone(),
                expected: self.network.chain_id,
                actual,
            });
        }

        if !need_signer {
            return Ok(Handle::ReadOnly(wallet));
        }

        let account = wallet.account().await?;
        Ok(Handle::Signer { wallet, account })
    }
}

/// [`WalletModal`] that connects over HTTP JSON-RPC, signing with a local
/// private key when one is configured.
#[derive(Debug, Clone)]
pub struct RpcModal {
    url: Url,
    signer: Option<PrivateKeySigner>,
}

impl RpcModal {
    /// Create a modal for the endpoint at `rpc_url`.
    ///
    /// # Errors
    ///
    /// May fail if `rpc_url` or `private_key` cannot be parsed.
    pub fn new(
        rpc_url: &str,
        private_key: Option<&str>,
    ) -> eyre::Result<Self> {
        let url = rpc_url
            .parse::<Url>()
            .map_err(|e| eyre::eyre!("invalid rpc url {rpc_url}: {e}"))?;
        let signer = private_key
            .map(str::parse::<PrivateKeySigner>)
            .transpose()
            .map_err(|e| eyre::eyre!("invalid private key: {e}"))?;
        Ok(Self { url, signer })
    }
}

#[async_trait]
impl WalletModal for RpcModal {
    async fn connect(&self) -> Result<Arc<dyn Wallet>> {
        let (provider, account) = match &self.signer {
            Some(signer) => {
                let account = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer.clone()))
                    .connect_http(self.url.clone())
                    .erased();
                (provider, Some(account))
            }
            None => {
                let provider = ProviderBuilder::new()
                    .connect_http(self.url.clone())
                    .erased();
                (provider, None)
            }
        };
        info!(url = %self.url, ?account, "wallet connected");
        Ok(Arc::new(RpcWallet { provider, account }))
    }
}

/// Wallet produced by [`RpcModal`].
#[derive(Debug, Clone)]
pub struct RpcWallet {
    provider: DynProvider,
    account: Option<Address>,
}

#[async_trait]
impl Wallet for RpcWallet {
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn account(&self) -> Result<Address> {
        self.account.ok_or(Error::NoSigner)
    }

    fn contract(&self, address: Address) -> Arc<dyn NftContract> {
        Arc::new(RpcNftContract::new(address, self.provider.clone()))
    }
}
