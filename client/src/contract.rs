//! Access to the external NFT contract.
//!
//! [`NftContract`] is the seam the session talks to. [`RpcNftContract`] backs
//! it with the `sol!` binding in [`crate::abi`] over any alloy provider.
use alloy::{
    network::{Ethereum, ReceiptResponse},
    primitives::{Address, TxHash, U256},
    providers::{DynProvider, PendingTransactionBuilder},
};
use async_trait::async_trait;
use tracing::debug;

use crate::{
    abi::SrtkNft::{self, SrtkNftInstance},
    error::{Error, Result},
};

/// Read and write calls of the srtk NFT contract.
///
/// Write calls return once the transaction is confirmed.
#[async_trait]
pub trait NftContract: Send + Sync {
    /// Number of tokens minted so far.
    async fn token_ids(&self) -> Result<U256>;

    /// Owner of the contract.
    async fn owner(&self) -> Result<Address>;

    /// Whether the presale has been started by the owner.
    async fn presale_started(&self) -> Result<bool>;

    /// Unix timestamp, in seconds, at which the presale ends.
    async fn presale_ended(&self) -> Result<U256>;

    /// Start the presale. Only the owner may do this.
    async fn start_presale(&self) -> Result<TxHash>;

    /// Mint a token during the presale, paying `fee` wei.
    async fn presale_mint(&self, fee: U256) -> Result<TxHash>;

    /// Mint a token after the presale, paying `fee` wei.
    async fn mint(&self, fee: U256) -> Result<TxHash>;
}

/// [`NftContract`] implementation over JSON-RPC.
#[derive(Debug, Clone)]
pub struct RpcNftContract {
    instance: SrtkNftInstance<DynProvider>,
}

impl RpcNftContract {
    /// Bind the contract deployed at `address` to `provider`.
    ///
    /// Whether writes are possible depends on `provider` having a wallet.
    #[must_use]
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self { instance: SrtkNft::new(address, provider) }
    }

    /// Address of the bound contract.
    #[must_use]
    pub fn address(&self) -> Address {
        *self.instance.address()
    }
}

#[async_trait]
impl NftContract for RpcNftContract {
    async fn token_ids(&self) -> Result<U256> {
        Ok(self.instance.tokenIds().call().await?)
    }

    async fn owner(&self) -> Result<Address> {
        Ok(self.instance.owner().call().await?)
    }

    async fn presale_started(&self) -> Result<bool> {
        Ok(self.instance.presaleStarted().call().await?)
    }

    async fn presale_ended(&self) -> Result<U256> {
        Ok(self.instance.presaleEnded().call().await?)
    }

    async fn start_presale(&self) -> Result<TxHash> {
        let pending = self.instance.startPresale().send().await?;
        confirm("startPresale", pending).await
    }

    async fn presale_mint(&self, fee: U256) -> Result<TxHash> {
        let pending = self.instance.presaleMint().value(fee).send().await?;
        confirm("presaleMint", pending).await
    }

    async fn mint(&self, fee: U256) -> Result<TxHash> {
        let pending = self.instance.mint().value(fee).send().await?;
        confirm("mint", pending).await
    }
}

/// Wait for `pending` to be mined and check the receipt status.
async fn confirm(
    function_name: &str,
    pending: PendingTransactionBuilder<Ethereum>,
) -> Result<TxHash> {
    debug!(
        function = function_name,
        tx = %pending.tx_hash(),
        "awaiting confirmation"
    );
    let receipt = pending.get_receipt().await?;
    let hash = receipt.transaction_hash;
    if receipt.status() {
        Ok(hash)
    } else {
        Err(Error::Reverted(hash))
    }
}
