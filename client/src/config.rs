//! Client configuration.
//!
//! Values are read from an optional `srtk.toml` and from `SRTK_*` environment
//! variables, e.g. `SRTK_RPC_URL` or `SRTK_CONTRACT_ADDRESS`.
use std::time::Duration;

use alloy::primitives::{utils::parse_ether, Address, U256};
use eyre::Context;
use serde::Deserialize;

/// Prefix of the environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "SRTK";

/// Configuration of the mint client.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// JSON-RPC endpoint of the wallet provider.
    #[serde(default = "defaults::rpc_url")]
    pub rpc_url: String,

    /// Name of the network the dapp runs on, shown on a network mismatch.
    #[serde(default = "defaults::network")]
    pub network: String,

    /// Chain id the wallet must be connected to.
    #[serde(default = "defaults::chain_id")]
    pub chain_id: u64,

    /// Address of the deployed NFT contract.
    pub contract_address: Address,

    /// Hex-encoded private key of the signing account. Without it the wallet
    /// is read-only.
    #[serde(default)]
    pub private_key: Option<String>,

    /// Fee attached to `presaleMint` and `mint`, in ether.
    #[serde(default = "defaults::mint_price")]
    pub mint_price: String,

    /// Total supply cap shown next to the minted count.
    #[serde(default = "defaults::max_supply")]
    pub max_supply: u64,

    /// Period of both state pollers, in seconds.
    #[serde(default = "defaults::poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Config {
    /// Build a configuration for `contract_address` with every other field
    /// at its default value.
    #[must_use]
    pub fn new(contract_address: Address) -> Self {
        Self {
            rpc_url: defaults::rpc_url(),
            network: defaults::network(),
            chain_id: defaults::chain_id(),
            contract_address,
            private_key: None,
            mint_price: defaults::mint_price(),
            max_supply: defaults::max_supply(),
            poll_interval_secs: defaults::poll_interval_secs(),
        }
    }

    /// Load the configuration from `srtk.toml` (if present) and the
    /// environment.
    ///
    /// # Errors
    ///
    /// May fail if a source cannot be read, if `contract_address` is
    /// missing or if [`Config::validate`] rejects the result.
    pub fn load() -> eyre::Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::with_name("srtk").required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .wrap_err("failed to read configuration sources")?
            .try_deserialize()
            .wrap_err("failed to deserialize client configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values serde cannot.
    ///
    /// # Errors
    ///
    /// May fail if `poll_interval_secs` is zero or `mint_price` is invalid.
    pub fn validate(&self) -> eyre::Result<()> {
        eyre::ensure!(
            self.poll_interval_secs > 0,
            "poll_interval_secs must be at least 1"
        );
        self.mint_fee()?;
        Ok(())
    }

    /// Mint fee in wei.
    ///
    /// # Errors
    ///
    /// May fail if `mint_price` is not a valid ether amount.
    pub fn mint_fee(&self) -> eyre::Result<U256> {
        parse_ether(&self.mint_price)
            .wrap_err(format!("invalid mint price {}", self.mint_price))
    }

    /// Period of the state pollers.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

mod defaults {
    pub(super) fn rpc_url() -> String {
        "http://localhost:8545".into()
    }

    pub(super) fn network() -> String {
        "goerli".into()
    }

    pub(super) fn chain_id() -> u64 {
        5
    }

    pub(super) fn mint_price() -> String {
        "0.01".into()
    }

    pub(super) fn max_supply() -> u64 {
        20
    }

    pub(super) fn poll_interval_secs() -> u64 {
        5
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{uint, Address};

    use super::Config;

    #[test]
    fn defaults_target_goerli() {
        let config = Config::new(Address::ZERO);
        assert_eq!(config.network, "goerli");
        assert_eq!(config.chain_id, 5);
        assert_eq!(config.max_supply, 20);
        assert_eq!(config.poll_interval().as_secs(), 5);
    }

    #[test]
    fn mint_fee_is_one_hundredth_of_an_ether() {
        let config = Config::new(Address::ZERO);
        let fee = config.mint_fee().expect("default price should parse");
        assert_eq!(fee, uint!(10_000_000_000_000_000_U256));
    }

    #[test]
    fn rejects_invalid_mint_price() {
        let mut config = Config::new(Address::ZERO);
        config.mint_price = "a lot".into();
        assert!(config.mint_fee().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let mut config = Config::new(Address::ZERO);
        assert!(config.validate().is_ok());

        config.poll_interval_secs = 0;
        let err = config.validate().expect_err("zero period should fail");
        assert!(err.to_string().contains("poll_interval_secs"));
    }
}
