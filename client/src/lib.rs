/*!
# srtk client

Client side of the srtk NFT collection: connects a wallet, keeps a cached
view of the presale and mint state of the contract fresh with two pollers and
submits the start-presale, presale-mint and mint transactions.

```ignore
use srtk_client::{Config, Session};

let config = Config::load()?;
let session = Session::from_config(&config)?;
session.load().await?;
println!("{}", session.page());
session.public_mint().await?;
session.teardown().await;
```

All contract state lives on chain. [`SessionState`] is only a cache of it,
refreshed by explicit calls or by poller ticks.
*/
#![deny(rustdoc::broken_intra_doc_links)]

pub mod abi;
pub mod clock;
pub mod config;
pub mod contract;
pub mod error;
pub mod poller;
pub mod session;
pub mod state;
pub mod view;
pub mod wallet;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::Config;
pub use error::{Error, Result};
pub use session::{Notice, Session};
pub use state::SessionState;
pub use view::{render, Page, View};
