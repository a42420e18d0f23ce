//! Pure rendering of a [`SessionState`].
use std::fmt;

use crate::state::SessionState;

/// Title shown on top of the page.
pub const TITLE: &str = "Welcome! to SrtK NFTs";

/// Body of the page. Exactly one branch is shown at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// No wallet yet: offer to connect one.
    ConnectWallet,
    /// A transaction is in flight.
    Loading,
    /// The owner may start the presale.
    StartPresale,
    /// Nothing to do until the owner starts the presale.
    PresaleNotStarted,
    /// Allow-listed accounts may mint.
    PresaleMint,
    /// Anyone may mint.
    PublicMint,
}

/// Select the body for `state`.
///
/// Branches are tried in a fixed priority order and the first match wins, so
/// contradictory flags (an owner without a wallet, say) are simply shadowed.
#[must_use]
pub fn render(state: &SessionState) -> View {
    if !state.wallet_connected {
        return View::ConnectWallet;
    }
    if state.loading {
        return View::Loading;
    }
    if state.is_owner && !state.presale_started {
        return View::StartPresale;
    }
    if !state.presale_started {
        return View::PresaleNotStarted;
    }
    if state.presale_started && !state.presale_ended {
        return View::PresaleMint;
    }
    View::PublicMint
}

impl View {
    /// Command that triggers this branch's action, if it has one.
    #[must_use]
    pub fn action(self) -> Option<&'static str> {
        match self {
            View::ConnectWallet => Some("connect"),
            View::StartPresale => Some("start-presale"),
            View::PresaleMint => Some("presale-mint"),
            View::PublicMint => Some("mint"),
            View::Loading | View::PresaleNotStarted => None,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            View::ConnectWallet => "Connect Wallet",
            View::Loading => "Loading...",
            View::StartPresale => "Start the presale",
            View::PresaleNotStarted => {
                "Presale hasn't started yet! Come back later"
            }
            View::PresaleMint => {
                "Presale! If you're whitelisted you can mint a srtk now."
            }
            View::PublicMint => "Mint a srtk now.",
        };
        f.write_str(text)?;
        if let Some(command) = self.action() {
            write!(f, " [{command}]")?;
        }
        Ok(())
    }
}

/// The whole page: title, minted counter, network warning and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Number of minted tokens, as last read.
    pub minted: String,
    /// Supply cap shown next to the counter.
    pub max_supply: u64,
    /// Wrong-network message, shown above the body.
    pub network_error: Option<String>,
    /// Selected body.
    pub view: View,
}

impl Page {
    /// Render `state` into a page.
    #[must_use]
    pub fn new(state: &SessionState, max_supply: u64) -> Self {
        Self {
            minted: state.minted.clone(),
            max_supply,
            network_error: state.network_error.clone(),
            view: render(state),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        writeln!(
            f,
            "{}/{} have already been minted",
            self.minted, self.max_supply
        )?;
        if let Some(error) = &self.network_error {
            writeln!(f, "{error}")?;
        }
        write!(f, "{}", self.view)
    }
}
