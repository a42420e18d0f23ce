//! Cached projection of the contract state kept by a session.
use alloy::primitives::U256;

/// Session state shown by the view.
///
/// Every field is derived from contract reads and may be stale. It changes
/// only on explicit refreshes, poller ticks and completed actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// A wallet on the expected network has been connected.
    pub wallet_connected: bool,
    /// The connected account owns the contract.
    pub is_owner: bool,
    /// The presale has been started.
    pub presale_started: bool,
    /// The presale end time has passed.
    pub presale_ended: bool,
    /// A transaction submitted by the user is in flight.
    pub loading: bool,
    /// Number of minted tokens as a decimal string, empty until first read.
    pub minted: String,
    /// Set while reads fail because the wallet is on another chain.
    pub network_error: Option<String>,
}

/// Whether a presale ending at `end_seconds` is over at `now_millis`.
///
/// NOTE: the current time is scaled by 1000 on top of already being in
/// milliseconds, so `end_seconds` is compared against microseconds and any
/// realistic end time reads as passed. This matches the deployed front end
/// and is kept on purpose; see DESIGN.md.
#[must_use]
pub fn presale_has_ended(end_seconds: U256, now_millis: u64) -> bool {
    end_seconds < U256::from(now_millis) * U256::from(1000_u64)
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;

    use super::presale_has_ended;

    #[test]
    fn compares_end_against_millis_times_thousand() {
        let now_millis = 1_700_000_000_000_u64;
        let threshold = U256::from(now_millis) * U256::from(1000_u64);

        assert!(presale_has_ended(threshold - U256::from(1), now_millis));
        assert!(!presale_has_ended(threshold, now_millis));
        assert!(!presale_has_ended(threshold + U256::from(1), now_millis));
    }

    #[test]
    fn future_end_in_seconds_reads_as_passed() {
        let now_millis = 1_700_000_000_000_u64;
        // One day after `now`, in seconds.
        let end = U256::from(now_millis / 1000 + 86_400);
        assert!(presale_has_ended(end, now_millis));
    }

    #[test]
    fn nothing_ends_before_epoch() {
        assert!(!presale_has_ended(U256::ZERO, 0));
        assert!(!presale_has_ended(U256::from(1), 0));
    }
}
