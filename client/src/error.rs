use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the bridge client.
///
/// Conditions split into retryable and fatal: [`is_retryable`] returns true
/// for failures that a caller may safely retry without inspecting anything
/// (the anchored output root has not caught up yet, or the network hiccuped).
/// Everything else either indicates bad input, a protocol-level
/// inconsistency, or a rejection whose reason must be looked at before any
/// retry.
///
/// [`is_retryable`]: BridgeError::is_retryable
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    /// The message's Base block is newer than the latest output root
    /// recorded on Solana. Recoverable: wait for the oracle to advance.
    #[error("message not yet finalized: output root at block {anchor}, message in block {event}")]
    NotYetFinalized { anchor: u64, event: u64 },

    /// On-chain state violates the protocol's assumptions (missing or
    /// undecodable account, wrong event count). Retrying without
    /// investigation will not help.
    #[error("malformed source state: {0}")]
    MalformedSourceState(String),

    /// A payload type tag outside the known set.
    #[error("unsupported message type tag {0}")]
    UnsupportedMessageType(u8),

    /// A value does not fit the fixed width its wire field declares.
    /// Truncation is never acceptable, so this is a hard error.
    #[error("value for `{field}` exceeds its declared encoding width")]
    EncodingOverflow { field: &'static str },

    /// Every bump seed was exhausted while deriving a program address.
    #[error("program address derivation exhausted for {0}")]
    DerivationExhausted(&'static str),

    /// Transport-level failure talking to a chain. Retryable with backoff.
    #[error("transient network failure: {0}")]
    TransientNetwork(String),

    /// The destination chain rejected the transaction (simulation or
    /// validation failure). Fatal for this attempt; carries the reason.
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),

    /// Execution monitoring gave up after its bounded wait.
    #[error("timed out after {0:?} waiting for message execution")]
    TimedOut(Duration),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Local Borsh serialization failed. Indicates a bug in the supplied
    /// data, not bad chain state.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl BridgeError {
    /// Whether the failed operation may be retried unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NotYetFinalized { .. } | Self::TransientNetwork(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_split() {
        assert!(BridgeError::NotYetFinalized { anchor: 10, event: 11 }.is_retryable());
        assert!(BridgeError::TransientNetwork("connection reset".into()).is_retryable());

        assert!(!BridgeError::MalformedSourceState("two events".into()).is_retryable());
        assert!(!BridgeError::UnsupportedMessageType(7).is_retryable());
        assert!(!BridgeError::EncodingOverflow { field: "amount" }.is_retryable());
        assert!(!BridgeError::DerivationExhausted("bridge").is_retryable());
        assert!(!BridgeError::SubmissionRejected("custom program error".into()).is_retryable());
        assert!(!BridgeError::TimedOut(Duration::from_secs(60)).is_retryable());
    }
}
