//! Watching Base for a message's execution marker.

use std::time::Duration;

use alloy_primitives::{Address, B256};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    chain::BaseReader,
    error::{BridgeError, Result},
    evm::BaseBridge,
};

/// Outcome of a bounded execution watch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    /// `max_wait` elapsed first. The caller decides whether to keep
    /// waiting; the message may still execute later.
    TimedOut,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonitorPolicy {
    pub poll_interval: Duration,
    /// Ceiling for the backed-off interval between polls.
    pub max_interval: Duration,
    /// Total patience; `None` polls until cancelled.
    pub max_wait: Option<Duration>,
}

impl Default for MonitorPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            max_interval: Duration::from_secs(60),
            max_wait: Some(Duration::from_secs(15 * 60)),
        }
    }
}

/// One-shot check of the bridge contract's `successes` marker.
pub async fn is_executed<B: BaseReader + ?Sized>(
    base: &B,
    bridge_contract: Address,
    outer_hash: B256,
) -> Result<bool> {
    let calldata = BaseBridge::successesCall { messageHash: outer_hash }.abi_encode();
    let raw = base.call(bridge_contract, calldata.into(), None).await?;
    BaseBridge::successesCall::abi_decode_returns(&raw).map_err(|err| {
        BridgeError::MalformedSourceState(format!("undecodable successes response: {err}"))
    })
}

/// Polls until the message with the given envelope hash is marked
/// successful on Base.
///
/// The hash is computed once by the caller (see
/// [`crate::evm::build_evm_message`]) and treated as opaque here. Each miss
/// stretches the next sleep by half, up to `max_interval`; with a
/// `max_wait` the watch resolves to [`ExecutionStatus::TimedOut`] instead
/// of blocking forever. Dropping the future cancels cleanly: all state
/// lives on chain.
pub async fn await_execution<B: BaseReader + ?Sized>(
    base: &B,
    bridge_contract: Address,
    outer_hash: B256,
    policy: &MonitorPolicy,
) -> Result<ExecutionStatus> {
    let started = tokio::time::Instant::now();
    let mut interval = policy.poll_interval;

    loop {
        if is_executed(base, bridge_contract, outer_hash).await? {
            info!(message = %outer_hash, "message relayed successfully");
            return Ok(ExecutionStatus::Success);
        }

        if let Some(max_wait) = policy.max_wait {
            if started.elapsed() + interval > max_wait {
                return Ok(ExecutionStatus::TimedOut);
            }
        }

        debug!(message = %outer_hash, ?interval, "message not executed yet");
        tokio::time::sleep(interval).await;
        interval = (interval + interval / 2).min(policy.max_interval);
    }
}
