//! Atomic submission of instruction batches to Solana.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use solana_sdk::{
    compute_budget::ComputeBudgetInstruction, instruction::Instruction, signature::Signature,
    signer::Signer, transaction::Transaction,
};
use tracing::{info, warn};

use crate::{
    chain::{SolanaReader, SolanaSubmitter},
    error::Result,
};

/// How submissions are retried and budgeted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitPolicy {
    /// Compute-unit limit requested for the whole batch.
    pub compute_unit_limit: u32,
    /// Further attempts after the first, for retryable failures only.
    pub max_retries: u32,
    /// Base delay between attempts; grows linearly with the attempt count.
    pub retry_delay: Duration,
}

impl Default for SubmitPolicy {
    fn default() -> Self {
        Self {
            compute_unit_limit: 400_000,
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Signs and submits one logical step as a single transaction, blocking
/// until the cluster confirms it.
///
/// The compute-budget request and the domain instructions ride in the same
/// transaction, so the batch applies atomically or not at all. Transient
/// failures are retried with a fresh blockhash; message identities are
/// content-addressed, so a retry after an indeterminate failure can at
/// worst collide with its own success and be rejected by the program, not
/// double-applied.
pub async fn submit<C>(
    chain: &C,
    policy: &SubmitPolicy,
    instructions: &[Instruction],
    payer: &dyn Signer,
) -> Result<Signature>
where
    C: SolanaReader + SolanaSubmitter + ?Sized,
{
    let mut batch = Vec::with_capacity(instructions.len() + 1);
    batch.push(ComputeBudgetInstruction::set_compute_unit_limit(
        policy.compute_unit_limit,
    ));
    batch.extend_from_slice(instructions);

    let mut attempt = 0;
    loop {
        attempt += 1;
        let blockhash = chain.latest_blockhash().await?;
        let transaction = Transaction::new_signed_with_payer(
            &batch,
            Some(&payer.pubkey()),
            &[payer],
            blockhash,
        );

        match chain.send_and_confirm(&transaction).await {
            Ok(signature) => {
                info!(%signature, instructions = batch.len(), "transaction confirmed");
                return Ok(signature);
            }
            Err(err) if err.is_retryable() && attempt <= policy.max_retries => {
                warn!(attempt, %err, "transient submission failure, retrying");
                tokio::time::sleep(policy.retry_delay * attempt).await;
            }
            Err(err) => return Err(err),
        }
    }
}
