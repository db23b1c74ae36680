//! Transaction submission against a real in-process SVM bank.

use bridge_client::{
    submit::{submit, SubmitPolicy},
    BridgeError,
};
use solana_sdk::{
    native_token::LAMPORTS_PER_SOL, pubkey::Pubkey, signature::Keypair, signer::Signer,
    system_instruction,
};
use testing::chains::LiteSvmChain;

#[tokio::test]
async fn batch_applies_atomically_and_confirms() {
    let chain = LiteSvmChain::new();
    let payer = Keypair::new();
    chain.airdrop(&payer.pubkey(), 10 * LAMPORTS_PER_SOL);

    let first = Pubkey::new_unique();
    let second = Pubkey::new_unique();
    let ixs = [
        system_instruction::transfer(&payer.pubkey(), &first, 1_000_000),
        system_instruction::transfer(&payer.pubkey(), &second, 2_000_000),
    ];

    submit(&chain, &SubmitPolicy::default(), &ixs, &payer)
        .await
        .unwrap();

    assert_eq!(chain.balance(&first), 1_000_000);
    assert_eq!(chain.balance(&second), 2_000_000);
}

#[tokio::test]
async fn rejected_batch_applies_nothing() {
    let chain = LiteSvmChain::new();
    let payer = Keypair::new();
    chain.airdrop(&payer.pubkey(), LAMPORTS_PER_SOL);

    let first = Pubkey::new_unique();
    let second = Pubkey::new_unique();
    let ixs = [
        system_instruction::transfer(&payer.pubkey(), &first, 1_000),
        // more than the payer holds; the whole batch must fail
        system_instruction::transfer(&payer.pubkey(), &second, 100 * LAMPORTS_PER_SOL),
    ];

    let err = submit(&chain, &SubmitPolicy::default(), &ixs, &payer)
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::SubmissionRejected(_)));
    assert!(!err.is_retryable());

    assert_eq!(chain.balance(&first), 0);
    assert_eq!(chain.balance(&second), 0);
}
