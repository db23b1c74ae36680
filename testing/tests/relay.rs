//! Base -> Solana relay flows against in-memory chains.

use alloy_primitives::{Address, B256};
use alloy_sol_types::SolCall;
use bridge_client::{
    anchor,
    chain::BaseLog,
    evm::BaseBridge,
    pda,
    relay::{BaseToSolana, MessageState},
    state::{IncomingMessage, IncomingPayload, IncomingTransfer},
    BridgeConfig, BridgeError,
};
use solana_sdk::{pubkey::Pubkey, signature::Keypair};
use testing::{
    chains::{MockBase, MockSolana},
    fixtures,
};

const ANCHOR_HEIGHT: u64 = 100;
const NONCE: u64 = 5;

struct Harness {
    config: BridgeConfig,
    base: MockBase,
    solana: MockSolana,
    payer: Keypair,
    tx_hash: B256,
    message_hash: B256,
    log: BaseLog,
}

impl Harness {
    fn relay(&self) -> BaseToSolana<'_, MockBase, MockSolana> {
        BaseToSolana::new(&self.config, &self.base, &self.solana)
    }

    fn incoming_account(&self) -> Pubkey {
        pda::incoming_message_address(&self.config.bridge_program, &self.message_hash.0)
            .unwrap()
            .0
    }

    fn payload(&self) -> IncomingPayload {
        IncomingPayload::Transfer {
            transfer: IncomingTransfer::Sol {
                remote_token: [0xAA; 20],
                to: Pubkey::new_unique(),
                amount: 1_000,
            },
            ixs: vec![],
        }
    }
}

fn setup(event_block: u64) -> Harness {
    let bridge_program = Pubkey::new_unique();
    let relayer_program = Pubkey::new_unique();
    let base_bridge = Address::from([0xB0; 20]);
    let config = fixtures::test_config(bridge_program, relayer_program, base_bridge);

    let solana = MockSolana::new(bridge_program);
    let (bridge_pda, _) = pda::bridge_address(&bridge_program).unwrap();
    solana.set_account(
        bridge_pda,
        fixtures::bridge_account(ANCHOR_HEIGHT, Pubkey::new_unique()),
    );

    let base = MockBase::default();
    let tx_hash = B256::from([0x77; 32]);
    let message_hash = B256::from([0xAB; 32]);
    let mut sender = [0u8; 32];
    sender[..20].copy_from_slice(&[0xC5; 20]);

    let log = fixtures::initiated_log(
        base_bridge,
        message_hash,
        B256::from([0x44; 32]),
        NONCE,
        sender,
        vec![0xDE, 0xAD],
    );
    base.insert_receipt(tx_hash, fixtures::receipt(event_block, vec![log.clone()]));
    base.script_call(
        base_bridge,
        BaseBridge::generateProofCall { nonce: NONCE }.abi_encode(),
        vec![fixtures::proof_response(vec![
            B256::from([1; 32]),
            B256::from([2; 32]),
        ])],
    );

    let harness = Harness {
        config,
        base,
        solana,
        payer: Keypair::new(),
        tx_hash,
        message_hash,
        log,
    };
    harness.solana.materialize_incoming(harness.payload());
    harness
}

#[tokio::test]
async fn full_relay_reaches_executed() {
    let h = setup(90);
    let report = h.relay().run(&h.payer, h.tx_hash).await;

    assert_eq!(report.error, None);
    assert_eq!(report.reached, MessageState::Executed);
    assert_eq!(report.message_hash, Some(h.message_hash));
    assert_eq!(h.solana.submission_count(), 2);

    // the compute budget rides with the domain instruction in one batch
    let prove_tx = h.solana.submission(0);
    assert_eq!(prove_tx.message.instructions.len(), 2);

    let incoming: IncomingMessage = anchor::decode_account(
        IncomingMessage::NAME,
        &h.solana.account(&h.incoming_account()).unwrap(),
    )
    .unwrap();
    assert!(incoming.executed);
}

#[tokio::test]
async fn anchored_block_is_provable_inclusive() {
    let h = setup(ANCHOR_HEIGHT);
    assert!(h.relay().is_provable(h.tx_hash).await.unwrap());
    let hash = h.relay().prove(&h.payer, h.tx_hash).await.unwrap();
    assert_eq!(hash, h.message_hash);
}

#[tokio::test]
async fn newer_block_is_not_yet_finalized() {
    let h = setup(ANCHOR_HEIGHT + 1);
    assert!(!h.relay().is_provable(h.tx_hash).await.unwrap());

    let err = h.relay().prove(&h.payer, h.tx_hash).await.unwrap_err();
    assert_eq!(
        err,
        BridgeError::NotYetFinalized { anchor: ANCHOR_HEIGHT, event: ANCHOR_HEIGHT + 1 }
    );
    assert!(err.is_retryable());

    let report = h.relay().run(&h.payer, h.tx_hash).await;
    assert_eq!(report.reached, MessageState::Initiated);
    assert_eq!(report.message_hash, None);
    assert_eq!(h.solana.submission_count(), 0);
}

#[tokio::test]
async fn zero_events_is_malformed() {
    let h = setup(90);
    h.base.insert_receipt(h.tx_hash, fixtures::receipt(90, vec![]));
    let err = h.relay().prove(&h.payer, h.tx_hash).await.unwrap_err();
    assert!(matches!(err, BridgeError::MalformedSourceState(_)));
}

#[tokio::test]
async fn two_events_is_malformed() {
    let h = setup(90);
    h.base.insert_receipt(
        h.tx_hash,
        fixtures::receipt(90, vec![h.log.clone(), h.log.clone()]),
    );
    let err = h.relay().prove(&h.payer, h.tx_hash).await.unwrap_err();
    assert!(matches!(err, BridgeError::MalformedSourceState(_)));
}

#[tokio::test]
async fn proving_skips_an_existing_record() {
    let h = setup(90);
    let incoming = IncomingMessage {
        sender: [0; 32],
        message: h.payload(),
        executed: false,
    };
    h.solana.set_account(
        h.incoming_account(),
        anchor::encode_account(IncomingMessage::NAME, &incoming).unwrap(),
    );

    let hash = h.relay().prove(&h.payer, h.tx_hash).await.unwrap();
    assert_eq!(hash, h.message_hash);
    assert_eq!(h.solana.submission_count(), 0);
}

#[tokio::test]
async fn executing_an_executed_message_is_a_noop() {
    let h = setup(90);
    let incoming = IncomingMessage {
        sender: [0; 32],
        message: h.payload(),
        executed: true,
    };
    h.solana.set_account(
        h.incoming_account(),
        anchor::encode_account(IncomingMessage::NAME, &incoming).unwrap(),
    );

    h.relay().execute(&h.payer, h.message_hash).await.unwrap();
    assert_eq!(h.solana.submission_count(), 0);
}

#[tokio::test]
async fn executing_an_unproven_message_is_malformed() {
    let h = setup(90);
    let err = h.relay().execute(&h.payer, h.message_hash).await.unwrap_err();
    assert!(matches!(err, BridgeError::MalformedSourceState(_)));
}

#[tokio::test]
async fn status_is_reconstructed_from_chain_state() {
    let h = setup(ANCHOR_HEIGHT + 1);
    assert_eq!(h.relay().status(h.tx_hash).await.unwrap(), MessageState::Initiated);

    let h = setup(90);
    assert_eq!(h.relay().status(h.tx_hash).await.unwrap(), MessageState::Provable);

    h.relay().prove(&h.payer, h.tx_hash).await.unwrap();
    assert_eq!(h.relay().status(h.tx_hash).await.unwrap(), MessageState::Proven);

    h.relay().execute(&h.payer, h.message_hash).await.unwrap();
    assert_eq!(h.relay().status(h.tx_hash).await.unwrap(), MessageState::Executed);
}

#[tokio::test]
async fn rerunning_a_completed_relay_issues_no_writes() {
    let h = setup(90);
    let first = h.relay().run(&h.payer, h.tx_hash).await;
    assert_eq!(first.reached, MessageState::Executed);
    let writes = h.solana.submission_count();

    let second = h.relay().run(&h.payer, h.tx_hash).await;
    assert_eq!(second.reached, MessageState::Executed);
    assert_eq!(second.error, None);
    assert_eq!(h.solana.submission_count(), writes);
}
