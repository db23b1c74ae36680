use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use alloy_primitives::{Address, Bytes, B256};
use anchor_lang::AnchorDeserialize;
use async_trait::async_trait;
use bridge_client::{
    anchor,
    chain::{BaseReader, BaseReceipt, SolanaReader, SolanaSubmitter},
    config::NATIVE_SOL,
    instructions::{BridgeSolArgs, ProveMessageArgs},
    pda,
    state::{IncomingMessage, IncomingPayload, Message, OutgoingMessage, Transfer},
    BridgeError, Result,
};
use solana_sdk::{
    hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction,
};

/// In-memory Base: receipts by transaction hash, view calls scripted per
/// `(contract, calldata)` pair. Scripted responses are consumed in order,
/// with the last one repeating.
#[derive(Default)]
pub struct MockBase {
    receipts: Mutex<HashMap<B256, BaseReceipt>>,
    calls: Mutex<HashMap<(Address, Vec<u8>), VecDeque<Vec<u8>>>>,
}

impl MockBase {
    pub fn insert_receipt(&self, tx_hash: B256, receipt: BaseReceipt) {
        self.receipts.lock().unwrap().insert(tx_hash, receipt);
    }

    pub fn script_call(&self, to: Address, calldata: Vec<u8>, responses: Vec<Vec<u8>>) {
        self.calls
            .lock()
            .unwrap()
            .insert((to, calldata), responses.into());
    }
}

#[async_trait]
impl BaseReader for MockBase {
    async fn transaction_receipt(&self, tx_hash: B256) -> Result<BaseReceipt> {
        self.receipts
            .lock()
            .unwrap()
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| {
                BridgeError::MalformedSourceState(format!("no receipt for transaction {tx_hash}"))
            })
    }

    async fn call(&self, to: Address, data: Bytes, _block_number: Option<u64>) -> Result<Bytes> {
        let mut calls = self.calls.lock().unwrap();
        let responses = calls
            .get_mut(&(to, data.to_vec()))
            .ok_or_else(|| BridgeError::TransientNetwork("unscripted call".into()))?;
        let response = if responses.len() > 1 {
            responses.pop_front().unwrap()
        } else {
            responses.front().cloned().unwrap_or_default()
        };
        Ok(response.into())
    }
}

/// In-memory Solana: an account map plus a record of every submitted
/// transaction. With [`MockSolana::materialize_incoming`] set, the mock
/// emulates the bridge program's effects so full flows can run end to end.
pub struct MockSolana {
    bridge_program: Pubkey,
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    submissions: Mutex<Vec<Transaction>>,
    incoming_payload: Mutex<Option<IncomingPayload>>,
    next_nonce: Mutex<u64>,
}

impl MockSolana {
    pub fn new(bridge_program: Pubkey) -> Self {
        Self {
            bridge_program,
            accounts: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            incoming_payload: Mutex::new(None),
            next_nonce: Mutex::new(0),
        }
    }

    pub fn set_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.lock().unwrap().insert(address, data);
    }

    pub fn account(&self, address: &Pubkey) -> Option<Vec<u8>> {
        self.accounts.lock().unwrap().get(address).cloned()
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn submission(&self, index: usize) -> Transaction {
        self.submissions.lock().unwrap()[index].clone()
    }

    /// Emulate the bridge program: `prove_message` writes this payload
    /// into the incoming-message account, `relay_message` flips its
    /// executed flag, `bridge_sol` writes the outgoing-message account.
    pub fn materialize_incoming(&self, payload: IncomingPayload) {
        *self.incoming_payload.lock().unwrap() = Some(payload);
    }

    fn apply_program_effects(&self, transaction: &Transaction) {
        let message = &transaction.message;
        for ix in &message.instructions {
            let program = message.account_keys[ix.program_id_index as usize];
            if program != self.bridge_program || ix.data.len() < 8 {
                continue;
            }

            if ix.data[..8] == anchor::instruction_discriminator("prove_message") {
                let args = ProveMessageArgs::deserialize(&mut &ix.data[8..]).unwrap();
                let payload = self.incoming_payload.lock().unwrap().clone();
                let Some(payload) = payload else { continue };
                let incoming = IncomingMessage {
                    sender: args.sender,
                    message: payload,
                    executed: false,
                };
                let (address, _) =
                    pda::incoming_message_address(&self.bridge_program, &args.message_hash)
                        .unwrap();
                self.set_account(
                    address,
                    anchor::encode_account(IncomingMessage::NAME, &incoming).unwrap(),
                );
            } else if ix.data[..8] == anchor::instruction_discriminator("relay_message") {
                let address = message.account_keys[ix.accounts[0] as usize];
                let data = self.account(&address).unwrap();
                let mut incoming: IncomingMessage =
                    anchor::decode_account(IncomingMessage::NAME, &data).unwrap();
                incoming.executed = true;
                self.set_account(
                    address,
                    anchor::encode_account(IncomingMessage::NAME, &incoming).unwrap(),
                );
            } else if ix.data[..8] == anchor::instruction_discriminator("bridge_sol") {
                let args = BridgeSolArgs::deserialize(&mut &ix.data[8..]).unwrap();
                let mut nonce = self.next_nonce.lock().unwrap();
                let outgoing = OutgoingMessage {
                    nonce: *nonce,
                    sender: message.account_keys[0],
                    message: Message::Transfer(Transfer {
                        local_token: NATIVE_SOL,
                        remote_token: args.remote_token,
                        to: args.to,
                        amount: args.amount,
                        call: args.call,
                    }),
                };
                *nonce += 1;
                let (address, _) = pda::outgoing_message_address(
                    &self.bridge_program,
                    &args.outgoing_message_salt,
                )
                .unwrap();
                self.set_account(
                    address,
                    anchor::encode_account(OutgoingMessage::NAME, &outgoing).unwrap(),
                );
            }
        }
    }
}

#[async_trait]
impl SolanaReader for MockSolana {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        Ok(self.account(address))
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(Hash::default())
    }
}

#[async_trait]
impl SolanaSubmitter for MockSolana {
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
        self.apply_program_effects(transaction);
        self.submissions.lock().unwrap().push(transaction.clone());
        Ok(Signature::default())
    }
}

/// Solana backed by a real in-process SVM bank, for exercising transaction
/// submission with actual fee and balance accounting.
pub struct LiteSvmChain {
    svm: Mutex<litesvm::LiteSVM>,
}

impl Default for LiteSvmChain {
    fn default() -> Self {
        Self::new()
    }
}

impl LiteSvmChain {
    pub fn new() -> Self {
        Self { svm: Mutex::new(litesvm::LiteSVM::new()) }
    }

    pub fn airdrop(&self, to: &Pubkey, lamports: u64) {
        self.svm.lock().unwrap().airdrop(to, lamports).unwrap();
    }

    pub fn balance(&self, of: &Pubkey) -> u64 {
        self.svm.lock().unwrap().get_balance(of).unwrap_or(0)
    }
}

#[async_trait]
impl SolanaReader for LiteSvmChain {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        Ok(self
            .svm
            .lock()
            .unwrap()
            .get_account(address)
            .map(|account| account.data))
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.svm.lock().unwrap().latest_blockhash())
    }
}

#[async_trait]
impl SolanaSubmitter for LiteSvmChain {
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
        let signature = transaction.signatures[0];
        self.svm
            .lock()
            .unwrap()
            .send_transaction(transaction.clone())
            .map_err(|failed| BridgeError::SubmissionRejected(failed.err.to_string()))?;
        Ok(signature)
    }
}
