use anchor_lang::prelude::*;

/// A Solana -> Base message, written at submission time and read back later
/// to recompute the envelope hash for monitoring.
///
/// Seeds: `[b"outgoing_message", salt]` where `salt` is 32 random bytes
/// chosen at submission.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Sequence number assigned by the bridge program. Unique per source
    /// chain together with the chain itself.
    pub nonce: u64,
    /// The Solana account that initiated the message.
    pub sender: Pubkey,
    pub message: Message,
}

impl OutgoingMessage {
    pub const NAME: &'static str = "OutgoingMessage";
}

/// Payload of an outgoing message. Exactly one variant is active; the
/// variant is immutable once the record is committed.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum Message {
    Call(Call),
    Transfer(Transfer),
}

/// A contract call to perform on Base.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub ty: CallType,
    /// Base address of the callee.
    pub to: [u8; 20],
    /// Wei forwarded with the call.
    pub value: u128,
    pub data: Vec<u8>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallType {
    Call = 0,
    DelegateCall = 1,
}

/// A token transfer to Base, optionally followed by a call.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    /// Mint on Solana ([`crate::config::NATIVE_SOL`] for lamports).
    pub local_token: Pubkey,
    /// The wrapped token's ERC-20 address on Base.
    pub remote_token: [u8; 20],
    /// Base recipient.
    pub to: [u8; 20],
    /// Amount in the token's smallest unit.
    pub amount: u64,
    pub call: Option<Call>,
}
