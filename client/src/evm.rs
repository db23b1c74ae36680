//! Canonical encoding and identity of cross-chain messages.
//!
//! Every byte produced here must match what the Base bridge contract hashes
//! and verifies on its side. Identity is two-level:
//!
//! ```text
//! inner = keccak256(abi.encode(sender, type tag, payload bytes))
//! outer = keccak256(abi.encode(nonce, message account, inner))
//! ```
//!
//! Width and padding rules are strict. Solana pubkeys already occupy the
//! full `bytes32` and are used verbatim. Base addresses stored in `bytes32`
//! fields are right-padded with zeros so that the contract's `bytes20`
//! truncation recovers them; this is the opposite of the left-padding the
//! ABI applies to `address`-typed values and integers. Integers encode at
//! their declared width (`uint64` nonce/amount, `uint128` call value);
//! anything that does not fit is an [`EncodingOverflow`], never a
//! truncation.
//!
//! [`EncodingOverflow`]: crate::BridgeError::EncodingOverflow

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::{sol, sol_data, SolType, SolValue};
use solana_program::pubkey::Pubkey;

use crate::{
    error::{BridgeError, Result},
    state::{Call, Message, OutgoingMessage},
};

sol! {
    /// The slice of the Base bridge contract's interface the client speaks.
    #[derive(Debug, PartialEq, Eq)]
    contract BaseBridge {
        struct BridgeMessage {
            uint64 nonce;
            bytes32 sender;
            bytes data;
        }

        /// Emitted once per registered message; `messageHash` is the
        /// envelope (outer) hash and keys the incoming-message account on
        /// Solana.
        event MessageInitiated(bytes32 indexed messageHash, bytes32 mmrRoot, BridgeMessage message);

        /// Sibling path for the message at leaf `nonce`, valid against the
        /// MMR root as of the queried block.
        function generateProof(uint64 nonce) external view returns (bytes32[] memory proof);

        /// Whether the message with the given envelope hash executed
        /// successfully on Base.
        function successes(bytes32 messageHash) external view returns (bool success);
    }

    /// Transfer leg of a bridged message, as the contract's message
    /// library lays it out.
    #[derive(Debug, PartialEq, Eq)]
    struct TransferTuple {
        address localToken;
        bytes32 remoteToken;
        bytes32 to;
        uint64 remoteAmount;
    }

    /// Call leg of a bridged message.
    #[derive(Debug, PartialEq, Eq)]
    struct CallTuple {
        uint8 ty;
        address to;
        uint128 value;
        bytes data;
    }
}

/// Payload type tag, one byte on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    Call = 0,
    Transfer = 1,
    /// A transfer carrying a non-empty optional call.
    TransferAndCall = 2,
}

impl From<MessageType> for u8 {
    fn from(ty: MessageType) -> u8 {
        ty as u8
    }
}

impl TryFrom<u8> for MessageType {
    type Error = BridgeError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Self::Call),
            1 => Ok(Self::Transfer),
            2 => Ok(Self::TransferAndCall),
            other => Err(BridgeError::UnsupportedMessageType(other)),
        }
    }
}

/// A Solana pubkey is already 32 bytes and embeds verbatim.
pub fn pubkey_to_bytes32(pubkey: &Pubkey) -> B256 {
    B256::from(pubkey.to_bytes())
}

/// Embeds a Base address into a `bytes32` field that readers truncate with
/// `bytes20`: the address occupies the first 20 bytes, zeros follow.
pub fn evm_address_to_bytes32(address: &Address) -> B256 {
    let mut word = [0u8; 32];
    word[..20].copy_from_slice(address.as_slice());
    B256::from(word)
}

/// Inverse of [`evm_address_to_bytes32`].
pub fn bytes32_to_evm_address(word: &B256) -> Address {
    Address::from_slice(&word[..20])
}

/// The raw 20 bytes of a Base address.
pub fn evm_address_bytes(address: &Address) -> [u8; 20] {
    address.0.into()
}

/// Hash over the message content: sender, payload tag, encoded payload.
pub fn inner_hash(sender: B256, ty: MessageType, payload: &[u8]) -> B256 {
    // `abi.encode(bytes32 sender, uint8 ty, bytes data)`. This alloy version
    // does not implement `SolValue` for `u8` (it reserves the Rust `u8` for
    // the `bytes1`/`bytesN` ambiguity), so the tuple is encoded through its
    // explicit Solidity types to pin the tag to `uint8`.
    type InnerParams = (sol_data::FixedBytes<32>, sol_data::Uint<8>, sol_data::Bytes);
    let params: <InnerParams as SolType>::RustType =
        (sender, u8::from(ty), payload.to_vec().into());
    keccak256(InnerParams::abi_encode_params(&params))
}

/// Hash over the envelope: nonce, message account, inner hash. This is the
/// canonical cross-chain identity the destination chain keys success by.
pub fn outer_hash(nonce: u64, message_account: B256, inner: B256) -> B256 {
    keccak256((nonce, message_account, inner).abi_encode_params())
}

/// A payload rendered into the contract's ABI encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedPayload {
    pub ty: MessageType,
    pub data: Vec<u8>,
}

/// ABI-encodes an outgoing payload. A transfer with `Some(call)` becomes
/// `TransferAndCall` with both tuples; with `None` only the transfer tuple
/// is present.
pub fn encode_payload(message: &Message) -> EncodedPayload {
    match message {
        Message::Call(call) => EncodedPayload {
            ty: MessageType::Call,
            data: call_tuple(call).abi_encode(),
        },
        Message::Transfer(transfer) => {
            let tuple = TransferTuple {
                localToken: Address::from(transfer.remote_token),
                remoteToken: pubkey_to_bytes32(&transfer.local_token),
                to: evm_address_to_bytes32(&Address::from(transfer.to)),
                remoteAmount: transfer.amount,
            };
            match &transfer.call {
                None => EncodedPayload {
                    ty: MessageType::Transfer,
                    data: tuple.abi_encode(),
                },
                Some(call) => EncodedPayload {
                    ty: MessageType::TransferAndCall,
                    data: (tuple, call_tuple(call)).abi_encode_params(),
                },
            }
        }
    }
}

fn call_tuple(call: &Call) -> CallTuple {
    CallTuple {
        ty: call.ty as u8,
        to: Address::from(call.to),
        value: call.value,
        data: call.data.clone().into(),
    }
}

/// An outgoing message rendered for the Base side, with both identity
/// hashes. Pure function of the account address and its decoded contents:
/// recomputing from freshly fetched state always reproduces the values
/// from creation time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvmMessage {
    pub outgoing_message_pubkey: B256,
    pub gas_limit: u64,
    pub nonce: u64,
    pub sender: B256,
    pub ty: MessageType,
    pub data: Vec<u8>,
    pub inner_hash: B256,
    pub outer_hash: B256,
}

/// Renders an [`OutgoingMessage`] account the way the Base relayer and
/// contract will see it.
pub fn build_evm_message(
    address: &Pubkey,
    outgoing: &OutgoingMessage,
    gas_limit: u64,
) -> EvmMessage {
    let sender = pubkey_to_bytes32(&outgoing.sender);
    let payload = encode_payload(&outgoing.message);
    let inner = inner_hash(sender, payload.ty, &payload.data);
    let account = pubkey_to_bytes32(address);
    let outer = outer_hash(outgoing.nonce, account, inner);
    EvmMessage {
        outgoing_message_pubkey: account,
        gas_limit,
        nonce: outgoing.nonce,
        sender,
        ty: payload.ty,
        data: payload.data,
        inner_hash: inner,
        outer_hash: outer,
    }
}

/// Narrows a foreign 256-bit value into a declared `uint64` field.
pub fn checked_u64(value: U256, field: &'static str) -> Result<u64> {
    u64::try_from(value).map_err(|_| BridgeError::EncodingOverflow { field })
}

/// Narrows a foreign 256-bit value into a declared `uint128` field.
pub fn checked_u128(value: U256, field: &'static str) -> Result<u128> {
    u128::try_from(value).map_err(|_| BridgeError::EncodingOverflow { field })
}

/// Scales a human-readable amount into the token's smallest unit
/// (`amount * 10^decimals`, floored).
pub fn scaled_amount(amount: f64, decimals: u8) -> Result<u64> {
    let scaled = amount * 10f64.powi(i32::from(decimals));
    if !scaled.is_finite() || scaled < 0.0 || scaled >= u64::MAX as f64 {
        return Err(BridgeError::EncodingOverflow { field: "amount" });
    }
    Ok(scaled.floor() as u64)
}
