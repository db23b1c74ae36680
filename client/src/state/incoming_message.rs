use anchor_lang::prelude::*;

/// A Base -> Solana message, created by the bridge program when its
/// inclusion proof is accepted.
///
/// Seeds: `[b"incoming_message", message_hash]`
///
/// `executed` starts false and is flipped exactly once by a successful
/// `relay_message`; the record is terminal after that. Only the bridge
/// program mutates this account.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Originating Base identity, canonicalized to 32 bytes.
    pub sender: [u8; 32],
    pub message: IncomingPayload,
    pub executed: bool,
}

impl IncomingMessage {
    pub const NAME: &'static str = "IncomingMessage";
}

/// What a proven message asks the bridge to do on Solana.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum IncomingPayload {
    /// Run the bundled instructions only.
    Call(Vec<Ix>),
    /// Pay out a transfer, then run any bundled instructions.
    Transfer { transfer: IncomingTransfer, ixs: Vec<Ix> },
}

/// Transfer leg of an incoming message.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum IncomingTransfer {
    Sol {
        /// The wrapped token burned on Base.
        remote_token: [u8; 20],
        to: Pubkey,
        amount: u64,
    },
    Spl {
        remote_token: [u8; 20],
        local_token: Pubkey,
        to: Pubkey,
        amount: u64,
    },
}

/// An instruction bundled inside a message, stored in the program's own
/// compact encoding rather than the runtime's.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Ix {
    pub program_id: Pubkey,
    pub accounts: Vec<IxAccount>,
    pub data: Vec<u8>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct IxAccount {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::{decode_account, encode_account};

    #[test]
    fn sol_transfer_round_trip() {
        let message = IncomingMessage {
            sender: [3; 32],
            message: IncomingPayload::Transfer {
                transfer: IncomingTransfer::Sol {
                    remote_token: [1; 20],
                    to: Pubkey::new_unique(),
                    amount: 5_000,
                },
                ixs: vec![Ix {
                    program_id: Pubkey::new_unique(),
                    accounts: vec![IxAccount {
                        pubkey: Pubkey::new_unique(),
                        is_signer: false,
                        is_writable: true,
                    }],
                    data: vec![0xDE, 0xAD],
                }],
            },
            executed: false,
        };
        let bytes = encode_account(IncomingMessage::NAME, &message).unwrap();
        let back: IncomingMessage = decode_account(IncomingMessage::NAME, &bytes).unwrap();
        assert_eq!(back, message);
    }

    #[test]
    fn call_payload_round_trip() {
        let message = IncomingMessage {
            sender: [0; 32],
            message: IncomingPayload::Call(vec![]),
            executed: true,
        };
        let bytes = encode_account(IncomingMessage::NAME, &message).unwrap();
        let back: IncomingMessage = decode_account(IncomingMessage::NAME, &bytes).unwrap();
        assert_eq!(back, message);
    }
}
