//! Wire format for the settlement instruction handed to the external relay.
//!
//! Layout is fixed and bit-exact: one version byte, a 3-byte big-endian
//! action id, then the ABI tuple `(address vault, bool isDeposit,
//! uint64 usdAmount)` as three 32-byte words. The amount is the staked or
//! unstaked asset amount rescaled from 6 to 8 decimals; anything that does
//! not fit in 64 bits must be rejected before this module is reached.
//!
//! Encoding is a pure function of the payload so it can be golden-tested in
//! isolation from ledger state.

use alloy::primitives::Address;
use alloy::sol_types::SolValue;
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};

/// Current payload version byte.
pub const ACTION_VERSION: u8 = 0x01;

/// Action id for a cross-venue vault transfer.
pub const ACTION_ID_VAULT_TRANSFER: u32 = 0x00_0002;

/// Total encoded length: 1 version byte + 3 id bytes + 3 ABI words.
pub const ENCODED_LEN: usize = 4 + 3 * 32;

/// The settlement instruction consumed by the external relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPayload {
    pub version: u8,
    pub action_id: u32,
    /// Vault the transfer settles against on the destination venue
    pub vault: Address,
    /// Direction: true moves funds toward the venue, false back out
    pub is_deposit: bool,
    /// 8-decimal USD amount
    pub amount: u64,
}

impl ActionPayload {
    /// Build a version-1 vault transfer instruction.
    pub fn vault_transfer(vault: Address, is_deposit: bool, amount: u64) -> Self {
        Self {
            version: ACTION_VERSION,
            action_id: ACTION_ID_VAULT_TRANSFER,
            vault,
            is_deposit,
            amount,
        }
    }

    /// Encode to the fixed 100-byte relay format.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(ENCODED_LEN);
        out.push(self.version);
        out.extend_from_slice(&self.action_id.to_be_bytes()[1..]);
        out.extend_from_slice(&(self.vault, self.is_deposit, self.amount).abi_encode());
        debug_assert_eq!(out.len(), ENCODED_LEN);
        out
    }

    /// Hex rendering of the encoded payload, for logs and relay debugging.
    pub fn encode_hex(&self) -> String {
        hex::encode(self.encode())
    }

    /// Decode and validate a relay payload.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ENCODED_LEN {
            return Err(CodecError::InvalidLength {
                expected: ENCODED_LEN,
                found: bytes.len(),
            }
            .into());
        }

        let version = bytes[0];
        if version != ACTION_VERSION {
            return Err(CodecError::UnsupportedVersion { found: version }.into());
        }

        let action_id = u32::from_be_bytes([0, bytes[1], bytes[2], bytes[3]]);
        if action_id != ACTION_ID_VAULT_TRANSFER {
            return Err(CodecError::UnknownActionId { found: action_id }.into());
        }

        let (vault, is_deposit, amount) = <(Address, bool, u64)>::abi_decode(&bytes[4..])
            .map_err(|e| CodecError::Body(e.to_string()))?;

        Ok(Self {
            version,
            action_id,
            vault,
            is_deposit,
            amount,
        })
    }
}
