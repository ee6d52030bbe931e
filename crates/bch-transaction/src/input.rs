//! Transaction input.

use bch_primitives::util::{ByteReader, ByteWriter, VarInt};
use bch_script::Script;

use crate::TransactionError;

/// Sequence number used for all inputs; locktime is not exercised.
pub const DEFAULT_SEQUENCE: u32 = 0xFFFF_FFFF;

/// A transaction input referencing a previous output.
///
/// The previous txid is held in wire order (reversed relative to the
/// display hex). The unlocking script is `None` until the input is signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxInput {
    /// The txid of the previous transaction, in wire order.
    pub prev_txid: [u8; 32],
    /// The index of the spent output within the previous transaction.
    pub prev_index: u32,
    /// The unlocking script, present once the input is signed.
    pub unlocking_script: Option<Script>,
    /// The sequence number.
    pub sequence: u32,
}

impl TxInput {
    /// Create an unsigned input spending the given outpoint.
    ///
    /// # Arguments
    /// * `prev_txid` - The previous txid in wire order.
    /// * `prev_index` - The output index being spent.
    ///
    /// # Returns
    /// A `TxInput` with no unlocking script and the default sequence.
    pub fn new(prev_txid: [u8; 32], prev_index: u32) -> Self {
        TxInput {
            prev_txid,
            prev_index,
            unlocking_script: None,
            sequence: DEFAULT_SEQUENCE,
        }
    }

    /// Create an unsigned input from a display-order txid hex string.
    ///
    /// # Arguments
    /// * `txid_hex` - The previous txid as printed (display order).
    /// * `prev_index` - The output index being spent.
    ///
    /// # Returns
    /// A `TxInput`, or an error if the hex is not a 32-byte txid.
    pub fn from_txid_hex(txid_hex: &str, prev_index: u32) -> Result<Self, TransactionError> {
        let bytes = hex::decode(txid_hex)
            .map_err(|_| TransactionError::InvalidTxid(txid_hex.to_string()))?;
        if bytes.len() != 32 {
            return Err(TransactionError::InvalidTxid(txid_hex.to_string()));
        }
        let mut prev_txid = [0u8; 32];
        prev_txid.copy_from_slice(&bytes);
        prev_txid.reverse();
        Ok(TxInput::new(prev_txid, prev_index))
    }

    /// The previous txid in display order.
    ///
    /// # Returns
    /// The reversed txid as a hex string.
    pub fn prev_txid_hex(&self) -> String {
        let mut bytes = self.prev_txid;
        bytes.reverse();
        hex::encode(bytes)
    }

    /// Read an input from the wire format.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let mut prev_txid = [0u8; 32];
        prev_txid.copy_from_slice(reader.read_bytes(32)?);
        let prev_index = reader.read_u32_le()?;

        let script_len = reader.read_varint()?.value() as usize;
        let script_bytes = reader.read_bytes(script_len)?;
        let unlocking_script = if script_bytes.is_empty() {
            None
        } else {
            Some(Script::from_bytes(script_bytes))
        };

        let sequence = reader.read_u32_le()?;
        Ok(TxInput {
            prev_txid,
            prev_index,
            unlocking_script,
            sequence,
        })
    }

    /// Write the input in wire format.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.prev_txid);
        writer.write_u32_le(self.prev_index);
        match &self.unlocking_script {
            Some(script) => {
                writer.write_varint(VarInt::from(script.len()));
                writer.write_bytes(script.to_bytes());
            }
            None => writer.write_varint(VarInt(0)),
        }
        writer.write_u32_le(self.sequence);
    }

    /// Write just the outpoint (txid + index), as used by the sighash.
    pub(crate) fn write_outpoint(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.prev_txid);
        writer.write_u32_le(self.prev_index);
    }
}
