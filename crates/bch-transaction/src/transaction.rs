//! The wire-format transaction.

use std::fmt;

use bch_primitives::hash::sha256d;
use bch_primitives::util::{ByteReader, ByteWriter, VarInt};

use crate::input::TxInput;
use crate::output::TxOutput;
use crate::TransactionError;

/// Transaction version carried by all built transactions.
pub const TX_VERSION: u32 = 2;

/// A Bitcoin Cash transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// The transaction version.
    pub version: u32,
    /// The inputs.
    pub inputs: Vec<TxInput>,
    /// The outputs.
    pub outputs: Vec<TxOutput>,
    /// The lock time.
    pub lock_time: u32,
}

impl Transaction {
    /// Create an empty version-2 transaction with zero locktime.
    ///
    /// # Returns
    /// A `Transaction` with no inputs or outputs.
    pub fn new() -> Self {
        Transaction {
            version: TX_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    /// Serialize the transaction to wire-format bytes.
    ///
    /// # Returns
    /// The encoded transaction.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.serialized_size());
        writer.write_u32_le(self.version);
        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(&mut writer);
        }
        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(&mut writer);
        }
        writer.write_u32_le(self.lock_time);
        writer.into_bytes()
    }

    /// Serialize the transaction to a lowercase hex string.
    ///
    /// # Returns
    /// The encoded transaction as hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parse a transaction from wire-format bytes.
    ///
    /// # Arguments
    /// * `bytes` - The encoded transaction; trailing bytes are an error.
    ///
    /// # Returns
    /// The parsed `Transaction`, or an error on malformed input.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = ByteReader::new(bytes);

        let version = reader.read_u32_le()?;
        let input_count = reader.read_varint()?.value() as usize;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            inputs.push(TxInput::read_from(&mut reader)?);
        }

        let output_count = reader.read_varint()?.value() as usize;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            outputs.push(TxOutput::read_from(&mut reader)?);
        }

        let lock_time = reader.read_u32_le()?;
        if reader.remaining() != 0 {
            return Err(TransactionError::TrailingBytes);
        }

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    /// Parse a transaction from a hex string.
    ///
    /// # Arguments
    /// * `hex_str` - The encoded transaction as hex.
    ///
    /// # Returns
    /// The parsed `Transaction`, or an error on malformed input.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)
            .map_err(bch_primitives::PrimitivesError::from)?;
        Self::from_bytes(&bytes)
    }

    /// The transaction id in wire order: SHA-256d of the serialization.
    ///
    /// # Returns
    /// The 32-byte txid in wire order.
    pub fn txid(&self) -> [u8; 32] {
        sha256d(&self.to_bytes())
    }

    /// The transaction id in display order (byte-reversed hex).
    ///
    /// # Returns
    /// The txid hex string as printed by explorers.
    pub fn txid_hex(&self) -> String {
        let mut id = self.txid();
        id.reverse();
        hex::encode(id)
    }

    /// The exact serialized size in bytes.
    ///
    /// # Returns
    /// The wire-format length of the transaction as currently populated.
    pub fn serialized_size(&self) -> usize {
        let mut size = 4 + 4; // version + locktime
        size += VarInt::from(self.inputs.len()).length();
        for input in &self.inputs {
            let script_len = input
                .unlocking_script
                .as_ref()
                .map(|s| s.len())
                .unwrap_or(0);
            size += 32 + 4 + VarInt::from(script_len).length() + script_len + 4;
        }
        size += VarInt::from(self.outputs.len()).length();
        for output in &self.outputs {
            size += output.serialized_size();
        }
        size
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bch_script::Script;

    fn sample_tx() -> Transaction {
        let mut tx = Transaction::new();
        let mut input = TxInput::new([0xAB; 32], 1);
        input.unlocking_script = Some(Script::from_bytes(&[0x51]));
        tx.inputs.push(input);
        tx.outputs.push(TxOutput::new(
            1000,
            Script::p2pkh(&[0x22; 20]),
        ));
        tx
    }

    #[test]
    fn test_defaults() {
        let tx = Transaction::new();
        assert_eq!(tx.version, 2);
        assert_eq!(tx.lock_time, 0);
    }

    #[test]
    fn test_bytes_roundtrip() {
        let tx = sample_tx();
        let bytes = tx.to_bytes();
        assert_eq!(bytes.len(), tx.serialized_size());

        let parsed = Transaction::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, tx);
    }

    #[test]
    fn test_hex_roundtrip() {
        let tx = sample_tx();
        let parsed = Transaction::from_hex(&tx.to_hex()).unwrap();
        assert_eq!(parsed, tx);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = sample_tx().to_bytes();
        bytes.push(0x00);
        assert!(matches!(
            Transaction::from_bytes(&bytes),
            Err(TransactionError::TrailingBytes)
        ));
    }

    #[test]
    fn test_truncation_rejected() {
        let bytes = sample_tx().to_bytes();
        assert!(Transaction::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn test_txid_display_is_reversed() {
        let tx = sample_tx();
        let wire = tx.txid();
        let display = tx.txid_hex();

        let mut reversed = wire;
        reversed.reverse();
        assert_eq!(display, hex::encode(reversed));
        assert_eq!(display.len(), 64);
    }
}
