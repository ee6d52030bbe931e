//! Transaction output.

use bch_primitives::util::{ByteReader, ByteWriter, VarInt};
use bch_script::Script;

use crate::TransactionError;

/// A transaction output: a satoshi value and a locking script.
///
/// For token-bearing outputs the locking script includes the token prefix
/// ahead of the spending conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutput {
    /// The output value in satoshis.
    pub value: u64,
    /// The full output script, token prefix included when present.
    pub locking_script: Script,
}

impl TxOutput {
    /// Create an output.
    ///
    /// # Arguments
    /// * `value` - The satoshi value.
    /// * `locking_script` - The full output script.
    ///
    /// # Returns
    /// A new `TxOutput`.
    pub fn new(value: u64, locking_script: Script) -> Self {
        TxOutput {
            value,
            locking_script,
        }
    }

    /// Read an output from the wire format.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let value = reader.read_u64_le()?;
        let script_len = reader.read_varint()?.value() as usize;
        let locking_script = Script::from_bytes(reader.read_bytes(script_len)?);
        Ok(TxOutput {
            value,
            locking_script,
        })
    }

    /// Write the output in wire format.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u64_le(self.value);
        writer.write_varint(VarInt::from(self.locking_script.len()));
        writer.write_bytes(self.locking_script.to_bytes());
    }

    /// The serialized size of this output in bytes.
    ///
    /// # Returns
    /// 8 (value) + varint length + script bytes.
    pub fn serialized_size(&self) -> usize {
        8 + VarInt::from(self.locking_script.len()).length() + self.locking_script.len()
    }
}
