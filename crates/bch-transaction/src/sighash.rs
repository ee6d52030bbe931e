//! Fork-id (BIP143-style) signature hashing.
//!
//! Bitcoin Cash commits to the spent output's value and to digests of the
//! prevouts, sequences, and outputs, so each input can be signed without
//! re-serializing the whole transaction per input.

use bch_primitives::hash::{sha256, sha256d};
use bch_primitives::util::{ByteWriter, VarInt};

use crate::transaction::Transaction;
use crate::TransactionError;

/// SIGHASH_ALL combined with the fork-id bit.
pub const SIGHASH_ALL_FORKID: u32 = 0x41;

/// SHA-256d over all input outpoints.
///
/// # Arguments
/// * `tx` - The transaction being signed.
///
/// # Returns
/// The 32-byte prevouts digest.
pub fn hash_prevouts(tx: &Transaction) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 36);
    for input in &tx.inputs {
        input.write_outpoint(&mut writer);
    }
    sha256d(writer.as_bytes())
}

/// SHA-256d over all input sequence numbers.
///
/// # Arguments
/// * `tx` - The transaction being signed.
///
/// # Returns
/// The 32-byte sequences digest.
pub fn hash_sequence(tx: &Transaction) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        writer.write_u32_le(input.sequence);
    }
    sha256d(writer.as_bytes())
}

/// SHA-256d over all serialized outputs.
///
/// # Arguments
/// * `tx` - The transaction being signed.
///
/// # Returns
/// The 32-byte outputs digest.
pub fn hash_outputs(tx: &Transaction) -> [u8; 32] {
    let mut writer = ByteWriter::new();
    for output in &tx.outputs {
        output.write_to(&mut writer);
    }
    sha256d(writer.as_bytes())
}

/// Build the sighash preimage for one input.
///
/// Layout: version, hashPrevouts, hashSequence, the input's outpoint, the
/// varint-prefixed script code, the spent value, the input's sequence,
/// hashOutputs, locktime, and the sighash type as a little-endian u32.
///
/// The script code is the full locking script of the spent output,
/// token prefix included for token-bearing coins.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - Which input is being signed.
/// * `script_code` - The spent output's full locking script bytes.
/// * `value` - The spent output's value in satoshis.
///
/// # Returns
/// The preimage bytes, or an error if the input index is out of range.
pub fn sighash_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    value: u64,
) -> Result<Vec<u8>, TransactionError> {
    let input = tx
        .inputs
        .get(input_index)
        .ok_or(TransactionError::InputIndexOutOfRange(input_index))?;

    let mut writer = ByteWriter::with_capacity(156 + script_code.len());
    writer.write_u32_le(tx.version);
    writer.write_bytes(&hash_prevouts(tx));
    writer.write_bytes(&hash_sequence(tx));
    input.write_outpoint(&mut writer);
    writer.write_varint(VarInt::from(script_code.len()));
    writer.write_bytes(script_code);
    writer.write_u64_le(value);
    writer.write_u32_le(input.sequence);
    writer.write_bytes(&hash_outputs(tx));
    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(SIGHASH_ALL_FORKID);
    Ok(writer.into_bytes())
}

/// The single-SHA-256 digest of the sighash preimage for one input.
///
/// The signer hashes this digest once more before signing, so the
/// signature covers the conventional double SHA-256 of the preimage.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - Which input is being signed.
/// * `script_code` - The spent output's full locking script bytes.
/// * `value` - The spent output's value in satoshis.
///
/// # Returns
/// The 32-byte digest, or an error if the input index is out of range.
pub fn sighash_digest(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    value: u64,
) -> Result<[u8; 32], TransactionError> {
    Ok(sha256(&sighash_preimage(
        tx,
        input_index,
        script_code,
        value,
    )?))
}
