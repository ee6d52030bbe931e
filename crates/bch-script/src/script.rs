/// Bitcoin Cash Script type - a sequence of opcodes and data pushes.
///
/// Scripts are used in transaction inputs (unlocking) and outputs (locking)
/// to define spending conditions. The Script wraps a `Vec<u8>` and provides
/// methods for construction, classification, and serialization.

use std::fmt;

use crate::opcodes::*;
use crate::ScriptError;

/// A Bitcoin Cash script, represented as a byte vector newtype.
#[derive(Clone, PartialEq, Eq)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    ///
    /// # Returns
    /// An empty `Script` instance.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string (e.g. "76a914...88ac").
    ///
    /// # Returns
    /// A `Script` wrapping the decoded bytes, or an error if the hex is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str)?;
        Ok(Script(bytes))
    }

    /// Create a script from raw bytes.
    ///
    /// # Arguments
    /// * `bytes` - Raw script bytes.
    ///
    /// # Returns
    /// A `Script` wrapping a copy of the given bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Create a script from an owned byte vector without copying.
    ///
    /// # Arguments
    /// * `bytes` - Raw script bytes.
    ///
    /// # Returns
    /// A `Script` taking ownership of the vector.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }

    /// Build the canonical P2PKH locking script for a 20-byte key hash.
    ///
    /// Pattern: OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
    ///
    /// # Arguments
    /// * `pub_key_hash` - The Hash160 of the recipient's public key.
    ///
    /// # Returns
    /// A 25-byte locking `Script`.
    pub fn p2pkh(pub_key_hash: &[u8; 20]) -> Self {
        let mut bytes = Vec::with_capacity(25);
        bytes.push(OP_DUP);
        bytes.push(OP_HASH160);
        bytes.push(OP_DATA_20);
        bytes.extend_from_slice(pub_key_hash);
        bytes.push(OP_EQUALVERIFY);
        bytes.push(OP_CHECKSIG);
        Script(bytes)
    }

    /// Build the canonical P2SH locking script for a 20-byte script hash.
    ///
    /// Pattern: OP_HASH160 <20 bytes> OP_EQUAL
    ///
    /// # Arguments
    /// * `script_hash` - The Hash160 of the redeem script.
    ///
    /// # Returns
    /// A 23-byte locking `Script`.
    pub fn p2sh(script_hash: &[u8; 20]) -> Self {
        let mut bytes = Vec::with_capacity(23);
        bytes.push(OP_HASH160);
        bytes.push(OP_DATA_20);
        bytes.extend_from_slice(script_hash);
        bytes.push(OP_EQUAL);
        Script(bytes)
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Append a raw opcode byte.
    ///
    /// # Arguments
    /// * `opcode` - The opcode byte to append.
    pub fn append_opcode(&mut self, opcode: u8) {
        self.0.push(opcode);
    }

    /// Append a minimally-encoded data push.
    ///
    /// Uses a direct push for data up to 75 bytes, OP_PUSHDATA1 up to 255,
    /// OP_PUSHDATA2 up to 65535, and OP_PUSHDATA4 beyond that.
    ///
    /// # Arguments
    /// * `data` - The data bytes to push.
    pub fn append_push_data(&mut self, data: &[u8]) {
        let len = data.len();
        if len <= 75 {
            self.0.push(len as u8);
        } else if len <= 0xFF {
            self.0.push(OP_PUSHDATA1);
            self.0.push(len as u8);
        } else if len <= 0xFFFF {
            self.0.push(OP_PUSHDATA2);
            self.0.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.0.push(OP_PUSHDATA4);
            self.0.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.0.extend_from_slice(data);
    }

    /// Append raw bytes without any push encoding.
    ///
    /// # Arguments
    /// * `bytes` - The bytes to append verbatim.
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the script as a hex string.
    ///
    /// # Returns
    /// A lowercase hex representation of the script bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Return a reference to the underlying bytes.
    ///
    /// # Returns
    /// A byte slice of the script contents.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the script and return the underlying byte vector.
    ///
    /// # Returns
    /// The owned script bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Return the length of the script in bytes.
    ///
    /// # Returns
    /// The number of bytes in the script.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the script is empty (zero bytes).
    ///
    /// # Returns
    /// `true` if the script has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // -----------------------------------------------------------------------
    // Script classification
    // -----------------------------------------------------------------------

    /// Check if this is a Pay-to-Public-Key-Hash (P2PKH) output script.
    ///
    /// Pattern: OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
    ///
    /// # Returns
    /// `true` if the script matches the P2PKH pattern.
    pub fn is_p2pkh(&self) -> bool {
        let b = &self.0;
        b.len() == 25
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == OP_DATA_20
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
    }

    /// Check if this is a Pay-to-Script-Hash (P2SH) output script.
    ///
    /// Pattern: OP_HASH160 <20 bytes> OP_EQUAL
    ///
    /// # Returns
    /// `true` if the script matches the P2SH pattern.
    pub fn is_p2sh(&self) -> bool {
        let b = &self.0;
        b.len() == 23 && b[0] == OP_HASH160 && b[1] == OP_DATA_20 && b[22] == OP_EQUAL
    }

    /// Check if this is an OP_RETURN data carrier script.
    ///
    /// # Returns
    /// `true` if the script starts with OP_RETURN.
    pub fn is_data_carrier(&self) -> bool {
        !self.0.is_empty() && self.0[0] == OP_RETURN
    }

    /// Extract the 20-byte public key hash from a P2PKH script.
    ///
    /// # Returns
    /// `Some([u8; 20])` if the script is P2PKH, `None` otherwise.
    pub fn p2pkh_hash(&self) -> Option<[u8; 20]> {
        if !self.is_p2pkh() {
            return None;
        }
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&self.0[3..23]);
        Some(hash)
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
