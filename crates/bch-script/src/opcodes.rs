/// Bitcoin Cash script opcode constants.
///
/// Only the opcodes used by the P2PKH/P2SH templates and the OP_RETURN
/// data carrier are defined here.

/// An empty push (also known as OP_FALSE).
pub const OP_0: u8 = 0x00;

/// Direct push of 20 bytes.
pub const OP_DATA_20: u8 = 0x14;

/// Push the next byte's worth of length, then that many bytes.
pub const OP_PUSHDATA1: u8 = 0x4c;

/// Push a little-endian u16 length, then that many bytes.
pub const OP_PUSHDATA2: u8 = 0x4d;

/// Push a little-endian u32 length, then that many bytes.
pub const OP_PUSHDATA4: u8 = 0x4e;

/// Mark the output as a provably unspendable data carrier.
pub const OP_RETURN: u8 = 0x6a;

/// Duplicate the top stack item.
pub const OP_DUP: u8 = 0x76;

/// Pop two items and push whether they are equal.
pub const OP_EQUAL: u8 = 0x87;

/// OP_EQUAL followed by OP_VERIFY.
pub const OP_EQUALVERIFY: u8 = 0x88;

/// Hash the top stack item with RIPEMD160(SHA256(x)).
pub const OP_HASH160: u8 = 0xa9;

/// Verify an ECDSA signature against a public key.
pub const OP_CHECKSIG: u8 = 0xac;
