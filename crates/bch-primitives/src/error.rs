//! Error types for primitive operations.

use thiserror::Error;

/// Errors raised by hashing, wire-format, and key operations.
#[derive(Debug, Error)]
pub enum PrimitivesError {
    /// A reader ran out of bytes mid-field.
    #[error("unexpected end of data")]
    UnexpectedEof,

    /// A hex string could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// A k256 ECDSA operation failed.
    #[error("ecdsa error: {0}")]
    Ecdsa(#[from] k256::ecdsa::Error),

    /// A private key scalar was malformed or out of range.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// A public key encoding was malformed or not on the curve.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// A signature was malformed or could not be produced.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// A WIF string was malformed.
    #[error("invalid WIF: {0}")]
    InvalidWif(String),

    /// A Base58Check checksum did not match.
    #[error("checksum mismatch")]
    ChecksumMismatch,
}
