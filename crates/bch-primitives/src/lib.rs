/// BCH CashToken SDK - Hashing, wire-format utilities, and key material.
///
/// This crate provides the foundational building blocks for the SDK:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Variable-length integer encoding and cursor-based wire readers/writers
/// - secp256k1 private/public keys and DER signatures (via k256)

pub mod hash;
pub mod util;
pub mod ec;

mod error;
pub use error::PrimitivesError;
