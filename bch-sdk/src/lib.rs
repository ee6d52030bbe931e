#![deny(missing_docs)]

//! BCH CashToken SDK - Complete SDK.
//!
//! Re-exports all BCH SDK components for convenient single-crate usage.

pub use bch_primitives as primitives;
pub use bch_script as script;
pub use bch_tokens as tokens;
pub use bch_transaction as transaction;
pub use bch_wallet as wallet;
