/// BCH CashToken SDK - Token descriptors and the token prefix codec.
///
/// Provides the `CashToken` descriptor (fungible amount, NFT capability,
/// commitment), and encoding/decoding of the 0xEF token prefix that
/// precedes a locking script in a token-bearing output.

pub mod descriptor;
pub mod prefix;

mod error;
pub use descriptor::{Capability, CashToken};
pub use error::TokenError;
pub use prefix::{encode_prefix, split_prefix, TOKEN_PREFIX};
