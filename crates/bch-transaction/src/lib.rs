/// BCH CashToken SDK - Transaction model, sighash, unspents, and fees.
///
/// Provides the wire-format transaction (inputs, outputs, serialization,
/// txid), the fork-id sighash algorithm, the `Unspent` coin model with its
/// token-aware priority ordering, and fee estimation.

pub mod fees;
pub mod input;
pub mod output;
pub mod sighash;
pub mod transaction;
pub mod unspent;

mod error;
pub use error::TransactionError;
pub use input::TxInput;
pub use output::TxOutput;
pub use transaction::{Transaction, TX_VERSION};
pub use unspent::Unspent;
