/// BCH CashToken SDK - Token ledger, UTXO selection, and transaction building.
///
/// Turns a wallet's unspent outputs and a requested set of payments into a
/// signed, byte-exact transaction: the token ledger nets holdings and owes
/// change, the selector picks token-aware inputs, and the builder computes
/// fees, signs each input, and serializes the result.

pub mod builder;
pub mod ledger;
pub mod network;
pub mod outputs;
pub mod selector;

mod error;
pub use builder::{create_transaction, sanitize_tx_data, CarrierMessage};
pub use error::WalletError;
pub use ledger::{TokenLedger, DUST_LIMIT};
pub use network::{ChainBackend, FallbackChain};
pub use outputs::{OutputRequest, PreparedOutput};
pub use selector::select_unspents;
