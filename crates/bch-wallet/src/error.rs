/// Error types for wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// The satoshi balance cannot cover the requested outputs plus fee.
    #[error("insufficient funds: balance {available} is less than {required} (including fee)")]
    InsufficientFunds {
        /// Satoshis available across the considered inputs.
        available: u64,
        /// Satoshis required by outputs and fee.
        required: u64,
    },

    /// The token holdings cannot cover a requested token output.
    #[error("insufficient token funds for category {0}")]
    InsufficientTokenFunds(String),

    /// The requested output kind cannot be spent to yet.
    #[error("{0}")]
    UnsupportedOutput(String),

    /// No chain backend produced a usable answer.
    #[error("all chain backends failed: {0}")]
    BackendUnavailable(String),

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] bch_primitives::PrimitivesError),

    /// Error from script crate.
    #[error("script error: {0}")]
    Script(#[from] bch_script::ScriptError),

    /// Error from tokens crate.
    #[error("token error: {0}")]
    Token(#[from] bch_tokens::TokenError),

    /// Error from transaction crate.
    #[error("transaction error: {0}")]
    Transaction(#[from] bch_transaction::TransactionError),
}
