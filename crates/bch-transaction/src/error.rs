/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// A txid string was not 64 hex characters.
    #[error("invalid txid: {0}")]
    InvalidTxid(String),

    /// Trailing bytes after a complete transaction.
    #[error("trailing bytes after transaction")]
    TrailingBytes,

    /// An input index was out of range for the transaction.
    #[error("input index {0} out of range")]
    InputIndexOutOfRange(usize),

    /// Error from primitives crate (wire-format reads, keys).
    #[error("primitives error: {0}")]
    Primitives(#[from] bch_primitives::PrimitivesError),

    /// Error from script crate.
    #[error("script error: {0}")]
    Script(#[from] bch_script::ScriptError),

    /// Error from tokens crate (prefix parsing on unspents).
    #[error("token error: {0}")]
    Token(#[from] bch_tokens::TokenError),
}
