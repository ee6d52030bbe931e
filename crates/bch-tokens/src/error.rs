/// Error types for token descriptor and prefix operations.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The prefix ended before a complete field was read.
    #[error("truncated token prefix")]
    Truncated,

    /// The token bitfield has reserved bits set or an inconsistent shape.
    #[error("invalid token bitfield {0:#04x}")]
    InvalidBitfield(u8),

    /// The NFT capability nibble is not 0, 1, or 2.
    #[error("invalid nft capability {0}")]
    InvalidCapability(u8),

    /// The commitment is empty or longer than 40 bytes.
    #[error("invalid commitment length {0}")]
    InvalidCommitmentLength(usize),

    /// The fungible amount is zero or exceeds the maximum supply.
    #[error("invalid token amount {0}")]
    InvalidAmount(u64),

    /// A descriptor carries neither an NFT nor a fungible amount.
    #[error("token carries neither nft nor amount")]
    EmptyToken,

    /// A commitment was given without an NFT capability.
    #[error("commitment without nft capability")]
    CommitmentWithoutNft,

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] bch_primitives::PrimitivesError),
}
