/// Error types for script and address operations.
///
/// Covers cashaddr decoding failures, script construction problems,
/// and OP_RETURN payload limits.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Generic invalid address error.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Address string mixes upper and lower case.
    #[error("address mixes upper and lower case")]
    MixedCase,

    /// Cashaddr checksum does not verify.
    #[error("checksum failed")]
    ChecksumFailed,

    /// The human-readable prefix is not a known network.
    #[error("unknown address prefix '{0}'")]
    UnknownPrefix(String),

    /// The version byte does not encode a supported address kind.
    #[error("unknown address version byte {0:#04x}")]
    UnknownVersion(u8),

    /// A character outside the cashaddr alphabet was encountered.
    #[error("invalid cashaddr character '{0}'")]
    InvalidCharacter(char),

    /// Bit-group conversion had invalid padding.
    #[error("invalid padding in payload")]
    InvalidPadding,

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Push data exceeds maximum allowed size.
    #[error("data too big: {0} bytes")]
    DataTooBig(usize),

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] bch_primitives::PrimitivesError),
}
