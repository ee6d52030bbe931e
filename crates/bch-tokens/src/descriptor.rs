//! CashToken descriptors.
//!
//! A token descriptor names a category and carries a fungible amount, an
//! NFT (capability plus optional commitment), or both. Descriptors are
//! attached to outputs via the token prefix and tracked by the wallet's
//! token ledger.

use std::fmt;

use crate::TokenError;

/// Maximum fungible token amount: 2^63 - 1.
pub const MAX_FUNGIBLE_AMOUNT: u64 = i64::MAX as u64;

/// Maximum NFT commitment length in bytes.
pub const MAX_COMMITMENT_LENGTH: usize = 40;

/// The capability of a non-fungible token.
///
/// Ordered by authority: an immutable NFT can only be moved, a mutable
/// NFT may change its commitment when spent, and a minting NFT may create
/// new NFTs of its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// The NFT can only be transferred as-is.
    Immutable,
    /// The commitment may be rewritten when the NFT is spent.
    Mutable,
    /// New NFTs of the same category may be created.
    Minting,
}

impl Capability {
    /// The capability nibble used in the token prefix bitfield.
    pub fn to_bits(self) -> u8 {
        match self {
            Capability::Immutable => 0,
            Capability::Mutable => 1,
            Capability::Minting => 2,
        }
    }

    /// Decode a capability from the prefix bitfield nibble.
    ///
    /// # Arguments
    /// * `bits` - The low nibble of the token bitfield.
    ///
    /// # Returns
    /// `Ok(Capability)` or an error for values above 2.
    pub fn from_bits(bits: u8) -> Result<Self, TokenError> {
        match bits {
            0 => Ok(Capability::Immutable),
            1 => Ok(Capability::Mutable),
            2 => Ok(Capability::Minting),
            other => Err(TokenError::InvalidCapability(other)),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Capability::Immutable => "immutable",
            Capability::Mutable => "mutable",
            Capability::Minting => "minting",
        };
        write!(f, "{}", s)
    }
}

/// A CashToken descriptor.
///
/// The category is held in display order (the byte order of the genesis
/// txid as printed); the prefix codec reverses it on the wire. A valid
/// descriptor carries a fungible amount, an NFT, or both.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CashToken {
    /// The 32-byte token category, in display order.
    pub category: [u8; 32],
    /// The fungible amount, if any (1..=2^63-1).
    pub amount: Option<u64>,
    /// The NFT capability, present exactly when the output carries an NFT.
    pub capability: Option<Capability>,
    /// The NFT commitment, at most 40 bytes; requires a capability.
    pub commitment: Option<Vec<u8>>,
}

impl CashToken {
    /// Create a fungible-only token descriptor.
    ///
    /// # Arguments
    /// * `category` - The token category in display order.
    /// * `amount` - The fungible amount.
    ///
    /// # Returns
    /// A descriptor with no NFT fields.
    pub fn fungible(category: [u8; 32], amount: u64) -> Self {
        CashToken {
            category,
            amount: Some(amount),
            capability: None,
            commitment: None,
        }
    }

    /// Create an NFT descriptor without a fungible amount.
    ///
    /// # Arguments
    /// * `category` - The token category in display order.
    /// * `capability` - The NFT capability.
    /// * `commitment` - Optional commitment bytes.
    ///
    /// # Returns
    /// A descriptor carrying only an NFT.
    pub fn nft(category: [u8; 32], capability: Capability, commitment: Option<Vec<u8>>) -> Self {
        CashToken {
            category,
            amount: None,
            capability: Some(capability),
            commitment,
        }
    }

    /// Whether the descriptor carries an NFT.
    pub fn has_nft(&self) -> bool {
        self.capability.is_some()
    }

    /// Whether the descriptor carries a fungible amount.
    pub fn has_amount(&self) -> bool {
        self.amount.is_some()
    }

    /// The category in display-order hex.
    pub fn category_hex(&self) -> String {
        hex::encode(self.category)
    }

    /// Check the structural invariants of the descriptor.
    ///
    /// A descriptor must carry an NFT or an amount, a commitment requires
    /// a capability, a non-empty commitment is at most 40 bytes, and the
    /// amount is within 1..=2^63-1.
    ///
    /// # Returns
    /// `Ok(())` or the first violated invariant.
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.capability.is_none() && self.amount.is_none() {
            return Err(TokenError::EmptyToken);
        }
        if self.commitment.is_some() && self.capability.is_none() {
            return Err(TokenError::CommitmentWithoutNft);
        }
        if let Some(commitment) = &self.commitment {
            if commitment.is_empty() || commitment.len() > MAX_COMMITMENT_LENGTH {
                return Err(TokenError::InvalidCommitmentLength(commitment.len()));
            }
        }
        if let Some(amount) = self.amount {
            if amount == 0 || amount > MAX_FUNGIBLE_AMOUNT {
                return Err(TokenError::InvalidAmount(amount));
            }
        }
        Ok(())
    }
}
