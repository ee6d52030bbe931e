//! Token prefix codec.
//!
//! A token-bearing output prepends a prefix to its locking script:
//! the 0xEF marker, the 32-byte category in reversed (wire) order, a
//! bitfield describing which fields follow, an optional length-prefixed
//! commitment, and an optional varint fungible amount.

use bch_primitives::util::{ByteReader, ByteWriter, VarInt};

use crate::descriptor::{Capability, CashToken, MAX_COMMITMENT_LENGTH, MAX_FUNGIBLE_AMOUNT};
use crate::TokenError;

/// The byte that marks a token prefix at the start of an output script.
pub const TOKEN_PREFIX: u8 = 0xEF;

/// Bitfield flag: a length-prefixed commitment follows.
const HAS_COMMITMENT: u8 = 0x40;

/// Bitfield flag: the output carries an NFT.
const HAS_NFT: u8 = 0x20;

/// Bitfield flag: a varint fungible amount follows.
const HAS_AMOUNT: u8 = 0x10;

/// Mask of the NFT capability nibble.
const CAPABILITY_MASK: u8 = 0x0F;

/// Encode a token descriptor as a prefix byte sequence.
///
/// The category is reversed into wire order. The descriptor is validated
/// first, so malformed descriptors never serialize.
///
/// # Arguments
/// * `token` - The descriptor to encode.
///
/// # Returns
/// The prefix bytes, or an error if the descriptor is invalid.
pub fn encode_prefix(token: &CashToken) -> Result<Vec<u8>, TokenError> {
    token.validate()?;

    let mut writer = ByteWriter::with_capacity(34 + MAX_COMMITMENT_LENGTH);
    writer.write_u8(TOKEN_PREFIX);

    let mut category = token.category;
    category.reverse();
    writer.write_bytes(&category);

    let mut bitfield = 0u8;
    if token.commitment.is_some() {
        bitfield |= HAS_COMMITMENT;
    }
    if let Some(capability) = token.capability {
        bitfield |= HAS_NFT | capability.to_bits();
    }
    if token.amount.is_some() {
        bitfield |= HAS_AMOUNT;
    }
    writer.write_u8(bitfield);

    if let Some(commitment) = &token.commitment {
        writer.write_varint(VarInt::from(commitment.len()));
        writer.write_bytes(commitment);
    }
    if let Some(amount) = token.amount {
        writer.write_varint(VarInt(amount));
    }

    Ok(writer.into_bytes())
}

/// Split an output script into its token prefix and locking script.
///
/// A script that does not start with 0xEF has no prefix and is returned
/// whole. A script that does start with 0xEF must parse as a well-formed
/// prefix; a malformed one is an error rather than a plain script, since
/// 0xEF never begins a valid locking script.
///
/// # Arguments
/// * `script` - The full output script bytes.
///
/// # Returns
/// The decoded descriptor (if any) and the remaining locking script bytes.
pub fn split_prefix(script: &[u8]) -> Result<(Option<CashToken>, Vec<u8>), TokenError> {
    if script.first() != Some(&TOKEN_PREFIX) {
        return Ok((None, script.to_vec()));
    }

    let mut reader = ByteReader::new(script);
    reader.read_u8().map_err(|_| TokenError::Truncated)?; // 0xEF marker

    let mut category = [0u8; 32];
    category.copy_from_slice(reader.read_bytes(32).map_err(|_| TokenError::Truncated)?);
    category.reverse();

    let bitfield = reader.read_u8().map_err(|_| TokenError::Truncated)?;
    if bitfield & 0x80 != 0 {
        return Err(TokenError::InvalidBitfield(bitfield));
    }
    let has_commitment = bitfield & HAS_COMMITMENT != 0;
    let has_nft = bitfield & HAS_NFT != 0;
    let has_amount = bitfield & HAS_AMOUNT != 0;
    let capability_bits = bitfield & CAPABILITY_MASK;

    if !has_nft && !has_amount {
        return Err(TokenError::InvalidBitfield(bitfield));
    }
    if has_commitment && !has_nft {
        return Err(TokenError::InvalidBitfield(bitfield));
    }
    if !has_nft && capability_bits != 0 {
        return Err(TokenError::InvalidBitfield(bitfield));
    }

    let capability = if has_nft {
        Some(Capability::from_bits(capability_bits)?)
    } else {
        None
    };

    let commitment = if has_commitment {
        let len = reader
            .read_varint()
            .map_err(|_| TokenError::Truncated)?
            .value() as usize;
        if len == 0 || len > MAX_COMMITMENT_LENGTH {
            return Err(TokenError::InvalidCommitmentLength(len));
        }
        Some(
            reader
                .read_bytes(len)
                .map_err(|_| TokenError::Truncated)?
                .to_vec(),
        )
    } else {
        None
    };

    let amount = if has_amount {
        let value = reader
            .read_varint()
            .map_err(|_| TokenError::Truncated)?
            .value();
        if value == 0 || value > MAX_FUNGIBLE_AMOUNT {
            return Err(TokenError::InvalidAmount(value));
        }
        Some(value)
    } else {
        None
    };

    let token = CashToken {
        category,
        amount,
        capability,
        commitment,
    };

    Ok((Some(token), reader.rest().to_vec()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Display-order category used across the vectors.
    const CATEGORY_HEX: &str = "aabbccddeeff00112233445566778899aabbccddeeff00112233445566778899";

    /// Same category in wire (reversed) order.
    const WIRE_HEX: &str = "99887766554433221100ffeeddccbbaa99887766554433221100ffeeddccbbaa";

    fn category() -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&hex::decode(CATEGORY_HEX).unwrap());
        out
    }

    /// Known prefix encodings for each field combination.
    #[test]
    fn test_encode_known_vectors() {
        let cases: Vec<(CashToken, String)> = vec![
            (
                CashToken::nft(category(), Capability::Immutable, None),
                format!("ef{}20", WIRE_HEX),
            ),
            (
                CashToken {
                    category: category(),
                    amount: Some(1000),
                    capability: Some(Capability::Mutable),
                    commitment: None,
                },
                format!("ef{}31fde803", WIRE_HEX),
            ),
            (
                CashToken::nft(category(), Capability::Minting, Some(vec![0x01, 0x02])),
                format!("ef{}62020102", WIRE_HEX),
            ),
            (
                CashToken {
                    category: category(),
                    amount: Some(MAX_FUNGIBLE_AMOUNT),
                    capability: Some(Capability::Minting),
                    commitment: Some(b"x".to_vec()),
                },
                format!("ef{}720178ffffffffffffffff7f", WIRE_HEX),
            ),
            (
                CashToken::fungible(category(), 513),
                format!("ef{}10fd0102", WIRE_HEX),
            ),
        ];

        for (token, expected) in cases {
            let encoded = encode_prefix(&token).unwrap();
            assert_eq!(hex::encode(&encoded), expected);

            // The prefix alone decodes back with an empty locking script.
            let (decoded, rest) = split_prefix(&encoded).unwrap();
            assert_eq!(decoded.as_ref(), Some(&token));
            assert!(rest.is_empty());
        }
    }

    /// A token prefix followed by a P2PKH locking script splits cleanly.
    #[test]
    fn test_split_token_bearing_script() {
        let token = CashToken {
            category: category(),
            amount: Some(50),
            capability: Some(Capability::Minting),
            commitment: None,
        };
        let p2pkh = hex::decode("76a91492461bde6283b461ece7ddf4dbf1e0a48bd113d888ac").unwrap();

        let mut script = encode_prefix(&token).unwrap();
        assert_eq!(
            hex::encode(&script),
            format!("ef{}3232", WIRE_HEX)
        );
        script.extend_from_slice(&p2pkh);

        let (decoded, rest) = split_prefix(&script).unwrap();
        assert_eq!(decoded, Some(token));
        assert_eq!(rest, p2pkh);
    }

    /// A plain script passes through untouched.
    #[test]
    fn test_split_plain_script() {
        let p2pkh = hex::decode("76a91492461bde6283b461ece7ddf4dbf1e0a48bd113d888ac").unwrap();
        let (token, rest) = split_prefix(&p2pkh).unwrap();
        assert!(token.is_none());
        assert_eq!(rest, p2pkh);

        let (token, rest) = split_prefix(&[]).unwrap();
        assert!(token.is_none());
        assert!(rest.is_empty());
    }

    /// Malformed prefixes are errors, not plain scripts.
    #[test]
    fn test_split_rejects_malformed() {
        // truncated category
        let mut short = vec![TOKEN_PREFIX];
        short.extend_from_slice(&[0u8; 16]);
        assert!(matches!(split_prefix(&short), Err(TokenError::Truncated)));

        let wire = hex::decode(WIRE_HEX).unwrap();

        // reserved bit set
        let mut bad = vec![TOKEN_PREFIX];
        bad.extend_from_slice(&wire);
        bad.push(0xA0);
        assert!(matches!(
            split_prefix(&bad),
            Err(TokenError::InvalidBitfield(0xA0))
        ));

        // neither nft nor amount
        let mut empty = vec![TOKEN_PREFIX];
        empty.extend_from_slice(&wire);
        empty.push(0x00);
        assert!(matches!(
            split_prefix(&empty),
            Err(TokenError::InvalidBitfield(0x00))
        ));

        // commitment flag without nft flag
        let mut orphan = vec![TOKEN_PREFIX];
        orphan.extend_from_slice(&wire);
        orphan.extend_from_slice(&[0x50, 0x01, 0xAA]);
        assert!(matches!(
            split_prefix(&orphan),
            Err(TokenError::InvalidBitfield(0x50))
        ));

        // capability 3 is undefined
        let mut bad_cap = vec![TOKEN_PREFIX];
        bad_cap.extend_from_slice(&wire);
        bad_cap.push(0x23);
        assert!(matches!(
            split_prefix(&bad_cap),
            Err(TokenError::InvalidCapability(3))
        ));

        // zero amount
        let mut zero_amount = vec![TOKEN_PREFIX];
        zero_amount.extend_from_slice(&wire);
        zero_amount.extend_from_slice(&[0x10, 0x00]);
        assert!(matches!(
            split_prefix(&zero_amount),
            Err(TokenError::InvalidAmount(0))
        ));

        // commitment length over 40
        let mut long_commitment = vec![TOKEN_PREFIX];
        long_commitment.extend_from_slice(&wire);
        long_commitment.extend_from_slice(&[0x60, 41]);
        long_commitment.extend_from_slice(&[0u8; 41]);
        assert!(matches!(
            split_prefix(&long_commitment),
            Err(TokenError::InvalidCommitmentLength(41))
        ));
    }

    /// Wide varint encodings of the amount still decode.
    #[test]
    fn test_decode_wide_varint_amount() {
        let wire = hex::decode(WIRE_HEX).unwrap();
        let mut script = vec![TOKEN_PREFIX];
        script.extend_from_slice(&wire);
        script.push(0x10);
        // 513 as a 5-byte varint rather than the minimal 3-byte form
        script.extend_from_slice(&[0xFE, 0x01, 0x02, 0x00, 0x00]);

        let (token, rest) = split_prefix(&script).unwrap();
        assert_eq!(token.unwrap().amount, Some(513));
        assert!(rest.is_empty());
    }
}
