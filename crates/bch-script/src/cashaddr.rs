//! Cashaddr address codec.
//!
//! Implements the Bitcoin Cash base32 address format: a human-readable
//! network prefix, a version byte carrying the address kind, a 20-byte
//! hash payload, and a 40-bit BCH checksum over 5-bit symbols.

use std::fmt;
use std::str::FromStr;

use bch_primitives::ec::PublicKey;

use crate::script::Script;
use crate::ScriptError;

/// The cashaddr base32 alphabet.
const CHARSET: &[u8] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Generator constants for the 40-bit BCH checksum.
const GENERATORS: [u64; 5] = [
    0x98f2bc8e61,
    0x79b76d99e2,
    0xf33e5fb3c4,
    0xae2eabe2a8,
    0x1e4f43e470,
];

/// The network an address belongs to, determining its human-readable prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Network {
    /// Main network, prefix "bitcoincash".
    Mainnet,
    /// Test network, prefix "bchtest".
    Testnet,
    /// Regression test network, prefix "bchreg".
    Regtest,
}

impl Network {
    /// Return the human-readable cashaddr prefix for this network.
    ///
    /// # Returns
    /// The prefix string without the trailing colon.
    pub fn prefix(&self) -> &'static str {
        match self {
            Network::Mainnet => "bitcoincash",
            Network::Testnet => "bchtest",
            Network::Regtest => "bchreg",
        }
    }

    /// Look up the network for a human-readable prefix.
    ///
    /// # Arguments
    /// * `prefix` - The lowercase prefix string.
    ///
    /// # Returns
    /// `Ok(Network)` or an error if the prefix is not recognized.
    pub fn from_prefix(prefix: &str) -> Result<Self, ScriptError> {
        match prefix {
            "bitcoincash" => Ok(Network::Mainnet),
            "bchtest" => Ok(Network::Testnet),
            "bchreg" => Ok(Network::Regtest),
            other => Err(ScriptError::UnknownPrefix(other.to_string())),
        }
    }

}

/// The kind of locking script an address stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressKind {
    /// Pay-to-Public-Key-Hash.
    P2pkh,
    /// Pay-to-Script-Hash.
    P2sh,
}

impl AddressKind {
    /// The version byte carried inside the address payload.
    ///
    /// The low three bits encode the hash size (0 for 160 bits) and
    /// bits 3-6 encode the kind (0 for P2PKH, 1 for P2SH).
    fn version_byte(&self) -> u8 {
        match self {
            AddressKind::P2pkh => 0x00,
            AddressKind::P2sh => 0x08,
        }
    }

    /// Decode an address kind from a version byte.
    fn from_version_byte(version: u8) -> Result<Self, ScriptError> {
        match version {
            0x00 => Ok(AddressKind::P2pkh),
            0x08 => Ok(AddressKind::P2sh),
            other => Err(ScriptError::UnknownVersion(other)),
        }
    }
}

/// A decoded Bitcoin Cash address.
///
/// Holds the network, the address kind, and the 20-byte Hash160 payload.
/// `Display` and `FromStr` round-trip through the cashaddr string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    /// The network this address belongs to.
    pub network: Network,
    /// Whether this is a P2PKH or P2SH address.
    pub kind: AddressKind,
    /// The 20-byte Hash160 payload.
    pub payload: [u8; 20],
}

impl Address {
    /// Create a P2PKH address from a 20-byte public key hash.
    ///
    /// # Arguments
    /// * `hash` - The Hash160 of the public key.
    /// * `network` - The target network.
    ///
    /// # Returns
    /// A new `Address`.
    pub fn p2pkh(hash: [u8; 20], network: Network) -> Self {
        Address {
            network,
            kind: AddressKind::P2pkh,
            payload: hash,
        }
    }

    /// Create a P2SH address from a 20-byte script hash.
    ///
    /// # Arguments
    /// * `hash` - The Hash160 of the redeem script.
    /// * `network` - The target network.
    ///
    /// # Returns
    /// A new `Address`.
    pub fn p2sh(hash: [u8; 20], network: Network) -> Self {
        Address {
            network,
            kind: AddressKind::P2sh,
            payload: hash,
        }
    }

    /// Derive the P2PKH address of a public key.
    ///
    /// # Arguments
    /// * `pub_key` - The public key; its compressed encoding is hashed.
    /// * `network` - The target network.
    ///
    /// # Returns
    /// A new P2PKH `Address`.
    pub fn from_pub_key(pub_key: &PublicKey, network: Network) -> Self {
        Address::p2pkh(pub_key.hash160(), network)
    }

    /// Decode a cashaddr string.
    ///
    /// The network prefix is required: the input must be exactly
    /// `prefix:payload`. All-uppercase input is accepted, mixed case is
    /// rejected.
    ///
    /// # Arguments
    /// * `addr` - The cashaddr string.
    ///
    /// # Returns
    /// `Ok(Address)` or an error describing why decoding failed.
    pub fn decode(addr: &str) -> Result<Self, ScriptError> {
        let has_lower = addr.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = addr.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper {
            return Err(ScriptError::MixedCase);
        }
        let addr = addr.to_ascii_lowercase();

        let (prefix, body) = addr.split_once(':').ok_or_else(|| {
            ScriptError::InvalidAddress("missing network prefix".to_string())
        })?;
        let network = Network::from_prefix(prefix)?;
        Self::decode_body(network, body)
    }

    /// Decode the base32 body against a fixed network prefix.
    fn decode_body(network: Network, body: &str) -> Result<Self, ScriptError> {
        let mut symbols = Vec::with_capacity(body.len());
        for c in body.chars() {
            let idx = CHARSET
                .iter()
                .position(|&b| b as char == c)
                .ok_or(ScriptError::InvalidCharacter(c))?;
            symbols.push(idx as u8);
        }

        // 8 checksum symbols plus at least one payload symbol
        if symbols.len() <= 8 {
            return Err(ScriptError::InvalidAddress(
                "address body too short".to_string(),
            ));
        }

        let mut checked = prefix_expand(network.prefix());
        checked.extend_from_slice(&symbols);
        if polymod(&checked) != 0 {
            return Err(ScriptError::ChecksumFailed);
        }

        let payload5 = &symbols[..symbols.len() - 8];
        let payload8 = convert_bits(payload5, 5, 8, false)?;
        if payload8.len() != 21 {
            return Err(ScriptError::InvalidAddress(format!(
                "unexpected payload length {}",
                payload8.len()
            )));
        }

        let kind = AddressKind::from_version_byte(payload8[0])?;
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&payload8[1..]);

        Ok(Address {
            network,
            kind,
            payload: hash,
        })
    }

    /// Encode this address as a cashaddr string with prefix.
    ///
    /// # Returns
    /// The lowercase `prefix:payload` string.
    pub fn encode(&self) -> String {
        let mut payload8 = Vec::with_capacity(21);
        payload8.push(self.kind.version_byte());
        payload8.extend_from_slice(&self.payload);

        // 8-to-5 bit regrouping never fails
        let payload5 = convert_bits(&payload8, 8, 5, true).unwrap_or_default();

        let mut checksum_input = prefix_expand(self.network.prefix());
        checksum_input.extend_from_slice(&payload5);
        checksum_input.extend_from_slice(&[0u8; 8]);
        let poly = polymod(&checksum_input);

        let mut body = String::with_capacity(payload5.len() + 8);
        for &sym in &payload5 {
            body.push(CHARSET[sym as usize] as char);
        }
        for i in 0..8 {
            let sym = ((poly >> (5 * (7 - i))) & 0x1f) as usize;
            body.push(CHARSET[sym] as char);
        }

        format!("{}:{}", self.network.prefix(), body)
    }

    /// Build the locking script this address stands for.
    ///
    /// # Returns
    /// The P2PKH or P2SH locking `Script`.
    pub fn locking_script(&self) -> Script {
        match self.kind {
            AddressKind::P2pkh => Script::p2pkh(&self.payload),
            AddressKind::P2sh => Script::p2sh(&self.payload),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl FromStr for Address {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::decode(s)
    }
}

/// Compute the 40-bit BCH checksum over a sequence of 5-bit symbols.
///
/// # Arguments
/// * `values` - 5-bit symbols, including the expanded prefix.
///
/// # Returns
/// Zero for a valid checksummed sequence; otherwise the checksum residue.
fn polymod(values: &[u8]) -> u64 {
    let mut c: u64 = 1;
    for &d in values {
        let c0 = c >> 35;
        c = ((c & 0x07_ffff_ffff) << 5) ^ (d as u64);
        for (i, gen) in GENERATORS.iter().enumerate() {
            if (c0 >> i) & 1 != 0 {
                c ^= gen;
            }
        }
    }
    c ^ 1
}

/// Expand the human-readable prefix for checksum computation.
///
/// Each character contributes its low five bits, followed by a zero
/// separator symbol.
fn prefix_expand(prefix: &str) -> Vec<u8> {
    let mut out: Vec<u8> = prefix.bytes().map(|b| b & 0x1f).collect();
    out.push(0);
    out
}

/// Regroup a byte sequence between bit widths.
///
/// Converting 8-to-5 pads the final group with zeros; converting 5-to-8
/// rejects non-zero padding or a leftover group that is too large.
///
/// # Arguments
/// * `data` - Input groups, each holding `from` significant bits.
/// * `from` - Source group width in bits.
/// * `to` - Target group width in bits.
/// * `pad` - Whether to pad the final partial group.
///
/// # Returns
/// The regrouped values, or an error on invalid padding.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, ScriptError> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    let max_value: u32 = (1 << to) - 1;

    for &value in data {
        acc = (acc << from) | value as u32;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max_value) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max_value) != 0 {
        return Err(ScriptError::InvalidPadding);
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
