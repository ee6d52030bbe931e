//! The unspent output (coin) model.
//!
//! An `Unspent` pairs an outpoint with the value and full output script of
//! the coin it spends, plus the decoded token descriptor when the script
//! carries a token prefix. Unspents order by a token-aware priority key so
//! selection can walk the most capable coins first.

use std::cmp::Ordering;

use bch_script::Script;
use bch_tokens::{split_prefix, Capability, CashToken};

use crate::input::TxInput;
use crate::TransactionError;

/// An unspent transaction output owned by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unspent {
    /// The funding txid, in display order.
    pub txid: [u8; 32],
    /// The index of the output within the funding transaction.
    pub txindex: u32,
    /// The output value in satoshis.
    pub amount: u64,
    /// Confirmation count reported by the chain backend.
    pub confirmations: i64,
    /// The full output script, token prefix included when present.
    pub script: Script,
    /// The decoded token descriptor, if the script carries one.
    pub token: Option<CashToken>,
}

impl Unspent {
    /// Create an unspent from its funding outpoint and full output script.
    ///
    /// The token descriptor is decoded from the script's prefix; a script
    /// with a malformed prefix is rejected.
    ///
    /// # Arguments
    /// * `txid_hex` - The funding txid in display order.
    /// * `txindex` - The output index.
    /// * `amount` - The satoshi value.
    /// * `confirmations` - Confirmation count from the backend.
    /// * `script` - The full output script.
    ///
    /// # Returns
    /// A new `Unspent`, or an error on a bad txid or token prefix.
    pub fn new(
        txid_hex: &str,
        txindex: u32,
        amount: u64,
        confirmations: i64,
        script: Script,
    ) -> Result<Self, TransactionError> {
        let bytes = hex::decode(txid_hex)
            .map_err(|_| TransactionError::InvalidTxid(txid_hex.to_string()))?;
        if bytes.len() != 32 {
            return Err(TransactionError::InvalidTxid(txid_hex.to_string()));
        }
        let mut txid = [0u8; 32];
        txid.copy_from_slice(&bytes);

        let (token, _rest) = split_prefix(script.to_bytes())?;
        Ok(Unspent {
            txid,
            txindex,
            amount,
            confirmations,
            script,
            token,
        })
    }

    /// The funding txid in display order.
    pub fn txid_hex(&self) -> String {
        hex::encode(self.txid)
    }

    /// The locking script with any token prefix stripped.
    ///
    /// # Returns
    /// The spending conditions alone.
    pub fn spend_script(&self) -> Result<Script, TransactionError> {
        let (_token, rest) = split_prefix(self.script.to_bytes())?;
        Ok(Script::from_vec(rest))
    }

    /// Whether this coin carries any token.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Whether this coin carries an NFT.
    pub fn has_nft(&self) -> bool {
        self.token
            .as_ref()
            .map(|t| t.has_nft())
            .unwrap_or(false)
    }

    /// The NFT capability, if the coin carries an NFT.
    pub fn capability(&self) -> Option<Capability> {
        self.token.as_ref().and_then(|t| t.capability)
    }

    /// The fungible token amount, zero for non-token coins.
    pub fn token_amount(&self) -> u64 {
        self.token
            .as_ref()
            .and_then(|t| t.amount)
            .unwrap_or(0)
    }

    /// Build an unsigned input spending this coin.
    ///
    /// # Returns
    /// A `TxInput` with the outpoint in wire order.
    pub fn to_input(&self) -> TxInput {
        let mut wire = self.txid;
        wire.reverse();
        TxInput::new(wire, self.txindex)
    }

    /// The ordering key: NFT presence, then capability, then fungible
    /// amount, then satoshi value.
    fn priority_key(&self) -> (bool, Option<Capability>, u64, u64) {
        (
            self.has_nft(),
            self.capability(),
            self.token_amount(),
            self.amount,
        )
    }
}

impl PartialOrd for Unspent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Unspent {
    /// Orders by the priority key only. Coins with equal keys compare
    /// equal here even when they are structurally different; equality
    /// itself stays structural.
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority_key().cmp(&other.priority_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bch_tokens::encode_prefix;

    const TXID: &str = "aabbccddeeff00112233445566778899aabbccddeeff00112233445566778899";

    fn p2pkh() -> Script {
        Script::p2pkh(&[0x55; 20])
    }

    fn token_script(token: &CashToken) -> Script {
        let mut bytes = encode_prefix(token).unwrap();
        bytes.extend_from_slice(p2pkh().to_bytes());
        Script::from_vec(bytes)
    }

    fn plain(amount: u64) -> Unspent {
        Unspent::new(TXID, 0, amount, 1, p2pkh()).unwrap()
    }

    fn with_token(token: CashToken) -> Unspent {
        Unspent::new(TXID, 0, 1000, 1, token_script(&token)).unwrap()
    }

    /// Token-bearing scripts decode their descriptor on construction.
    #[test]
    fn test_parses_token_prefix() {
        let token = CashToken::fungible([0x42; 32], 700);
        let unspent = with_token(token.clone());
        assert_eq!(unspent.token, Some(token));
        assert_eq!(unspent.token_amount(), 700);
        assert!(unspent.has_token());
        assert!(!unspent.has_nft());

        // stripping the prefix recovers the spending conditions
        assert_eq!(unspent.spend_script().unwrap(), p2pkh());
    }

    #[test]
    fn test_plain_script_has_no_token() {
        let unspent = plain(5000);
        assert!(!unspent.has_token());
        assert_eq!(unspent.token_amount(), 0);
        assert_eq!(unspent.spend_script().unwrap(), p2pkh());
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(Unspent::new("abcd", 0, 1, 1, p2pkh()).is_err());

        // malformed token prefix
        let bad = Script::from_bytes(&[0xEF, 0x01]);
        assert!(Unspent::new(TXID, 0, 1, 1, bad).is_err());
    }

    #[test]
    fn test_to_input_reverses_txid() {
        let input = plain(1).to_input();
        assert_eq!(input.prev_txid_hex(), TXID);
    }

    /// NFTs outrank fungible coins, ordered minting > mutable > immutable.
    #[test]
    fn test_priority_ordering() {
        let category = [0x42u8; 32];
        let minting = with_token(CashToken::nft(category, Capability::Minting, None));
        let mutable = with_token(CashToken::nft(category, Capability::Mutable, None));
        let immutable = with_token(CashToken::nft(category, Capability::Immutable, None));
        let fungible_big = with_token(CashToken::fungible(category, 900));
        let fungible_small = with_token(CashToken::fungible(category, 10));
        let plain_rich = plain(1_000_000);
        let plain_poor = plain(100);

        let mut coins = vec![
            plain_poor.clone(),
            fungible_small.clone(),
            minting.clone(),
            plain_rich.clone(),
            immutable.clone(),
            fungible_big.clone(),
            mutable.clone(),
        ];
        coins.sort_by(|a, b| b.cmp(a));

        assert_eq!(
            coins,
            vec![
                minting,
                mutable,
                immutable,
                fungible_big,
                fungible_small,
                plain_rich,
                plain_poor
            ]
        );
    }

    /// Coins with identical keys compare equal under the order, while
    /// equality stays structural.
    #[test]
    fn test_ordering_ties() {
        let a = plain(500);
        let mut b = plain(500);
        b.txindex = 7;

        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert_ne!(a, b);
    }
}
