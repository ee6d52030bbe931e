//! The token ledger.
//!
//! Folds a UTXO set into per-category holdings, subtracts the outputs a
//! transaction will produce, and emits the deterministic change outputs
//! owed for whatever remains. Categories map in a `BTreeMap` so change
//! output order is stable across runs.

use std::collections::{BTreeMap, BTreeSet};

use bch_script::Address;
use bch_tokens::{Capability, CashToken};
use bch_transaction::Unspent;

use crate::outputs::PreparedOutput;
use crate::WalletError;

/// The dust threshold: the value given to every token change output.
pub const DUST_LIMIT: u64 = 546;

/// One NFT held in a category.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NftItem {
    capability: Capability,
    commitment: Option<Vec<u8>>,
}

/// The holdings of one token category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CategoryHoldings {
    fungible: u64,
    nfts: Vec<NftItem>,
}

/// Netted holdings across a set of unspent outputs.
///
/// Zero fungible amounts and empty NFT lists are pruned immediately, so a
/// category present in the map always holds something.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenLedger {
    satoshi_total: u64,
    per_category: BTreeMap<[u8; 32], CategoryHoldings>,
    genesis_txids: BTreeSet<[u8; 32]>,
}

impl TokenLedger {
    /// Fold a UTXO set into a ledger.
    ///
    /// Sums satoshi values, accumulates fungible amounts and NFT items per
    /// category, and records the txid of every output at index 0 as a
    /// potential genesis of a new category.
    ///
    /// # Arguments
    /// * `utxos` - The unspent outputs to net.
    ///
    /// # Returns
    /// The folded ledger.
    pub fn fold(utxos: &[Unspent]) -> Self {
        let mut ledger = TokenLedger::default();
        for utxo in utxos {
            ledger.satoshi_total += utxo.amount;
            if utxo.txindex == 0 {
                ledger.genesis_txids.insert(utxo.txid);
            }
            if let Some(token) = &utxo.token {
                let holdings = ledger.per_category.entry(token.category).or_default();
                if let Some(amount) = token.amount {
                    holdings.fungible += amount;
                }
                if let Some(capability) = token.capability {
                    holdings.nfts.push(NftItem {
                        capability,
                        commitment: token.commitment.clone(),
                    });
                }
            }
        }
        ledger
    }

    /// The satoshis not yet committed to an output.
    pub fn satoshi_total(&self) -> u64 {
        self.satoshi_total
    }

    /// Whether any token holdings remain.
    pub fn has_tokens(&self) -> bool {
        !self.per_category.is_empty()
    }

    /// Subtract one output the transaction will produce.
    ///
    /// The satoshi value always comes out of the running total. A token
    /// whose category is a recorded genesis txid is being minted fresh and
    /// leaves the holdings untouched; any other token must be drawn from
    /// the matching category, with NFTs matched by the capability rules
    /// (minting covers any request, mutable covers mutable or immutable,
    /// immutable covers only an identical commitment).
    ///
    /// # Arguments
    /// * `amount` - The output's satoshi value.
    /// * `token` - The output's token, if any.
    ///
    /// # Returns
    /// `Ok(())`, or an insufficient-funds error naming what ran out.
    pub fn subtract_output(
        &mut self,
        amount: u64,
        token: Option<&CashToken>,
    ) -> Result<(), WalletError> {
        if amount > self.satoshi_total {
            return Err(WalletError::InsufficientFunds {
                available: self.satoshi_total,
                required: amount,
            });
        }
        self.satoshi_total -= amount;

        let token = match token {
            Some(token) => token,
            None => return Ok(()),
        };

        // Minting a fresh category: nothing is drawn from holdings.
        if self.genesis_txids.contains(&token.category) {
            return Ok(());
        }

        let holdings = self
            .per_category
            .get_mut(&token.category)
            .ok_or_else(|| WalletError::InsufficientTokenFunds(hex::encode(token.category)))?;

        if let Some(amount) = token.amount {
            if holdings.fungible < amount {
                return Err(WalletError::InsufficientTokenFunds(hex::encode(
                    token.category,
                )));
            }
            holdings.fungible -= amount;
        }

        if let Some(requested) = token.capability {
            let index = find_nft(&holdings.nfts, requested, token.commitment.as_deref())
                .ok_or_else(|| {
                    WalletError::InsufficientTokenFunds(hex::encode(token.category))
                })?;
            holdings.nfts.remove(index);
        }

        if holdings.fungible == 0 && holdings.nfts.is_empty() {
            self.per_category.remove(&token.category);
        }
        Ok(())
    }

    /// Emit the change outputs owed for everything still in the ledger.
    ///
    /// Per category: one dust output per held NFT, the category's fungible
    /// remainder folded into the first of those, and a final dust output
    /// for a fungible-only remainder. With no tokens left, a positive
    /// satoshi leftover becomes one plain change output. When token
    /// outputs exist, the last of them absorbs the satoshi leftover
    /// instead of a separate plain output being created.
    ///
    /// # Arguments
    /// * `change_address` - Where all change outputs pay to.
    ///
    /// # Returns
    /// The change outputs and the satoshis they consume, or an
    /// insufficient-funds error if dust values exceed the leftover.
    pub fn build_change_outputs(
        self,
        change_address: &Address,
    ) -> Result<(Vec<PreparedOutput>, u64), WalletError> {
        let mut outputs = Vec::new();

        for (category, holdings) in &self.per_category {
            let mut fungible_left = holdings.fungible;

            for nft in &holdings.nfts {
                let amount = if fungible_left > 0 {
                    std::mem::take(&mut fungible_left)
                } else {
                    0
                };
                let token = CashToken {
                    category: *category,
                    amount: (amount > 0).then_some(amount),
                    capability: Some(nft.capability),
                    commitment: nft.commitment.clone(),
                };
                outputs.push(PreparedOutput::spend(
                    change_address,
                    DUST_LIMIT,
                    Some(token),
                )?);
            }

            if fungible_left > 0 {
                let token = CashToken::fungible(*category, fungible_left);
                outputs.push(PreparedOutput::spend(
                    change_address,
                    DUST_LIMIT,
                    Some(token),
                )?);
            }
        }

        let dust_total = outputs.len() as u64 * DUST_LIMIT;
        if dust_total > self.satoshi_total {
            return Err(WalletError::InsufficientFunds {
                available: self.satoshi_total,
                required: dust_total,
            });
        }
        let leftover = self.satoshi_total - dust_total;

        if let Some(last) = outputs.last_mut() {
            // token change exists: the last token output absorbs the leftover
            last.amount += leftover;
        } else if leftover > 0 {
            outputs.push(PreparedOutput::spend(change_address, leftover, None)?);
        }

        let satoshi_used = outputs.iter().map(|o| o.amount).sum();
        Ok((outputs, satoshi_used))
    }
}

/// Find the held NFT that satisfies a requested item.
///
/// Priority order: an identical-commitment immutable for an immutable
/// request, then a mutable for a mutable-or-immutable request, then a
/// minting baton for any request.
fn find_nft(
    nfts: &[NftItem],
    requested: Capability,
    commitment: Option<&[u8]>,
) -> Option<usize> {
    if requested == Capability::Immutable {
        if let Some(i) = nfts.iter().position(|n| {
            n.capability == Capability::Immutable && n.commitment.as_deref() == commitment
        }) {
            return Some(i);
        }
    }
    if requested <= Capability::Mutable {
        if let Some(i) = nfts
            .iter()
            .position(|n| n.capability == Capability::Mutable)
        {
            return Some(i);
        }
    }
    nfts.iter()
        .position(|n| n.capability == Capability::Minting)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
