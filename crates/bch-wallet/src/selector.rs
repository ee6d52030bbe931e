//! Token-aware UTXO selection.
//!
//! Picks the inputs a transaction must spend to satisfy its token outputs.
//! Selection never fails: shortfalls surface later when the ledger nets
//! the selected inputs against the outputs.

use std::collections::BTreeMap;

use bch_tokens::Capability;
use bch_transaction::Unspent;

use crate::outputs::PreparedOutput;

/// The outstanding token demand for one category.
#[derive(Debug, Default)]
struct CategoryDemand {
    fungible: u64,
    nfts: Vec<(Capability, Option<Vec<u8>>)>,
}

/// Select the unspents needed to cover the token outputs.
///
/// Builds a per-category demand from the outputs, then drafts inputs in
/// three steps: a genesis unspent (output index 0 of the transaction a
/// demanded category names) covers its whole category; token unspents,
/// walked from highest priority down, each retire one matching NFT demand
/// or reduce the fungible demand; everything unused stays in the pool.
///
/// # Arguments
/// * `pool` - The spendable unspents.
/// * `outputs` - The prepared outputs the transaction will create.
///
/// # Returns
/// The remaining pool sorted ascending (plain coins first) and the
/// selected unspents. Unmet demand is not an error here.
pub fn select_unspents(
    pool: Vec<Unspent>,
    outputs: &[PreparedOutput],
) -> (Vec<Unspent>, Vec<Unspent>) {
    let mut demand: BTreeMap<[u8; 32], CategoryDemand> = BTreeMap::new();
    for output in outputs {
        if let Some(token) = &output.token {
            let entry = demand.entry(token.category).or_default();
            if let Some(amount) = token.amount {
                entry.fungible += amount;
            }
            if let Some(capability) = token.capability {
                entry.nfts.push((capability, token.commitment.clone()));
            }
        }
    }

    let mut used = Vec::new();
    let mut pool = pool;

    // A genesis input mints its category outright, covering every request
    // in it.
    pool.retain(|utxo| {
        if utxo.txindex == 0 && demand.remove(&utxo.txid).is_some() {
            used.push(utxo.clone());
            false
        } else {
            true
        }
    });

    let (mut tokens, mut remaining): (Vec<Unspent>, Vec<Unspent>) =
        pool.into_iter().partition(Unspent::has_token);

    // Highest-priority token coins first, so a minting baton is drafted
    // ahead of narrower matches.
    tokens.sort_by(|a, b| b.cmp(a));

    for utxo in tokens {
        let token = match &utxo.token {
            Some(token) => token,
            None => continue,
        };
        let entry = match demand.get_mut(&token.category) {
            Some(entry) => entry,
            None => {
                remaining.push(utxo);
                continue;
            }
        };

        let mut take = false;
        if let Some(capability) = token.capability {
            if let Some(i) = covered_demand(&entry.nfts, capability, token.commitment.as_deref()) {
                entry.nfts.remove(i);
                take = true;
            }
        } else if token.amount.is_some() && entry.fungible > 0 {
            take = true;
        }

        if take {
            if let Some(amount) = token.amount {
                entry.fungible = entry.fungible.saturating_sub(amount);
            }
            used.push(utxo);
        } else {
            remaining.push(utxo);
        }
    }

    // Cheapest coins first so fee top-ups start with plain dust.
    remaining.sort();
    (remaining, used)
}

/// The first demand item a held NFT can satisfy.
///
/// A minting baton covers any request, a mutable NFT covers mutable and
/// immutable requests, and an immutable NFT covers only an immutable
/// request with an identical commitment.
fn covered_demand(
    requests: &[(Capability, Option<Vec<u8>>)],
    held: Capability,
    commitment: Option<&[u8]>,
) -> Option<usize> {
    match held {
        Capability::Minting => (!requests.is_empty()).then_some(0),
        Capability::Mutable => requests
            .iter()
            .position(|(cap, _)| *cap <= Capability::Mutable),
        Capability::Immutable => requests.iter().position(|(cap, req_commitment)| {
            *cap == Capability::Immutable && req_commitment.as_deref() == commitment
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
