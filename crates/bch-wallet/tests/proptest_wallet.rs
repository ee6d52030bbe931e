//! Property-based tests for the ledger, selector, and builder.

use proptest::prelude::*;

use bch_script::{Address, Network, Script};
use bch_tokens::{encode_prefix, CashToken};
use bch_transaction::fees::estimate_fee;
use bch_transaction::Unspent;
use bch_wallet::{sanitize_tx_data, select_unspents, OutputRequest, PreparedOutput, TokenLedger};

const CATEGORY: [u8; 32] = [0x42; 32];

fn unspent(txid_byte: u8, amount: u64, token: Option<CashToken>) -> Unspent {
    let p2pkh = Script::p2pkh(&[0x55; 20]);
    let script = match &token {
        Some(token) => {
            let mut bytes = encode_prefix(token).unwrap();
            bytes.extend_from_slice(p2pkh.to_bytes());
            Script::from_vec(bytes)
        }
        None => p2pkh,
    };
    Unspent::new(&hex::encode([txid_byte; 32]), 1, amount, 1, script).unwrap()
}

fn change_address() -> Address {
    Address::p2pkh([0x11; 20], Network::Mainnet)
}

proptest! {
    /// Folding coins and emitting change conserves satoshis and fungible
    /// token amounts exactly.
    #[test]
    fn ledger_conserves_totals(
        plain in proptest::collection::vec(600u64..100_000, 0..6),
        fungible in proptest::collection::vec(1u64..10_000, 1..6),
    ) {
        let mut pool = Vec::new();
        for (i, amount) in plain.iter().enumerate() {
            pool.push(unspent(i as u8 + 1, *amount, None));
        }
        for (i, amount) in fungible.iter().enumerate() {
            pool.push(unspent(
                i as u8 + 100,
                1_000,
                Some(CashToken::fungible(CATEGORY, *amount)),
            ));
        }

        let satoshi_in: u64 = pool.iter().map(|u| u.amount).sum();
        let fungible_in: u64 = fungible.iter().sum();

        let ledger = TokenLedger::fold(&pool);
        let (outputs, used) = ledger.build_change_outputs(&change_address()).unwrap();

        let satoshi_out: u64 = outputs.iter().map(|o| o.amount).sum();
        let fungible_out: u64 = outputs
            .iter()
            .filter_map(|o| o.token.as_ref().and_then(|t| t.amount))
            .sum();
        prop_assert_eq!(satoshi_out, satoshi_in);
        prop_assert_eq!(used, satoshi_in);
        prop_assert_eq!(fungible_out, fungible_in);
    }

    /// Selection is a partition of the pool, and when the pool can cover
    /// a fungible demand the drafted coins do cover it.
    #[test]
    fn selector_partitions_and_covers(
        amounts in proptest::collection::vec(1u64..1_000, 1..8),
        demand_seed in 1u64..1_000,
    ) {
        let pool: Vec<Unspent> = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| {
                unspent(i as u8 + 1, 1_000, Some(CashToken::fungible(CATEGORY, *amount)))
            })
            .collect();
        let total: u64 = amounts.iter().sum();
        let demand = demand_seed.min(total);

        let outputs = vec![PreparedOutput::spend(
            &change_address(),
            546,
            Some(CashToken::fungible(CATEGORY, demand)),
        ).unwrap()];

        let (remaining, used) = select_unspents(pool.clone(), &outputs);
        prop_assert_eq!(remaining.len() + used.len(), pool.len());

        let drafted: u64 = used.iter().map(Unspent::token_amount).sum();
        prop_assert!(drafted >= demand);
    }

    /// Inputs minus outputs equals the estimated fee for the final input
    /// and output counts.
    #[test]
    fn builder_balances_to_fee(
        amounts in proptest::collection::vec(10_000u64..100_000, 1..8),
        spend in 600u64..5_000,
        fee_rate in 1u64..4,
    ) {
        let pool: Vec<Unspent> = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| unspent(i as u8 + 1, *amount, None))
            .collect();
        let requests = vec![OutputRequest::Spend {
            address: change_address(),
            amount: spend,
            token: None,
        }];

        let (used, outputs) = sanitize_tx_data(
            pool,
            &requests,
            fee_rate,
            &change_address(),
            false,
            None,
            true,
        )
        .unwrap();

        let satoshi_in: u64 = used.iter().map(|u| u.amount).sum();
        let satoshi_out: u64 = outputs.iter().map(|o| o.amount).sum();
        let fee = estimate_fee(used.len(), requests.len() + 1, fee_rate, true, 0);
        prop_assert_eq!(satoshi_in - satoshi_out, fee);
    }
}
