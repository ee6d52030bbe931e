use proptest::prelude::*;

use bch_script::Script;
use bch_transaction::{Transaction, TxInput, TxOutput, Unspent};

fn any_input() -> impl Strategy<Value = TxInput> {
    (
        prop::array::uniform32(any::<u8>()),
        any::<u32>(),
        prop::option::of(prop::collection::vec(any::<u8>(), 1..64)),
        any::<u32>(),
    )
        .prop_map(|(txid, index, script, sequence)| {
            let mut input = TxInput::new(txid, index);
            input.unlocking_script = script.map(|b| Script::from_vec(b));
            input.sequence = sequence;
            input
        })
}

fn any_output() -> impl Strategy<Value = TxOutput> {
    (any::<u64>(), prop::collection::vec(any::<u8>(), 0..64))
        .prop_map(|(value, script)| TxOutput::new(value, Script::from_vec(script)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn transaction_roundtrip(
        version in any::<u32>(),
        inputs in prop::collection::vec(any_input(), 0..8),
        outputs in prop::collection::vec(any_output(), 0..8),
        lock_time in any::<u32>(),
    ) {
        let tx = Transaction { version, inputs, outputs, lock_time };
        let bytes = tx.to_bytes();
        prop_assert_eq!(bytes.len(), tx.serialized_size());

        let parsed = Transaction::from_bytes(&bytes).unwrap();
        prop_assert_eq!(parsed, tx);
    }

    #[test]
    fn truncated_transactions_rejected(
        inputs in prop::collection::vec(any_input(), 1..4),
        cut in 1usize..8,
    ) {
        let mut tx = Transaction::new();
        tx.inputs = inputs;
        tx.outputs.push(TxOutput::new(1, Script::p2pkh(&[0u8; 20])));
        let bytes = tx.to_bytes();
        prop_assume!(cut < bytes.len());
        prop_assert!(Transaction::from_bytes(&bytes[..bytes.len() - cut]).is_err());
    }

    #[test]
    fn unspent_ordering_is_total(
        amounts in prop::collection::vec(1u64..1_000_000, 2..16),
    ) {
        let txid = "00".repeat(32);
        let mut coins: Vec<Unspent> = amounts
            .iter()
            .map(|&a| Unspent::new(&txid, 0, a, 1, Script::p2pkh(&[0u8; 20])).unwrap())
            .collect();
        coins.sort();
        for pair in coins.windows(2) {
            prop_assert!(pair[0].amount <= pair[1].amount);
        }
    }
}
