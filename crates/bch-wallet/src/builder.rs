//! Transaction construction and signing.
//!
//! `sanitize_tx_data` turns a UTXO pool and a list of output requests into
//! the exact inputs and outputs of a transaction, iterating fee estimation
//! as inputs are added. `create_transaction` signs the result and returns
//! the raw transaction hex ready for broadcast.

use bch_primitives::ec::PrivateKey;
use bch_script::op_return::{chunk_message, op_return_raw, op_return_script};
use bch_script::{Address, Script};
use bch_transaction::fees::estimate_fee;
use bch_transaction::sighash::{sighash_digest, SIGHASH_ALL_FORKID};
use bch_transaction::{Transaction, Unspent, TX_VERSION};

use crate::ledger::TokenLedger;
use crate::outputs::{prepare, OutputRequest, PreparedOutput};
use crate::selector::select_unspents;
use crate::WalletError;

/// A message to embed in the transaction as data carrier outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarrierMessage {
    /// Plain text, split into relay-sized chunks, one OP_RETURN output
    /// per chunk.
    Text(String),
    /// Pre-encoded pushdata bytes placed after OP_RETURN verbatim, in a
    /// single output.
    Raw(Vec<u8>),
}

impl CarrierMessage {
    /// Render the message into its data carrier outputs.
    fn to_outputs(&self) -> Result<Vec<PreparedOutput>, WalletError> {
        match self {
            CarrierMessage::Text(text) => chunk_message(text.as_bytes())
                .iter()
                .map(|chunk| Ok(PreparedOutput::data_carrier(op_return_script(chunk)?)))
                .collect(),
            CarrierMessage::Raw(pushdata) => Ok(vec![PreparedOutput::data_carrier(
                op_return_raw(pushdata)?,
            )]),
        }
    }
}

/// Net the drafted inputs against the outputs plus fee and emit change.
fn settle(
    used: &[Unspent],
    prepared: &[PreparedOutput],
    fee: u64,
    change_address: &Address,
) -> Result<Vec<PreparedOutput>, WalletError> {
    let mut ledger = TokenLedger::fold(used);
    for output in prepared {
        ledger.subtract_output(output.amount, output.token.as_ref())?;
    }
    ledger.subtract_output(fee, None)?;
    let (change, _) = ledger.build_change_outputs(change_address)?;
    Ok(change)
}

/// Resolve the inputs and outputs of a transaction before signing.
///
/// Prepares the requested outputs, drafts token inputs through the
/// selector, then adds plain coins cheapest-first until the satoshi
/// balance covers the outputs plus the estimated fee. Token shortfalls
/// are hard errors; only a satoshi shortfall triggers another draw from
/// the pool.
///
/// Output order is fixed: the requested spends, then any data carrier
/// outputs, then change last.
///
/// # Arguments
/// * `pool` - The spendable unspents.
/// * `requests` - The outputs the caller wants.
/// * `fee_rate` - The fee rate in satoshis per byte.
/// * `change_address` - Where change outputs pay to.
/// * `combine` - Spend the entire pool instead of drawing incrementally.
/// * `message` - An optional message to embed as data carrier outputs.
/// * `compressed` - Whether the signing key's public key is compressed.
///
/// # Returns
/// The selected inputs and the final output list, or an error if funds
/// or token holdings fall short.
pub fn sanitize_tx_data(
    pool: Vec<Unspent>,
    requests: &[OutputRequest],
    fee_rate: u64,
    change_address: &Address,
    combine: bool,
    message: Option<&CarrierMessage>,
    compressed: bool,
) -> Result<(Vec<Unspent>, Vec<PreparedOutput>), WalletError> {
    let prepared = requests
        .iter()
        .map(prepare)
        .collect::<Result<Vec<_>, _>>()?;
    let data_outputs = match message {
        Some(message) => message.to_outputs()?,
        None => Vec::new(),
    };
    let op_return_size: usize = data_outputs
        .iter()
        .map(PreparedOutput::serialized_size)
        .sum();

    let (mut remaining, mut used) = select_unspents(pool, &prepared);
    if combine {
        used.append(&mut remaining);
    }

    let change = loop {
        let fee = estimate_fee(
            used.len(),
            prepared.len() + 1,
            fee_rate,
            compressed,
            op_return_size,
        );
        match settle(&used, &prepared, fee, change_address) {
            Ok(change) => break change,
            Err(WalletError::InsufficientFunds { .. }) if !remaining.is_empty() => {
                used.push(remaining.remove(0));
            }
            Err(err) => return Err(err),
        }
    };

    let mut outputs = prepared;
    outputs.extend(data_outputs);
    outputs.extend(change);
    Ok((used, outputs))
}

/// Build and sign a complete transaction.
///
/// Resolves inputs and outputs via [`sanitize_tx_data`], then signs each
/// input with a fork-id SIGHASH_ALL signature over the spent output's
/// full locking script and value. The unlocking script pushes the DER
/// signature with the sighash byte appended, then the public key.
///
/// # Arguments
/// * `private_key` - The key owning every selected input.
/// * `pool` - The spendable unspents.
/// * `requests` - The outputs the caller wants.
/// * `fee_rate` - The fee rate in satoshis per byte.
/// * `change_address` - Where change outputs pay to.
/// * `combine` - Spend the entire pool instead of drawing incrementally.
/// * `message` - An optional message to embed as data carrier outputs.
///
/// # Returns
/// The raw transaction hex, or an error if construction or signing fails.
pub fn create_transaction(
    private_key: &PrivateKey,
    pool: Vec<Unspent>,
    requests: &[OutputRequest],
    fee_rate: u64,
    change_address: &Address,
    combine: bool,
    message: Option<&CarrierMessage>,
) -> Result<String, WalletError> {
    let (used, outputs) = sanitize_tx_data(
        pool,
        requests,
        fee_rate,
        change_address,
        combine,
        message,
        true,
    )?;

    let mut tx = Transaction {
        version: TX_VERSION,
        inputs: used.iter().map(Unspent::to_input).collect(),
        outputs: outputs.iter().map(PreparedOutput::to_tx_output).collect(),
        lock_time: 0,
    };

    let pub_key_bytes = private_key.pub_key().to_compressed();
    for (i, unspent) in used.iter().enumerate() {
        let digest = sighash_digest(&tx, i, unspent.script.to_bytes(), unspent.amount)?;
        let signature = private_key.sign(&digest)?;
        let mut sig_bytes = signature.to_der();
        sig_bytes.push(SIGHASH_ALL_FORKID as u8);

        let mut unlocking = Script::new();
        unlocking.append_push_data(&sig_bytes);
        unlocking.append_push_data(&pub_key_bytes);
        tx.inputs[i].unlocking_script = Some(unlocking);
    }

    Ok(tx.to_hex())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use bch_script::Network;
    use bch_tokens::{encode_prefix, CashToken};

    const CATEGORY: [u8; 32] = [0x42; 32];

    fn change_address() -> Address {
        Address::p2pkh([0x11; 20], Network::Mainnet)
    }

    fn destination() -> Address {
        Address::p2pkh([0x22; 20], Network::Mainnet)
    }

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

    /// A single plain spend: one input, the spend, then the change output
    /// holding everything minus the 226-byte fee.
    #[test]
    fn test_plain_spend_change() {
        let pool = vec![unspent(1, 100_000, None)];
        let requests = vec![OutputRequest::Spend {
            address: destination(),
            amount: 1_000,
            token: None,
        }];
        let (used, outputs) =
            sanitize_tx_data(pool, &requests, 1, &change_address(), false, None, true).unwrap();

        assert_eq!(used.len(), 1);
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].amount, 1_000);
        assert_eq!(outputs[1].amount, 100_000 - 1_000 - 226);
        assert!(outputs[1].token.is_none());
    }

    /// Coins are drawn cheapest-first until the fee is covered.
    #[test]
    fn test_incremental_funding() {
        let pool = vec![
            unspent(1, 50_000, None),
            unspent(2, 600, None),
            unspent(3, 900, None),
        ];
        let requests = vec![OutputRequest::Spend {
            address: destination(),
            amount: 1_000,
            token: None,
        }];
        let (used, outputs) =
            sanitize_tx_data(pool, &requests, 1, &change_address(), false, None, true).unwrap();

        // 600 + 900 covers 1000 + the two-input fee of 374; the 50k coin
        // stays in the pool
        assert_eq!(used.len(), 2);
        assert_eq!(used[0].amount, 600);
        assert_eq!(used[1].amount, 900);
        assert_eq!(outputs[1].amount, 1_500 - 1_000 - 374);
    }

    /// Combine mode spends the whole pool up front.
    #[test]
    fn test_combine_spends_everything() {
        let pool = vec![unspent(1, 50_000, None), unspent(2, 60_000, None)];
        let requests = vec![OutputRequest::Spend {
            address: destination(),
            amount: 1_000,
            token: None,
        }];
        let (used, outputs) =
            sanitize_tx_data(pool, &requests, 1, &change_address(), true, None, true).unwrap();

        assert_eq!(used.len(), 2);
        assert_eq!(outputs[1].amount, 110_000 - 1_000 - 374);
    }

    /// An exhausted pool is a satoshi shortfall.
    #[test]
    fn test_insufficient_funds() {
        let pool = vec![unspent(1, 500, None)];
        let requests = vec![OutputRequest::Spend {
            address: destination(),
            amount: 1_000,
            token: None,
        }];
        assert!(matches!(
            sanitize_tx_data(pool, &requests, 1, &change_address(), false, None, true),
            Err(WalletError::InsufficientFunds { .. })
        ));
    }

    /// A missing token category fails hard, never draining the pool.
    #[test]
    fn test_token_shortfall_is_hard_error() {
        let pool = vec![unspent(1, 100_000, None)];
        let requests = vec![OutputRequest::Spend {
            address: destination(),
            amount: 546,
            token: Some(CashToken::fungible(CATEGORY, 10)),
        }];
        assert!(matches!(
            sanitize_tx_data(pool, &requests, 1, &change_address(), false, None, true),
            Err(WalletError::InsufficientTokenFunds(_))
        ));
    }

    /// A token spend drafts the token coin and a plain coin for the fee,
    /// and token change comes back last.
    #[test]
    fn test_token_spend_with_change() {
        let pool = vec![
            unspent(1, 50_000, None),
            unspent(2, 546, Some(CashToken::fungible(CATEGORY, 100))),
        ];
        let requests = vec![OutputRequest::Spend {
            address: destination(),
            amount: 546,
            token: Some(CashToken::fungible(CATEGORY, 40)),
        }];
        let (used, outputs) =
            sanitize_tx_data(pool, &requests, 1, &change_address(), false, None, true).unwrap();

        assert_eq!(used.len(), 2);
        assert_eq!(outputs.len(), 2);
        let change_token = outputs[1].token.as_ref().unwrap();
        assert_eq!(change_token.amount, Some(60));
        // token change absorbs the satoshi leftover
        assert_eq!(outputs[1].amount, 50_546 - 546 - 374);
    }

    /// Data carrier outputs sit between the spends and the change.
    #[test]
    fn test_message_outputs_ordered() {
        let pool = vec![unspent(1, 100_000, None)];
        let requests = vec![OutputRequest::Spend {
            address: destination(),
            amount: 1_000,
            token: None,
        }];
        let message = CarrierMessage::Text("hello".to_string());
        let (_, outputs) = sanitize_tx_data(
            pool,
            &requests,
            1,
            &change_address(),
            false,
            Some(&message),
            true,
        )
        .unwrap();

        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[0].amount, 1_000);
        assert_eq!(outputs[1].locking_script.to_hex(), "6a0568656c6c6f");
        assert_eq!(outputs[1].amount, 0);
        // carrier output is 8 + 1 + 7 = 16 bytes on top of the base fee
        assert_eq!(outputs[2].amount, 100_000 - 1_000 - 226 - 16);
    }

    /// Raw pushdata goes in verbatim as a single output.
    #[test]
    fn test_raw_message_verbatim() {
        let blob = hex::decode("026d0109626974505553484552").unwrap();
        let outputs = CarrierMessage::Raw(blob).to_outputs().unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(
            outputs[0].locking_script.to_hex(),
            "6a026d0109626974505553484552"
        );
    }

    /// A signed transaction parses back with the expected shape.
    #[test]
    fn test_create_transaction_roundtrip() {
        let private_key = PrivateKey::from_bytes(&[0x01; 32]).unwrap();
        let pool = vec![unspent(1, 100_000, None)];
        let requests = vec![OutputRequest::Spend {
            address: destination(),
            amount: 1_000,
            token: None,
        }];
        let raw = create_transaction(
            &private_key,
            pool,
            &requests,
            1,
            &change_address(),
            false,
            None,
        )
        .unwrap();

        let tx = Transaction::from_hex(&raw).unwrap();
        assert_eq!(tx.version, TX_VERSION);
        assert_eq!(tx.inputs.len(), 1);
        assert_eq!(tx.outputs.len(), 2);
        assert_eq!(tx.outputs[0].value, 1_000);
        assert_eq!(tx.outputs[1].value, 98_774);
        assert_eq!(tx.lock_time, 0);

        // sig push (~72 bytes) plus a 33-byte pubkey push
        let unlocking = tx.inputs[0].unlocking_script.as_ref().unwrap();
        assert!(unlocking.len() >= 100 && unlocking.len() <= 108);
        let bytes = unlocking.to_bytes();
        assert_eq!(bytes[0] as usize + 1 + 34, bytes.len());
        assert_eq!(bytes[bytes.len() - 34], 33);
    }
}
