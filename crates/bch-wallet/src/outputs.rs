//! Output requests and their normalized form.
//!
//! A caller asks for spends and data carriers; `prepare` normalizes each
//! request into the exact script and value that will appear on the wire,
//! with the token prefix prepended for token-bearing spends.

use bch_primitives::util::VarInt;
use bch_script::op_return::op_return_script;
use bch_script::{Address, AddressKind, Script};
use bch_tokens::{encode_prefix, CashToken};
use bch_transaction::TxOutput;

use crate::WalletError;

/// One requested transaction output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputRequest {
    /// Pay satoshis, and optionally a token, to an address.
    Spend {
        /// The destination address.
        address: Address,
        /// The satoshi value.
        amount: u64,
        /// A token to attach to the output.
        token: Option<CashToken>,
    },
    /// Carry a data payload in a zero-value OP_RETURN output.
    DataCarrier {
        /// The payload bytes, push-encoded into the script.
        payload: Vec<u8>,
    },
}

/// An output request normalized into wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedOutput {
    /// The full output script, token prefix included when present.
    pub locking_script: Script,
    /// The satoshi value.
    pub amount: u64,
    /// The attached token, if any.
    pub token: Option<CashToken>,
}

impl PreparedOutput {
    /// Build a spend output for an address, prefixing the token when given.
    ///
    /// # Arguments
    /// * `address` - The destination address.
    /// * `amount` - The satoshi value.
    /// * `token` - A token to attach.
    ///
    /// # Returns
    /// The prepared output, or an error for invalid tokens.
    pub fn spend(
        address: &Address,
        amount: u64,
        token: Option<CashToken>,
    ) -> Result<Self, WalletError> {
        let spend_script = address.locking_script();
        let locking_script = match &token {
            Some(token) => {
                let mut bytes = encode_prefix(token)?;
                bytes.extend_from_slice(spend_script.to_bytes());
                Script::from_vec(bytes)
            }
            None => spend_script,
        };
        Ok(PreparedOutput {
            locking_script,
            amount,
            token,
        })
    }

    /// Build a zero-value data carrier output from a raw script.
    ///
    /// # Arguments
    /// * `script` - The complete OP_RETURN script.
    ///
    /// # Returns
    /// The prepared output.
    pub fn data_carrier(script: Script) -> Self {
        PreparedOutput {
            locking_script: script,
            amount: 0,
            token: None,
        }
    }

    /// Convert into a wire-format transaction output.
    pub fn to_tx_output(&self) -> TxOutput {
        TxOutput::new(self.amount, self.locking_script.clone())
    }

    /// The serialized size of this output in bytes.
    pub fn serialized_size(&self) -> usize {
        8 + VarInt::from(self.locking_script.len()).length() + self.locking_script.len()
    }
}

/// Normalize an output request into its wire form.
///
/// P2SH destinations are rejected here: the builder cannot construct a
/// P2SH spend yet, even though the codec parses such addresses.
///
/// # Arguments
/// * `request` - The requested output.
///
/// # Returns
/// The prepared output, or an error for unsupported or invalid requests.
pub fn prepare(request: &OutputRequest) -> Result<PreparedOutput, WalletError> {
    match request {
        OutputRequest::Spend {
            address,
            amount,
            token,
        } => {
            if address.kind == AddressKind::P2sh {
                return Err(WalletError::UnsupportedOutput(
                    "P2SH output scripts are not yet supported".to_string(),
                ));
            }
            PreparedOutput::spend(address, *amount, token.clone())
        }
        OutputRequest::DataCarrier { payload } => {
            Ok(PreparedOutput::data_carrier(op_return_script(payload)?))
        }
    }
}
