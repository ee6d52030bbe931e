//! The chain backend seam.
//!
//! The wallet pulls unspents and pushes raw transactions through the
//! `ChainBackend` trait, keeping construction and signing independent of
//! any particular index server. `FallbackChain` tries an ordered list of
//! backends until one answers.

use bch_script::Address;
use bch_transaction::Unspent;

use crate::WalletError;

/// A source of chain state and a sink for raw transactions.
pub trait ChainBackend {
    /// The unspent outputs paying to an address.
    ///
    /// # Arguments
    /// * `address` - The address to look up.
    ///
    /// # Returns
    /// The address's unspents, or a backend error.
    fn unspents(&self, address: &Address) -> Result<Vec<Unspent>, WalletError>;

    /// The confirmed satoshi balance of an address.
    ///
    /// # Arguments
    /// * `address` - The address to look up.
    ///
    /// # Returns
    /// The balance in satoshis, or a backend error.
    fn balance(&self, address: &Address) -> Result<u64, WalletError>;

    /// Submit a raw transaction to the network.
    ///
    /// # Arguments
    /// * `raw_tx` - The raw transaction hex.
    ///
    /// # Returns
    /// `Ok(())` on acceptance, or a backend error.
    fn broadcast(&self, raw_tx: &str) -> Result<(), WalletError>;
}

/// An ordered list of backends tried until one answers.
///
/// Each call walks the list in order and returns the first success. When
/// every backend fails, the last error is reported.
pub struct FallbackChain {
    backends: Vec<Box<dyn ChainBackend>>,
}

impl FallbackChain {
    /// Create a chain over an ordered list of backends.
    ///
    /// # Arguments
    /// * `backends` - The backends, most preferred first.
    pub fn new(backends: Vec<Box<dyn ChainBackend>>) -> Self {
        FallbackChain { backends }
    }

    fn try_each<T>(
        &self,
        mut call: impl FnMut(&dyn ChainBackend) -> Result<T, WalletError>,
    ) -> Result<T, WalletError> {
        let mut last_error = "no backends configured".to_string();
        for backend in &self.backends {
            match call(backend.as_ref()) {
                Ok(value) => return Ok(value),
                Err(err) => last_error = err.to_string(),
            }
        }
        Err(WalletError::BackendUnavailable(last_error))
    }
}

impl ChainBackend for FallbackChain {
    fn unspents(&self, address: &Address) -> Result<Vec<Unspent>, WalletError> {
        self.try_each(|backend| backend.unspents(address))
    }

    fn balance(&self, address: &Address) -> Result<u64, WalletError> {
        self.try_each(|backend| backend.balance(address))
    }

    fn broadcast(&self, raw_tx: &str) -> Result<(), WalletError> {
        self.try_each(|backend| backend.broadcast(raw_tx))
    }
}
