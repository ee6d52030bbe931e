//! Fee estimation.
//!
//! Estimates the signed size of a transaction before signatures exist,
//! using the worst-case P2PKH input size, and derives the fee from a
//! satoshi-per-byte rate.

use bch_primitives::util::VarInt;

/// Worst-case size of a signed P2PKH input with a compressed public key.
pub const P2PKH_INPUT_SIZE_COMPRESSED: usize = 148;

/// Worst-case size of a signed P2PKH input with an uncompressed public key.
pub const P2PKH_INPUT_SIZE_UNCOMPRESSED: usize = 180;

/// Size of a P2PKH output: value, script length varint, 25-byte script.
pub const P2PKH_OUTPUT_SIZE: usize = 34;

/// Estimate the signed size of a transaction in bytes.
///
/// Counts the version and locktime, the input and output count varints,
/// worst-case P2PKH inputs, P2PKH outputs, and any extra bytes for data
/// carrier outputs (each counted as its full serialized size).
///
/// # Arguments
/// * `n_inputs` - Number of P2PKH inputs.
/// * `n_outputs` - Number of P2PKH outputs.
/// * `compressed` - Whether the signing key's public key is compressed.
/// * `op_return_size` - Total serialized size of all data carrier outputs.
///
/// # Returns
/// The estimated transaction size in bytes.
pub fn estimate_size(
    n_inputs: usize,
    n_outputs: usize,
    compressed: bool,
    op_return_size: usize,
) -> usize {
    let input_size = if compressed {
        P2PKH_INPUT_SIZE_COMPRESSED
    } else {
        P2PKH_INPUT_SIZE_UNCOMPRESSED
    };
    4 + 4
        + VarInt::from(n_inputs).length()
        + n_inputs * input_size
        + VarInt::from(n_outputs).length()
        + n_outputs * P2PKH_OUTPUT_SIZE
        + op_return_size
}

/// Estimate the fee for a transaction at a satoshi-per-byte rate.
///
/// # Arguments
/// * `n_inputs` - Number of P2PKH inputs.
/// * `n_outputs` - Number of P2PKH outputs.
/// * `sat_per_byte` - The fee rate.
/// * `compressed` - Whether the signing key's public key is compressed.
/// * `op_return_size` - Total serialized size of all data carrier outputs.
///
/// # Returns
/// The estimated fee in satoshis.
pub fn estimate_fee(
    n_inputs: usize,
    n_outputs: usize,
    sat_per_byte: u64,
    compressed: bool,
    op_return_size: usize,
) -> u64 {
    estimate_size(n_inputs, n_outputs, compressed, op_return_size) as u64 * sat_per_byte
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Known sizes for small transactions at one satoshi per byte.
    #[test]
    fn test_known_fees() {
        assert_eq!(estimate_fee(1, 2, 1, true, 0), 226);
        assert_eq!(estimate_fee(2, 2, 1, true, 0), 374);
        assert_eq!(estimate_fee(1, 2, 2, true, 0), 452);
        assert_eq!(estimate_fee(1, 2, 1, false, 0), 258);
    }

    /// Data carrier bytes are charged verbatim.
    #[test]
    fn test_op_return_bytes_counted() {
        // OP_RETURN + push(13): script is 15 bytes, output is 8 + 1 + 15
        let op_return_size = 8 + 1 + 15;
        assert_eq!(estimate_fee(1, 2, 1, true, op_return_size), 226 + 24);
    }

    /// More inputs, outputs, or a higher rate never lower the fee.
    #[test]
    fn test_monotonic() {
        for n in 1..10 {
            assert!(estimate_fee(n + 1, 2, 1, true, 0) > estimate_fee(n, 2, 1, true, 0));
            assert!(estimate_fee(1, n + 1, 1, true, 0) > estimate_fee(1, n, 1, true, 0));
        }
        assert!(estimate_fee(1, 2, 3, true, 0) > estimate_fee(1, 2, 2, true, 0));
    }

    /// The count varints widen past 252 entries.
    #[test]
    fn test_varint_widening() {
        let small = estimate_size(252, 1, true, 0);
        let large = estimate_size(253, 1, true, 0);
        // one more input plus two extra varint bytes
        assert_eq!(large - small, P2PKH_INPUT_SIZE_COMPRESSED + 2);
    }
}
