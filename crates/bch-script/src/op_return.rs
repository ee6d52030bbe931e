//! OP_RETURN data carrier construction.
//!
//! Builds the null-data outputs a wallet attaches to a transaction: plain
//! text messages chunked to the relay limit, and structured pushdata blobs
//! assembled from hex and UTF-8 items.

use crate::opcodes::OP_RETURN;
use crate::script::Script;
use crate::ScriptError;

/// Maximum OP_RETURN payload relayed by default, in bytes.
pub const MAX_OP_RETURN_PAYLOAD: usize = 220;

/// One item of a structured OP_RETURN payload.
///
/// Items are concatenated into a single blob, each preceded by its own
/// minimal push encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushdataItem {
    /// Raw bytes given as a hex string.
    Hex(String),
    /// A UTF-8 string pushed as its byte encoding.
    Utf8(String),
}

/// Assemble a pushdata blob from a list of items.
///
/// Each item is encoded as a minimal data push (length prefix followed by
/// the bytes) and the pushes are concatenated. The blob is later embedded
/// in an OP_RETURN script as one payload.
///
/// # Arguments
/// * `items` - The hex and UTF-8 items to encode.
///
/// # Returns
/// The concatenated pushdata bytes, or an error if a hex item is invalid
/// or the blob exceeds the relay limit.
pub fn create_pushdata(items: &[PushdataItem]) -> Result<Vec<u8>, ScriptError> {
    let mut blob = Script::new();
    for item in items {
        match item {
            PushdataItem::Hex(hex_str) => {
                let bytes = hex::decode(hex_str)?;
                blob.append_push_data(&bytes);
            }
            PushdataItem::Utf8(text) => {
                blob.append_push_data(text.as_bytes());
            }
        }
    }

    let blob = blob.into_bytes();
    if blob.len() > MAX_OP_RETURN_PAYLOAD {
        return Err(ScriptError::DataTooBig(blob.len()));
    }
    Ok(blob)
}

/// Build an OP_RETURN script carrying a single payload.
///
/// # Arguments
/// * `payload` - The data carried after OP_RETURN, at most 220 bytes.
///
/// # Returns
/// The data carrier `Script`, or an error if the payload is oversized.
pub fn op_return_script(payload: &[u8]) -> Result<Script, ScriptError> {
    if payload.len() > MAX_OP_RETURN_PAYLOAD {
        return Err(ScriptError::DataTooBig(payload.len()));
    }
    let mut script = Script::new();
    script.append_opcode(OP_RETURN);
    script.append_push_data(payload);
    Ok(script)
}

/// Build an OP_RETURN script from pre-encoded pushdata bytes.
///
/// The caller has already laid out the pushes (for example via
/// [`create_pushdata`]); the bytes follow OP_RETURN verbatim.
///
/// # Arguments
/// * `pushdata` - The pre-encoded pushdata bytes, at most 220 bytes.
///
/// # Returns
/// The data carrier `Script`, or an error if the payload is oversized.
pub fn op_return_raw(pushdata: &[u8]) -> Result<Script, ScriptError> {
    if pushdata.len() > MAX_OP_RETURN_PAYLOAD {
        return Err(ScriptError::DataTooBig(pushdata.len()));
    }
    let mut script = Script::new();
    script.append_opcode(OP_RETURN);
    script.append_bytes(pushdata);
    Ok(script)
}

/// Split a message into relay-sized chunks.
///
/// Each chunk becomes its own OP_RETURN output. Splitting happens on byte
/// boundaries; an empty message yields no chunks.
///
/// # Arguments
/// * `message` - The raw message bytes.
///
/// # Returns
/// The message split into chunks of at most 220 bytes.
pub fn chunk_message(message: &[u8]) -> Vec<Vec<u8>> {
    message
        .chunks(MAX_OP_RETURN_PAYLOAD)
        .map(|c| c.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Structured pushdata from mixed hex and UTF-8 items.
    #[test]
    fn test_create_pushdata() {
        let items = vec![
            PushdataItem::Hex("6d01".to_string()),
            PushdataItem::Utf8("bitPUSHER".to_string()),
        ];
        let blob = create_pushdata(&items).unwrap();
        assert_eq!(hex::encode(&blob), "026d0109626974505553484552");
        assert_eq!(blob.len(), 13);

        let script = op_return_script(&blob).unwrap();
        assert_eq!(script.to_hex(), "6a0d026d0109626974505553484552");
        assert!(script.is_data_carrier());

        // pre-encoded pushes go in verbatim
        let raw = op_return_raw(&blob).unwrap();
        assert_eq!(raw.to_hex(), "6a026d0109626974505553484552");
    }

    #[test]
    fn test_create_pushdata_rejects_bad_hex() {
        let items = vec![PushdataItem::Hex("zz".to_string())];
        assert!(create_pushdata(&items).is_err());
    }

    /// A blob over the relay limit is rejected.
    #[test]
    fn test_payload_size_limit() {
        assert!(op_return_script(&[0u8; 220]).is_ok());
        assert!(matches!(
            op_return_script(&[0u8; 221]),
            Err(ScriptError::DataTooBig(221))
        ));

        let items = vec![PushdataItem::Utf8("x".repeat(220))];
        assert!(create_pushdata(&items).is_err()); // 220 bytes + push prefix
    }

    #[test]
    fn test_chunk_message() {
        assert!(chunk_message(b"").is_empty());

        let chunks = chunk_message(&[0xAAu8; 220]);
        assert_eq!(chunks.len(), 1);

        let chunks = chunk_message(&[0xAAu8; 441]);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 220);
        assert_eq!(chunks[1].len(), 220);
        assert_eq!(chunks[2].len(), 1);
    }
}
