use crate::error::{DecodeError, Result};
use crate::mysql::cursor::ByteCursor;
use log::debug;
use std::collections::BTreeMap;

/// Reads the `CLIENT_CONNECT_ATTRS` block: a length-encoded byte count
/// followed by length-encoded key/value strings filling exactly that many
/// bytes. A repeated key keeps its last value.
pub fn read_connect_attrs(reader: &mut ByteCursor<'_>) -> Result<BTreeMap<String, String>> {
    let declared = reader.read_len_enc_int()?;
    let block_len = match usize::try_from(declared) {
        Ok(n) if n <= reader.remaining() => n,
        _ => {
            debug!(
                "connect attributes declare {} bytes, only {} left in packet",
                declared,
                reader.remaining()
            );
            return Err(DecodeError::AttributeBlockMismatch { declared });
        }
    };

    let mut block = ByteCursor::new(reader.read_fixed(block_len)?);
    let mut attrs = BTreeMap::new();
    while block.remaining() > 0 {
        let key = block
            .read_len_enc_str()
            .map_err(|e| past_block_end(e, declared))?;
        let value = block
            .read_len_enc_str()
            .map_err(|e| past_block_end(e, declared))?;
        attrs.insert(key, value);
    }

    Ok(attrs)
}

// An entry running off the end of the nested cursor means the declared
// length cut it short.
fn past_block_end(err: DecodeError, declared: u64) -> DecodeError {
    match err {
        DecodeError::BufferExhausted { .. } => {
            debug!("connect attribute entry overruns the declared {} bytes", declared);
            DecodeError::AttributeBlockMismatch { declared }
        }
        other => other,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // _pid=87588, _os=osx10.11
    const ENTRIES: [u8; 24] = [
        0x04, 0x5f, 0x70, 0x69, 0x64, 0x05, 0x38, 0x37, 0x35, 0x38, 0x38, 0x03, 0x5f, 0x6f, 0x73,
        0x08, 0x6f, 0x73, 0x78, 0x31, 0x30, 0x2e, 0x31, 0x31,
    ];

    fn block(declared: u8, entries: &[u8], trailing: &[u8]) -> Vec<u8> {
        let mut payload = vec![declared];
        payload.extend_from_slice(entries);
        payload.extend_from_slice(trailing);
        payload
    }

    #[test]
    fn test_exact_block() {
        let payload = block(ENTRIES.len() as u8, &ENTRIES, &[]);
        let mut reader = ByteCursor::new(&payload);
        let attrs = read_connect_attrs(&mut reader).unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs["_pid"], "87588");
        assert_eq!(attrs["_os"], "osx10.11");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_bytes_after_block_are_left_unread() {
        let payload = block(ENTRIES.len() as u8, &ENTRIES, &[0xde, 0xad]);
        let mut reader = ByteCursor::new(&payload);
        let attrs = read_connect_attrs(&mut reader).unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(reader.remaining(), 2);
    }

    #[test]
    fn test_declared_one_short() {
        let payload = block(ENTRIES.len() as u8 - 1, &ENTRIES, &[]);
        let mut reader = ByteCursor::new(&payload);
        assert_eq!(
            read_connect_attrs(&mut reader),
            Err(DecodeError::AttributeBlockMismatch { declared: 23 })
        );
    }

    #[test]
    fn test_declared_one_long() {
        // the extra byte exists in the packet and starts a truncated key
        let payload = block(ENTRIES.len() as u8 + 1, &ENTRIES, &[0x05]);
        let mut reader = ByteCursor::new(&payload);
        assert_eq!(
            read_connect_attrs(&mut reader),
            Err(DecodeError::AttributeBlockMismatch { declared: 25 })
        );

        // the packet ends before the declared length
        let payload = block(ENTRIES.len() as u8 + 1, &ENTRIES, &[]);
        let mut reader = ByteCursor::new(&payload);
        assert_eq!(
            read_connect_attrs(&mut reader),
            Err(DecodeError::AttributeBlockMismatch { declared: 25 })
        );
    }

    #[test]
    fn test_key_without_value() {
        // block ends right after a key
        let payload = [0x04, 0x03, 0x5f, 0x6f, 0x73];
        let mut reader = ByteCursor::new(&payload);
        assert_eq!(
            read_connect_attrs(&mut reader),
            Err(DecodeError::AttributeBlockMismatch { declared: 4 })
        );
    }

    #[test]
    fn test_empty_block() {
        let payload = [0x00];
        let mut reader = ByteCursor::new(&payload);
        assert!(read_connect_attrs(&mut reader).unwrap().is_empty());
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_duplicate_key_keeps_last_value() {
        // _pid=1, _pid=2
        let payload = [
            0x0e, 0x04, 0x5f, 0x70, 0x69, 0x64, 0x01, 0x31, 0x04, 0x5f, 0x70, 0x69, 0x64, 0x01,
            0x32,
        ];
        let mut reader = ByteCursor::new(&payload);
        let attrs = read_connect_attrs(&mut reader).unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["_pid"], "2");
    }

    #[test]
    fn test_empty_value() {
        // program_name=""
        let payload = [
            0x0e, 0x0c, 0x70, 0x72, 0x6f, 0x67, 0x72, 0x61, 0x6d, 0x5f, 0x6e, 0x61, 0x6d, 0x65,
            0x00,
        ];
        let mut reader = ByteCursor::new(&payload);
        let attrs = read_connect_attrs(&mut reader).unwrap();
        assert_eq!(attrs["program_name"], "");
    }

    #[test]
    fn test_malformed_entry_length() {
        let payload = [0x02, 0xfb, 0x00];
        let mut reader = ByteCursor::new(&payload);
        assert_eq!(
            read_connect_attrs(&mut reader),
            Err(DecodeError::MalformedVarint(0xfb))
        );

        let payload = [0xff, 0x00];
        let mut reader = ByteCursor::new(&payload);
        assert_eq!(
            read_connect_attrs(&mut reader),
            Err(DecodeError::MalformedVarint(0xff))
        );
    }

    #[test]
    fn test_two_byte_block_length() {
        // 300 bytes of entries: a 2 byte key and a 294 byte value
        let mut payload = vec![0xfc, 0x2c, 0x01, 0x02, 0x6b, 0x31, 0xfc, 0x26, 0x01];
        payload.extend(std::iter::repeat(0x61).take(294));
        let mut reader = ByteCursor::new(&payload);
        let attrs = read_connect_attrs(&mut reader).unwrap();
        assert_eq!(attrs["k1"].len(), 294);
        assert_eq!(reader.remaining(), 0);
    }
}
