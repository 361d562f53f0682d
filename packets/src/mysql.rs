pub mod client;
pub mod common;
pub mod cursor;

use crate::error::{DecodeError, Result};
use cursor::ByteCursor;

/// One packet split off the transport stream: 3-byte length, sequence id, payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySQLPacket {
    len: u32,
    pub seq: u8,
    payload: Vec<u8>,
}

impl MySQLPacket {
    /// Splits the 4-byte header off `bytes`. Anything after the declared
    /// payload length belongs to the next packet and is ignored.
    pub fn new(bytes: &[u8]) -> Result<MySQLPacket> {
        let mut reader = ByteCursor::new(bytes);
        let len = reader.read_u24_le()?;
        let seq = reader.read_u8()?;
        let payload = reader.read_fixed(len as usize)?.to_vec();
        if reader.remaining() > 0 {
            log::trace!(
                "{} bytes after packet seq {} belong to the next packet",
                reader.remaining(),
                seq
            );
        }

        Ok(MySQLPacket { len, seq, payload })
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get_seq(&self) -> u8 {
        self.seq
    }

    pub fn get_payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

impl TryFrom<&[u8]> for MySQLPacket {
    type Error = DecodeError;

    fn try_from(bytes: &[u8]) -> Result<MySQLPacket> {
        MySQLPacket::new(bytes)
    }
}
