use crate::error::{DecodeError, Result};
use bytes::Buf;

/// Forward-only reader over one packet payload.
///
/// Every read is bounds-checked against the borrowed buffer and reports
/// [`DecodeError::BufferExhausted`] instead of panicking, which is what
/// `bytes::Buf` would do on a short read.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> ByteCursor<'a> {
        ByteCursor { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn read_fixed(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(DecodeError::BufferExhausted {
                requested: n,
                remaining: self.remaining(),
            });
        }
        let chunk = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(chunk)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_fixed(1)?.get_u8())
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(self.read_fixed(2)?.get_u16_le())
    }

    pub fn read_u24_le(&mut self) -> Result<u32> {
        Ok(self.read_fixed(3)?.get_uint_le(3) as u32)
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(self.read_fixed(4)?.get_u32_le())
    }

    pub fn read_u64_le(&mut self) -> Result<u64> {
        Ok(self.read_fixed(8)?.get_u64_le())
    }

    /// Bytes up to the next 0x00; the terminator is consumed but not returned.
    pub fn read_null_terminated(&mut self) -> Result<&'a [u8]> {
        let rest = &self.buf[self.pos..];
        match rest.iter().position(|&c| c == 0) {
            Some(end) => {
                let s = &rest[..end];
                self.pos += end + 1;
                Ok(s)
            }
            None => Err(DecodeError::UnterminatedString { offset: self.pos }),
        }
    }

    pub fn read_null_terminated_str(&mut self) -> Result<String> {
        Ok(String::from_utf8_lossy(self.read_null_terminated()?).to_string())
    }

    /// MySQL length-encoded integer.
    ///
    /// 0xfb (NULL) and 0xff (ERR header) are not valid lengths here.
    pub fn read_len_enc_int(&mut self) -> Result<u64> {
        match self.read_u8()? {
            b @ 0x00..=0xfa => Ok(b as u64),
            0xfc => Ok(self.read_u16_le()? as u64),
            0xfd => Ok(self.read_u24_le()? as u64),
            0xfe => self.read_u64_le(),
            b => Err(DecodeError::MalformedVarint(b)),
        }
    }

    pub fn read_len_enc_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_len_enc_int()?;
        // a length that doesn't fit usize can't fit in the buffer either
        let n = usize::try_from(len).map_err(|_| DecodeError::BufferExhausted {
            requested: usize::MAX,
            remaining: self.remaining(),
        })?;
        self.read_fixed(n)
    }

    pub fn read_len_enc_str(&mut self) -> Result<String> {
        Ok(String::from_utf8_lossy(self.read_len_enc_bytes()?).to_string())
    }
}
