use crate::error::{DecodeError, Result};
use crate::mysql::client::connect_attrs::read_connect_attrs;
use crate::mysql::common::CapabilityFlags;
use crate::mysql::cursor::ByteCursor;
use log::{debug, trace};
use std::collections::BTreeMap;
use std::fmt;

const RESERVED_LEN: usize = 23;

/// Client reply to the server greeting (`Protocol::HandshakeResponse41`).
///
/// <https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_connection_phase_packets_protocol_handshake_response.html>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeResponse {
    capabilities: CapabilityFlags,
    max_packet_size: u32,
    charset: u8,
    username: String,
    auth_response: Vec<u8>,
    database: String,
    auth_plugin: String,
    connect_attrs: BTreeMap<String, String>,
}

impl HandshakeResponse {
    /// Decodes a whole payload, transport header already stripped.
    pub fn decode(payload: &[u8]) -> Result<HandshakeResponse> {
        decode_handshake_response(&mut ByteCursor::new(payload))
    }

    pub fn capabilities(&self) -> CapabilityFlags {
        self.capabilities
    }

    pub fn base_capabilities(&self) -> u16 {
        self.capabilities.base()
    }

    pub fn extended_capabilities(&self) -> u16 {
        self.capabilities.extended()
    }

    pub fn max_packet_size(&self) -> u32 {
        self.max_packet_size
    }

    pub fn charset(&self) -> u8 {
        self.charset
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn auth_response_len(&self) -> usize {
        self.auth_response.len()
    }

    pub fn auth_response(&self) -> &[u8] {
        &self.auth_response
    }

    /// Empty when `CLIENT_CONNECT_WITH_DB` is not set.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Empty when `CLIENT_PLUGIN_AUTH` is not set.
    pub fn auth_plugin(&self) -> &str {
        &self.auth_plugin
    }

    pub fn connect_attrs(&self) -> &BTreeMap<String, String> {
        &self.connect_attrs
    }
}

impl fmt::Display for HandshakeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user={} db={} plugin={} auth_response_len={} attrs={} caps={:#010x} charset={} max_packet_size={}",
            self.username,
            self.database,
            self.auth_plugin,
            self.auth_response.len(),
            self.connect_attrs.len(),
            self.capabilities.bits(),
            self.charset,
            self.max_packet_size,
        )
    }
}

/// How the auth response is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthResponseFraming {
    LenEnc,
    OneByteLength,
    NullTerminated,
}

/// Optional sections, decided once from the capability flags.
#[derive(Debug, Clone, Copy)]
struct Sections {
    auth_response: AuthResponseFraming,
    database: bool,
    auth_plugin: bool,
    connect_attrs: bool,
}

impl From<CapabilityFlags> for Sections {
    fn from(cap: CapabilityFlags) -> Sections {
        let auth_response = if cap.contains(CapabilityFlags::CLIENT_PLUGIN_AUTH_LENENC_CLIENT_DATA) {
            AuthResponseFraming::LenEnc
        } else if cap.contains(CapabilityFlags::CLIENT_SECURE_CONNECTION) {
            AuthResponseFraming::OneByteLength
        } else {
            AuthResponseFraming::NullTerminated
        };

        Sections {
            auth_response,
            database: cap.contains(CapabilityFlags::CLIENT_CONNECT_WITH_DB),
            auth_plugin: cap.contains(CapabilityFlags::CLIENT_PLUGIN_AUTH),
            connect_attrs: cap.contains(CapabilityFlags::CLIENT_CONNECT_ATTRS),
        }
    }
}

/// Decodes a handshake response starting at the cursor's position.
///
/// On success the cursor is left after the last field read; bytes after it
/// are not an error. On failure nothing is returned and the cursor position
/// is unspecified.
pub fn decode_handshake_response(reader: &mut ByteCursor<'_>) -> Result<HandshakeResponse> {
    let base = reader.read_u16_le()?;
    let extended = reader.read_u16_le()?;
    let capabilities = CapabilityFlags::from_halves(base, extended);
    let sections = Sections::from(capabilities);
    trace!("handshake response caps {:#010x}: {:?}", capabilities.bits(), sections);

    let max_packet_size = reader.read_u32_le()?;
    let charset = reader.read_u8()?;

    let reserved = reader.read_fixed(RESERVED_LEN)?;
    if let Some(offset) = reserved.iter().position(|&b| b != 0) {
        debug!("reserved byte {} of handshake response is {:#04x}", offset, reserved[offset]);
        return Err(DecodeError::NotHandshakeResponse { offset });
    }

    let username = reader.read_null_terminated_str()?;

    let auth_response = match sections.auth_response {
        AuthResponseFraming::LenEnc => reader.read_len_enc_bytes()?,
        AuthResponseFraming::OneByteLength => {
            let len = reader.read_u8()?;
            reader.read_fixed(len as usize)?
        }
        AuthResponseFraming::NullTerminated => reader.read_null_terminated()?,
    }
    .to_vec();

    let database = if sections.database {
        reader.read_null_terminated_str()?
    } else {
        String::new()
    };

    let auth_plugin = if sections.auth_plugin {
        reader.read_null_terminated_str()?
    } else {
        String::new()
    };

    let connect_attrs = if sections.connect_attrs {
        read_connect_attrs(reader)?
    } else {
        BTreeMap::new()
    };

    if reader.remaining() > 0 {
        trace!("{} bytes left after handshake response", reader.remaining());
    }

    Ok(HandshakeResponse {
        capabilities,
        max_packet_size,
        charset,
        username,
        auth_response,
        database,
        auth_plugin,
        connect_attrs,
    })
}
