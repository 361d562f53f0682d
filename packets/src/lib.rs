pub mod error;
pub mod mysql;

pub use error::{DecodeError, Result};
pub use mysql::client::login::{decode_handshake_response, HandshakeResponse};
pub use mysql::common::CapabilityFlags;
pub use mysql::cursor::ByteCursor;
pub use mysql::MySQLPacket;
