#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Captures start with the 4-byte transport header.
    pub framed: bool,
    /// Hex-encoded handshake response captures.
    pub packets: Vec<String>,
}
