use clap::{ArgAction, Parser};
use config::Config;
use std::io::{self, BufRead};

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "login-dissector",
    about = "Decode captured MySQL handshake response packets"
)]
pub struct Cli {
    /// Hex-encoded packets; read one per line from stdin when omitted
    pub packets: Vec<String>,

    /// Packets include the 3-byte length and sequence id header
    #[arg(long, action = ArgAction::SetTrue)]
    pub framed: bool,
}

impl Cli {
    pub fn into_config(self, stdin: impl BufRead) -> io::Result<Config> {
        let packets = if self.packets.is_empty() {
            let mut packets = Vec::new();
            for line in stdin.lines() {
                let line = line?;
                if !line.trim().is_empty() {
                    packets.push(line);
                }
            }
            packets
        } else {
            self.packets
        };

        Ok(Config {
            framed: self.framed,
            packets,
        })
    }
}
