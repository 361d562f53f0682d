mod cli;

use clap::Parser;
use cli::Cli;
use config::Config;
use log::{debug, error, info};
use packets::{HandshakeResponse, MySQLPacket};
use std::error::Error;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    let conf = match Cli::parse().into_config(io::stdin().lock()) {
        Ok(conf) => conf,
        Err(e) => {
            error!("Failed to read packets from stdin: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut failed = 0;
    for (index, capture) in conf.packets.iter().enumerate() {
        match dissect(&conf, capture) {
            Ok(login) => {
                info!("packet {}: {}", index, login);
                println!("{}", login);
                for (key, value) in login.connect_attrs() {
                    println!("  {}={}", key, value);
                }
            }
            Err(e) => {
                error!("packet {}: {}", index, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn dissect(conf: &Config, capture: &str) -> Result<HandshakeResponse, Box<dyn Error>> {
    let compact: String = capture.split_whitespace().collect();
    let bytes = hex::decode(compact)?;
    if !conf.framed {
        return Ok(HandshakeResponse::decode(&bytes)?);
    }

    let pkt = MySQLPacket::new(&bytes)?;
    debug!("packet seq {} payload len {}", pkt.get_seq(), pkt.len());
    Ok(HandshakeResponse::decode(pkt.get_payload())?)
}
