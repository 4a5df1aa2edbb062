//! # TP-Link Kasa Smart Plug Protocol
//!
//! Kasa outlets accept JSON commands on TCP port 9999. Every message is
//! obfuscated with an XOR autokey cipher seeded with `171` and prefixed with
//! its length as a 4-byte big-endian integer.
//!
//! Only the relay command is modelled here:
//! `{"system":{"set_relay_state":{"state":1}}}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const KASA_PORT: u16 = 9999;
pub const LEN_PREFIX: usize = 4;

const INITIAL_KEY: u8 = 171;

#[derive(Debug, Error)]
pub enum KasaError {
    #[error("malformed outlet reply: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("outlet reply is missing the relay result")]
    MissingResult,
    #[error("outlet rejected the command (err_code {code}): {msg}")]
    Rejected { code: i64, msg: String },
}

#[derive(Debug, Serialize)]
struct Envelope<T> {
    system: System<T>,
}

#[derive(Debug, Serialize)]
struct System<T> {
    set_relay_state: T,
}

#[derive(Debug, Serialize)]
struct RelayState {
    state: u8,
}

#[derive(Debug, Deserialize)]
struct RelayResult {
    err_code: i64,
    #[serde(default)]
    err_msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyEnvelope {
    system: Option<ReplySystem>,
}

#[derive(Debug, Deserialize)]
struct ReplySystem {
    set_relay_state: Option<RelayResult>,
}

/// JSON body that switches the relay to `state` (`1` on, `0` off).
pub fn relay_command(state: u8) -> String {
    let envelope = Envelope {
        system: System {
            set_relay_state: RelayState { state },
        },
    };
    // Serializing a struct of plain integers cannot fail.
    serde_json::to_string(&envelope).unwrap_or_default()
}

pub fn encrypt(plain: &[u8]) -> Vec<u8> {
    let mut key: u8 = INITIAL_KEY;
    plain
        .iter()
        .map(|byte| {
            key ^= byte;
            key
        })
        .collect()
}

pub fn decrypt(cipher: &[u8]) -> Vec<u8> {
    let mut key: u8 = INITIAL_KEY;
    cipher
        .iter()
        .map(|&byte| {
            let plain: u8 = key ^ byte;
            key = byte;
            plain
        })
        .collect()
}

/// Encrypts `payload` and prepends the length header, ready for the socket.
pub fn frame(payload: &str) -> Vec<u8> {
    let body: Vec<u8> = encrypt(payload.as_bytes());
    let mut framed: Vec<u8> = Vec::with_capacity(LEN_PREFIX + body.len());
    framed.extend_from_slice(&(body.len() as u32).to_be_bytes());
    framed.extend_from_slice(&body);
    framed
}

pub fn body_len(prefix: [u8; LEN_PREFIX]) -> usize {
    u32::from_be_bytes(prefix) as usize
}

/// Checks a decrypted reply to a relay command.
pub fn check_relay_reply(reply: &[u8]) -> Result<(), KasaError> {
    let envelope: ReplyEnvelope = serde_json::from_slice(reply)?;
    let result: RelayResult = envelope
        .system
        .and_then(|system| system.set_relay_state)
        .ok_or(KasaError::MissingResult)?;

    match result.err_code {
        0 => Ok(()),
        code => Err(KasaError::Rejected {
            code,
            msg: result.err_msg.unwrap_or_default(),
        }),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
