use std::io::{Read, Write};
use std::net::{IpAddr, SocketAddr, TcpStream};
use std::time::Duration;

use tracing::debug;

use rebootr_common::capability::PowerControl;
use rebootr_common::network::device::PowerAction;
use rebootr_common::{Error, Result};
use rebootr_protocols::kasa::{self, KASA_PORT, LEN_PREFIX};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
/// Relay replies are a few dozen bytes; anything huge is not a Kasa outlet.
const MAX_REPLY_LEN: usize = 64 * 1024;

/// Talks to TP-Link Kasa outlets directly over TCP.
#[derive(Debug, Clone)]
pub struct KasaPowerControl {
    port: u16,
    timeout: Duration,
}

impl KasaPowerControl {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    fn send_command(&self, outlet: IpAddr, action: PowerAction) -> Result<()> {
        let fail = |reason: String| Error::dispatch(outlet, action, reason);
        let addr: SocketAddr = SocketAddr::new(outlet, self.port);
        let payload: String = kasa::relay_command(action.relay_state());
        debug!(%addr, %payload, "sending relay command");

        let mut stream: TcpStream = TcpStream::connect_timeout(&addr, self.timeout)
            .map_err(|e| fail(format!("connect to {addr}: {e}")))?;
        stream
            .set_read_timeout(Some(self.timeout))
            .and_then(|_| stream.set_write_timeout(Some(self.timeout)))
            .map_err(|e| fail(e.to_string()))?;

        stream
            .write_all(&kasa::frame(&payload))
            .map_err(|e| fail(format!("write: {e}")))?;

        let mut prefix: [u8; LEN_PREFIX] = [0u8; LEN_PREFIX];
        stream
            .read_exact(&mut prefix)
            .map_err(|e| fail(format!("read reply header: {e}")))?;

        let len: usize = kasa::body_len(prefix);
        if len > MAX_REPLY_LEN {
            return Err(fail(format!("reply of {len} bytes is too large")));
        }

        let mut body: Vec<u8> = vec![0u8; len];
        stream
            .read_exact(&mut body)
            .map_err(|e| fail(format!("read reply: {e}")))?;

        kasa::check_relay_reply(&kasa::decrypt(&body)).map_err(|e| fail(e.to_string()))
    }
}

impl Default for KasaPowerControl {
    fn default() -> Self {
        Self::new(KASA_PORT, DEFAULT_TIMEOUT)
    }
}

impl PowerControl for KasaPowerControl {
    fn power_on(&self, outlet: IpAddr) -> Result<()> {
        self.send_command(outlet, PowerAction::On)
    }

    fn power_off(&self, outlet: IpAddr) -> Result<()> {
        self.send_command(outlet, PowerAction::Off)
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
