//! DNS lookups straight over UDP.
//!
//! The query is built by hand (see `rebootr_protocols::dns`) and sent to a
//! single recursive resolver, by default the first `nameserver` in
//! `/etc/resolv.conf`. Only the presence of records matters, never their
//! contents.

use std::fs;
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use rebootr_common::capability::{RecordResolver, RecordType};
use rebootr_common::{Error, Result};
use rebootr_protocols::dns::{self, Answer, DNS_PORT};

pub const RESOLV_CONF: &str = "/etc/resolv.conf";
pub const FALLBACK_RESOLVER: IpAddr = IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1));

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);
const MAX_DATAGRAM: usize = 4096;

#[derive(Debug, Clone)]
pub struct UdpResolver {
    server: SocketAddr,
    timeout: Duration,
}

impl UdpResolver {
    pub fn new(server: SocketAddr) -> Self {
        Self {
            server,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_ip(server: IpAddr) -> Self {
        Self::new(SocketAddr::new(server, DNS_PORT))
    }

    /// Resolver from `/etc/resolv.conf`, or [`FALLBACK_RESOLVER`].
    pub fn from_system() -> Self {
        let server: IpAddr = fs::read_to_string(RESOLV_CONF)
            .ok()
            .and_then(|contents| parse_nameserver(&contents))
            .unwrap_or(FALLBACK_RESOLVER);
        Self::from_ip(server)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }

    fn bind(&self) -> Result<UdpSocket> {
        let local: SocketAddr = match self.server {
            SocketAddr::V4(_) => SocketAddr::from(([0, 0, 0, 0], 0)),
            SocketAddr::V6(_) => SocketAddr::from(([0u16; 8], 0)),
        };
        let socket: UdpSocket =
            UdpSocket::bind(local).map_err(|e| Error::probe_unavailable("dns", e))?;
        socket
            .set_read_timeout(Some(self.timeout))
            .map_err(|e| Error::probe_unavailable("dns", e))?;
        Ok(socket)
    }

    /// Waits for the reply matching `id`, ignoring stray datagrams.
    fn await_answer(&self, socket: &UdpSocket, id: u16, kind: RecordType) -> Result<Option<Answer>> {
        let deadline: Instant = Instant::now() + self.timeout;
        let mut buf: [u8; MAX_DATAGRAM] = [0u8; MAX_DATAGRAM];

        loop {
            let remaining: Duration = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            socket
                .set_read_timeout(Some(remaining))
                .map_err(|e| Error::probe_unavailable("dns", e))?;

            match socket.recv_from(&mut buf) {
                Ok((len, from)) if from == self.server => match dns::inspect_answer(&buf[..len], kind) {
                    Ok(answer) if answer.is_response && answer.id == id => return Ok(Some(answer)),
                    Ok(_) => continue,
                    Err(e) => debug!("discarding reply from {from}: {e}"),
                },
                Ok((_, from)) => debug!("discarding datagram from {from}"),
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Ok(None);
                }
                Err(e) => {
                    // e.g. ICMP port unreachable surfacing as ConnectionRefused
                    debug!("dns receive failed: {e}");
                    return Ok(None);
                }
            }
        }
    }
}

impl Default for UdpResolver {
    fn default() -> Self {
        Self::from_system()
    }
}

impl RecordResolver for UdpResolver {
    fn has_records(&self, host: &str, kind: RecordType) -> Result<bool> {
        let id: u16 = rand::random();
        let query: Vec<u8> = match dns::create_query_packet(host, kind, id) {
            Ok(query) => query,
            Err(e) => {
                warn!("{e}");
                return Ok(false);
            }
        };

        let socket: UdpSocket = self.bind()?;
        if let Err(e) = socket.send_to(&query, self.server) {
            // a dead uplink shows up here as an unreachable network
            debug!(server = %self.server, "dns query not sent: {e}");
            return Ok(false);
        }

        let found: bool = self
            .await_answer(&socket, id, kind)?
            .is_some_and(|answer| answer.has_records());
        debug!(host, %kind, found, "dns answer");
        Ok(found)
    }
}

/// First usable `nameserver` entry of a resolv.conf file.
pub fn parse_nameserver(contents: &str) -> Option<IpAddr> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some("nameserver"), Some(addr)) => addr.split('%').next()?.parse().ok(),
                _ => None,
            }
        })
        .next()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
