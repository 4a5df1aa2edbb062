use std::net::IpAddr;
use std::process::{Command, Stdio};
use std::time::Duration;

use tracing::trace;

use rebootr_common::capability::Pinger;
use rebootr_common::{Error, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// One echo request through the system `ping` utility.
///
/// The utility exits successfully only when a reply came back; any other exit
/// status is an unreachable host. Failing to start the utility at all is the
/// only error.
#[derive(Debug, Clone)]
pub struct SystemPinger {
    program: String,
    timeout: Duration,
}

impl SystemPinger {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn args(&self, target: IpAddr) -> Vec<String> {
        let wait: String = self.timeout.as_secs().max(1).to_string();

        #[cfg(target_os = "macos")]
        let wait_flag: &str = "-t";
        #[cfg(not(target_os = "macos"))]
        let wait_flag: &str = "-W";

        vec![
            "-c".to_string(),
            "1".to_string(),
            wait_flag.to_string(),
            wait,
            target.to_string(),
        ]
    }
}

impl Default for SystemPinger {
    fn default() -> Self {
        Self::new("ping", DEFAULT_TIMEOUT)
    }
}

impl Pinger for SystemPinger {
    fn ping(&self, target: IpAddr) -> Result<bool> {
        let status = Command::new(&self.program)
            .args(self.args(target))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| Error::probe_unavailable("ping", format!("{}: {e}", self.program)))?;

        trace!(%target, ?status, "ping exited");
        Ok(status.success())
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
