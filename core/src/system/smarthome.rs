use std::net::IpAddr;
use std::process::{Command, Stdio};

use tracing::debug;

use rebootr_common::capability::PowerControl;
use rebootr_common::network::device::PowerAction;
use rebootr_common::{Error, Result};
use rebootr_protocols::kasa;

pub const SMARTHOME_CLI: &str = "tplink-smarthome-api";
pub const INSTALL_HINT: &str = "npm install -g tplink-smarthome-api";

/// Outlet control by shelling out to the `tplink-smarthome-api` tool.
#[derive(Debug, Clone)]
pub struct SmarthomeCli {
    program: String,
}

impl SmarthomeCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn send_command(&self, outlet: IpAddr, action: PowerAction) -> Result<()> {
        let payload: String = kasa::relay_command(action.relay_state());
        debug!(%outlet, %payload, "sending command through {}", self.program);

        let output = Command::new(&self.program)
            .arg("sendCommand")
            .arg(outlet.to_string())
            .arg(&payload)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::dispatch(outlet, action, e))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason: String = match stderr.trim() {
            "" => format!("{} exited with {}", self.program, output.status),
            msg => msg.to_string(),
        };
        Err(Error::dispatch(outlet, action, reason))
    }
}

impl Default for SmarthomeCli {
    fn default() -> Self {
        Self::new(SMARTHOME_CLI)
    }
}

impl PowerControl for SmarthomeCli {
    fn power_on(&self, outlet: IpAddr) -> Result<()> {
        self.send_command(outlet, PowerAction::On)
    }

    fn power_off(&self, outlet: IpAddr) -> Result<()> {
        self.send_command(outlet, PowerAction::Off)
    }

    fn ensure_available(&self) -> Result<()> {
        let found: bool = Command::new("which")
            .arg(&self.program)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success());

        if found {
            Ok(())
        } else {
            Err(Error::DependencyMissing {
                program: self.program.clone(),
                hint: INSTALL_HINT.to_string(),
            })
        }
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
