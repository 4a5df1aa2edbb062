use std::net::IpAddr;

use thiserror::Error;

use crate::config::ConfigError;
use crate::network::device::PowerAction;

pub type Result<T> = std::result::Result<T, Error>;

/// Conditions that stop a check or a whole monitor run.
///
/// A host that does not answer, or a name that does not resolve, is *not* an
/// error. Those are ordinary `false` results and drive the escalation.
#[derive(Debug, Error)]
pub enum Error {
    /// The probing mechanism itself could not run.
    #[error("{probe} probe unavailable: {reason}")]
    ProbeUnavailable { probe: &'static str, reason: String },

    /// An outlet command could not be sent or was rejected by the outlet.
    #[error("could not switch outlet {outlet} {action}: {reason}")]
    PowerControlDispatch {
        outlet: IpAddr,
        action: PowerAction,
        reason: String,
    },

    /// Tooling required by the power-control transport is not installed.
    #[error("`{program}` could not be found. To install it, run: `{hint}`")]
    DependencyMissing { program: String, hint: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl Error {
    pub fn probe_unavailable(probe: &'static str, reason: impl ToString) -> Self {
        Self::ProbeUnavailable {
            probe,
            reason: reason.to_string(),
        }
    }

    pub fn dispatch(outlet: IpAddr, action: PowerAction, reason: impl ToString) -> Self {
        Self::PowerControlDispatch {
            outlet,
            action,
            reason: reason.to_string(),
        }
    }
}
