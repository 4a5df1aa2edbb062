pub mod check;
pub mod lookup;
pub mod power;
pub mod probe;

use std::net::IpAddr;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use rebootr_common::capability::{PowerControl, RecordType};
use rebootr_common::config::{
    DEFAULT_FAILURE_ODDS, DEFAULT_MAX_RETRIES, FirstRebootPolicy, MonitorConfig, RetryPolicy,
};
use rebootr_core::network::kasa::KasaPowerControl;
use rebootr_core::network::resolver::UdpResolver;
use rebootr_core::system::smarthome::SmarthomeCli;
use rebootr_protocols::kasa::KASA_PORT;

const OUTLET_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "rebootr")]
#[command(version)]
#[command(about = "Checks the Internet connection and power-cycles the router and modem when it is down.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print warnings, errors and the verdict
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check connectivity and reboot the router/modem until it is back
    #[command(alias = "c")]
    Check(CheckArgs),
    /// Check connectivity without touching any outlet
    #[command(alias = "p")]
    Probe(ProbeArgs),
    /// Switch an outlet by hand
    Power {
        action: PowerCommand,
        outlet: IpAddr,
        #[command(flatten)]
        transport: TransportArgs,
    },
    /// Check whether a host has DNS records of a given type
    #[command(alias = "l")]
    Lookup {
        host: String,
        #[arg(long, value_enum, default_value_t = RecordKind::A)]
        record: RecordKind,
        #[command(flatten)]
        dns: DnsArgs,
    },
}

#[derive(Args)]
pub struct CheckArgs {
    /// Address of the router itself
    #[arg(long, env = "REBOOTR_ROUTER_IP")]
    pub router_ip: IpAddr,

    /// Address of the outlet powering the router
    #[arg(long, env = "REBOOTR_ROUTER_PLUG_IP")]
    pub router_plug_ip: IpAddr,

    /// Address of the outlet powering the modem
    #[arg(long, env = "REBOOTR_MODEM_PLUG_IP")]
    pub modem_plug_ip: IpAddr,

    /// Seconds a rebooted device is given to come back
    #[arg(long, env = "REBOOTR_POST_REBOOT_DELAY", value_name = "SECS", default_value_t = 180)]
    pub post_reboot_delay: u64,

    /// Seconds between switching an outlet off and on
    #[arg(long, env = "REBOOTR_POWER_TOGGLE_DELAY", value_name = "SECS", default_value_t = 5)]
    pub power_toggle_delay: u64,

    /// When to reboot the router before the modem
    #[arg(long, env = "REBOOTR_FIRST_REBOOT", default_value_t = FirstRebootPolicy::RouterUnreachable)]
    pub first_reboot: FirstRebootPolicy,

    /// Fail checks at random to exercise the reboot ladder
    #[arg(long, env = "REBOOTR_PRODUCE_RANDOM_FAILURES")]
    pub produce_random_failures: bool,

    /// A check fails once every ODDS + 1 times on average
    #[arg(long, env = "REBOOTR_FAILURE_ODDS", value_name = "ODDS", default_value_t = DEFAULT_FAILURE_ODDS)]
    pub failure_odds: u32,

    /// Seed for reproducible random failures
    #[arg(long, env = "REBOOTR_SEED")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub retry: RetryArgs,

    #[command(flatten)]
    pub transport: TransportArgs,

    #[command(flatten)]
    pub dns: DnsArgs,
}

impl CheckArgs {
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig::new(self.router_ip, self.router_plug_ip, self.modem_plug_ip)
            .with_post_reboot_delay(Duration::from_secs(self.post_reboot_delay))
            .with_power_toggle_delay(Duration::from_secs(self.power_toggle_delay))
            .with_random_failures(self.produce_random_failures, self.failure_odds)
            .with_retry(self.retry.policy())
            .with_first_reboot(self.first_reboot)
    }
}

#[derive(Args)]
pub struct ProbeArgs {
    /// Also ping the router
    #[arg(long, env = "REBOOTR_ROUTER_IP")]
    pub router_ip: Option<IpAddr>,

    #[command(flatten)]
    pub retry: RetryArgs,

    #[command(flatten)]
    pub dns: DnsArgs,
}

#[derive(Args)]
pub struct RetryArgs {
    /// Extra passes over the target lists before a check fails
    #[arg(long, env = "REBOOTR_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    pub retries: u32,

    /// Seconds between passes
    #[arg(long, env = "REBOOTR_RETRY_DELAY", value_name = "SECS", default_value_t = 10)]
    pub retry_delay: u64,
}

impl RetryArgs {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, Duration::from_secs(self.retry_delay))
    }
}

#[derive(Args)]
pub struct TransportArgs {
    /// How outlet commands are delivered
    #[arg(long, env = "REBOOTR_TRANSPORT", value_enum, default_value_t = Transport::Native)]
    pub transport: Transport,

    /// TCP port of the outlets (native transport)
    #[arg(long, env = "REBOOTR_OUTLET_PORT", default_value_t = KASA_PORT)]
    pub outlet_port: u16,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Transport {
    /// Speak the TP-Link Kasa protocol directly
    Native,
    /// Shell out to `tplink-smarthome-api`
    Cli,
}

impl TransportArgs {
    pub fn power_control(&self) -> Box<dyn PowerControl> {
        match self.transport {
            Transport::Native => Box::new(KasaPowerControl::new(self.outlet_port, OUTLET_TIMEOUT)),
            Transport::Cli => Box::new(SmarthomeCli::default()),
        }
    }
}

#[derive(Args)]
pub struct DnsArgs {
    /// Resolver to query instead of the one in /etc/resolv.conf
    #[arg(long, env = "REBOOTR_DNS_SERVER")]
    pub dns_server: Option<IpAddr>,
}

impl DnsArgs {
    pub fn resolver(&self) -> UdpResolver {
        match self.dns_server {
            Some(server) => UdpResolver::from_ip(server),
            None => UdpResolver::from_system(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PowerCommand {
    On,
    Off,
    /// Off, wait, on
    Cycle,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    A,
    Mx,
    Ns,
}

impl From<RecordKind> for RecordType {
    fn from(kind: RecordKind) -> Self {
        match kind {
            RecordKind::A => RecordType::A,
            RecordKind::Mx => RecordType::Mx,
            RecordKind::Ns => RecordType::Ns,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
