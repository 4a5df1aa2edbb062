use rebootr_common::config::RetryPolicy;
use rebootr_common::network::target::ProbeTargets;
use rebootr_core::Verdict;
use rebootr_core::probe::{NameResolutionProbe, ReachabilityProbe};
use rebootr_core::retry::RetryingCheck;
use rebootr_core::system::ping::SystemPinger;

use crate::commands::ProbeArgs;
use crate::terminal::spinner::CountdownSleeper;
use crate::terminal::{format, print};

/// Runs the individual checks and reports each one. Never switches an outlet.
pub fn probe(args: ProbeArgs, quiet: bool) -> anyhow::Result<Verdict> {
    let targets = ProbeTargets::default();
    let policy: RetryPolicy = args.retry.policy();
    let pinger = SystemPinger::default();
    let resolver = args.dns.resolver();
    let sleeper = CountdownSleeper::new(quiet);
    let retrying = RetryingCheck::new(policy, &sleeper);

    print::header("probing", quiet);

    let reachability = ReachabilityProbe::new(&pinger);
    let hosts_ok: bool = retrying.run(&targets.internet_hosts, |host| reachability.probe(host))?;

    let resolution = NameResolutionProbe::new(&resolver);
    let dns_ok: bool = retrying.run(&targets.domains, |host| resolution.probe(host))?;

    let router_ok: Option<bool> = args
        .router_ip
        .map(|router| reachability.probe(&router))
        .transpose()?;

    print::align_keys(&["Internet hosts", "DNS", "Router"]);
    print::aligned_line("Internet hosts", format::yes_no(hosts_ok));
    print::aligned_line(
        "DNS",
        format!("{} (via {})", format::yes_no(dns_ok), resolver.server()),
    );
    if let (Some(router), Some(ok)) = (args.router_ip, router_ok) {
        print::aligned_line("Router", format!("{} ({})", format::yes_no(ok), format::address(&router)));
    }

    let verdict: Verdict = if hosts_ok && dns_ok {
        Verdict::Up
    } else {
        Verdict::Down
    };
    print::verdict(verdict);
    Ok(verdict)
}
