use std::time::Instant;

use anyhow::Context;
use rebootr_common::capability::PowerControl;
use rebootr_common::config::MonitorConfig;
use rebootr_core::failure::RandomFailures;
use rebootr_core::system::ping::SystemPinger;
use rebootr_core::{ConnectivityMonitor, Outcome, Verdict};

use crate::commands::CheckArgs;
use crate::terminal::spinner::CountdownSleeper;
use crate::terminal::{format, print};

pub fn check(args: CheckArgs, quiet: bool) -> anyhow::Result<Verdict> {
    let power: Box<dyn PowerControl> = args.transport.power_control();
    power.ensure_available()?;

    let config: MonitorConfig = args.monitor_config();
    let resolver = args.dns.resolver();
    let mut monitor = ConnectivityMonitor::new(
        config,
        SystemPinger::default(),
        resolver,
        power.as_ref(),
        CountdownSleeper::new(quiet),
    )
    .context("refusing to start")?;

    if !quiet {
        print_config(monitor.config());
    }

    if let Some(seed) = args.seed
        && args.produce_random_failures
    {
        monitor = monitor.with_failure_injector(RandomFailures::seeded(args.failure_odds, seed));
    }

    print::header("checking connectivity", quiet);
    let started: Instant = Instant::now();
    let outcome: Outcome = monitor.run()?;

    if !quiet {
        print::header("summary", quiet);
        print::align_keys(&["States", "Reboots", "Elapsed"]);
        print::aligned_line("States", format::state_trail(&outcome.states));
        print::aligned_line("Reboots", format::reboot_list(&outcome.reboots));
        print::aligned_line("Elapsed", format::elapsed(started.elapsed()));
    }
    print::verdict(outcome.verdict);

    Ok(outcome.verdict)
}

fn print_config(config: &MonitorConfig) {
    print::header("configuration", false);
    print::align_keys(&["Router", "Router outlet", "Modem outlet", "Reboot delay", "First reboot"]);
    print::aligned_line("Router", format::address(&config.router_ip));
    print::aligned_line("Router outlet", format::address(&config.router_plug_ip));
    print::aligned_line("Modem outlet", format::address(&config.modem_plug_ip));
    print::aligned_line("Reboot delay", format::seconds(config.post_reboot_delay));
    print::aligned_line("First reboot", config.first_reboot.to_string());
    if config.produce_random_failures {
        print::print_status(format!(
            "Random failures enabled, 1 in {} checks fails",
            config.failure_odds + 1
        ));
    }
}
