#![cfg(test)]
use rebootr_common::Error;
use rebootr_common::config::{ConfigError, DEFAULT_FAILURE_ODDS, MonitorConfig};
use rebootr_common::network::device::Device;
use rebootr_core::failure::{FailureInjector, GatedCheck, RandomFailures};
use rebootr_core::{ConnectivityMonitor, MonitorState, Outcome, Verdict};

use crate::support::{AlwaysUnlucky, FakeNetwork, INTERNET_HOST, ROUTER, ScriptedFailures, config};

const TRIALS: u32 = 110_000;

fn failing_config() -> MonitorConfig {
    config().with_random_failures(true, DEFAULT_FAILURE_ODDS)
}

/*************************************************************
                       Random odds
**************************************************************/

#[test]
fn random_failures_hit_one_in_odds_plus_one() {
    let injector = RandomFailures::seeded(DEFAULT_FAILURE_ODDS, 0x5EED);

    for check in [
        GatedCheck::InternetReachable,
        GatedCheck::RouterReachable,
        GatedCheck::DnsResolves,
    ] {
        let hits: u32 = (0..TRIALS).filter(|_| injector.out_of_luck(check)).count() as u32;
        // expected 10_000, standard deviation ~95
        assert!(
            (9_500..=10_500).contains(&hits),
            "{check}: {hits} failures in {TRIALS} draws"
        );
    }
}

#[test]
fn router_check_short_circuits_at_the_configured_rate() {
    let net = FakeNetwork::healthy();
    let monitor = ConnectivityMonitor::new(failing_config(), &net, &net, &net, &net)
        .unwrap()
        .with_failure_injector(RandomFailures::seeded(DEFAULT_FAILURE_ODDS, 42));

    let failures: u32 = (0..TRIALS)
        .filter(|_| !monitor.router_reachable().unwrap())
        .count() as u32;

    assert!((9_500..=10_500).contains(&failures), "{failures} failures");
    // short-circuited checks never reach the pinger
    assert_eq!(net.pings(ROUTER) as u32, TRIALS - failures);
}

#[test]
fn same_seed_same_run() {
    let run = |seed: u64| -> Outcome {
        let net = FakeNetwork::healthy();
        let monitor =
            ConnectivityMonitor::new(config().with_random_failures(true, 2), &net, &net, &net, &net)
                .unwrap()
                .with_failure_injector(RandomFailures::seeded(2, seed));
        monitor.run().unwrap()
    };

    assert_eq!(run(7), run(7));
}

#[test]
fn zero_odds_are_rejected() {
    let net = FakeNetwork::healthy();
    let result = ConnectivityMonitor::new(config().with_random_failures(true, 0), &net, &net, &net, &net);
    assert!(matches!(
        result,
        Err(Error::InvalidConfig(ConfigError::ZeroFailureOdds))
    ));
}

/*************************************************************
                       Scripted failures
**************************************************************/

#[test]
fn injected_outage_walks_the_ladder_on_a_healthy_network() {
    let net = FakeNetwork::healthy();
    let monitor = ConnectivityMonitor::new(failing_config(), &net, &net, &net, &net)
        .unwrap()
        .with_failure_injector(ScriptedFailures::default().fail(GatedCheck::InternetReachable, 1));

    let outcome: Outcome = monitor.run().unwrap();

    assert_eq!(outcome.verdict, Verdict::Up);
    assert_eq!(
        outcome.states,
        vec![
            MonitorState::Checking,
            MonitorState::ModemRebooting,
            MonitorState::Up
        ]
    );
    assert_eq!(outcome.reboots, vec![Device::Modem]);
    // the failed pass never pinged; the re-check after the reboot did
    assert_eq!(net.pings(INTERNET_HOST), 1);
}

#[test]
fn injected_router_failure_reboots_router_first() {
    let net = FakeNetwork::healthy();
    let injector = ScriptedFailures::default()
        .fail(GatedCheck::InternetReachable, 1)
        .fail(GatedCheck::RouterReachable, 1);
    let monitor = ConnectivityMonitor::new(failing_config(), &net, &net, &net, &net)
        .unwrap()
        .with_failure_injector(injector);

    let outcome: Outcome = monitor.run().unwrap();

    assert_eq!(
        outcome.states,
        vec![
            MonitorState::Checking,
            MonitorState::RouterDownRebooting,
            MonitorState::Up
        ]
    );
    assert_eq!(outcome.reboots, vec![Device::Router]);
}

#[test]
fn injected_dns_failure_counts_as_an_outage() {
    let net = FakeNetwork::healthy();
    let monitor = ConnectivityMonitor::new(failing_config(), &net, &net, &net, &net)
        .unwrap()
        .with_failure_injector(ScriptedFailures::default().fail(GatedCheck::DnsResolves, 2));

    let outcome: Outcome = monitor.run().unwrap();

    assert_eq!(outcome.verdict, Verdict::Up);
    assert_eq!(outcome.reboots, vec![Device::Modem, Device::Router]);
}

#[test]
fn relentless_failures_end_down_without_probing() {
    let net = FakeNetwork::healthy();
    let monitor = ConnectivityMonitor::new(failing_config(), &net, &net, &net, &net)
        .unwrap()
        .with_failure_injector(AlwaysUnlucky);

    let outcome: Outcome = monitor.run().unwrap();

    assert_eq!(outcome.verdict, Verdict::Down);
    assert_eq!(
        outcome.reboots,
        vec![Device::Router, Device::Modem, Device::Router]
    );
    assert_eq!(net.pings(INTERNET_HOST), 0);
    assert_eq!(net.pings(ROUTER), 0);
}

#[test]
fn injector_is_ignored_unless_enabled() {
    let net = FakeNetwork::healthy();
    let monitor = ConnectivityMonitor::new(config(), &net, &net, &net, &net)
        .unwrap()
        .with_failure_injector(AlwaysUnlucky);

    let outcome: Outcome = monitor.run().unwrap();

    assert_eq!(outcome.verdict, Verdict::Up);
    assert!(outcome.reboots.is_empty());
}
