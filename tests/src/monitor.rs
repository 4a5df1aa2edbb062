#![cfg(test)]
use std::net::IpAddr;
use std::time::Duration;

use rebootr_common::Error;
use rebootr_common::capability::{Pause, RecordType};
use rebootr_common::config::{ConfigError, FirstRebootPolicy, MonitorConfig, RetryPolicy};
use rebootr_common::network::device::{Device, PowerAction};
use rebootr_common::network::target::ProbeTargets;
use rebootr_core::probe::ReachabilityProbe;
use rebootr_core::retry::RetryingCheck;
use rebootr_core::{ConnectivityMonitor, MonitorState, Outcome, Verdict};

use crate::support::{
    DOMAIN, Event, FakeNetwork, INTERNET_HOST, MODEM_PLUG, ROUTER, ROUTER_PLUG, config,
};

fn run(net: &FakeNetwork, config: MonitorConfig) -> rebootr_common::Result<Outcome> {
    ConnectivityMonitor::new(config, net, net, net, net)?.run()
}

fn cycle(outlet: IpAddr) -> [(IpAddr, PowerAction); 2] {
    [(outlet, PowerAction::Off), (outlet, PowerAction::On)]
}

/*************************************************************
                       Escalation ladder
**************************************************************/

#[test]
fn healthy_network_is_up_without_reboots() {
    let net = FakeNetwork::healthy();

    let outcome: Outcome = run(&net, config()).unwrap();

    assert!(outcome.verdict.is_up());
    assert_eq!(outcome.states, vec![MonitorState::Checking, MonitorState::Up]);
    assert!(outcome.reboots.is_empty());
    assert_eq!(
        net.events(),
        vec![
            Event::Ping(INTERNET_HOST),
            Event::Lookup(DOMAIN.to_string(), RecordType::A),
        ]
    );
}

#[test]
fn router_reboot_restores_connectivity() {
    let net = FakeNetwork::offline()
        .with_router_down()
        .cured_by(ROUTER_PLUG, 1);

    let outcome: Outcome = run(&net, config()).unwrap();

    assert_eq!(outcome.verdict, Verdict::Up);
    assert_eq!(
        outcome.states,
        vec![
            MonitorState::Checking,
            MonitorState::RouterDownRebooting,
            MonitorState::Up
        ]
    );
    assert_eq!(outcome.reboots, vec![Device::Router]);
    assert_eq!(net.power_events(), cycle(ROUTER_PLUG).to_vec());
}

#[test]
fn reachable_router_goes_straight_to_modem_then_gives_up() {
    let net = FakeNetwork::offline();

    let outcome: Outcome = run(&net, config()).unwrap();

    assert!(!outcome.verdict.is_up());
    assert_eq!(
        outcome.states,
        vec![
            MonitorState::Checking,
            MonitorState::ModemRebooting,
            MonitorState::RouterRebootingFinal,
            MonitorState::Down
        ]
    );
    assert_eq!(outcome.reboots, vec![Device::Modem, Device::Router]);
    assert_eq!(
        net.power_events(),
        [cycle(MODEM_PLUG), cycle(ROUTER_PLUG)].concat()
    );
    assert_eq!(net.pings(ROUTER), 1);
}

#[test]
fn modem_reboot_restores_connectivity() {
    let net = FakeNetwork::offline().cured_by(MODEM_PLUG, 1);

    let outcome: Outcome = run(&net, config()).unwrap();

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
}

#[test]
fn final_router_reboot_decides_the_verdict() {
    let net = FakeNetwork::offline()
        .with_router_down()
        .cured_by(ROUTER_PLUG, 2);

    let outcome: Outcome = run(&net, config()).unwrap();

    assert_eq!(outcome.verdict, Verdict::Up);
    assert_eq!(
        outcome.reboots,
        vec![Device::Router, Device::Modem, Device::Router]
    );
    assert_eq!(outcome.states.last(), Some(&MonitorState::Up));
}

#[test]
fn never_more_than_three_reboots() {
    let net = FakeNetwork::offline().with_router_down();

    let outcome: Outcome = run(&net, config()).unwrap();

    assert_eq!(outcome.verdict, Verdict::Down);
    assert_eq!(
        outcome.states,
        vec![
            MonitorState::Checking,
            MonitorState::RouterDownRebooting,
            MonitorState::ModemRebooting,
            MonitorState::RouterRebootingFinal,
            MonitorState::Down
        ]
    );
    assert_eq!(outcome.reboots.len(), 3);
    assert_eq!(net.power_events().len(), 6);
}

#[test]
fn broken_dns_alone_triggers_escalation() {
    let net = FakeNetwork::dns_broken();

    let outcome: Outcome = run(&net, config()).unwrap();

    assert_eq!(outcome.verdict, Verdict::Down);
    assert_eq!(outcome.reboots, vec![Device::Modem, Device::Router]);
}

#[test]
fn each_reboot_toggles_then_waits_for_recovery() {
    let cfg = config()
        .with_power_toggle_delay(Duration::from_secs(2))
        .with_post_reboot_delay(Duration::from_secs(90));
    let net = FakeNetwork::offline().cured_by(MODEM_PLUG, 1);

    run(&net, cfg).unwrap();

    assert_eq!(
        net.events(),
        vec![
            Event::Ping(INTERNET_HOST),
            Event::Ping(ROUTER),
            Event::Power(MODEM_PLUG, PowerAction::Off),
            Event::Pause(Pause::PowerToggle { outlet: MODEM_PLUG }, Duration::from_secs(2)),
            Event::Power(MODEM_PLUG, PowerAction::On),
            Event::Pause(Pause::Recovery { device: Device::Modem }, Duration::from_secs(90)),
            Event::Ping(INTERNET_HOST),
            Event::Lookup(DOMAIN.to_string(), RecordType::A),
        ]
    );
}

#[test]
fn shared_outlet_is_cycled_for_both_devices() {
    let cfg = MonitorConfig::new(ROUTER, ROUTER_PLUG, ROUTER_PLUG)
        .with_retry(RetryPolicy::single_attempt())
        .with_targets(config().targets);
    let net = FakeNetwork::offline();

    let outcome: Outcome = run(&net, cfg).unwrap();

    assert_eq!(outcome.reboots, vec![Device::Modem, Device::Router]);
    assert_eq!(
        net.power_events(),
        [cycle(ROUTER_PLUG), cycle(ROUTER_PLUG)].concat()
    );
}

#[test]
fn is_internet_up_reports_the_verdict() {
    let net = FakeNetwork::healthy();
    let monitor = ConnectivityMonitor::new(config(), &net, &net, &net, &net).unwrap();
    assert_eq!(monitor.config(), &config());
    assert_eq!(monitor.is_internet_up().unwrap(), Verdict::Up);
}

/*************************************************************
                       First reboot policy
**************************************************************/

#[test]
fn always_policy_reboots_router_first_without_pinging_it() {
    let net = FakeNetwork::offline();
    let cfg = config().with_first_reboot(FirstRebootPolicy::Always);

    let outcome: Outcome = run(&net, cfg).unwrap();

    assert_eq!(
        outcome.reboots,
        vec![Device::Router, Device::Modem, Device::Router]
    );
    assert_eq!(net.pings(ROUTER), 0);
}

#[test]
fn never_policy_skips_router_first_even_when_unreachable() {
    let net = FakeNetwork::offline().with_router_down();
    let cfg = config().with_first_reboot(FirstRebootPolicy::Never);

    let outcome: Outcome = run(&net, cfg).unwrap();

    assert_eq!(outcome.reboots, vec![Device::Modem, Device::Router]);
    assert_eq!(net.pings(ROUTER), 0);
}

/*************************************************************
                       Retries
**************************************************************/

#[test]
fn check_rescans_all_hosts_per_attempt() {
    let other_host: IpAddr = "198.51.100.3".parse().unwrap();
    let cfg = config()
        .with_retry(RetryPolicy::new(2, Duration::from_secs(10)))
        .with_targets(ProbeTargets::new(
            vec![INTERNET_HOST, other_host],
            vec![DOMAIN.to_string()],
        ));
    let net = FakeNetwork::offline();
    let monitor = ConnectivityMonitor::new(cfg, &net, &net, &net, &net).unwrap();

    assert!(!monitor.check_connectivity().unwrap());

    assert_eq!(net.pings(INTERNET_HOST), 3);
    assert_eq!(net.pings(other_host), 3);
    assert_eq!(
        net.pauses(),
        vec![Pause::Retry { attempt: 1 }, Pause::Retry { attempt: 2 }]
    );
    // dns is not consulted once the hosts have failed
    assert!(!net.events().iter().any(|e| matches!(e, Event::Lookup(..))));
}

#[test]
fn zero_retries_scan_once_without_pausing() {
    let net = FakeNetwork::offline();
    let probe = ReachabilityProbe::new(&net);
    let check = RetryingCheck::new(RetryPolicy::new(0, Duration::from_secs(10)), &net);

    assert!(!check.run(&[INTERNET_HOST], |host| probe.probe(host)).unwrap());

    assert_eq!(net.pings(INTERNET_HOST), 1);
    assert!(net.pauses().is_empty());
}

/*************************************************************
                       Aborted runs
**************************************************************/

#[test]
fn dispatch_failure_aborts_the_run() {
    let net = FakeNetwork::offline().with_broken_outlet(MODEM_PLUG);

    let result = run(&net, config());

    assert!(matches!(
        result,
        Err(Error::PowerControlDispatch {
            outlet,
            action: PowerAction::Off,
            ..
        }) if outlet == MODEM_PLUG
    ));
    assert_eq!(net.power_events(), vec![(MODEM_PLUG, PowerAction::Off)]);
    assert!(
        !net.pauses()
            .iter()
            .any(|p| matches!(p, Pause::Recovery { .. }))
    );
}

#[test]
fn dispatch_failure_on_final_reboot_aborts_the_run() {
    let net = FakeNetwork::offline().with_broken_outlet(ROUTER_PLUG);

    let result = run(&net, config());

    assert!(matches!(
        result,
        Err(Error::PowerControlDispatch { outlet, .. }) if outlet == ROUTER_PLUG
    ));
    assert_eq!(
        net.power_events(),
        [cycle(MODEM_PLUG).to_vec(), vec![(ROUTER_PLUG, PowerAction::Off)]].concat()
    );
}

#[test]
fn unavailable_ping_aborts_before_any_power_command() {
    let net = FakeNetwork::healthy().without_ping();

    let result = run(&net, config());

    assert!(matches!(result, Err(Error::ProbeUnavailable { probe: "ping", .. })));
    assert!(net.power_events().is_empty());
}

#[test]
fn empty_host_list_is_rejected() {
    let net = FakeNetwork::healthy();
    let cfg = config().with_targets(ProbeTargets::new(vec![], vec![DOMAIN.to_string()]));

    let result = ConnectivityMonitor::new(cfg, &net, &net, &net, &net);

    assert!(matches!(
        result,
        Err(Error::InvalidConfig(ConfigError::NoInternetHosts))
    ));
}

#[test]
fn empty_domain_list_is_rejected() {
    let net = FakeNetwork::healthy();
    let cfg = config().with_targets(ProbeTargets::new(vec![INTERNET_HOST], vec![]));

    let result = ConnectivityMonitor::new(cfg, &net, &net, &net, &net);

    assert!(matches!(result, Err(Error::InvalidConfig(ConfigError::NoDomains))));
}
