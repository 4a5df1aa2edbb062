use rebootr_common::capability::{RecordResolver, RecordType};
use tracing::warn;

use crate::commands::{DnsArgs, RecordKind};
use crate::terminal::{format, print};

pub fn lookup(host: &str, record: RecordKind, dns: &DnsArgs) -> anyhow::Result<bool> {
    let kind: RecordType = record.into();
    let resolver = dns.resolver();
    let found: bool = resolver.has_records(host, kind)?;

    print::align_keys(&["Resolver", "Host", "Found"]);
    print::aligned_line("Resolver", resolver.server().to_string());
    print::aligned_line("Host", format!("{host} ({kind})"));
    print::aligned_line("Found", format::yes_no(found));

    if !found {
        warn!("{host} has no {kind} records");
    }
    Ok(found)
}
