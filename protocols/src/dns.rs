use dns_parser::{Class, Packet, RData};
use pnet::packet::dns::{DnsClass, DnsQuery, DnsType, MutableDnsPacket, Opcode, Retcode};
use thiserror::Error;

use rebootr_common::capability::RecordType;

pub const DNS_HDR_LEN: usize = 12;
pub const DNS_PORT: u16 = 53;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 253;
const CLASS_IN: u16 = 1;
const QR_FLAG: u8 = 0x80;
const RCODE_MASK: u8 = 0x0f;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DnsError {
    #[error("invalid domain name `{0}`")]
    InvalidName(String),
    #[error("buffer too small for a DNS header")]
    Truncated,
    #[error("malformed DNS reply: {0}")]
    Malformed(String),
}

/// What a resolver said about one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer {
    pub id: u16,
    pub is_response: bool,
    /// The server answered with `NOERROR`.
    pub no_error: bool,
    /// Answer records of the requested type and class `IN`.
    pub records: usize,
}

impl Answer {
    pub fn has_records(&self) -> bool {
        self.is_response && self.no_error && self.records > 0
    }
}

pub fn record_code(kind: RecordType) -> u16 {
    match kind {
        RecordType::A => 1,
        RecordType::Ns => 2,
        RecordType::Mx => 15,
    }
}

/// Builds a recursive standard query for `host`.
pub fn create_query_packet(host: &str, kind: RecordType, id: u16) -> Result<Vec<u8>, DnsError> {
    let query: DnsQuery = create_query(host, kind)?;
    let q_fixed_len: usize = 4;
    let qlen: usize = query.qname.len() + q_fixed_len;
    let total: usize = DNS_HDR_LEN + qlen;
    let mut buffer: Vec<u8> = vec![0u8; total];

    {
        let mut dns: MutableDnsPacket =
            MutableDnsPacket::new(&mut buffer).ok_or(DnsError::Truncated)?;
        dns.set_id(id);
        dns.set_is_response(0);
        dns.set_opcode(Opcode::StandardQuery);
        dns.set_is_authoriative(0);
        dns.set_is_truncated(0);
        dns.set_is_recursion_desirable(1);
        dns.set_is_recursion_available(0);
        dns.set_zero_reserved(0);
        dns.set_is_non_authenticated_data(0);
        dns.set_rcode(Retcode::NoError);
        dns.set_query_count(1);
        dns.set_response_count(0);
        dns.set_authority_rr_count(0);
        dns.set_additional_rr_count(0);
    }

    let mut cursor: usize = DNS_HDR_LEN;

    buffer[cursor..cursor + query.qname.len()].copy_from_slice(&query.qname);
    cursor += query.qname.len();

    let type_bytes: [u8; 2] = query.qtype.0.to_be_bytes();
    buffer[cursor..cursor + 2].copy_from_slice(&type_bytes);
    cursor += 2;

    let class_bytes: [u8; 2] = query.qclass.0.to_be_bytes();
    buffer[cursor..cursor + 2].copy_from_slice(&class_bytes);

    Ok(buffer)
}

/// Reads the header and counts matching answer records of a reply.
///
/// The header is read by hand so that any non-zero rcode, including the
/// ones past `REFUSED`, is a plain "no records". Only `NOERROR` replies have
/// their answer section parsed; CNAME chains are skipped over, so an A record
/// behind an alias still counts.
pub fn inspect_answer(payload: &[u8], kind: RecordType) -> Result<Answer, DnsError> {
    if payload.len() < DNS_HDR_LEN {
        return Err(DnsError::Truncated);
    }
    let id: u16 = u16::from_be_bytes([payload[0], payload[1]]);
    let is_response: bool = payload[2] & QR_FLAG != 0;
    let no_error: bool = payload[3] & RCODE_MASK == 0;

    if !no_error {
        return Ok(Answer {
            id,
            is_response,
            no_error,
            records: 0,
        });
    }

    let packet: Packet<'_> =
        Packet::parse(payload).map_err(|e| DnsError::Malformed(e.to_string()))?;
    let records: usize = packet
        .answers
        .iter()
        .filter(|record| record.cls == Class::IN && is_kind(&record.data, kind))
        .count();

    Ok(Answer {
        id,
        is_response,
        no_error,
        records,
    })
}

fn is_kind(data: &RData<'_>, kind: RecordType) -> bool {
    matches!(
        (kind, data),
        (RecordType::A, RData::A(_)) | (RecordType::Mx, RData::MX(_)) | (RecordType::Ns, RData::NS(_))
    )
}

fn create_query(host: &str, kind: RecordType) -> Result<DnsQuery, DnsError> {
    let qname: Vec<u8> = encode_dns_name(host)?;
    Ok(DnsQuery {
        qname,
        qtype: DnsType(record_code(kind)),
        qclass: DnsClass(CLASS_IN),
        payload: Vec::new(),
    })
}

fn encode_dns_name(name: &str) -> Result<Vec<u8>, DnsError> {
    let trimmed: &str = name.trim_end_matches('.');
    if trimmed.is_empty() || trimmed.len() > MAX_NAME_LEN {
        return Err(DnsError::InvalidName(name.to_string()));
    }

    let mut encoded: Vec<u8> = Vec::with_capacity(trimmed.len() + 2);
    for label in trimmed.split('.') {
        if label.is_empty() || label.len() > MAX_LABEL_LEN || !label.is_ascii() {
            return Err(DnsError::InvalidName(name.to_string()));
        }
        encoded.push(label.len() as u8);
        encoded.extend_from_slice(label.as_bytes());
    }
    encoded.push(0);
    Ok(encoded)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
