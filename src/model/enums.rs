use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource record types the zone store accepts.
///
/// This is the closed set the backing DNS server is provisioned with:
/// the basic types, the DNSSEC types that appear in signed zones, and a
/// handful of auxiliary types.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    #[default]
    A,
    Aaaa,
    Afsdb,
    Cert,
    Cname,
    Dnskey,
    Ds,
    Hinfo,
    Key,
    Loc,
    Mx,
    Naptr,
    Ns,
    Nsec,
    Ptr,
    Rp,
    Rrsig,
    Soa,
    Spf,
    Srv,
    Sshfp,
    Txt,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Afsdb => "AFSDB",
            RecordType::Cert => "CERT",
            RecordType::Cname => "CNAME",
            RecordType::Dnskey => "DNSKEY",
            RecordType::Ds => "DS",
            RecordType::Hinfo => "HINFO",
            RecordType::Key => "KEY",
            RecordType::Loc => "LOC",
            RecordType::Mx => "MX",
            RecordType::Naptr => "NAPTR",
            RecordType::Ns => "NS",
            RecordType::Nsec => "NSEC",
            RecordType::Ptr => "PTR",
            RecordType::Rp => "RP",
            RecordType::Rrsig => "RRSIG",
            RecordType::Soa => "SOA",
            RecordType::Spf => "SPF",
            RecordType::Srv => "SRV",
            RecordType::Sshfp => "SSHFP",
            RecordType::Txt => "TXT",
        }
    }

    /// Whether the content field of this type holds a domain name.
    pub fn content_is_domain_name(&self) -> bool {
        matches!(
            self,
            RecordType::Cname
                | RecordType::Mx
                | RecordType::Naptr
                | RecordType::Ns
                | RecordType::Ptr
        )
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let all = [
            RecordType::A,
            RecordType::Aaaa,
            RecordType::Afsdb,
            RecordType::Cert,
            RecordType::Cname,
            RecordType::Dnskey,
            RecordType::Ds,
            RecordType::Hinfo,
            RecordType::Key,
            RecordType::Loc,
            RecordType::Mx,
            RecordType::Naptr,
            RecordType::Ns,
            RecordType::Nsec,
            RecordType::Ptr,
            RecordType::Rp,
            RecordType::Rrsig,
            RecordType::Soa,
            RecordType::Spf,
            RecordType::Srv,
            RecordType::Sshfp,
            RecordType::Txt,
        ];
        all.into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown record type: {}", s))
    }
}

/// Zone replication role.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainKind {
    Master,
    Native,
    Slave,
}

impl DomainKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainKind::Master => "MASTER",
            DomainKind::Native => "NATIVE",
            DomainKind::Slave => "SLAVE",
        }
    }
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MASTER" => Ok(DomainKind::Master),
            "NATIVE" => Ok(DomainKind::Native),
            "SLAVE" => Ok(DomainKind::Slave),
            _ => Err(format!("unknown domain type: {}", s)),
        }
    }
}

/// Policy controlling reverse (PTR) record synthesis for A records.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoPtrPolicy {
    /// Never synthesize a PTR record.
    Never,
    /// Synthesize a PTR record, creating the reverse domain if needed.
    #[default]
    Always,
    /// Synthesize a PTR record only when the reverse domain already exists.
    OnlyIfDomain,
}
