use super::domain::DomainId;
use super::enums::{AutoPtrPolicy, RecordType};
use super::template::RecordTemplateId;
use std::fmt;

/// Identifier of a stored record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One resource record row.
///
/// `name` is the fully qualified owner name, not relative to the domain,
/// and must not end in a dot (the DNS server treats the whole zone as
/// invalid otherwise). `ordername`, `change_date` and `number` are derived
/// on every save; values supplied by callers are overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub domain: DomainId,
    pub name: String,
    pub rtype: RecordType,
    pub content: String,
    pub ttl: Option<u32>,
    /// Priority, for MX and SRV records.
    pub prio: Option<u32>,
    /// Set for data this zone is itself authoritative for; unset for
    /// delegation NS records and their glue.
    pub auth: bool,
    pub disabled: bool,
    /// DNSSEC ordering field, derived from the zone's crypto and
    /// metadata state on every save.
    pub ordername: Option<String>,
    /// Epoch seconds of the last save, watched by the DNS server for
    /// serial updates and slave notification.
    pub change_date: Option<u32>,
    /// The IPv4 address as an integer, derived for A records only.
    /// Backs indexed range queries over address space.
    pub number: Option<u32>,
    /// Back-reference to the record template that generated this record.
    pub template: Option<RecordTemplateId>,
    /// Marks this record as maintained automatically for another record,
    /// e.g. a synthesized PTR for its source A record. Non-owning; the
    /// deletion path decides what happens to dependents.
    pub depends_on: Option<RecordId>,
    pub auto_ptr: AutoPtrPolicy,
}

impl Record {
    pub fn new(
        domain: DomainId,
        rtype: RecordType,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            domain,
            name: name.into(),
            rtype,
            content: content.into(),
            ttl: Some(3600),
            prio: None,
            auth: true,
            disabled: false,
            ordername: None,
            change_date: None,
            number: None,
            template: None,
            depends_on: None,
            auto_ptr: AutoPtrPolicy::default(),
        }
    }

    pub fn with_auto_ptr(mut self, policy: AutoPtrPolicy) -> Self {
        self.auto_ptr = policy;
        self
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_prio(mut self, prio: u32) -> Self {
        self.prio = Some(prio);
        self
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prio {
            Some(prio) => write!(f, "{} IN {} {} {}", self.name, self.rtype, prio, self.content),
            None => write!(f, "{} IN {} {}", self.name, self.rtype, self.content),
        }
    }
}
