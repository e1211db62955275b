//! In-memory relational store for zone data.
//!
//! Each entity lives in its own id-keyed table, mirroring the column
//! layout the DNS server reads (`domains`, `records`, `domaintemplates`,
//! `recordtemplates`, `domainmetadata`, `domainmetadatatemplates`,
//! `cryptokeys`). Uniqueness constraints are enforced on insert and
//! update. Multi-row operations run through [`ZoneStore::transaction`],
//! which rolls the tables back wholesale if any step fails, so callers
//! observe them as all-or-nothing.

use crate::error::{Result, ZoneForgeError};
use crate::model::{
    CryptoKey, CryptoKeyId, Domain, DomainId, DomainMetadata, DomainMetadataId,
    DomainMetadataTemplate, DomainTemplate, DomainTemplateId, MetadataTemplateId, Record, RecordId,
    RecordTemplate, RecordTemplateId, RecordType,
};
use parking_lot::RwLock;
use std::collections::HashMap;

/// The table set. Obtained through [`ZoneStore::read`] or
/// [`ZoneStore::transaction`].
#[derive(Debug, Default, Clone)]
pub struct Tables {
    last_id: u64,
    domains: HashMap<u64, Domain>,
    records: HashMap<u64, Record>,
    domain_templates: HashMap<u64, DomainTemplate>,
    record_templates: HashMap<u64, RecordTemplate>,
    metadata: HashMap<u64, DomainMetadata>,
    metadata_templates: HashMap<u64, DomainMetadataTemplate>,
    crypto_keys: HashMap<u64, CryptoKey>,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    // --- domains ---

    pub fn insert_domain(&mut self, domain: Domain) -> Result<DomainId> {
        self.check_domain_name_free(&domain.name, None)?;
        let id = self.next_id();
        self.domains.insert(id, domain);
        Ok(DomainId(id))
    }

    pub fn update_domain(&mut self, id: DomainId, domain: Domain) -> Result<()> {
        if !self.domains.contains_key(&id.0) {
            return Err(ZoneForgeError::DomainNotFound(domain.name));
        }
        self.check_domain_name_free(&domain.name, Some(id))?;
        self.domains.insert(id.0, domain);
        Ok(())
    }

    fn check_domain_name_free(&self, name: &str, exclude: Option<DomainId>) -> Result<()> {
        let taken = self
            .domains
            .iter()
            .any(|(id, d)| d.name == name && exclude != Some(DomainId(*id)));
        if taken {
            return Err(ZoneForgeError::UniqueViolation {
                entity: "domains",
                key: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn domain(&self, id: DomainId) -> Option<&Domain> {
        self.domains.get(&id.0)
    }

    pub fn domain_by_name(&self, name: &str) -> Option<(DomainId, &Domain)> {
        self.domains
            .iter()
            .find(|(_, d)| d.name == name)
            .map(|(id, d)| (DomainId(*id), d))
    }

    pub fn domains_using_template(&self, template: DomainTemplateId) -> Vec<DomainId> {
        let mut ids: Vec<DomainId> = self
            .domains
            .iter()
            .filter(|(_, d)| d.template == Some(template))
            .map(|(id, _)| DomainId(*id))
            .collect();
        ids.sort();
        ids
    }

    // --- records ---

    pub fn insert_record(&mut self, record: Record) -> Result<RecordId> {
        self.check_record_unique(&record, None)?;
        let id = self.next_id();
        self.records.insert(id, record);
        Ok(RecordId(id))
    }

    pub fn update_record(&mut self, id: RecordId, record: Record) -> Result<()> {
        if !self.records.contains_key(&id.0) {
            return Err(ZoneForgeError::RecordNotFound(id.0));
        }
        self.check_record_unique(&record, Some(id))?;
        self.records.insert(id.0, record);
        Ok(())
    }

    /// Unique `(name, type, content)`, the key the DNS server relies on.
    fn check_record_unique(&self, record: &Record, exclude: Option<RecordId>) -> Result<()> {
        let taken = self.records.iter().any(|(id, r)| {
            r.name == record.name
                && r.rtype == record.rtype
                && r.content == record.content
                && exclude != Some(RecordId(*id))
        });
        if taken {
            return Err(ZoneForgeError::UniqueViolation {
                entity: "records",
                key: format!("{} {} {}", record.name, record.rtype, record.content),
            });
        }
        Ok(())
    }

    pub fn delete_record(&mut self, id: RecordId) -> Option<Record> {
        self.records.remove(&id.0)
    }

    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id.0)
    }

    pub fn find_record(&self, name: &str, rtype: RecordType, content: &str) -> Option<RecordId> {
        self.records
            .iter()
            .find(|(_, r)| r.name == name && r.rtype == rtype && r.content == content)
            .map(|(id, _)| RecordId(*id))
    }

    pub fn records_named(&self, name: &str) -> Vec<(RecordId, Record)> {
        self.collect_records(|r| r.name == name)
    }

    pub fn records_of_domain(&self, domain: DomainId) -> Vec<(RecordId, Record)> {
        self.collect_records(|r| r.domain == domain)
    }

    /// The zone's SOA record, if one exists.
    pub fn soa_of(&self, domain: DomainId) -> Option<(RecordId, Record)> {
        self.collect_records(|r| r.domain == domain && r.rtype == RecordType::Soa)
            .into_iter()
            .next()
    }

    pub fn records_generated_by(&self, template: RecordTemplateId) -> Vec<(RecordId, Record)> {
        self.collect_records(|r| r.template == Some(template))
    }

    /// Records maintained automatically for `source`.
    pub fn dependents_of(&self, source: RecordId) -> Vec<RecordId> {
        self.collect_records(|r| r.depends_on == Some(source))
            .into_iter()
            .map(|(id, _)| id)
            .collect()
    }

    /// A records whose derived address number falls within `lo..=hi`.
    pub fn records_in_number_range(&self, lo: u32, hi: u32) -> Vec<(RecordId, Record)> {
        self.collect_records(|r| r.number.is_some_and(|n| n >= lo && n <= hi))
    }

    fn collect_records(&self, pred: impl Fn(&Record) -> bool) -> Vec<(RecordId, Record)> {
        let mut rows: Vec<(RecordId, Record)> = self
            .records
            .iter()
            .filter(|(_, r)| pred(r))
            .map(|(id, r)| (RecordId(*id), r.clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        rows
    }

    // --- domain templates ---

    pub fn insert_domain_template(&mut self, template: DomainTemplate) -> Result<DomainTemplateId> {
        let taken = self
            .domain_templates
            .values()
            .any(|t| t.name == template.name);
        if taken {
            return Err(ZoneForgeError::UniqueViolation {
                entity: "domaintemplates",
                key: template.name,
            });
        }
        let id = self.next_id();
        self.domain_templates.insert(id, template);
        Ok(DomainTemplateId(id))
    }

    pub fn domain_template(&self, id: DomainTemplateId) -> Option<&DomainTemplate> {
        self.domain_templates.get(&id.0)
    }

    pub fn domain_template_by_name(&self, name: &str) -> Option<(DomainTemplateId, &DomainTemplate)> {
        self.domain_templates
            .iter()
            .find(|(_, t)| t.name == name)
            .map(|(id, t)| (DomainTemplateId(*id), t))
    }

    // --- record templates ---

    pub fn insert_record_template(&mut self, template: RecordTemplate) -> Result<RecordTemplateId> {
        if self.domain_template(template.domain_template).is_none() {
            return Err(ZoneForgeError::TemplateNotFound(template.domain_template.0));
        }
        let id = self.next_id();
        self.record_templates.insert(id, template);
        Ok(RecordTemplateId(id))
    }

    pub fn update_record_template(
        &mut self,
        id: RecordTemplateId,
        template: RecordTemplate,
    ) -> Result<()> {
        if !self.record_templates.contains_key(&id.0) {
            return Err(ZoneForgeError::TemplateNotFound(id.0));
        }
        self.record_templates.insert(id.0, template);
        Ok(())
    }

    pub fn delete_record_template(&mut self, id: RecordTemplateId) -> Option<RecordTemplate> {
        self.record_templates.remove(&id.0)
    }

    pub fn record_template(&self, id: RecordTemplateId) -> Option<&RecordTemplate> {
        self.record_templates.get(&id.0)
    }

    pub fn record_templates_of(
        &self,
        template: DomainTemplateId,
    ) -> Vec<(RecordTemplateId, RecordTemplate)> {
        let mut rows: Vec<(RecordTemplateId, RecordTemplate)> = self
            .record_templates
            .iter()
            .filter(|(_, t)| t.domain_template == template)
            .map(|(id, t)| (RecordTemplateId(*id), t.clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        rows
    }

    // --- domain metadata ---

    pub fn insert_metadata(&mut self, metadata: DomainMetadata) -> DomainMetadataId {
        let id = self.next_id();
        self.metadata.insert(id, metadata);
        DomainMetadataId(id)
    }

    pub fn update_metadata(&mut self, id: DomainMetadataId, metadata: DomainMetadata) -> Result<()> {
        if !self.metadata.contains_key(&id.0) {
            return Err(ZoneForgeError::MetadataNotFound(id.0));
        }
        self.metadata.insert(id.0, metadata);
        Ok(())
    }

    pub fn delete_metadata(&mut self, id: DomainMetadataId) -> Option<DomainMetadata> {
        self.metadata.remove(&id.0)
    }

    pub fn metadata_of_domain(&self, domain: DomainId) -> Vec<(DomainMetadataId, DomainMetadata)> {
        self.collect_metadata(|m| m.domain == domain)
    }

    pub fn metadata_of_kind(
        &self,
        domain: DomainId,
        kind: &str,
    ) -> Vec<(DomainMetadataId, DomainMetadata)> {
        self.collect_metadata(|m| m.domain == domain && m.kind == kind)
    }

    pub fn metadata_generated_by(
        &self,
        template: MetadataTemplateId,
    ) -> Vec<(DomainMetadataId, DomainMetadata)> {
        self.collect_metadata(|m| m.template == Some(template))
    }

    fn collect_metadata(
        &self,
        pred: impl Fn(&DomainMetadata) -> bool,
    ) -> Vec<(DomainMetadataId, DomainMetadata)> {
        let mut rows: Vec<(DomainMetadataId, DomainMetadata)> = self
            .metadata
            .iter()
            .filter(|(_, m)| pred(m))
            .map(|(id, m)| (DomainMetadataId(*id), m.clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        rows
    }

    // --- metadata templates ---

    pub fn insert_metadata_template(
        &mut self,
        template: DomainMetadataTemplate,
    ) -> Result<MetadataTemplateId> {
        if self.domain_template(template.domain_template).is_none() {
            return Err(ZoneForgeError::TemplateNotFound(template.domain_template.0));
        }
        let id = self.next_id();
        self.metadata_templates.insert(id, template);
        Ok(MetadataTemplateId(id))
    }

    pub fn update_metadata_template(
        &mut self,
        id: MetadataTemplateId,
        template: DomainMetadataTemplate,
    ) -> Result<()> {
        if !self.metadata_templates.contains_key(&id.0) {
            return Err(ZoneForgeError::TemplateNotFound(id.0));
        }
        self.metadata_templates.insert(id.0, template);
        Ok(())
    }

    pub fn delete_metadata_template(&mut self, id: MetadataTemplateId) -> Option<DomainMetadataTemplate> {
        self.metadata_templates.remove(&id.0)
    }

    pub fn metadata_template(&self, id: MetadataTemplateId) -> Option<&DomainMetadataTemplate> {
        self.metadata_templates.get(&id.0)
    }

    pub fn metadata_templates_of(
        &self,
        template: DomainTemplateId,
    ) -> Vec<(MetadataTemplateId, DomainMetadataTemplate)> {
        let mut rows: Vec<(MetadataTemplateId, DomainMetadataTemplate)> = self
            .metadata_templates
            .iter()
            .filter(|(_, t)| t.domain_template == template)
            .map(|(id, t)| (MetadataTemplateId(*id), t.clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        rows
    }

    // --- crypto keys ---

    pub fn insert_crypto_key(&mut self, key: CryptoKey) -> CryptoKeyId {
        let id = self.next_id();
        self.crypto_keys.insert(id, key);
        CryptoKeyId(id)
    }

    pub fn delete_crypto_key(&mut self, id: CryptoKeyId) -> Option<CryptoKey> {
        self.crypto_keys.remove(&id.0)
    }

    /// Whether any key row marks `domain` as DNSSEC-enabled.
    pub fn has_crypto_key(&self, domain: DomainId) -> bool {
        self.crypto_keys.values().any(|k| k.domain == Some(domain))
    }
}

/// Shared, lock-guarded zone data store.
pub struct ZoneStore {
    inner: RwLock<Tables>,
}

impl ZoneStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Tables::default()),
        }
    }

    /// Run a read-only closure against the tables.
    pub fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        f(&self.inner.read())
    }

    /// Run a mutating closure against the tables. If the closure fails,
    /// every write it made is rolled back. The write guard is held for
    /// the whole closure, so transactions also serialize with each
    /// other; two template reconciliations of the same domain cannot
    /// interleave.
    pub fn transaction<T>(&self, f: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let mut tables = self.inner.write();
        let checkpoint = tables.clone();
        match f(&mut tables) {
            Ok(value) => Ok(value),
            Err(err) => {
                *tables = checkpoint;
                Err(err)
            }
        }
    }
}

impl Default for ZoneStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_names_are_unique() {
        let store = ZoneStore::new();
        store
            .transaction(|t| {
                t.insert_domain(Domain::new("example.com"))?;
                let err = t.insert_domain(Domain::new("example.com")).unwrap_err();
                assert!(err.is_transient());
                Err::<(), _>(err)
            })
            .unwrap_err();
    }

    #[test]
    fn record_unique_key_is_name_type_content() {
        let store = ZoneStore::new();
        store
            .transaction(|t| {
                let domain = t.insert_domain(Domain::new("example.com"))?;
                t.insert_record(Record::new(domain, RecordType::A, "www.example.com", "192.0.2.1"))?;
                // Same name and type, different content: allowed.
                t.insert_record(Record::new(domain, RecordType::A, "www.example.com", "192.0.2.2"))?;
                assert!(
                    t.insert_record(Record::new(
                        domain,
                        RecordType::A,
                        "www.example.com",
                        "192.0.2.1"
                    ))
                    .is_err()
                );
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let store = ZoneStore::new();
        let result: Result<()> = store.transaction(|t| {
            t.insert_domain(Domain::new("example.com"))?;
            Err(ZoneForgeError::ConfigInvalid("boom".to_string()))
        });
        assert!(result.is_err());
        assert!(store.read(|t| t.domain_by_name("example.com").is_none()));
    }

    #[test]
    fn number_range_query_matches_a_records() {
        let store = ZoneStore::new();
        store
            .transaction(|t| {
                let domain = t.insert_domain(Domain::new("example.com"))?;
                let mut a = Record::new(domain, RecordType::A, "a.example.com", "10.0.0.1");
                a.number = Some(u32::from(std::net::Ipv4Addr::new(10, 0, 0, 1)));
                let mut b = Record::new(domain, RecordType::A, "b.example.com", "10.0.0.200");
                b.number = Some(u32::from(std::net::Ipv4Addr::new(10, 0, 0, 200)));
                t.insert_record(a)?;
                t.insert_record(b)?;
                let lo = u32::from(std::net::Ipv4Addr::new(10, 0, 0, 0));
                let hi = u32::from(std::net::Ipv4Addr::new(10, 0, 0, 100));
                let hits = t.records_in_number_range(lo, hi);
                assert_eq!(hits.len(), 1);
                assert_eq!(hits[0].1.name, "a.example.com");
                Ok(())
            })
            .unwrap();
    }
}
