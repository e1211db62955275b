//! Entry points tying the save/delete pipelines together.
//!
//! External callers (API, admin, import tooling) go through
//! [`ZoneDataEngine`]; every entry point is an explicit, ordered
//! pipeline (validate, derive, persist, cascade) executed inside one
//! store transaction, so the cascading side effects land atomically
//! with the triggering write.

use crate::autoptr;
use crate::config::EngineConfig;
use crate::conflict;
use crate::error::{Result, ZoneForgeError};
use crate::model::{
    AutoPtrPolicy, CryptoKey, CryptoKeyId, Domain, DomainId, DomainMetadata, DomainMetadataId,
    DomainMetadataTemplate, DomainTemplate, DomainTemplateId, MetadataTemplateId, Record, RecordId,
    RecordTemplate, RecordTemplateId, RecordType,
};
use crate::ordername;
use crate::serial;
use crate::store::{Tables, ZoneStore};
use crate::templating::{self, ReconcileSummary};
use crate::validation;
use chrono::Utc;
use parking_lot::Mutex;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::debug;

/// Engine state threaded through the pipeline stages.
pub(crate) struct EngineCtx<'a> {
    pub config: &'a EngineConfig,
    pub reverse_template: &'a Mutex<Option<DomainTemplateId>>,
}

/// The zone data engine: owns the store handle and configuration and
/// exposes the boundary operations of the core.
pub struct ZoneDataEngine {
    store: Arc<ZoneStore>,
    config: EngineConfig,
    /// Default reverse-zone template id, resolved on first use.
    reverse_template: Mutex<Option<DomainTemplateId>>,
}

impl ZoneDataEngine {
    pub fn new(store: Arc<ZoneStore>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            reverse_template: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &ZoneStore {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn ctx(&self) -> EngineCtx<'_> {
        EngineCtx {
            config: &self.config,
            reverse_template: &self.reverse_template,
        }
    }

    /// Validate a record without persisting anything: allowed type,
    /// name shape, type-dependent content, CNAME exclusivity.
    pub fn validate_record(&self, record: &Record, existing: Option<RecordId>) -> Result<()> {
        self.store
            .read(|tables| validate_record(tables, &self.config, record, existing))
    }

    /// Persist a domain, then reconcile its templated records when the
    /// template assignment changed (including first assignment and
    /// clearing).
    pub fn save_domain(&self, id: Option<DomainId>, mut domain: Domain) -> Result<DomainId> {
        domain.name = domain.name.to_lowercase();
        validation::validate_domain_name(&domain.name)?;
        let ctx = self.ctx();
        self.store.transaction(|tables| {
            let previous = id.and_then(|i| tables.domain(i)).cloned();
            let templates_changed = previous.as_ref().is_none_or(|p| {
                p.template != domain.template || p.reverse_template != domain.reverse_template
            });
            let domain_id = match id {
                Some(existing) => {
                    tables.update_domain(existing, domain.clone())?;
                    existing
                }
                None => tables.insert_domain(domain.clone())?,
            };
            if templates_changed {
                templating::reconcile(&ctx, tables, domain_id)?;
            }
            Ok(domain_id)
        })
    }

    /// Converge a domain's generated records and metadata to its
    /// assigned template. Idempotent; the summary reports the writes
    /// performed.
    pub fn reconcile_domain(&self, id: DomainId) -> Result<ReconcileSummary> {
        let ctx = self.ctx();
        self.store
            .transaction(|tables| templating::reconcile(&ctx, tables, id))
    }

    /// Validate and persist a record, refreshing its derived fields and
    /// cascading PTR synthesis for A records.
    pub fn save_record(&self, id: Option<RecordId>, mut record: Record) -> Result<RecordId> {
        record.name = record.name.to_lowercase();
        let ctx = self.ctx();
        self.store.transaction(|tables| {
            validate_record(tables, &self.config, &record, id)?;
            apply_record(&ctx, tables, id, record)
        })
    }

    /// Delete a record, clean up records maintained for it, and bump
    /// the serial of every affected zone.
    pub fn delete_record(&self, id: RecordId) -> Result<()> {
        let ctx = self.ctx();
        self.store.transaction(|tables| remove_record(&ctx, tables, id))
    }

    /// Create or update a record template. Creation materializes the
    /// template for every domain currently assigned its domain
    /// template; an update re-renders every record still linked to it.
    pub fn save_record_template(
        &self,
        id: Option<RecordTemplateId>,
        template: RecordTemplate,
    ) -> Result<RecordTemplateId> {
        let ctx = self.ctx();
        self.store.transaction(|tables| match id {
            None => {
                let template_id = tables.insert_record_template(template.clone())?;
                for domain_id in tables.domains_using_template(template.domain_template) {
                    let domain_name = domain_name(tables, domain_id)?;
                    let record = template.materialize(template_id, domain_id, &domain_name);
                    apply_record(&ctx, tables, None, record)?;
                }
                Ok(template_id)
            }
            Some(template_id) => {
                tables.update_record_template(template_id, template.clone())?;
                for (record_id, record) in tables.records_generated_by(template_id) {
                    let name = domain_name(tables, record.domain)?;
                    let desired = template.materialize(template_id, record.domain, &name);
                    let mut updated = record;
                    templating::apply_rendered(&mut updated, &desired);
                    apply_record(&ctx, tables, Some(record_id), updated)?;
                }
                Ok(template_id)
            }
        })
    }

    /// Delete a record template together with the records generated
    /// from it.
    pub fn delete_record_template(&self, id: RecordTemplateId) -> Result<()> {
        let ctx = self.ctx();
        self.store.transaction(|tables| {
            tables
                .delete_record_template(id)
                .ok_or(ZoneForgeError::TemplateNotFound(id.0))?;
            for (record_id, _) in tables.records_generated_by(id) {
                remove_record(&ctx, tables, record_id)?;
            }
            Ok(())
        })
    }

    /// Create or update a metadata template, with the same
    /// materialization and re-render semantics as record templates.
    pub fn save_metadata_template(
        &self,
        id: Option<MetadataTemplateId>,
        template: DomainMetadataTemplate,
    ) -> Result<MetadataTemplateId> {
        self.store.transaction(|tables| match id {
            None => {
                let template_id = tables.insert_metadata_template(template.clone())?;
                for domain_id in tables.domains_using_template(template.domain_template) {
                    let name = domain_name(tables, domain_id)?;
                    tables.insert_metadata(template.materialize(template_id, domain_id, &name));
                }
                Ok(template_id)
            }
            Some(template_id) => {
                tables.update_metadata_template(template_id, template.clone())?;
                for (row_id, row) in tables.metadata_generated_by(template_id) {
                    let name = domain_name(tables, row.domain)?;
                    let desired = template.materialize(template_id, row.domain, &name);
                    tables.update_metadata(row_id, desired)?;
                }
                Ok(template_id)
            }
        })
    }

    /// Delete a metadata template together with the rows generated
    /// from it.
    pub fn delete_metadata_template(&self, id: MetadataTemplateId) -> Result<()> {
        self.store.transaction(|tables| {
            tables
                .delete_metadata_template(id)
                .ok_or(ZoneForgeError::TemplateNotFound(id.0))?;
            for (row_id, _) in tables.metadata_generated_by(id) {
                tables.delete_metadata(row_id);
            }
            Ok(())
        })
    }

    // Thin passthroughs for arranging surrounding state.

    pub fn create_domain_template(&self, template: DomainTemplate) -> Result<DomainTemplateId> {
        self.store
            .transaction(|tables| tables.insert_domain_template(template))
    }

    pub fn add_crypto_key(&self, key: CryptoKey) -> Result<CryptoKeyId> {
        self.store.transaction(|tables| Ok(tables.insert_crypto_key(key)))
    }

    pub fn add_metadata(&self, metadata: DomainMetadata) -> Result<DomainMetadataId> {
        self.store
            .transaction(|tables| Ok(tables.insert_metadata(metadata)))
    }

    pub fn domain(&self, id: DomainId) -> Option<Domain> {
        self.store.read(|tables| tables.domain(id).cloned())
    }

    pub fn find_domain(&self, name: &str) -> Option<(DomainId, Domain)> {
        self.store
            .read(|tables| tables.domain_by_name(name).map(|(id, d)| (id, d.clone())))
    }

    pub fn record(&self, id: RecordId) -> Option<Record> {
        self.store.read(|tables| tables.record(id).cloned())
    }
}

fn validate_record(
    tables: &Tables,
    config: &EngineConfig,
    record: &Record,
    existing: Option<RecordId>,
) -> Result<()> {
    if let Some(allowed) = &config.allowed_record_types {
        if !allowed.contains(&record.rtype) {
            return Err(ZoneForgeError::RecordTypeNotAllowed(record.rtype.to_string()));
        }
    }
    validation::validate_domain_name(&record.name)?;
    validation::validate_record_content(record.rtype, &record.content)?;
    conflict::check(tables, record, existing)
}

fn domain_name(tables: &Tables, id: DomainId) -> Result<String> {
    tables
        .domain(id)
        .map(|d| d.name.clone())
        .ok_or_else(|| ZoneForgeError::DomainNotFound(id.to_string()))
}

/// The derive-and-persist stage shared by every path that writes a
/// record: direct saves, template materialization, PTR synthesis and
/// SOA re-touching. Refreshes the derived fields, persists, then runs
/// the A-record PTR cascade.
pub(crate) fn apply_record(
    ctx: &EngineCtx<'_>,
    tables: &mut Tables,
    id: Option<RecordId>,
    mut record: Record,
) -> Result<RecordId> {
    record.name = record.name.to_lowercase();
    if record.ttl.is_none() {
        record.ttl = Some(ctx.config.default_ttl);
    }
    record.change_date = Some(epoch_now());
    record.ordername = ordername::generate(tables, &record);
    record.number = match record.rtype {
        RecordType::A => {
            let ip: Ipv4Addr =
                record
                    .content
                    .parse()
                    .map_err(|_| ZoneForgeError::InvalidContent {
                        rtype: "A",
                        content: record.content.clone(),
                        reason: "not a valid IPv4 address".to_string(),
                    })?;
            Some(u32::from(ip))
        }
        _ => None,
    };

    let record_id = match id {
        Some(existing) => {
            tables.update_record(existing, record.clone())?;
            existing
        }
        None => tables.insert_record(record.clone())?,
    };
    debug!(record = %record, id = %record_id, "record saved");

    if record.rtype == RecordType::A && record.auto_ptr != AutoPtrPolicy::Never {
        autoptr::synthesize(ctx, tables, record_id)?;
    }
    Ok(record_id)
}

/// The deletion pipeline: remove the row, apply the dependent-record
/// cleanup rule, then bump the zone serial.
pub(crate) fn remove_record(
    ctx: &EngineCtx<'_>,
    tables: &mut Tables,
    id: RecordId,
) -> Result<()> {
    let record = tables
        .delete_record(id)
        .ok_or(ZoneForgeError::RecordNotFound(id.0))?;
    debug!(record = %record, "record deleted");
    for dependent in tables.dependents_of(id) {
        remove_record(ctx, tables, dependent)?;
    }
    serial::bump(ctx, tables, record.domain)?;
    Ok(())
}

fn epoch_now() -> u32 {
    Utc::now().timestamp() as u32
}
