//! SOA re-touch after record deletion.
//!
//! Deleting a record changes the zone, but removing a row does not move
//! any timestamp the DNS server watches. Re-saving the SOA record
//! unconditionally forces its `change_date` forward, which the server
//! turns into a serial bump and slave notification.

use crate::engine::{self, EngineCtx};
use crate::error::Result;
use crate::model::DomainId;
use crate::store::Tables;
use tracing::debug;

/// Re-save the domain's SOA record, if it has one.
pub(crate) fn bump(ctx: &EngineCtx<'_>, tables: &mut Tables, domain: DomainId) -> Result<()> {
    if let Some((soa_id, soa)) = tables.soa_of(domain) {
        debug!(soa = %soa.name, "re-touching SOA after record deletion");
        engine::apply_record(ctx, tables, Some(soa_id), soa)?;
    }
    Ok(())
}
