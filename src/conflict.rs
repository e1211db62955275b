//! CNAME exclusivity: a name may carry either a single CNAME record or
//! any number of other records, never both.

use crate::error::{Result, ZoneForgeError};
use crate::model::{Record, RecordId, RecordType};
use crate::store::Tables;

/// Check a record about to be created or updated against every stored
/// record sharing its name. `existing` excludes the record's own prior
/// identity on update. Names are compared verbatim, store-wide; two
/// zones never legitimately share a fully qualified record name.
pub fn check(tables: &Tables, record: &Record, existing: Option<RecordId>) -> Result<()> {
    let same_name: Vec<(RecordId, Record)> = tables
        .records_named(&record.name)
        .into_iter()
        .filter(|(id, _)| Some(*id) != existing)
        .collect();

    if record.rtype == RecordType::Cname {
        let conflicting: Vec<RecordId> = same_name.into_iter().map(|(id, _)| id).collect();
        if !conflicting.is_empty() {
            return Err(ZoneForgeError::CnameConflict(conflicting));
        }
    } else {
        let conflicting: Vec<RecordId> = same_name
            .into_iter()
            .filter(|(_, r)| r.rtype == RecordType::Cname)
            .map(|(id, _)| id)
            .collect();
        if !conflicting.is_empty() {
            return Err(ZoneForgeError::ConflictsWithCname(conflicting));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Domain;

    fn tables_with_domain() -> (Tables, crate::model::DomainId) {
        let mut tables = Tables::default();
        let domain = tables.insert_domain(Domain::new("example.com")).unwrap();
        (tables, domain)
    }

    #[test]
    fn cname_refused_when_name_is_taken() {
        let (mut tables, domain) = tables_with_domain();
        let a = tables
            .insert_record(Record::new(domain, RecordType::A, "site.example.com", "192.0.2.1"))
            .unwrap();

        let cname = Record::new(domain, RecordType::Cname, "site.example.com", "other.example.com");
        match check(&tables, &cname, None) {
            Err(ZoneForgeError::CnameConflict(ids)) => assert_eq!(ids, vec![a]),
            other => panic!("expected CNAME conflict, got {:?}", other),
        }
    }

    #[test]
    fn other_types_refused_when_cname_exists() {
        let (mut tables, domain) = tables_with_domain();
        let cname = tables
            .insert_record(Record::new(
                domain,
                RecordType::Cname,
                "site.example.com",
                "other.example.com",
            ))
            .unwrap();

        let txt = Record::new(domain, RecordType::Txt, "site.example.com", "hello");
        match check(&tables, &txt, None) {
            Err(ZoneForgeError::ConflictsWithCname(ids)) => assert_eq!(ids, vec![cname]),
            other => panic!("expected conflict with CNAME, got {:?}", other),
        }
    }

    #[test]
    fn update_excludes_own_identity() {
        let (mut tables, domain) = tables_with_domain();
        let id = tables
            .insert_record(Record::new(
                domain,
                RecordType::Cname,
                "site.example.com",
                "other.example.com",
            ))
            .unwrap();

        let updated = Record::new(domain, RecordType::Cname, "site.example.com", "third.example.com");
        assert!(check(&tables, &updated, Some(id)).is_ok());
        assert!(check(&tables, &updated, None).is_err());
    }

    #[test]
    fn unrelated_names_do_not_conflict() {
        let (mut tables, domain) = tables_with_domain();
        tables
            .insert_record(Record::new(domain, RecordType::A, "a.example.com", "192.0.2.1"))
            .unwrap();
        let cname = Record::new(domain, RecordType::Cname, "b.example.com", "a.example.com");
        assert!(check(&tables, &cname, None).is_ok());
    }
}
