use std::sync::Arc;
use zoneforge::config::EngineConfig;
use zoneforge::model::{AutoPtrPolicy, Domain, DomainId, Record, RecordType};
use zoneforge::{ZoneDataEngine, ZoneForgeError, ZoneStore};

fn engine() -> (ZoneDataEngine, DomainId) {
    let engine = ZoneDataEngine::new(Arc::new(ZoneStore::new()), EngineConfig::default());
    let domain = engine.save_domain(None, Domain::new("example.com")).unwrap();
    (engine, domain)
}

#[test]
fn cname_cannot_join_an_existing_name() {
    let (engine, domain) = engine();
    let a_id = engine
        .save_record(
            None,
            Record::new(domain, RecordType::A, "site.example.com", "192.0.2.1")
                .with_auto_ptr(AutoPtrPolicy::Never),
        )
        .unwrap();

    let cname = Record::new(domain, RecordType::Cname, "site.example.com", "other.example.com");
    match engine.validate_record(&cname, None) {
        Err(ZoneForgeError::CnameConflict(ids)) => assert_eq!(ids, vec![a_id]),
        other => panic!("expected CNAME conflict, got {:?}", other),
    }
    assert!(engine.save_record(None, cname).is_err());
}

#[test]
fn nothing_can_join_an_existing_cname() {
    let (engine, domain) = engine();
    let cname_id = engine
        .save_record(
            None,
            Record::new(domain, RecordType::Cname, "site.example.com", "other.example.com"),
        )
        .unwrap();

    let a = Record::new(domain, RecordType::A, "site.example.com", "192.0.2.1")
        .with_auto_ptr(AutoPtrPolicy::Never);
    match engine.validate_record(&a, None) {
        Err(ZoneForgeError::ConflictsWithCname(ids)) => assert_eq!(ids, vec![cname_id]),
        other => panic!("expected conflict with CNAME, got {:?}", other),
    }
}

#[test]
fn updating_a_cname_does_not_conflict_with_itself() {
    let (engine, domain) = engine();
    let id = engine
        .save_record(
            None,
            Record::new(domain, RecordType::Cname, "site.example.com", "other.example.com"),
        )
        .unwrap();

    let mut updated = engine.record(id).unwrap();
    updated.content = "third.example.com".to_string();
    assert!(engine.save_record(Some(id), updated).is_ok());
}

#[test]
fn content_is_validated_per_type() {
    let (engine, domain) = engine();

    let bad_a = Record::new(domain, RecordType::A, "www.example.com", "192.168.1");
    assert!(matches!(
        engine.save_record(None, bad_a),
        Err(ZoneForgeError::InvalidContent { rtype: "A", .. })
    ));

    let v4_in_aaaa = Record::new(domain, RecordType::Aaaa, "www.example.com", "192.168.1.1");
    assert!(matches!(
        engine.save_record(None, v4_in_aaaa),
        Err(ZoneForgeError::InvalidContent { rtype: "AAAA", .. })
    ));

    let bad_soa = Record::new(domain, RecordType::Soa, "example.com", "too few fields");
    assert!(matches!(
        engine.save_record(None, bad_soa),
        Err(ZoneForgeError::InvalidContent { rtype: "SOA", .. })
    ));

    let dotted_cname = Record::new(domain, RecordType::Cname, "x.example.com", "target.example.com.");
    assert!(engine.save_record(None, dotted_cname).is_err());
}

#[test]
fn record_names_must_be_valid_and_are_lowercased() {
    let (engine, domain) = engine();

    let trailing_dot = Record::new(domain, RecordType::Txt, "www.example.com.", "x");
    assert!(matches!(
        engine.save_record(None, trailing_dot),
        Err(ZoneForgeError::InvalidName(_))
    ));

    let id = engine
        .save_record(None, Record::new(domain, RecordType::Txt, "WWW.Example.COM", "x"))
        .unwrap();
    assert_eq!(engine.record(id).unwrap().name, "www.example.com");
}

#[test]
fn duplicate_name_type_content_is_rejected() {
    let (engine, domain) = engine();
    engine
        .save_record(
            None,
            Record::new(domain, RecordType::Txt, "www.example.com", "hello"),
        )
        .unwrap();

    let err = engine
        .save_record(
            None,
            Record::new(domain, RecordType::Txt, "www.example.com", "hello"),
        )
        .unwrap_err();
    assert!(err.is_transient());
}

#[test]
fn type_allowlist_restricts_saves() {
    let config = EngineConfig {
        allowed_record_types: Some(vec![RecordType::A, RecordType::Soa, RecordType::Ns]),
        ..Default::default()
    };
    let engine = ZoneDataEngine::new(Arc::new(ZoneStore::new()), config);
    let domain = engine.save_domain(None, Domain::new("example.com")).unwrap();

    let txt = Record::new(domain, RecordType::Txt, "www.example.com", "hello");
    assert!(matches!(
        engine.save_record(None, txt),
        Err(ZoneForgeError::RecordTypeNotAllowed(_))
    ));
}

#[test]
fn a_records_derive_their_address_number() {
    let (engine, domain) = engine();
    let id = engine
        .save_record(
            None,
            Record::new(domain, RecordType::A, "www.example.com", "192.168.1.3")
                .with_auto_ptr(AutoPtrPolicy::Never),
        )
        .unwrap();

    let record = engine.record(id).unwrap();
    assert_eq!(record.number, Some(u32::from(std::net::Ipv4Addr::new(192, 168, 1, 3))));
    assert!(record.change_date.is_some());
}
