use std::sync::Arc;
use zoneforge::config::EngineConfig;
use zoneforge::model::{
    AutoPtrPolicy, CryptoKey, Domain, DomainMetadata, Record, RecordType, metadata_kinds,
};
use zoneforge::{ZoneDataEngine, ZoneStore};

fn engine() -> ZoneDataEngine {
    ZoneDataEngine::new(Arc::new(ZoneStore::new()), EngineConfig::default())
}

fn a_record(domain: zoneforge::model::DomainId, name: &str, content: &str) -> Record {
    Record::new(domain, RecordType::A, name, content).with_auto_ptr(AutoPtrPolicy::Never)
}

#[test]
fn no_crypto_key_means_no_ordername() {
    let engine = engine();
    let domain = engine.save_domain(None, Domain::new("example.com")).unwrap();
    let id = engine
        .save_record(None, a_record(domain, "www.example.com", "192.0.2.1"))
        .unwrap();
    assert_eq!(engine.record(id).unwrap().ordername, None);
}

#[test]
fn nsec_mode_uses_relative_labels() {
    let engine = engine();
    let domain = engine.save_domain(None, Domain::new("example.com")).unwrap();
    engine.add_crypto_key(CryptoKey::new(domain, 257)).unwrap();

    let www = engine
        .save_record(None, a_record(domain, "www.example.com", "192.0.2.1"))
        .unwrap();
    assert_eq!(
        engine.record(www).unwrap().ordername,
        Some("www".to_string())
    );

    let deep = engine
        .save_record(None, a_record(domain, "a.b.example.com", "192.0.2.2"))
        .unwrap();
    assert_eq!(
        engine.record(deep).unwrap().ordername,
        Some("b a".to_string())
    );

    // A record at the apex has no relative labels.
    let apex = engine
        .save_record(
            None,
            Record::new(domain, RecordType::Txt, "example.com", "hello"),
        )
        .unwrap();
    assert_eq!(engine.record(apex).unwrap().ordername, Some(String::new()));
}

#[test]
fn nsec3_mode_hashes_the_record_name() {
    let engine = engine();
    let domain = engine.save_domain(None, Domain::new("example")).unwrap();
    engine.add_crypto_key(CryptoKey::new(domain, 257)).unwrap();
    engine
        .add_metadata(DomainMetadata::new(
            domain,
            metadata_kinds::NSEC3PARAM,
            "1 1 12 aabbccdd",
        ))
        .unwrap();

    let id = engine
        .save_record(None, a_record(domain, "a.example", "192.0.2.1"))
        .unwrap();
    assert_eq!(
        engine.record(id).unwrap().ordername,
        Some("35mthgpgcu1qg68fab165klnsnk3dpvl".to_string())
    );
}

#[test]
fn nsec3_narrow_mode_leaves_the_field_empty() {
    let engine = engine();
    let domain = engine.save_domain(None, Domain::new("example")).unwrap();
    engine.add_crypto_key(CryptoKey::new(domain, 257)).unwrap();
    engine
        .add_metadata(DomainMetadata::new(
            domain,
            metadata_kinds::NSEC3PARAM,
            "1 1 12 aabbccdd",
        ))
        .unwrap();
    engine
        .add_metadata(DomainMetadata::new(domain, metadata_kinds::NSEC3NARROW, "1"))
        .unwrap();

    let id = engine
        .save_record(None, a_record(domain, "a.example", "192.0.2.1"))
        .unwrap();
    assert_eq!(engine.record(id).unwrap().ordername, Some(String::new()));
}

#[test]
fn malformed_nsec3param_downgrades_to_no_ordername() {
    let engine = engine();
    let domain = engine.save_domain(None, Domain::new("example")).unwrap();
    engine.add_crypto_key(CryptoKey::new(domain, 257)).unwrap();
    engine
        .add_metadata(DomainMetadata::new(
            domain,
            metadata_kinds::NSEC3PARAM,
            "1 1 twelve aabbccdd",
        ))
        .unwrap();

    let id = engine
        .save_record(None, a_record(domain, "a.example", "192.0.2.1"))
        .unwrap();
    assert_eq!(engine.record(id).unwrap().ordername, None);
}

#[test]
fn ordername_is_recomputed_on_every_save() {
    let engine = engine();
    let domain = engine.save_domain(None, Domain::new("example.com")).unwrap();

    let id = engine
        .save_record(None, a_record(domain, "www.example.com", "192.0.2.1"))
        .unwrap();
    assert_eq!(engine.record(id).unwrap().ordername, None);

    // Zone state changed independently of the record.
    engine.add_crypto_key(CryptoKey::new(domain, 257)).unwrap();
    let record = engine.record(id).unwrap();
    engine.save_record(Some(id), record).unwrap();
    assert_eq!(
        engine.record(id).unwrap().ordername,
        Some("www".to_string())
    );
}
