//! Integration Tests für den Property-Store
//!
//! Persistenz läuft gegen den RAM-basierten MemoryStore

use std::collections::BTreeMap;

use rtc_core::config::RECORD_HEADER_LEN;
use rtc_core::{
    ByteStore, MAX_PROPERTIES, MemoryStore, MemoryStoreError, PropertyError, PropertyStore,
};

fn fresh() -> PropertyStore<MemoryStore> {
    PropertyStore::new(MemoryStore::new(512))
}

fn contents(props: &PropertyStore<MemoryStore>) -> BTreeMap<i16, Vec<u8>> {
    props.iter().map(|p| (p.id(), p.value().to_vec())).collect()
}

/// Speichert, übergibt das EEPROM an einen neuen Store und lädt dort
fn reload(mut props: PropertyStore<MemoryStore>) -> PropertyStore<MemoryStore> {
    let base = props.base_offset();
    props.save().unwrap();
    let mut loaded = PropertyStore::new(props.into_store()).with_base_offset(base);
    assert_eq!(loaded.load(), Ok(true));
    loaded
}

// ============================================================================
// Tests: set / get
// ============================================================================

#[test]
fn test_set_get_example() {
    let mut props = fresh();
    props.set(1, &7i32.to_le_bytes()).unwrap();
    props.set(2, &[0x2A]).unwrap();
    props.set(1, &9i32.to_le_bytes()).unwrap();

    assert_eq!(props.get_long(1), Some(9));
    assert_eq!(props.get(2).unwrap().value(), [0x2A]);
    assert_eq!(props.size(), 2 * RECORD_HEADER_LEN + 4 + 1);
}

#[test]
fn test_int_and_long_roundtrip() {
    let mut props = fresh();
    props.set_int(10, -1234).unwrap();
    props.set_long(11, -70_000).unwrap();
    props.set_int(12, i16::MAX).unwrap();

    assert_eq!(props.get_int(10), Some(-1234));
    assert_eq!(props.get_long(11), Some(-70_000));
    assert_eq!(props.get_int(12), Some(i16::MAX));
    assert_eq!(props.get(11).unwrap().value().len(), 4);
}

#[test]
fn test_add_property_returns_writable_value() {
    let mut props = fresh();
    props.add_property(5, 3).unwrap().copy_from_slice(b"abc");
    assert_eq!(props.get(5).unwrap().value(), *b"abc");

    // Gleiche Größe: Wert bleibt erhalten
    assert_eq!(props.add_property(5, 3).unwrap(), *b"abc");

    // Neue Größe: Record wird mit Nullen neu angelegt
    assert_eq!(props.add_property(5, 2).unwrap(), [0, 0]);
    assert_eq!(props.len(), 1);
}

#[test]
fn test_empty_value() {
    let mut props = fresh();
    props.set(1, &[]).unwrap();
    assert!(props.find_property(1));
    assert_eq!(props.get(1).unwrap().value(), [] as [u8; 0]);
    assert_eq!(props.get_int(1), Some(0));
    assert_eq!(props.size(), RECORD_HEADER_LEN);
}

// ============================================================================
// Tests: remove / Kompaktierung
// ============================================================================

#[test]
fn test_remove_compacts_buffer() {
    let mut props = fresh();
    props.set(1, &[1; 3]).unwrap();
    props.set(2, &[2; 10]).unwrap();
    props.set(3, &[3; 1]).unwrap();
    props.set(4, &[4; 6]).unwrap();
    let before = props.size();

    assert!(props.remove(2));

    assert!(!props.find_property(2));
    assert_eq!(props.size(), before - (RECORD_HEADER_LEN + 10));
    assert_eq!(props.len(), 3);
    assert_eq!(props.get(1).unwrap().value(), [1; 3]);
    assert_eq!(props.get(3).unwrap().value(), [3; 1]);
    assert_eq!(props.get(4).unwrap().value(), [4; 6]);
}

#[test]
fn test_remove_first_and_last() {
    let mut props = fresh();
    for id in 1..=4 {
        props.set_int(id, id * 100).unwrap();
    }

    props.remove(1);
    props.remove(4);

    let ids: Vec<i16> = props.iter().map(|p| p.id()).collect();
    assert_eq!(ids, [2, 3]);
    assert_eq!(props.get_int(2), Some(200));
    assert_eq!(props.get_int(3), Some(300));
}

#[test]
fn test_remove_then_readd() {
    let mut props = fresh();
    props.set_int(1, 1).unwrap();
    props.set_int(2, 2).unwrap();

    props.remove(1);
    assert!(!props.find_property(1));

    props.set_int(1, 11).unwrap();
    let ids: Vec<i16> = props.iter().map(|p| p.id()).collect();
    assert_eq!(ids, [2, 1]);
    assert_eq!(props.get_int(1), Some(11));
}

#[test]
fn test_remove_missing_is_noop() {
    let mut props = fresh();
    props.set_int(1, 1).unwrap();
    let size = props.size();

    assert!(!props.remove(99));
    assert_eq!(props.size(), size);
    assert_eq!(props.len(), 1);
}

#[test]
fn test_removing_last_record_releases_buffer() {
    let mut props = fresh();
    props.set(1, &[0; 16]).unwrap();
    props.set(2, &[0; 16]).unwrap();
    assert!(props.capacity() > 0);

    props.remove(1);
    assert!(props.capacity() >= props.size());

    props.remove(2);
    assert_eq!(props.size(), 0);
    assert_eq!(props.capacity(), 0);
    assert!(props.is_empty());
}

#[test]
fn test_flush() {
    let mut props = fresh();
    props.set_int(1, 1).unwrap();
    props.set_int(2, 2).unwrap();

    props.flush();
    assert!(props.is_empty());
    assert_eq!(props.capacity(), 0);
    assert_eq!(props.get_int(1), None);
}

// ============================================================================
// Tests: save / load
// ============================================================================

#[test]
fn test_save_load_roundtrip() {
    let mut props = fresh();
    props.set_int(1, 42).unwrap();
    props.set(2, b"hello").unwrap();
    props.set_long(3, 123_456).unwrap();
    let expected = contents(&props);

    let loaded = reload(props);
    assert_eq!(contents(&loaded), expected);
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded.get_long(3), Some(123_456));
}

#[test]
fn test_roundtrip_independent_of_history() {
    let mut props = fresh();
    props.set(5, &[5; 4]).unwrap();
    props.set(1, &[1; 2]).unwrap();
    props.set(9, &[9; 7]).unwrap();
    props.set(5, &[55; 1]).unwrap(); // Größenänderung → ans Ende
    props.remove(1);
    props.set(1, &[11; 3]).unwrap();
    props.set(9, &[99; 7]).unwrap(); // gleiche Größe → an Ort und Stelle
    let expected = contents(&props);

    let loaded = reload(props);
    assert_eq!(contents(&loaded), expected);
    assert_eq!(loaded.get(5).unwrap().value(), [55]);
    assert_eq!(loaded.get(9).unwrap().value(), [99; 7]);
}

#[test]
fn test_image_layout() {
    let mut props = PropertyStore::new(MemoryStore::new(64)).with_base_offset(8);
    props.set(0x0102, &[0xAA, 0xBB]).unwrap();
    props.save().unwrap();

    let store = props.into_store();
    let bytes = store.as_bytes();
    // Vor dem Image bleibt alles unberührt
    assert!(bytes[..8].iter().all(|&b| b == 0xFF));
    assert_eq!(
        &bytes[8..18],
        [1, 0, 6, 0, 0x02, 0x01, 2, 0, 0xAA, 0xBB]
    );
    // Hinter dem Image ebenfalls (Größenfeld schreibt genau 2 Bytes)
    assert!(bytes[18..].iter().all(|&b| b == 0xFF));
}

#[test]
fn test_load_erased_eeprom() {
    let mut props = fresh();
    props.set_int(1, 1).unwrap();

    // 0xFFFF als count ist ungültig → leerer Store
    assert_eq!(props.load(), Ok(false));
    assert!(props.is_empty());
    assert_eq!(props.capacity(), 0);
}

#[test]
fn test_load_zero_count() {
    let mut props = PropertyStore::new(MemoryStore::from_bytes(vec![0; 32]));
    assert_eq!(props.load(), Ok(false));
    assert!(props.is_empty());
}

#[test]
fn test_load_rejects_count_at_limit() {
    let mut raw = vec![0u8; 32];
    raw[..2].copy_from_slice(&MAX_PROPERTIES.to_le_bytes());
    let mut props = PropertyStore::new(MemoryStore::from_bytes(raw));
    assert_eq!(props.load(), Ok(false));
}

#[test]
fn test_save_empty_then_load() {
    let mut props = fresh();
    props.set_int(1, 1).unwrap();
    props.save().unwrap();

    props.remove(1);
    props.save().unwrap();

    assert_eq!(props.load(), Ok(false));
    assert!(props.is_empty());
}

#[test]
fn test_flush_then_load_repopulates() {
    let mut props = fresh();
    props.set_int(1, 10).unwrap();
    props.set_int(2, 20).unwrap();
    props.save().unwrap();

    props.remove(1);
    props.remove(2);
    assert_eq!(props.capacity(), 0);

    assert_eq!(props.load(), Ok(true));
    assert_eq!(props.get_int(1), Some(10));
    assert_eq!(props.get_int(2), Some(20));
}

#[test]
fn test_load_from_and_save_to_positions() {
    let mut props = fresh();
    props.set_int(1, 111).unwrap();
    props.save_to(100).unwrap();
    assert_eq!(props.base_offset(), 100);

    props.set_int(1, 222).unwrap();
    props.save_to(200).unwrap();

    assert_eq!(props.load_from(100), Ok(true));
    assert_eq!(props.get_int(1), Some(111));
    assert_eq!(props.load_from(200), Ok(true));
    assert_eq!(props.get_int(1), Some(222));
}

#[test]
fn test_store_errors_propagate() {
    let mut props = PropertyStore::new(MemoryStore::new(6));
    props.set(1, &[0; 4]).unwrap();

    assert_eq!(
        props.save(),
        Err(MemoryStoreError::OutOfBounds { offset: 4, len: 8 })
    );
}

// ============================================================================
// Tests: Grenzen
// ============================================================================

#[test]
fn test_image_at_end_of_address_space() {
    // Header passt genau in die letzten 4 Bytes, Records wären hinter 0xFFFF
    let base = 0xFFFC;
    let mut props = PropertyStore::new(MemoryStore::new(0x1_0000)).with_base_offset(base);

    props.set(1, &[0xAA]).unwrap();
    assert_eq!(
        props.save(),
        Err(MemoryStoreError::OutOfBounds {
            offset: base,
            len: 4 + RECORD_HEADER_LEN + 1
        })
    );
    assert!(props.store_mut().as_bytes()[usize::from(base)..].iter().all(|&b| b == 0xFF));

    // Ein Header mit Records an dieser Stelle ist kein gültiges Image
    props
        .store_mut()
        .write_bytes(base, &[1, 0, 5, 0])
        .unwrap();
    assert_eq!(props.load(), Ok(false));
    assert!(props.is_empty());

    // Ein leeres Image passt dagegen
    assert_eq!(props.save(), Ok(()));
    assert_eq!(props.store_mut().as_bytes()[usize::from(base)..], [0, 0, 0, 0]);
}

// ============================================================================

#[test]
fn test_record_limit() {
    let mut props = fresh();
    let limit = MAX_PROPERTIES as i16 - 1;
    for id in 0..limit {
        props.set(id, &[1]).unwrap();
    }

    assert_eq!(props.set(limit, &[1]), Err(PropertyError::Full));
    assert!(!props.find_property(limit));

    // Volles Image ist weiterhin ladbar
    let loaded = reload(props);
    assert_eq!(loaded.len(), usize::from(MAX_PROPERTIES) - 1);
}

#[test]
fn test_too_large_value() {
    let mut props = fresh();
    let huge = vec![0u8; usize::from(u16::MAX)];
    assert!(matches!(
        props.set(1, &huge),
        Err(PropertyError::TooLarge { .. })
    ));
    assert!(props.is_empty());
}
