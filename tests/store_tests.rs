//! Record store tests
//!
//! Core invariants: round-trips, shift correctness, capacity enforcement,
//! lazy extension, corruption handling.

use nvtext::store::TERMINATOR;
use nvtext::{MemDevice, RecordStore, StoreError};

fn empty_store(capacity: usize) -> RecordStore<MemDevice> {
    let mut store = RecordStore::new(MemDevice::new(capacity));
    store.init().unwrap();
    store
}

/// The packed prefix of the device: everything up to and including the
/// terminator. Bytes past the terminator are stale and never compared.
fn packed_prefix(store: &RecordStore<MemDevice>) -> &[u8] {
    let bytes = store.device().as_bytes();
    let mut addr = 0;
    loop {
        let len = bytes[addr];
        if len == TERMINATOR {
            return &bytes[..=addr];
        }
        addr += len as usize + 1;
    }
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_write_read_roundtrip() {
    let mut store = empty_store(64);

    assert!(store.write(1, b"abc").is_ok());
    assert_eq!(store.read(1).unwrap(), b"abc");
    assert_eq!(store.check().unwrap(), 1);
}

#[test]
fn test_empty_record_counts() {
    let mut store = empty_store(32);

    store.write(1, b"").unwrap();
    assert_eq!(store.check().unwrap(), 1);
    assert_eq!(store.read(1).unwrap(), b"");
}

#[test]
fn test_overwrite_with_longer_content() {
    let mut store = empty_store(64);

    store.write(1, b"abc").unwrap();
    store.write(2, b"tail").unwrap();

    store.write(1, b"longer").unwrap();
    assert_eq!(store.read(1).unwrap(), b"longer");
    assert_eq!(store.read(2).unwrap(), b"tail");
}

#[test]
fn test_overwrite_with_shorter_content() {
    let mut store = empty_store(64);

    store.write(1, b"a longer string").unwrap();
    store.write(2, b"tail").unwrap();

    store.write(1, b"x").unwrap();
    assert_eq!(store.read(1).unwrap(), b"x");
    assert_eq!(store.read(2).unwrap(), b"tail");
}

#[test]
fn test_overwrite_same_length_in_place() {
    let mut store = empty_store(64);

    store.write(1, b"aaa").unwrap();
    store.write(2, b"tail").unwrap();
    let tail_addr = store.entries().unwrap()[1].address;

    store.write(1, b"bbb").unwrap();
    assert_eq!(store.read(1).unwrap(), b"bbb");
    // no structural change: the following record did not move
    assert_eq!(store.entries().unwrap()[1].address, tail_addr);
}

#[test]
fn test_resize_preserves_all_following_records() {
    let mut store = empty_store(256);

    store.write(1, b"one").unwrap();
    store.write(2, b"two").unwrap();
    store.write(3, b"three").unwrap();
    store.write(4, b"").unwrap();
    store.write(5, b"five").unwrap();

    store.write(2, b"a much longer second record").unwrap();

    assert_eq!(store.read(1).unwrap(), b"one");
    assert_eq!(store.read(2).unwrap(), b"a much longer second record");
    assert_eq!(store.read(3).unwrap(), b"three");
    assert_eq!(store.read(4).unwrap(), b"");
    assert_eq!(store.read(5).unwrap(), b"five");
    assert_eq!(store.check().unwrap(), 5);
}

#[test]
fn test_max_length_record() {
    let mut store = empty_store(512);
    let content = vec![b'm'; 254];

    store.write(1, &content).unwrap();
    assert_eq!(store.read(1).unwrap(), content);
}

#[test]
fn test_record_too_long_rejected() {
    let mut store = empty_store(512);
    let content = vec![b'm'; 255];

    match store.write(1, &content) {
        Err(StoreError::RecordTooLong { len: 255, max: 254 }) => {}
        other => panic!("expected RecordTooLong, got {:?}", other),
    }
}

// =============================================================================
// Shift Correctness
// =============================================================================

/// Every shift amount in [-254, 254], checked against a layout rebuilt from
/// scratch. The direction-aware block move is the one place an off-by-one
/// inverts silently.
#[test]
fn test_shift_by_every_amount_matches_rebuilt_layout() {
    for old_len in [0usize, 254] {
        for new_len in 0..=254usize {
            let mut store = empty_store(1024);
            store.write(1, &vec![b'a'; old_len]).unwrap();
            store.write(2, b"bravo").unwrap();
            store.write(3, b"charlie").unwrap();

            store.write(1, &vec![b'x'; new_len]).unwrap();

            let mut reference = empty_store(1024);
            reference.write(1, &vec![b'x'; new_len]).unwrap();
            reference.write(2, b"bravo").unwrap();
            reference.write(3, b"charlie").unwrap();

            assert_eq!(
                packed_prefix(&store),
                packed_prefix(&reference),
                "old_len={} new_len={}",
                old_len,
                new_len
            );
        }
    }
}

#[test]
fn test_entries_addresses_move_after_grow() {
    let mut store = empty_store(128);
    store.write(1, b"ab").unwrap();
    store.write(2, b"cd").unwrap();

    let before = store.entries().unwrap();
    assert_eq!(before[1].address, 3);

    store.write(1, b"abcde").unwrap();
    let after = store.entries().unwrap();
    assert_eq!(after[1].address, 6);
    assert_eq!(after[1].content, b"cd");
}

// =============================================================================
// Space Accounting
// =============================================================================

#[test]
fn test_exact_fit_succeeds() {
    // 1 length byte + 6 content + 1 terminator == capacity 8
    let mut store = empty_store(8);
    assert!(store.write(1, b"abcdef").is_ok());
    assert_eq!(store.read(1).unwrap(), b"abcdef");
    assert_eq!(store.check().unwrap(), 1);
}

#[test]
fn test_one_byte_over_fails() {
    let mut store = empty_store(8);
    match store.write(1, b"abcdefg") {
        Err(StoreError::InsufficientSpace) => {}
        other => panic!("expected InsufficientSpace, got {:?}", other),
    }
    // nothing was written
    assert_eq!(store.check().unwrap(), 0);
}

#[test]
fn test_grow_to_exact_boundary_succeeds() {
    // layout after setup: [2 a a] [1 b] T  -> terminator at address 5 of 16
    let mut store = empty_store(16);
    store.write(1, b"aa").unwrap();
    store.write(2, b"b").unwrap();

    // grow record 1 so the shifted terminator lands on the last address:
    // [12 x*12] [1 b] T -> addresses 0..=12, 13..=14, 15
    store.write(1, &vec![b'x'; 12]).unwrap();
    assert_eq!(store.read(2).unwrap(), b"b");
    assert_eq!(store.check().unwrap(), 2);
}

#[test]
fn test_grow_past_boundary_fails_without_corruption() {
    let mut store = empty_store(16);
    store.write(1, b"aa").unwrap();
    store.write(2, b"b").unwrap();

    match store.write(1, &vec![b'x'; 13]) {
        Err(StoreError::InsufficientSpace) => {}
        other => panic!("expected InsufficientSpace, got {:?}", other),
    }
    // sequence unchanged and still well-formed
    assert_eq!(store.read(1).unwrap(), b"aa");
    assert_eq!(store.read(2).unwrap(), b"b");
    assert_eq!(store.check().unwrap(), 2);
}

// =============================================================================
// Lazy Extension
// =============================================================================

#[test]
fn test_write_past_end_extends_with_empty_records() {
    let mut store = empty_store(64);

    store.write(5, b"five").unwrap();

    assert_eq!(store.check().unwrap(), 5);
    for position in 1..=4 {
        assert_eq!(store.read(position).unwrap(), b"");
    }
    assert_eq!(store.read(5).unwrap(), b"five");
}

#[test]
fn test_failed_write_keeps_extension_slots() {
    // capacity 8: extending to position 3 leaves no room for 6 content bytes
    let mut store = empty_store(8);

    match store.write(3, b"abcdef") {
        Err(StoreError::InsufficientSpace) => {}
        other => panic!("expected InsufficientSpace, got {:?}", other),
    }

    // the two empty records created on the way are kept: valid records,
    // not corruption
    assert_eq!(store.check().unwrap(), 2);
    assert_eq!(store.read(1).unwrap(), b"");
    assert_eq!(store.read(2).unwrap(), b"");
}

#[test]
fn test_extension_to_last_address_fails_cleanly() {
    // capacity 3 holds at most [0] [0] T; asking for position 4 would push
    // the terminator off the device
    let mut store = empty_store(3);

    match store.write(4, b"") {
        Err(StoreError::InsufficientSpace) => {}
        other => panic!("expected InsufficientSpace, got {:?}", other),
    }
    assert_eq!(store.check().unwrap(), 2);
}

// =============================================================================
// Capacity Policy
// =============================================================================

#[test]
fn test_position_beyond_bound_rejected() {
    let mut store = empty_store(64);
    store.set_max_records(Some(3));

    match store.write(4, b"x") {
        Err(StoreError::CapacityExceeded { bound: 3 }) => {}
        other => panic!("expected CapacityExceeded, got {:?}", other),
    }
}

#[test]
fn test_new_record_at_full_bound_rejected() {
    let mut store = empty_store(64);
    store.set_max_records(Some(2));

    store.write(1, b"a").unwrap();
    store.write(2, b"b").unwrap();

    // overwriting an existing record is still allowed
    assert!(store.write(2, b"bb").is_ok());

    match store.write(3, b"c") {
        Err(StoreError::CapacityExceeded { bound: 2 }) => {}
        other => panic!("expected CapacityExceeded, got {:?}", other),
    }
}

#[test]
fn test_unlimited_after_clearing_bound() {
    let mut store = empty_store(64);
    store.set_max_records(Some(1));
    store.write(1, b"a").unwrap();

    store.set_max_records(None);
    assert!(store.write(2, b"b").is_ok());
}

#[test]
fn test_read_beyond_bound_rejected() {
    let mut store = empty_store(64);
    store.write(1, b"a").unwrap();
    store.set_max_records(Some(1));

    match store.read(2) {
        Err(StoreError::CapacityExceeded { bound: 1 }) => {}
        other => panic!("expected CapacityExceeded, got {:?}", other),
    }
}

// =============================================================================
// Read Edge Cases
// =============================================================================

#[test]
fn test_position_zero_rejected() {
    let mut store = empty_store(32);

    assert!(matches!(store.write(0, b"x"), Err(StoreError::InvalidPosition)));
    assert!(matches!(store.read(0), Err(StoreError::InvalidPosition)));
}

#[test]
fn test_read_past_end_is_not_found() {
    let mut store = empty_store(32);
    store.write(1, b"only").unwrap();

    match store.read(2) {
        Err(StoreError::NotFound { position: 2 }) => {}
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_read_never_extends() {
    let mut store = empty_store(32);
    let _ = store.read(3);
    assert_eq!(store.check().unwrap(), 0);
}

#[test]
fn test_read_into_truncates_but_returns_declared_length() {
    let mut store = empty_store(32);
    store.write(1, b"abcdef").unwrap();

    let mut buf = [0u8; 4];
    let declared = store.read_into(1, &mut buf).unwrap();

    assert_eq!(declared, 6);
    assert_eq!(&buf, b"abcd");
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_init_is_idempotent() {
    let mut store = empty_store(32);
    store.write(1, b"gone").unwrap();

    store.init().unwrap();
    assert_eq!(store.check().unwrap(), 0);

    store.init().unwrap();
    assert_eq!(store.check().unwrap(), 0);
}

#[test]
fn test_fresh_erased_device_is_a_valid_empty_store() {
    // erased cells read 0xFF, which is the terminator
    let store = RecordStore::new(MemDevice::new(16));
    assert_eq!(store.check().unwrap(), 0);
}

// =============================================================================
// Corruption
// =============================================================================

#[test]
fn test_check_detects_length_running_past_capacity() {
    // a record claiming 200 bytes inside an 8-byte device
    let mut image = vec![0u8; 8];
    image[0] = 200;
    let store = RecordStore::new(MemDevice::from_image(image));

    assert!(matches!(store.check(), Err(StoreError::CorruptStore)));
}

#[test]
fn test_check_detects_missing_terminator() {
    // zero-length records wall to wall, never a terminator
    let store = RecordStore::new(MemDevice::from_image(vec![0u8; 8]));
    assert!(matches!(store.check(), Err(StoreError::CorruptStore)));
}

#[test]
fn test_open_auto_initializes_corrupt_device() {
    let mut image = vec![0u8; 16];
    image[0] = 200;

    let store = RecordStore::open(MemDevice::from_image(image)).unwrap();
    assert_eq!(store.check().unwrap(), 0);
}

#[test]
fn test_open_keeps_valid_content() {
    let mut seed = RecordStore::new(MemDevice::new(32));
    seed.init().unwrap();
    seed.write(1, b"keep").unwrap();

    let store = RecordStore::open(MemDevice::from_image(
        seed.device().as_bytes().to_vec(),
    ))
    .unwrap();
    assert_eq!(store.check().unwrap(), 1);
    assert_eq!(store.read(1).unwrap(), b"keep");
}

#[test]
fn test_write_on_corrupt_store_reports_corruption() {
    let mut image = vec![0u8; 8];
    image[0] = 200;
    let mut store = RecordStore::new(MemDevice::from_image(image));

    match store.write(2, b"x") {
        Err(StoreError::CorruptStore) => {}
        other => panic!("expected CorruptStore, got {:?}", other),
    }
}
