//! S1: creating a 4 MiB fixed disk on a real file.

use uuid::Uuid;
use vhdfix::{sizes, CreateOptions, DiskHandle, FixedClock, FixedIdSource, CREATOR_HOST_OS_MAC};

fn options() -> CreateOptions {
    CreateOptions::default()
        .clock(FixedClock(0))
        .id_source(FixedIdSource(Uuid::from_bytes([0x0F; 16])))
        .creator_application(*b"vnil")
        .creator_host_os(CREATOR_HOST_OS_MAC)
}

#[test]
fn four_mib_file_has_expected_length_and_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.vhd");

    let handle = DiskHandle::create(&path, 4 * sizes::MIB, options()).unwrap();
    assert_eq!(handle.footer().disk_geometry, 0x0078_1411);
    assert!(handle.footer().verify().is_ok());
    drop(handle);

    let len = std::fs::metadata(&path).unwrap().len();
    assert_eq!(len, 4 * sizes::MIB + 512);
}

#[test]
fn last_512_bytes_are_a_valid_big_endian_footer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.vhd");
    DiskHandle::create(&path, 4 * sizes::MIB, options()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let footer_bytes = &bytes[bytes.len() - 512..];
    assert_eq!(&footer_bytes[0..8], b"conectix");

    let footer = vhdfix::Footer::decode(footer_bytes).unwrap();
    assert!(footer.verify().is_ok());
    assert_eq!(footer.current_size, 4 * sizes::MIB);
}

#[test]
fn reopening_a_freshly_created_disk_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.vhd");
    DiskHandle::create(&path, 4 * sizes::MIB, options()).unwrap();

    let reopened = DiskHandle::open(&path).unwrap();
    assert_eq!(reopened.footer().current_size, 4 * sizes::MIB);
    assert_eq!(reopened.footer().uuid, Uuid::from_bytes([0x0F; 16]));
    assert!(reopened.footer().verify().is_ok());
}
