//! S3 and S5: bounds-checked reads/writes and SEEK_END semantics, exercised
//! against a real on-disk file rather than the in-memory cursor the unit
//! tests in `src/disk.rs` use.

use vhdfix::{sizes, CreateOptions, DiskHandle, SectorSeek, VhdError};

#[test]
fn bounded_write_at_last_sector() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.vhd");
    let mut handle = DiskHandle::create(&path, 4 * sizes::MIB, CreateOptions::default()).unwrap();

    let last_sector = handle.footer().current_size / sizes::SECTOR_U64 - 1;
    handle.seek(SectorSeek::Start(last_sector)).unwrap();
    handle.write(&[0xAB; 512], 1).unwrap();

    handle.seek(SectorSeek::Start(last_sector)).unwrap();
    let err = handle.write(&[0xAB; 1024], 2).unwrap_err();
    assert!(matches!(err, VhdError::OutOfBounds { .. }));
}

#[test]
fn seek_end_then_tell_reports_sector_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.vhd");
    let mut handle = DiskHandle::create(&path, 4 * sizes::MIB, CreateOptions::default()).unwrap();

    let sector = handle.seek(SectorSeek::End).unwrap();
    assert_eq!(sector, 8192);
    assert_eq!(handle.tell().unwrap(), 8192);

    let mut buf = [0u8; 512];
    let err = handle.read(&mut buf, 1).unwrap_err();
    assert!(matches!(err, VhdError::OutOfBounds { .. }));
}

#[test]
fn read_after_write_round_trips_a_sector() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.vhd");
    let mut handle = DiskHandle::create(&path, 4 * sizes::MIB, CreateOptions::default()).unwrap();

    handle.seek(SectorSeek::Start(10)).unwrap();
    handle.write(&[0x42; 512], 1).unwrap();

    handle.seek(SectorSeek::Start(10)).unwrap();
    let mut buf = [0u8; 512];
    handle.read(&mut buf, 1).unwrap();
    assert_eq!(buf, [0x42; 512]);
}
