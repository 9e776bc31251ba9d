//! S4: flipping a data byte leaves the footer valid; flipping a footer byte
//! (other than the checksum field itself) is caught on reopen.

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};

use vhdfix::{sizes, CreateOptions, DiskHandle, VhdError};

fn flip_byte_at(path: &std::path::Path, offset: u64) {
    let mut file = OpenOptions::new().read(true).write(true).open(path).unwrap();
    file.seek(SeekFrom::Start(offset)).unwrap();
    let mut byte = [0u8; 1];
    std::io::Read::read_exact(&mut file, &mut byte).unwrap();
    byte[0] ^= 0xFF;
    file.seek(SeekFrom::Start(offset)).unwrap();
    file.write_all(&byte).unwrap();
}

#[test]
fn flipping_a_data_byte_still_reopens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.vhd");
    DiskHandle::create(&path, 4 * sizes::MIB, CreateOptions::default()).unwrap();

    flip_byte_at(&path, 0);

    let reopened = DiskHandle::open(&path).unwrap();
    assert!(reopened.footer().verify().is_ok());
}

#[test]
fn flipping_a_footer_byte_fails_checksum() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.vhd");
    DiskHandle::create(&path, 4 * sizes::MIB, CreateOptions::default()).unwrap();

    let footer_start = 4 * sizes::MIB; // cookie byte, well outside the checksum field
    flip_byte_at(&path, footer_start);

    let err = DiskHandle::open(&path).unwrap_err();
    assert!(matches!(err, VhdError::BadChecksum { .. }));
}
