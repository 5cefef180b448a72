use std::io::Write;

use super::file_io::open_file_for_append;

#[test]
fn test_open_file_for_append_creates_missing_parents() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("nested/logs/crypto-vote.log");

    let mut file = open_file_for_append(&path).unwrap();
    file.write_all(b"first\n").unwrap();
    drop(file);

    let mut file = open_file_for_append(&path).unwrap();
    file.write_all(b"second\n").unwrap();
    drop(file);

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "first\nsecond\n");
}
